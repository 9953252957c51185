//! Control and company activity EFs.

use ddd_format::{DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::{CyclicRecords, EfContext, EfContent};
use crate::enums::CompanyActivityType;
use crate::types::{ControlType, FixedSize, FullCardNumber, VehicleRegistration};

/// A control: the driver card records the last one it was subject to, a
/// control card records every control it performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlActivityRecord {
    pub control_type: ControlType,
    pub control_time: TimeReal,
    /// Control card on driver and workshop cards, controlled card on
    /// control cards.
    pub card_number: FullCardNumber,
    pub vehicle_registration: VehicleRegistration,
    pub download_period_begin: TimeReal,
    pub download_period_end: TimeReal,
}

impl DecodeGen for ControlActivityRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            control_type: r.decode()?,
            control_time: r.decode()?,
            card_number: FullCardNumber::decode_gen(r, generation)?,
            vehicle_registration: r.decode()?,
            download_period_begin: r.decode()?,
            download_period_end: r.decode()?,
        })
    }
}

impl EncodeGen for ControlActivityRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.control_type.encode(out)?;
        self.control_time.encode(out)?;
        self.card_number.encode_gen(generation, out)?;
        self.vehicle_registration.encode(out)?;
        self.download_period_begin.encode(out)?;
        self.download_period_end.encode(out)
    }
}

impl FixedSize for ControlActivityRecord {
    fn size(generation: Generation) -> usize {
        28 + FullCardNumber::wire_len(generation)
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw[1..5] == [0; 4]
    }
}

/// EF_Control_Activity_Data holds exactly one record, possibly all zero.
impl EfContent for ControlActivityRecord {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        Self::decode_gen(r, ctx.generation)
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.encode_gen(ctx.generation, out)
    }
}

pub type ControlActivityData = ControlActivityRecord;

pub type ControllerActivityData = CyclicRecords<ControlActivityRecord>;

/// CompanyActivityRecord (46 bytes, 47 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyActivityRecord {
    pub company_activity_type: CompanyActivityType,
    pub company_activity_time: TimeReal,
    pub card_number_information: FullCardNumber,
    pub vehicle_registration_information: VehicleRegistration,
    pub download_period_begin: TimeReal,
    pub download_period_end: TimeReal,
}

impl DecodeGen for CompanyActivityRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            company_activity_type: r.decode()?,
            company_activity_time: r.decode()?,
            card_number_information: FullCardNumber::decode_gen(r, generation)?,
            vehicle_registration_information: r.decode()?,
            download_period_begin: r.decode()?,
            download_period_end: r.decode()?,
        })
    }
}

impl EncodeGen for CompanyActivityRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.company_activity_type.encode(out)?;
        self.company_activity_time.encode(out)?;
        self.card_number_information.encode_gen(generation, out)?;
        self.vehicle_registration_information.encode(out)?;
        self.download_period_begin.encode(out)?;
        self.download_period_end.encode(out)
    }
}

impl FixedSize for CompanyActivityRecord {
    fn size(generation: Generation) -> usize {
        28 + FullCardNumber::wire_len(generation)
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw[1..5] == [0; 4]
    }
}

pub type CompanyActivityData = CyclicRecords<CompanyActivityRecord>;
