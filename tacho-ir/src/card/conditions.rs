//! EF_Current_Usage and EF_Specific_Conditions.

use ddd_format::codec::put_u16;
use ddd_format::{DecodeError, Encode, EncodeError, Generation, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::{EfContext, EfContent};
use crate::types::{Slot, SpecificConditionRecord, VehicleRegistration, decode_remaining_records, encode_records};

/// CardCurrentUse (19 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUsage {
    pub session_open_time: TimeReal,
    pub session_open_vehicle: VehicleRegistration,
}

impl EfContent for CurrentUsage {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            session_open_time: r.decode()?,
            session_open_vehicle: r.decode()?,
        })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.session_open_time.encode(out)?;
        self.session_open_vehicle.encode(out)
    }
}

/// Out-of-scope and ferry/train records. Generation 2 cards prefix the
/// records with a newest-record pointer; generation 1 cards store them bare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificConditions {
    pub newest_record_index: Option<u16>,
    pub records: Vec<Slot<SpecificConditionRecord>>,
}

impl EfContent for SpecificConditions {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        let newest_record_index = match ctx.generation {
            Generation::Gen1 => None,
            Generation::Gen2 => Some(r.u16()?),
        };
        Ok(Self {
            newest_record_index,
            records: decode_remaining_records(r, ctx.generation)?,
        })
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if ctx.generation == Generation::Gen2 {
            put_u16(out, self.newest_record_index.unwrap_or(0));
        }
        encode_records(&self.records, ctx.generation, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardType;
    use crate::enums::SpecificConditionType;

    #[test]
    fn gen2_conditions_have_pointer() {
        let raw = [0x00, 0x01, 0x5E, 0x0B, 0xE1, 0x00, 0x03, 0x5E, 0x0C, 0x32, 0x80, 0x04];
        let ctx = EfContext {
            card_type: CardType::DriverCard,
            generation: Generation::Gen2,
        };
        let mut r = Reader::new(&raw);
        let conditions = SpecificConditions::decode_ef(&mut r, ctx).unwrap();
        assert_eq!(conditions.newest_record_index, Some(1));
        assert_eq!(
            conditions.records[1].valid().map(|c| c.specific_condition_type),
            Some(SpecificConditionType::FerryTrainCrossingEnd)
        );
        let mut out = Vec::new();
        conditions.encode_ef(ctx, &mut out).unwrap();
        assert_eq!(out, raw);
    }
}
