//! EF_Calibration on workshop cards.

use ddd_format::codec::{put_u16, put_u24};
use ddd_format::{
    Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue, TimeReal,
};
use serde::{Deserialize, Serialize};

use super::{EfContext, EfContent};
use crate::enums::{CalibrationPurpose, EquipmentType};
use crate::types::{
    ExtendedSerialNumber, FixedSize, Slot, VIN_LEN, VehicleRegistration, decode_remaining_records, encode_records,
    read_u24,
};

/// Seal fitted during a calibration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealRecord {
    pub equipment_type: EquipmentType,
    pub manufacturer_code: u16,
    pub seal_identifier: [u8; 6],
}

impl Decode for SealRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            equipment_type: r.decode()?,
            manufacturer_code: r.u16()?,
            seal_identifier: r.array()?,
        })
    }
}

impl Encode for SealRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.equipment_type.encode(out)?;
        put_u16(out, self.manufacturer_code);
        out.extend_from_slice(&self.seal_identifier);
        Ok(())
    }
}

/// Seal slots in SealDataCard; `no_of_seal_records` tells how many are used.
pub const SEAL_SLOTS: usize = 5;

/// Equipment data generation 2 appends to a calibration record (62 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationEquipment {
    pub sensor_gnss_serial_number: ExtendedSerialNumber,
    pub rcm_serial_number: ExtendedSerialNumber,
    pub no_of_seal_records: u8,
    pub seal_records: Vec<SealRecord>,
}

const CALIBRATION_EQUIPMENT_LEN: usize = 62;

impl Decode for CalibrationEquipment {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sensor_gnss_serial_number: r.decode()?,
            rcm_serial_number: r.decode()?,
            no_of_seal_records: r.u8()?,
            seal_records: r.decode_n(SEAL_SLOTS)?,
        })
    }
}

impl Encode for CalibrationEquipment {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if self.seal_records.len() != SEAL_SLOTS {
            return Err(EncodeError::LengthMismatch {
                field: "seal records",
                expected: SEAL_SLOTS,
                actual: self.seal_records.len(),
            });
        }
        self.sensor_gnss_serial_number.encode(out)?;
        self.rcm_serial_number.encode(out)?;
        out.push(self.no_of_seal_records);
        for seal in &self.seal_records {
            seal.encode(out)?;
        }
        Ok(())
    }
}

/// WorkshopCardCalibrationRecord (105 bytes, 167 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopCalibrationRecord {
    pub calibration_purpose: CalibrationPurpose,
    pub vehicle_identification_number: StringValue,
    pub vehicle_registration: VehicleRegistration,
    pub w_vehicle_characteristic_constant: u16,
    pub k_constant_of_recording_equipment: u16,
    pub l_tyre_circumference: u16,
    pub tyre_size: StringValue,
    pub authorised_speed: u8,
    pub old_odometer_value: u32,
    pub new_odometer_value: u32,
    pub old_time_value: TimeReal,
    pub new_time_value: TimeReal,
    pub next_calibration_date: TimeReal,
    pub vu_part_number: StringValue,
    pub vu_serial_number: ExtendedSerialNumber,
    pub sensor_serial_number: ExtendedSerialNumber,
    /// Generation 2 only.
    pub equipment: Option<CalibrationEquipment>,
}

impl DecodeGen for WorkshopCalibrationRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            calibration_purpose: r.decode()?,
            vehicle_identification_number: StringValue::read_ia5(r, VIN_LEN)?,
            vehicle_registration: r.decode()?,
            w_vehicle_characteristic_constant: r.u16()?,
            k_constant_of_recording_equipment: r.u16()?,
            l_tyre_circumference: r.u16()?,
            tyre_size: StringValue::read_ia5(r, 15)?,
            authorised_speed: r.u8()?,
            old_odometer_value: read_u24(r)?,
            new_odometer_value: read_u24(r)?,
            old_time_value: r.decode()?,
            new_time_value: r.decode()?,
            next_calibration_date: r.decode()?,
            vu_part_number: StringValue::read_ia5(r, 16)?,
            vu_serial_number: r.decode()?,
            sensor_serial_number: r.decode()?,
            equipment: match generation {
                Generation::Gen1 => None,
                Generation::Gen2 => Some(r.decode()?),
            },
        })
    }
}

impl EncodeGen for WorkshopCalibrationRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.calibration_purpose.encode(out)?;
        self.vehicle_identification_number.write_ia5(VIN_LEN, out)?;
        self.vehicle_registration.encode(out)?;
        put_u16(out, self.w_vehicle_characteristic_constant);
        put_u16(out, self.k_constant_of_recording_equipment);
        put_u16(out, self.l_tyre_circumference);
        self.tyre_size.write_ia5(15, out)?;
        out.push(self.authorised_speed);
        put_u24(out, self.old_odometer_value)?;
        put_u24(out, self.new_odometer_value)?;
        self.old_time_value.encode(out)?;
        self.new_time_value.encode(out)?;
        self.next_calibration_date.encode(out)?;
        self.vu_part_number.write_ia5(16, out)?;
        self.vu_serial_number.encode(out)?;
        self.sensor_serial_number.encode(out)?;
        match (generation, &self.equipment) {
            (Generation::Gen1, _) => Ok(()),
            (Generation::Gen2, Some(equipment)) => equipment.encode(out),
            (Generation::Gen2, None) => {
                out.extend_from_slice(&[0; CALIBRATION_EQUIPMENT_LEN]);
                Ok(())
            }
        }
    }
}

impl FixedSize for WorkshopCalibrationRecord {
    fn size(generation: Generation) -> usize {
        match generation {
            Generation::Gen1 => 105,
            Generation::Gen2 => 105 + CALIBRATION_EQUIPMENT_LEN,
        }
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw.iter().all(|&b| b == 0)
    }
}

/// EF_Calibration content.
///
/// A generation 2 record area that does not split into whole records is
/// carried as opaque bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Calibration {
    Records {
        calibration_total_number: u16,
        calibration_pointer_newest_record: u8,
        records: Vec<Slot<WorkshopCalibrationRecord>>,
    },
    Opaque(Vec<u8>),
}

impl Calibration {
    fn decode_records(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self::Records {
            calibration_total_number: r.u16()?,
            calibration_pointer_newest_record: r.u8()?,
            records: decode_remaining_records(r, generation)?,
        })
    }
}

impl EfContent for Calibration {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        let mut body = Reader::new(r.peek_rest());
        match Self::decode_records(&mut body, ctx.generation) {
            Ok(calibration) => {
                r.rest();
                Ok(calibration)
            }
            Err(e) if ctx.generation == Generation::Gen2 => {
                log::warn!("generation 2 calibration kept opaque: {e}");
                Ok(Self::Opaque(r.rest().to_vec()))
            }
            Err(e) => Err(e),
        }
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match self {
            Self::Records {
                calibration_total_number,
                calibration_pointer_newest_record,
                records,
            } => {
                put_u16(out, *calibration_total_number);
                out.push(*calibration_pointer_newest_record);
                encode_records(records, ctx.generation, out)
            }
            Self::Opaque(raw) => {
                out.extend_from_slice(raw);
                Ok(())
            }
        }
    }
}
