//! EF_Vehicles_Used and EF_VehicleUnits_Used.

use ddd_format::bcd::{read_bcd_u16, write_bcd_u16};
use ddd_format::codec::put_u24;
use ddd_format::{DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue, TimeReal};
use serde::{Deserialize, Serialize};

use super::CyclicRecords;
use crate::types::{FixedSize, VIN_LEN, VehicleRegistration, read_u24};

/// CardVehicleRecord: 31 bytes, 48 in generation 2 where the VIN is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVehicleRecord {
    pub vehicle_odometer_begin: u32,
    pub vehicle_odometer_end: u32,
    pub vehicle_first_use: TimeReal,
    pub vehicle_last_use: TimeReal,
    pub registration: VehicleRegistration,
    /// BCD counter of the VU data block in use when the card was withdrawn.
    pub vu_data_block_counter: u16,
    pub vehicle_identification_number: Option<StringValue>,
}

impl DecodeGen for CardVehicleRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            vehicle_odometer_begin: read_u24(r)?,
            vehicle_odometer_end: read_u24(r)?,
            vehicle_first_use: r.decode()?,
            vehicle_last_use: r.decode()?,
            registration: r.decode()?,
            vu_data_block_counter: read_bcd_u16(r)?,
            vehicle_identification_number: match generation {
                Generation::Gen1 => None,
                Generation::Gen2 => Some(StringValue::read_ia5(r, VIN_LEN)?),
            },
        })
    }
}

impl EncodeGen for CardVehicleRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u24(out, self.vehicle_odometer_begin)?;
        put_u24(out, self.vehicle_odometer_end)?;
        self.vehicle_first_use.encode(out)?;
        self.vehicle_last_use.encode(out)?;
        self.registration.encode(out)?;
        write_bcd_u16(self.vu_data_block_counter, out)?;
        if generation == Generation::Gen2 {
            self.vehicle_identification_number
                .clone()
                .unwrap_or_default()
                .write_ia5(VIN_LEN, out)?;
        }
        Ok(())
    }
}

impl FixedSize for CardVehicleRecord {
    fn size(generation: Generation) -> usize {
        match generation {
            Generation::Gen1 => 31,
            Generation::Gen2 => 48,
        }
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw[6..10] == [0; 4]
    }
}

pub type VehiclesUsed = CyclicRecords<CardVehicleRecord>;

/// CardVehicleUnitRecord (10 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVehicleUnitRecord {
    pub time_stamp: TimeReal,
    pub manufacturer_code: u8,
    pub device_id: u8,
    pub vu_software_version: StringValue,
}

impl DecodeGen for CardVehicleUnitRecord {
    fn decode_gen(r: &mut Reader<'_>, _generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            manufacturer_code: r.u8()?,
            device_id: r.u8()?,
            vu_software_version: StringValue::read_ia5(r, 4)?,
        })
    }
}

impl EncodeGen for CardVehicleUnitRecord {
    fn encode_gen(&self, _generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        out.push(self.manufacturer_code);
        out.push(self.device_id);
        self.vu_software_version.write_ia5(4, out)
    }
}

impl FixedSize for CardVehicleUnitRecord {
    fn size(_generation: Generation) -> usize {
        10
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw[..4] == [0; 4]
    }
}

pub type VehicleUnitsUsed = CyclicRecords<CardVehicleUnitRecord>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, EfContent, EfContext};
    use crate::types::Slot;

    fn vehicle_record(counter: [u8; 2]) -> Vec<u8> {
        let mut raw = vec![0x01, 0x86, 0xA0, 0x01, 0x87, 0x04];
        raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00, 0x5E, 0x0C, 0x32, 0x80]);
        raw.push(0x0D);
        raw.push(0x01);
        raw.extend_from_slice(b"M XY 42      ");
        raw.extend_from_slice(&counter);
        raw
    }

    #[test]
    fn bad_block_counter_only_invalidates_its_record() {
        let mut raw = vec![0x00, 0x01];
        raw.extend(vehicle_record([0x00, 0x17]));
        raw.extend(vehicle_record([0x00, 0x1F]));
        let ctx = EfContext {
            card_type: CardType::DriverCard,
            generation: Generation::Gen1,
        };
        let mut r = Reader::new(&raw);
        let used = VehiclesUsed::decode_ef(&mut r, ctx).unwrap();
        assert_eq!(used.records.len(), 2);
        let first = used.records[0].valid().unwrap();
        assert_eq!(first.vehicle_odometer_begin, 100_000);
        assert_eq!(first.vu_data_block_counter, 17);
        assert!(matches!(used.records[1], Slot::Invalid(_)));

        let mut out = Vec::new();
        used.encode_ef(ctx, &mut out).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn gen2_record_carries_vin() {
        let mut raw = vehicle_record([0x00, 0x01]);
        raw.extend_from_slice(b"WDB9634031L123456");
        let slot = Slot::<CardVehicleRecord>::decode_record(&raw, Generation::Gen2);
        let record = slot.valid().unwrap();
        assert_eq!(
            record.vehicle_identification_number.as_ref().map(StringValue::as_str),
            Some("WDB9634031L123456")
        );
    }
}
