//! EF_Events_Data and EF_Faults_Data.

use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::{EfContext, EfContent};
use crate::enums::EventFaultType;
use crate::types::{Slot, VehicleRegistration, decode_remaining_records, encode_records, fixed_record};

/// CardEventRecord / CardFaultRecord (24 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEventFaultRecord {
    pub event_fault_type: EventFaultType,
    pub begin_time: TimeReal,
    pub end_time: TimeReal,
    pub vehicle_registration: VehicleRegistration,
}

impl Decode for CardEventFaultRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            event_fault_type: r.decode()?,
            begin_time: r.decode()?,
            end_time: r.decode()?,
            vehicle_registration: r.decode()?,
        })
    }
}

impl Encode for CardEventFaultRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.event_fault_type.encode(out)?;
        self.begin_time.encode(out)?;
        self.end_time.encode(out)?;
        self.vehicle_registration.encode(out)
    }
}

// A slot that was never written has a zero begin time
fixed_record!(CardEventFaultRecord, 24, unpopulated: 1..5);

/// Event or fault records, grouped by type on the card but stored as one
/// flat sequence here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsData {
    pub records: Vec<Slot<CardEventFaultRecord>>,
}

pub type FaultsData = EventsData;

impl EventsData {
    pub fn populated(&self) -> impl Iterator<Item = &CardEventFaultRecord> {
        self.records.iter().filter_map(Slot::valid)
    }
}

impl EfContent for EventsData {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            records: decode_remaining_records(r, ctx.generation)?,
        })
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_records(&self.records, ctx.generation, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardType;
    use ddd_format::Generation;

    fn record(kind: u8, begin: u32) -> Vec<u8> {
        let mut raw = vec![kind];
        raw.extend_from_slice(&begin.to_be_bytes());
        raw.extend_from_slice(&(begin + 60).to_be_bytes());
        raw.push(0x0D);
        raw.push(0x01);
        raw.extend_from_slice(b"B AB 1234    ");
        raw
    }

    #[test]
    fn empty_slots_stay_raw() {
        let mut raw = record(0x05, 0x5E0B_E100);
        raw.extend_from_slice(&[0u8; 24]);
        raw.extend(record(0x2F, 0x5E0B_E200));
        let ctx = EfContext {
            card_type: CardType::DriverCard,
            generation: Generation::Gen1,
        };
        let mut r = Reader::new(&raw);
        let events = EventsData::decode_ef(&mut r, ctx).unwrap();
        assert_eq!(events.records.len(), 3);
        assert!(events.records[0].is_valid());
        assert_eq!(events.records[1], Slot::Invalid(vec![0; 24]));
        // Out-of-table type is kept, not rejected
        let third = events.records[2].valid().unwrap();
        assert_eq!(third.event_fault_type, EventFaultType::Unrecognized(0x2F));
        assert_eq!(events.populated().count(), 2);

        let mut out = Vec::new();
        events.encode_ef(ctx, &mut out).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn partial_record_is_an_error() {
        let ctx = EfContext {
            card_type: CardType::DriverCard,
            generation: Generation::Gen1,
        };
        let raw = [0u8; 30];
        assert!(EventsData::decode_ef(&mut Reader::new(&raw), ctx).is_err());
    }
}
