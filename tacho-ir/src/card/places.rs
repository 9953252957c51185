//! Place, GNSS and generation 2 version 2 location EFs.

use ddd_format::codec::{put_u16, put_u24};
use ddd_format::{Decode, DecodeError, Encode, EncodeError, Generation, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::{CyclicRecords, EfContext, EfContent};
use crate::enums::{LoadType, NationNumeric, OperationType, PositionAuthenticationStatus};
use crate::types::{
    GnssPlaceAuthRecord, GnssPlaceRecord, PlaceRecord, Slot, decode_remaining_records, encode_records, fixed_record,
    read_u24,
};

/// CardPlaceDailyWorkPeriod. The newest-record pointer is one byte wide in
/// generation 1 and two bytes in generation 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Places {
    pub place_pointer_newest_record: u16,
    pub records: Vec<Slot<PlaceRecord>>,
}

impl EfContent for Places {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        let place_pointer_newest_record = match ctx.generation {
            Generation::Gen1 => u16::from(r.u8()?),
            Generation::Gen2 => r.u16()?,
        };
        Ok(Self {
            place_pointer_newest_record,
            records: decode_remaining_records(r, ctx.generation)?,
        })
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match ctx.generation {
            Generation::Gen1 => {
                let pointer = u8::try_from(self.place_pointer_newest_record).map_err(|_| {
                    EncodeError::IntegerOverflow {
                        value: u64::from(self.place_pointer_newest_record),
                        bytes: 1,
                    }
                })?;
                out.push(pointer);
            }
            Generation::Gen2 => put_u16(out, self.place_pointer_newest_record),
        }
        encode_records(&self.records, ctx.generation, out)
    }
}

/// GNSSAccumulatedDrivingRecord (18 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnssAccumulatedDrivingRecord {
    pub time_stamp: TimeReal,
    pub gnss_place_record: GnssPlaceRecord,
    pub vehicle_odometer_value: u32,
}

impl Decode for GnssAccumulatedDrivingRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            gnss_place_record: r.decode()?,
            vehicle_odometer_value: read_u24(r)?,
        })
    }
}

impl Encode for GnssAccumulatedDrivingRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        self.gnss_place_record.encode(out)?;
        put_u24(out, self.vehicle_odometer_value)
    }
}

fixed_record!(GnssAccumulatedDrivingRecord, 18, unpopulated: ..4);

pub type GnssPlaces = CyclicRecords<GnssAccumulatedDrivingRecord>;

/// PlaceAuthStatusRecord (5 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceAuthStatusRecord {
    pub entry_time: TimeReal,
    pub authentication_status: PositionAuthenticationStatus,
}

impl Decode for PlaceAuthStatusRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            entry_time: r.decode()?,
            authentication_status: r.decode()?,
        })
    }
}

impl Encode for PlaceAuthStatusRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.entry_time.encode(out)?;
        self.authentication_status.encode(out)
    }
}

fixed_record!(PlaceAuthStatusRecord, 5, unpopulated: ..4);

/// Authentication status of place records and of GNSS accumulated driving
/// positions; both EFs share this layout.
pub type PlacesAuthentication = CyclicRecords<PlaceAuthStatusRecord>;

/// CardBorderCrossingRecord (17 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBorderCrossingRecord {
    pub country_left: NationNumeric,
    pub country_entered: NationNumeric,
    pub gnss_place_auth_record: GnssPlaceAuthRecord,
    pub vehicle_odometer_value: u32,
}

impl Decode for CardBorderCrossingRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            country_left: r.decode()?,
            country_entered: r.decode()?,
            gnss_place_auth_record: r.decode()?,
            vehicle_odometer_value: read_u24(r)?,
        })
    }
}

impl Encode for CardBorderCrossingRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.country_left.encode(out)?;
        self.country_entered.encode(out)?;
        self.gnss_place_auth_record.encode(out)?;
        put_u24(out, self.vehicle_odometer_value)
    }
}

fixed_record!(CardBorderCrossingRecord, 17, unpopulated: 2..6);

pub type BorderCrossings = CyclicRecords<CardBorderCrossingRecord>;

/// CardLoadUnloadRecord (20 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLoadUnloadRecord {
    pub time_stamp: TimeReal,
    pub operation_type: OperationType,
    pub gnss_place_auth_record: GnssPlaceAuthRecord,
    pub vehicle_odometer_value: u32,
}

impl Decode for CardLoadUnloadRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            operation_type: r.decode()?,
            gnss_place_auth_record: r.decode()?,
            vehicle_odometer_value: read_u24(r)?,
        })
    }
}

impl Encode for CardLoadUnloadRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        self.operation_type.encode(out)?;
        self.gnss_place_auth_record.encode(out)?;
        put_u24(out, self.vehicle_odometer_value)
    }
}

fixed_record!(CardLoadUnloadRecord, 20, unpopulated: ..4);

pub type LoadUnloadOperations = CyclicRecords<CardLoadUnloadRecord>;

/// CardLoadTypeEntryRecord (5 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLoadTypeEntryRecord {
    pub time_stamp: TimeReal,
    pub load_type_entered: LoadType,
}

impl Decode for CardLoadTypeEntryRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            load_type_entered: r.decode()?,
        })
    }
}

impl Encode for CardLoadTypeEntryRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        self.load_type_entered.encode(out)
    }
}

fixed_record!(CardLoadTypeEntryRecord, 5, unpopulated: ..4);

pub type LoadTypeEntries = CyclicRecords<CardLoadTypeEntryRecord>;
