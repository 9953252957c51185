use ddd_format::codec::{put_u16, put_u24};
use ddd_format::{
    Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue,
    TimeReal,
};
use serde::{Deserialize, Serialize};

use crate::enums::{
    EntryTypeDailyWorkPeriod, EquipmentType, NationNumeric, PositionAuthenticationStatus,
    SpecificConditionType,
};

/// Body width of Name and Address fields (after the code page byte).
pub const NAME_LEN: usize = 35;
/// Body width of VehicleRegistrationNumber (after the code page byte).
pub const VRN_LEN: usize = 13;
pub const CARD_NUMBER_LEN: usize = 16;
pub const VIN_LEN: usize = 17;

// --- Record-level fallback ---

/// A decoded value, or the bytes it was read from when decoding failed.
///
/// `Invalid` is written back verbatim, which is what keeps malformed or
/// unpopulated records byte-exact through a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot<T> {
    Valid(T),
    Invalid(Vec<u8>),
}

impl<T> Slot<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Fixed-width repeating record.
pub trait FixedSize: DecodeGen + EncodeGen {
    fn size(generation: Generation) -> usize;

    /// Wire bytes that stand for an empty slot rather than a record.
    fn is_unpopulated(_raw: &[u8]) -> bool {
        false
    }
}

/// Whether `value` encodes back to exactly `raw`.
pub(crate) fn reencodes<T: EncodeGen>(value: &T, generation: Generation, raw: &[u8]) -> bool {
    let mut out = Vec::with_capacity(raw.len());
    value.encode_gen(generation, &mut out).is_ok() && out == raw
}

impl<T: FixedSize> Slot<T> {
    pub fn decode_record(raw: &[u8], generation: Generation) -> Self {
        if T::is_unpopulated(raw) {
            return Self::Invalid(raw.to_vec());
        }
        let mut r = Reader::new(raw);
        match T::decode_gen(&mut r, generation).and_then(|v| r.expect_end().map(|()| v)) {
            Ok(v) if reencodes(&v, generation, raw) => Self::Valid(v),
            Ok(_) => {
                log::warn!("{}-byte record does not re-encode identically, keeping raw bytes", raw.len());
                Self::Invalid(raw.to_vec())
            }
            Err(e) => {
                log::warn!("{}-byte record kept raw: {e}", raw.len());
                Self::Invalid(raw.to_vec())
            }
        }
    }

    pub fn encode_record(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let start = out.len();
        match self {
            Self::Valid(v) => v.encode_gen(generation, out)?,
            Self::Invalid(raw) => out.extend_from_slice(raw),
        }
        let written = out.len() - start;
        if written != T::size(generation) {
            return Err(EncodeError::LengthMismatch {
                field: "record",
                expected: T::size(generation),
                actual: written,
            });
        }
        Ok(())
    }
}

/// Decode `count` fixed-size records, each falling back on its own.
pub(crate) fn decode_records<T: FixedSize>(
    r: &mut Reader<'_>,
    count: usize,
    generation: Generation,
) -> Result<Vec<Slot<T>>, DecodeError> {
    let size = T::size(generation);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(Slot::decode_record(r.take(size)?, generation));
    }
    Ok(records)
}

/// Decode every remaining byte as fixed-size records.
pub(crate) fn decode_remaining_records<T: FixedSize>(
    r: &mut Reader<'_>,
    generation: Generation,
) -> Result<Vec<Slot<T>>, DecodeError> {
    let size = T::size(generation);
    let remaining = r.remaining();
    if remaining % size != 0 {
        return Err(DecodeError::InvalidValue {
            field: "record area",
            reason: format!("{remaining} bytes is not a multiple of the {size}-byte record size"),
        });
    }
    decode_records(r, remaining / size, generation)
}

pub(crate) fn encode_records<T: FixedSize>(
    records: &[Slot<T>],
    generation: Generation,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    for record in records {
        record.encode_record(generation, out)?;
    }
    Ok(())
}

pub(crate) fn decode_n_gen<T: DecodeGen>(
    r: &mut Reader<'_>,
    count: usize,
    generation: Generation,
) -> Result<Vec<T>, DecodeError> {
    (0..count).map(|_| T::decode_gen(r, generation)).collect()
}

pub(crate) fn encode_all_gen<T: EncodeGen>(
    items: &[T],
    generation: Generation,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    for item in items {
        item.encode_gen(generation, out)?;
    }
    Ok(())
}

pub(crate) fn read_name(r: &mut Reader<'_>) -> Result<StringValue, DecodeError> {
    StringValue::read_code_paged(r, NAME_LEN)
}

pub(crate) fn write_name(name: &StringValue, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    name.write_code_paged(NAME_LEN, out)
}

pub(crate) fn read_u24(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    r.u24()
}

/// Implement the generation-aware record traits for a record whose layout
/// is the same in every generation. `unpopulated` names the bytes that are
/// all zero in a slot that was never written.
macro_rules! fixed_record {
    ($ty:ty, $size:expr, unpopulated: $range:expr) => {
        impl ddd_format::DecodeGen for $ty {
            fn decode_gen(
                r: &mut ddd_format::Reader<'_>,
                _generation: ddd_format::Generation,
            ) -> Result<Self, ddd_format::DecodeError> {
                <Self as ddd_format::Decode>::decode(r)
            }
        }

        impl ddd_format::EncodeGen for $ty {
            fn encode_gen(
                &self,
                _generation: ddd_format::Generation,
                out: &mut Vec<u8>,
            ) -> Result<(), ddd_format::EncodeError> {
                ddd_format::Encode::encode(self, out)
            }
        }

        impl $crate::types::FixedSize for $ty {
            fn size(_generation: ddd_format::Generation) -> usize {
                $size
            }

            fn is_unpopulated(raw: &[u8]) -> bool {
                raw[$range].iter().all(|&b| b == 0)
            }
        }
    };
}

pub(crate) use fixed_record;

// --- Shared data dictionary types ---

/// FullCardNumber (18 bytes); Gen2 FullCardNumberAndGeneration adds one
/// generation byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullCardNumber {
    pub card_type: EquipmentType,
    pub card_issuing_member_state: NationNumeric,
    pub card_number: StringValue,
    pub generation: Option<u8>,
}

impl DecodeGen for FullCardNumber {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            card_type: r.decode()?,
            card_issuing_member_state: r.decode()?,
            card_number: StringValue::read_ia5(r, CARD_NUMBER_LEN)?,
            generation: match generation {
                Generation::Gen1 => None,
                Generation::Gen2 => Some(r.u8()?),
            },
        })
    }
}

impl EncodeGen for FullCardNumber {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.card_type.encode(out)?;
        self.card_issuing_member_state.encode(out)?;
        self.card_number.write_ia5(CARD_NUMBER_LEN, out)?;
        if generation == Generation::Gen2 {
            out.push(self.generation.unwrap_or(0));
        }
        Ok(())
    }
}

impl FullCardNumber {
    pub fn wire_len(generation: Generation) -> usize {
        match generation {
            Generation::Gen1 => 18,
            Generation::Gen2 => 19,
        }
    }
}

/// VehicleRegistrationIdentification: nation plus code-paged number (15 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRegistration {
    pub nation: NationNumeric,
    pub number: StringValue,
}

impl Decode for VehicleRegistration {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            nation: r.decode()?,
            number: StringValue::read_code_paged(r, VRN_LEN)?,
        })
    }
}

impl Encode for VehicleRegistration {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.nation.encode(out)?;
        self.number.write_code_paged(VRN_LEN, out)
    }
}

/// HolderName: surname and first names, 36 bytes each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderName {
    pub surname: StringValue,
    pub first_names: StringValue,
}

impl Decode for HolderName {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            surname: read_name(r)?,
            first_names: read_name(r)?,
        })
    }
}

impl Encode for HolderName {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        write_name(&self.surname, out)?;
        write_name(&self.first_names, out)
    }
}

/// ExtendedSerialNumber (8 bytes). `month_year` is the BCD `MMYY` pair,
/// kept as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedSerialNumber {
    pub serial_number: u32,
    pub month_year: [u8; 2],
    pub equipment_type: EquipmentType,
    pub manufacturer_code: u8,
}

impl Decode for ExtendedSerialNumber {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            serial_number: r.u32()?,
            month_year: r.array()?,
            equipment_type: r.decode()?,
            manufacturer_code: r.u8()?,
        })
    }
}

impl Encode for ExtendedSerialNumber {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.serial_number.encode(out)?;
        out.extend_from_slice(&self.month_year);
        self.equipment_type.encode(out)?;
        out.push(self.manufacturer_code);
        Ok(())
    }
}

/// GeoCoordinates: signed 24-bit latitude and longitude in ±DDMM.M x10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: i32,
    pub longitude: i32,
}

fn read_i24(r: &mut Reader<'_>) -> Result<i32, DecodeError> {
    let raw = r.u24()?;
    // Sign-extend from bit 23
    Ok(((raw << 8) as i32) >> 8)
}

fn write_i24(value: i32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if !(-0x80_0000..=0x7F_FFFF).contains(&value) {
        return Err(EncodeError::IntegerOverflow {
            value: u64::from(value.unsigned_abs()),
            bytes: 3,
        });
    }
    put_u24(out, (value as u32) & 0x00FF_FFFF)
}

impl Decode for GeoCoordinates {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            latitude: read_i24(r)?,
            longitude: read_i24(r)?,
        })
    }
}

impl Encode for GeoCoordinates {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        write_i24(self.latitude, out)?;
        write_i24(self.longitude, out)
    }
}

/// GNSSPlaceRecord (11 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnssPlaceRecord {
    pub time_stamp: TimeReal,
    pub gnss_accuracy: u8,
    pub geo_coordinates: GeoCoordinates,
}

impl Decode for GnssPlaceRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            gnss_accuracy: r.u8()?,
            geo_coordinates: r.decode()?,
        })
    }
}

impl Encode for GnssPlaceRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        out.push(self.gnss_accuracy);
        self.geo_coordinates.encode(out)
    }
}

/// GNSSPlaceAuthRecord (12 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnssPlaceAuthRecord {
    pub place: GnssPlaceRecord,
    pub authentication_status: PositionAuthenticationStatus,
}

impl Decode for GnssPlaceAuthRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            place: r.decode()?,
            authentication_status: r.decode()?,
        })
    }
}

impl Encode for GnssPlaceAuthRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.place.encode(out)?;
        self.authentication_status.encode(out)
    }
}

/// PlaceRecord: 10 bytes in Gen1, 21 in Gen2 where a GNSS fix is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub entry_time: TimeReal,
    pub entry_type_daily_work_period: EntryTypeDailyWorkPeriod,
    pub daily_work_period_country: NationNumeric,
    pub daily_work_period_region: u8,
    pub vehicle_odometer_value: u32,
    pub entry_gnss_place_record: Option<GnssPlaceRecord>,
}

impl DecodeGen for PlaceRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            entry_time: r.decode()?,
            entry_type_daily_work_period: r.decode()?,
            daily_work_period_country: r.decode()?,
            daily_work_period_region: r.u8()?,
            vehicle_odometer_value: read_u24(r)?,
            entry_gnss_place_record: match generation {
                Generation::Gen1 => None,
                Generation::Gen2 => Some(r.decode()?),
            },
        })
    }
}

impl EncodeGen for PlaceRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.entry_time.encode(out)?;
        self.entry_type_daily_work_period.encode(out)?;
        self.daily_work_period_country.encode(out)?;
        out.push(self.daily_work_period_region);
        put_u24(out, self.vehicle_odometer_value)?;
        if generation == Generation::Gen2 {
            match &self.entry_gnss_place_record {
                Some(gnss) => gnss.encode(out)?,
                None => out.extend_from_slice(&[0; 11]),
            }
        }
        Ok(())
    }
}

impl FixedSize for PlaceRecord {
    fn size(generation: Generation) -> usize {
        match generation {
            Generation::Gen1 => 10,
            Generation::Gen2 => 21,
        }
    }

    fn is_unpopulated(raw: &[u8]) -> bool {
        raw[..4] == [0; 4]
    }
}

/// SpecificConditionRecord (5 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificConditionRecord {
    pub entry_time: TimeReal,
    pub specific_condition_type: SpecificConditionType,
}

impl Decode for SpecificConditionRecord {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            entry_time: r.decode()?,
            specific_condition_type: r.decode()?,
        })
    }
}

impl Encode for SpecificConditionRecord {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.entry_time.encode(out)?;
        self.specific_condition_type.encode(out)
    }
}

fixed_record!(SpecificConditionRecord, 5, unpopulated: ..4);

// --- Bitfields ---

/// ControlType bit set: card download, VU download, printing, display and
/// calibration check flags in bits 7..3. The low three bits are kept as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlType {
    pub card_downloading: bool,
    pub vu_downloading: bool,
    pub printing: bool,
    pub display: bool,
    pub calibration_checking: bool,
    pub reserved: u8,
}

impl ControlType {
    pub fn from_byte(b: u8) -> Self {
        Self {
            card_downloading: b & 0x80 != 0,
            vu_downloading: b & 0x40 != 0,
            printing: b & 0x20 != 0,
            display: b & 0x10 != 0,
            calibration_checking: b & 0x08 != 0,
            reserved: b & 0x07,
        }
    }

    pub fn to_byte(self) -> u8 {
        (u8::from(self.card_downloading) << 7)
            | (u8::from(self.vu_downloading) << 6)
            | (u8::from(self.printing) << 5)
            | (u8::from(self.display) << 4)
            | (u8::from(self.calibration_checking) << 3)
            | (self.reserved & 0x07)
    }
}

impl Decode for ControlType {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self::from_byte(r.u8()?))
    }
}

impl Encode for ControlType {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(self.to_byte());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSlot {
    Driver,
    CoDriver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivingStatus {
    /// Single manning, or "unknown" when no card is inserted.
    Single,
    /// Crew, or "known" when no card is inserted.
    Crew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    BreakRest,
    Availability,
    Work,
    Driving,
}

/// ActivityChangeInfo: `s c p aa ttttttttttt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityChangeInfo {
    pub slot: CardSlot,
    pub driving_status: DrivingStatus,
    pub card_inserted: bool,
    pub activity: ActivityKind,
    /// Minutes since 00:00 UTC of the day. Values above 1439 are kept as read.
    pub minutes: u16,
}

impl ActivityChangeInfo {
    /// Wire values that never denote a change.
    pub const SENTINELS: [u16; 2] = [0x0000, 0xFFFF];

    pub fn from_u16(v: u16) -> Self {
        Self {
            slot: if v & 0x8000 != 0 { CardSlot::CoDriver } else { CardSlot::Driver },
            driving_status: if v & 0x4000 != 0 {
                DrivingStatus::Crew
            } else {
                DrivingStatus::Single
            },
            card_inserted: v & 0x2000 == 0,
            activity: match (v >> 11) & 0x03 {
                0 => ActivityKind::BreakRest,
                1 => ActivityKind::Availability,
                2 => ActivityKind::Work,
                _ => ActivityKind::Driving,
            },
            minutes: v & 0x07FF,
        }
    }

    pub fn to_u16(self) -> u16 {
        let slot: u16 = match self.slot {
            CardSlot::Driver => 0,
            CardSlot::CoDriver => 0x8000,
        };
        let status: u16 = match self.driving_status {
            DrivingStatus::Single => 0,
            DrivingStatus::Crew => 0x4000,
        };
        let card: u16 = if self.card_inserted { 0 } else { 0x2000 };
        let activity: u16 = match self.activity {
            ActivityKind::BreakRest => 0,
            ActivityKind::Availability => 1,
            ActivityKind::Work => 2,
            ActivityKind::Driving => 3,
        };
        let activity = activity << 11;
        slot | status | card | activity | (self.minutes & 0x07FF)
    }
}

impl Decode for ActivityChangeInfo {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self::from_u16(r.u16()?))
    }
}

impl Encode for ActivityChangeInfo {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u16(out, self.to_u16());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddd_format::codec::{decode_exact, encode_to_vec};

    #[test]
    fn activity_change_bits() {
        // co-driver, crew, not inserted, driving, 23:59
        let v = 0x8000 | 0x4000 | 0x2000 | (3 << 11) | 1439;
        let info = ActivityChangeInfo::from_u16(v);
        assert_eq!(info.slot, CardSlot::CoDriver);
        assert_eq!(info.driving_status, DrivingStatus::Crew);
        assert!(!info.card_inserted);
        assert_eq!(info.activity, ActivityKind::Driving);
        assert_eq!(info.minutes, 1439);
        assert_eq!(info.to_u16(), v);
    }

    #[test]
    fn control_type_keeps_low_bits() {
        for b in 0..=255u8 {
            assert_eq!(ControlType::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn negative_coordinates() {
        let raw = [0xFF, 0xFF, 0xFE, 0x00, 0x01, 0x00];
        let c: GeoCoordinates = decode_exact(&raw).unwrap();
        assert_eq!(c.latitude, -2);
        assert_eq!(c.longitude, 256);
        assert_eq!(encode_to_vec(&c).unwrap(), raw.to_vec());
    }

    #[test]
    fn unpopulated_place_stays_raw() {
        let raw = [0u8; 10];
        let slot = Slot::<PlaceRecord>::decode_record(&raw, Generation::Gen1);
        assert_eq!(slot, Slot::Invalid(raw.to_vec()));
    }

    #[test]
    fn gen2_card_number_has_generation_byte() {
        let mut raw = vec![0x01, 0x0D];
        raw.extend_from_slice(b"DF00000012345601");
        raw.push(0x02);
        let mut r = Reader::new(&raw);
        let n = FullCardNumber::decode_gen(&mut r, Generation::Gen2).unwrap();
        assert_eq!(n.card_type, EquipmentType::DriverCard);
        assert_eq!(n.generation, Some(2));
        let mut out = Vec::new();
        n.encode_gen(Generation::Gen2, &mut out).unwrap();
        assert_eq!(out, raw);
    }
}
