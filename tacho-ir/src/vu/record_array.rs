//! Generation 2 record arrays.
//!
//! A generation 2 transfer is a run of record arrays, each headed by the
//! record type, the size of one record and the record count. The transfer
//! ends with the signature array.

use ddd_format::codec::{put_count_u16, put_u16, put_u24};
use ddd_format::{
    Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue, TimeReal,
};
use serde::{Deserialize, Serialize};

use super::records::{
    SensorPaired, VuCalibrationRecord, VuCardIwRecord, VuCompanyLock, VuControlActivity, VuDetailedSpeedBlock,
    VuDownloadActivity, VuDownloadablePeriod, VuEventRecord, VuFaultRecord, VuGnssAdRecord, VuIdentification,
    VuOverSpeedingControl, VuOverSpeedingEvent, VuPlaceRecord, VuTimeAdjustment,
};
use crate::enums::RecordType;
use crate::types::{
    ActivityChangeInfo, SpecificConditionRecord, VIN_LEN, VRN_LEN, VehicleRegistration, read_u24,
};

/// Record array header: type (1), record size (2), record count (2).
pub const RECORD_ARRAY_HEADER_LEN: usize = 5;

/// One record of a generation 2 record array.
///
/// A record is only given a typed variant when its layout consumes exactly
/// the announced record size and encodes back to the same bytes; anything
/// else stays `Raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VuRecord {
    ActivityChange(ActivityChangeInfo),
    CardSlotsStatus(u8),
    DateTime(TimeReal),
    OdometerValue(u32),
    VehicleIdentificationNumber(StringValue),
    VehicleRegistrationNumber(StringValue),
    VehicleRegistration(VehicleRegistration),
    DownloadablePeriod(VuDownloadablePeriod),
    SpecificCondition(SpecificConditionRecord),
    Certificate(Vec<u8>),
    Signature(Vec<u8>),
    DownloadActivity(VuDownloadActivity),
    Identification(VuIdentification),
    SensorPaired(SensorPaired),
    Calibration(VuCalibrationRecord),
    CardIw(VuCardIwRecord),
    Place(VuPlaceRecord),
    GnssAd(VuGnssAdRecord),
    Event(VuEventRecord),
    Fault(VuFaultRecord),
    OverSpeedingControl(VuOverSpeedingControl),
    OverSpeedingEvent(VuOverSpeedingEvent),
    TimeAdjustment(VuTimeAdjustment),
    CompanyLock(VuCompanyLock),
    ControlActivity(VuControlActivity),
    DetailedSpeedBlock(VuDetailedSpeedBlock),
    Raw(Vec<u8>),
}

/// Decode `raw` completely with `decode`, keeping the value only if
/// `encode` reproduces `raw`.
fn exact<T>(
    raw: &[u8],
    decode: impl FnOnce(&mut Reader<'_>) -> Result<T, DecodeError>,
    encode: impl FnOnce(&T, &mut Vec<u8>) -> Result<(), EncodeError>,
) -> Option<T> {
    let mut r = Reader::new(raw);
    let value = decode(&mut r).ok()?;
    if !r.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(raw.len());
    encode(&value, &mut out).ok()?;
    (out == raw).then_some(value)
}

fn plain<T: Decode + Encode>(raw: &[u8]) -> Option<T> {
    exact(raw, T::decode, |v, out| v.encode(out))
}

fn gen2<T: DecodeGen + EncodeGen>(raw: &[u8]) -> Option<T> {
    exact(
        raw,
        |r| T::decode_gen(r, Generation::Gen2),
        |v, out| v.encode_gen(Generation::Gen2, out),
    )
}

impl VuRecord {
    pub fn decode(record_type: RecordType, raw: &[u8]) -> Self {
        let typed = match record_type {
            RecordType::ActivityChangeInfo => plain(raw).map(Self::ActivityChange),
            RecordType::CardSlotsStatus => plain(raw).map(Self::CardSlotsStatus),
            RecordType::CurrentDateTime | RecordType::DateOfDayDownloaded => plain(raw).map(Self::DateTime),
            RecordType::OdometerValueMidnight => exact(raw, read_u24, |v, out| put_u24(out, *v)).map(Self::OdometerValue),
            RecordType::VehicleIdentificationNumber => exact(
                raw,
                |r| StringValue::read_ia5(r, VIN_LEN),
                |v, out| v.write_ia5(VIN_LEN, out),
            )
            .map(Self::VehicleIdentificationNumber),
            RecordType::VehicleRegistrationNumber => exact(
                raw,
                |r| StringValue::read_code_paged(r, VRN_LEN),
                |v, out| v.write_code_paged(VRN_LEN, out),
            )
            .map(Self::VehicleRegistrationNumber),
            RecordType::VehicleRegistrationIdentification => plain(raw).map(Self::VehicleRegistration),
            RecordType::VuDownloadablePeriod => plain(raw).map(Self::DownloadablePeriod),
            RecordType::SpecificConditionRecord => plain(raw).map(Self::SpecificCondition),
            RecordType::MemberStateCertificate | RecordType::VuCertificate => Some(Self::Certificate(raw.to_vec())),
            RecordType::Signature => Some(Self::Signature(raw.to_vec())),
            RecordType::VuDownloadActivityData => gen2(raw).map(Self::DownloadActivity),
            RecordType::VuIdentification => gen2(raw).map(Self::Identification),
            RecordType::SensorPaired | RecordType::SensorPairedRecord => gen2(raw).map(Self::SensorPaired),
            RecordType::VuCalibrationRecord => gen2(raw).map(Self::Calibration),
            RecordType::VuCardIwRecord => gen2(raw).map(Self::CardIw),
            RecordType::VuPlaceDailyWorkPeriodRecord => gen2(raw).map(Self::Place),
            RecordType::VuGnssAdRecord => gen2(raw).map(Self::GnssAd),
            RecordType::VuEventRecord => gen2(raw).map(Self::Event),
            RecordType::VuFaultRecord => gen2(raw).map(Self::Fault),
            RecordType::VuOverSpeedingControlData => plain(raw).map(Self::OverSpeedingControl),
            RecordType::VuOverSpeedingEventRecord => gen2(raw).map(Self::OverSpeedingEvent),
            RecordType::VuTimeAdjustmentRecord => gen2(raw).map(Self::TimeAdjustment),
            RecordType::VuCompanyLocksRecord => gen2(raw).map(Self::CompanyLock),
            RecordType::VuControlActivityRecord => gen2(raw).map(Self::ControlActivity),
            RecordType::VuDetailedSpeedBlock => plain(raw).map(Self::DetailedSpeedBlock),
            _ => None,
        };
        typed.unwrap_or_else(|| {
            if record_type.is_recognized() {
                log::debug!("{:?} record of {} bytes kept raw", record_type, raw.len());
            }
            Self::Raw(raw.to_vec())
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let g = Generation::Gen2;
        match self {
            Self::ActivityChange(v) => v.encode(out),
            Self::CardSlotsStatus(v) => v.encode(out),
            Self::DateTime(v) => v.encode(out),
            Self::OdometerValue(v) => put_u24(out, *v),
            Self::VehicleIdentificationNumber(v) => v.write_ia5(VIN_LEN, out),
            Self::VehicleRegistrationNumber(v) => v.write_code_paged(VRN_LEN, out),
            Self::VehicleRegistration(v) => v.encode(out),
            Self::DownloadablePeriod(v) => v.encode(out),
            Self::SpecificCondition(v) => v.encode(out),
            Self::Certificate(raw) | Self::Signature(raw) | Self::Raw(raw) => {
                out.extend_from_slice(raw);
                Ok(())
            }
            Self::DownloadActivity(v) => v.encode_gen(g, out),
            Self::Identification(v) => v.encode_gen(g, out),
            Self::SensorPaired(v) => v.encode_gen(g, out),
            Self::Calibration(v) => v.encode_gen(g, out),
            Self::CardIw(v) => v.encode_gen(g, out),
            Self::Place(v) => v.encode_gen(g, out),
            Self::GnssAd(v) => v.encode_gen(g, out),
            Self::Event(v) => v.encode_gen(g, out),
            Self::Fault(v) => v.encode_gen(g, out),
            Self::OverSpeedingControl(v) => v.encode(out),
            Self::OverSpeedingEvent(v) => v.encode_gen(g, out),
            Self::TimeAdjustment(v) => v.encode_gen(g, out),
            Self::CompanyLock(v) => v.encode_gen(g, out),
            Self::ControlActivity(v) => v.encode_gen(g, out),
            Self::DetailedSpeedBlock(v) => v.encode(out),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordArray {
    pub record_type: RecordType,
    pub record_size: u16,
    pub records: Vec<VuRecord>,
}

impl Decode for RecordArray {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let record_type: RecordType = r.decode()?;
        let record_size = r.u16()?;
        let count = r.u16()?;
        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let raw = r.take(usize::from(record_size))?;
            records.push(VuRecord::decode(record_type, raw));
        }
        Ok(Self {
            record_type,
            record_size,
            records,
        })
    }
}

impl Encode for RecordArray {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.record_type.encode(out)?;
        put_u16(out, self.record_size);
        put_count_u16(out, "records", self.records.len())?;
        for record in &self.records {
            let start = out.len();
            record.encode(out)?;
            let written = out.len() - start;
            if written != usize::from(self.record_size) {
                return Err(EncodeError::LengthMismatch {
                    field: "record array entry",
                    expected: usize::from(self.record_size),
                    actual: written,
                });
            }
        }
        Ok(())
    }
}

/// Record arrays up to and including the signature array.
pub fn decode_record_arrays(r: &mut Reader<'_>) -> Result<Vec<RecordArray>, DecodeError> {
    let mut arrays = Vec::new();
    loop {
        let array: RecordArray = r.decode()?;
        let done = array.record_type == RecordType::Signature;
        arrays.push(array);
        if done {
            return Ok(arrays);
        }
    }
}

pub fn encode_record_arrays(arrays: &[RecordArray], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    arrays.encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityKind;

    #[test]
    fn arrays_stop_after_signature() {
        let mut raw = vec![0x01, 0x00, 0x02, 0x00, 0x02, 0x18, 0x3C, 0x00, 0x00];
        raw.extend_from_slice(&[0x08, 0x00, 0x04, 0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF]);
        let trailing = [0x76, 0x22];
        let mut input = raw.clone();
        input.extend_from_slice(&trailing);

        let mut r = Reader::new(&input);
        let arrays = decode_record_arrays(&mut r).unwrap();
        assert_eq!(r.position(), raw.len());
        assert_eq!(arrays.len(), 2);
        let VuRecord::ActivityChange(change) = &arrays[0].records[0] else {
            panic!("expected a typed activity change");
        };
        assert_eq!(change.activity, ActivityKind::Driving);
        assert_eq!(change.minutes, 60);
        // 0x0000 is a legal record in an explicit array
        assert!(matches!(arrays[0].records[1], VuRecord::ActivityChange(_)));

        let mut out = Vec::new();
        encode_record_arrays(&arrays, &mut out).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn unexpected_size_stays_raw() {
        // a 5-byte "date" cannot be a TimeReal
        let record = VuRecord::decode(RecordType::CurrentDateTime, &[1, 2, 3, 4, 5]);
        assert_eq!(record, VuRecord::Raw(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn missing_signature_is_insufficient_data() {
        let raw = [0x02, 0x00, 0x01, 0x00, 0x01, 0x00];
        assert!(matches!(
            decode_record_arrays(&mut Reader::new(&raw)),
            Err(DecodeError::InsufficientData { .. })
        ));
    }
}
