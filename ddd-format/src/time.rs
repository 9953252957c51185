//! TimeReal (seconds since epoch) and Datef (BCD calendar date) fields.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::bcd::{decode_bcd, decode_bcd_byte, encode_bcd, encode_bcd_byte};
use crate::codec::{Decode, DecodeError, Encode, EncodeError, Reader, put_u32};

/// Four-byte big-endian seconds since 1970-01-01T00:00:00Z.
///
/// The wire value `0` means "no timestamp" and decodes to `TimeReal(None)`,
/// never to the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeReal(pub Option<DateTime<Utc>>);

impl TimeReal {
    pub const ABSENT: TimeReal = TimeReal(None);

    pub fn from_seconds(seconds: u32) -> Self {
        if seconds == 0 {
            return Self(None);
        }
        Self(DateTime::from_timestamp(i64::from(seconds), 0))
    }

    /// Raw wire value; `None` maps back to 0.
    pub fn seconds(&self) -> Result<u32, EncodeError> {
        match self.0 {
            None => Ok(0),
            Some(t) => {
                let secs = t.timestamp();
                u32::try_from(secs).map_err(|_| EncodeError::IntegerOverflow {
                    value: secs as u64,
                    bytes: 4,
                })
            }
        }
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl From<DateTime<Utc>> for TimeReal {
    fn from(t: DateTime<Utc>) -> Self {
        Self(Some(t))
    }
}

impl Decode for TimeReal {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self::from_seconds(r.u32()?))
    }
}

impl Encode for TimeReal {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u32(out, self.seconds()?);
        Ok(())
    }
}

/// Four-byte BCD date `yyyy mm dd`.
///
/// All-zero bytes mean "no date". Bytes that are not a valid calendar date
/// (bad BCD, year 0000, month 13, February 30th) are not an error: they decode to
/// `Unparsed` and are written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Datef {
    #[default]
    Absent,
    Date(NaiveDate),
    Unparsed([u8; 4]),
}

impl Datef {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        if bytes == [0; 4] {
            return Self::Absent;
        }
        match parse_date(bytes) {
            Some(date) => Self::Date(date),
            None => {
                log::debug!("unparseable BCD date {:02X?}", bytes);
                Self::Unparsed(bytes)
            }
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Result<[u8; 4], EncodeError> {
        match self {
            Self::Absent => Ok([0; 4]),
            Self::Unparsed(raw) => Ok(*raw),
            Self::Date(d) => {
                let year = u32::try_from(d.year()).map_err(|_| EncodeError::BcdOverflow {
                    value: 0,
                    digits: 4,
                })?;
                let mut out = Vec::with_capacity(4);
                encode_bcd(year, 2, &mut out)?;
                out.push(encode_bcd_byte(d.month() as u8)?);
                out.push(encode_bcd_byte(d.day() as u8)?);
                Ok([out[0], out[1], out[2], out[3]])
            }
        }
    }
}

fn parse_date(bytes: [u8; 4]) -> Option<NaiveDate> {
    let year = decode_bcd(&bytes[0..2]).ok().filter(|&y| y != 0)?;
    let month = decode_bcd_byte(bytes[2]).ok()?;
    let day = decode_bcd_byte(bytes[3]).ok()?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, u32::from(month), u32::from(day))
}

impl Decode for Datef {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self::from_bytes(r.array()?))
    }
}

impl Encode for Datef {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.to_bytes()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_exact, encode_to_vec};

    #[test]
    fn zero_time_real_is_absent() {
        let t: TimeReal = decode_exact(&[0, 0, 0, 0]).unwrap();
        assert!(t.is_absent());
        assert_eq!(encode_to_vec(&t).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn time_real_keeps_seconds() {
        let t: TimeReal = decode_exact(&[0x65, 0x92, 0x00, 0x80]).unwrap();
        assert_eq!(t.seconds().unwrap(), 0x6592_0080);
        assert_eq!(encode_to_vec(&t).unwrap(), vec![0x65, 0x92, 0x00, 0x80]);
    }

    #[test]
    fn datef_parses_valid_date() {
        let d = Datef::from_bytes([0x19, 0x85, 0x07, 0x14]);
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(1985, 7, 14));
        assert_eq!(d.to_bytes().unwrap(), [0x19, 0x85, 0x07, 0x14]);
    }

    #[test]
    fn datef_out_of_range_is_unparsed_not_error() {
        let d = Datef::from_bytes([0x20, 0x23, 0x02, 0x30]);
        assert_eq!(d, Datef::Unparsed([0x20, 0x23, 0x02, 0x30]));
        assert_eq!(d.date(), None);
        assert_eq!(d.to_bytes().unwrap(), [0x20, 0x23, 0x02, 0x30]);
    }

    #[test]
    fn datef_year_zero_is_unparsed() {
        let d = Datef::from_bytes([0x00, 0x00, 0x03, 0x15]);
        assert_eq!(d, Datef::Unparsed([0x00, 0x00, 0x03, 0x15]));
        assert_eq!(d.to_bytes().unwrap(), [0x00, 0x00, 0x03, 0x15]);
    }
}
