//! EF_Driver_Activity_Data: a ring buffer of variable-length daily records.
//!
//! The EF holds two 16-bit pointers followed by the ring. Each daily record
//! starts with its own length and the length of the record before it, so the
//! ring is walked backwards from the newest record. Records may wrap around
//! the end of the ring.

use ddd_format::bcd::{read_bcd_u16, write_bcd_u16};
use ddd_format::codec::put_u16;
use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::{EfContext, EfContent};
use crate::types::ActivityChangeInfo;

/// Upper bound on records visited in one walk (one year plus a leap day).
pub const MAX_DAILY_RECORDS: usize = 366;

/// Record header: previous record length and record length, two bytes each.
const RECORD_HEADER_LEN: usize = 4;

/// Date, presence counter and day distance precede the activity changes.
const FIXED_CONTENT_LEN: usize = 8;

/// CardActivityDailyRecord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDailyRecord {
    pub previous_record_length: u16,
    pub record_length: u16,
    pub date: TimeReal,
    pub presence_counter: u16,
    pub day_distance: u16,
    pub changes: Vec<ActivityChangeInfo>,
    /// Original content bytes, set when the fields above do not reproduce them.
    pub verbatim: Option<Vec<u8>>,
    /// False when the content could not be decoded at all.
    pub valid: bool,
}

impl ActivityDailyRecord {
    /// A record whose lengths match its content.
    pub fn new(
        previous_record_length: u16,
        date: TimeReal,
        presence_counter: u16,
        day_distance: u16,
        changes: Vec<ActivityChangeInfo>,
    ) -> Self {
        let content_len = FIXED_CONTENT_LEN + 2 * changes.len();
        Self {
            previous_record_length,
            record_length: u16::try_from(RECORD_HEADER_LEN + content_len).unwrap_or(u16::MAX),
            date,
            presence_counter,
            day_distance,
            changes,
            verbatim: None,
            valid: true,
        }
    }

    fn decode_content(
        previous_record_length: u16,
        record_length: u16,
        content: &[u8],
    ) -> Self {
        match Self::decode_fields(content) {
            Ok((date, presence_counter, day_distance, changes)) => {
                let mut record = Self {
                    previous_record_length,
                    record_length,
                    date,
                    presence_counter,
                    day_distance,
                    changes,
                    verbatim: None,
                    valid: true,
                };
                if record.fields_content().ok().as_deref() != Some(content) {
                    log::debug!("daily record of {record_length} bytes kept verbatim");
                    record.verbatim = Some(content.to_vec());
                }
                record
            }
            Err(e) => {
                log::warn!("daily record of {record_length} bytes is undecodable: {e}");
                Self {
                    previous_record_length,
                    record_length,
                    date: TimeReal::ABSENT,
                    presence_counter: 0,
                    day_distance: 0,
                    changes: Vec::new(),
                    verbatim: Some(content.to_vec()),
                    valid: false,
                }
            }
        }
    }

    fn decode_fields(content: &[u8]) -> Result<(TimeReal, u16, u16, Vec<ActivityChangeInfo>), DecodeError> {
        let mut r = Reader::new(content);
        let date = TimeReal::decode(&mut r)?;
        let presence_counter = read_bcd_u16(&mut r)?;
        let day_distance = r.u16()?;
        if r.remaining() % 2 != 0 {
            return Err(DecodeError::InvalidValue {
                field: "activity changes",
                reason: format!("odd length {}", r.remaining()),
            });
        }
        let mut changes = Vec::with_capacity(r.remaining() / 2);
        while !r.is_empty() {
            let raw = r.u16()?;
            if ActivityChangeInfo::SENTINELS.contains(&raw) {
                continue;
            }
            changes.push(ActivityChangeInfo::from_u16(raw));
        }
        Ok((date, presence_counter, day_distance, changes))
    }

    /// Content encoded from the decoded fields, ignoring `verbatim`.
    pub fn fields_content(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(FIXED_CONTENT_LEN + 2 * self.changes.len());
        self.date.encode(&mut out)?;
        write_bcd_u16(self.presence_counter, &mut out)?;
        put_u16(&mut out, self.day_distance);
        for change in &self.changes {
            change.encode(&mut out)?;
        }
        Ok(out)
    }

    /// Content bytes as they are written into the ring.
    pub fn content(&self) -> Result<Vec<u8>, EncodeError> {
        match &self.verbatim {
            Some(raw) => Ok(raw.clone()),
            None => self.fields_content(),
        }
    }
}

/// Non-zero ring bytes that belong to no reachable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleRegion {
    pub offset: usize,
    pub data: Vec<u8>,
}

/// Decoded driver activity ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverActivity {
    pub oldest_day_record_index: u16,
    pub newest_day_record_index: u16,
    pub ring_length: usize,
    /// Reachable daily records, oldest first.
    pub records: Vec<ActivityDailyRecord>,
    pub stale_regions: Vec<StaleRegion>,
}

/// Borrowed ring with wrap-around reads.
struct Ring<'a> {
    bytes: &'a [u8],
}

impl Ring<'_> {
    fn at(&self, pos: usize) -> u8 {
        self.bytes[pos % self.bytes.len()]
    }

    fn u16_at(&self, pos: usize) -> u16 {
        u16::from_be_bytes([self.at(pos), self.at(pos + 1)])
    }

    fn copy(&self, pos: usize, len: usize) -> Vec<u8> {
        (0..len).map(|i| self.at(pos + i)).collect()
    }
}

impl DriverActivity {
    /// Walk the ring backwards from the newest record.
    pub fn walk(oldest_day_record_index: u16, newest_day_record_index: u16, ring: &[u8]) -> Self {
        let n = ring.len();
        let mut records = Vec::new();
        let mut covered = vec![false; n];
        let mut visited = Vec::new();
        let ring_view = Ring { bytes: ring };
        let mut pos = usize::from(newest_day_record_index);

        if pos >= n && n > 0 {
            log::warn!("newest day record index {pos} lies outside the {n}-byte ring");
        }
        while n > 0 && pos < n && records.len() < MAX_DAILY_RECORDS && !visited.contains(&pos) {
            let previous_record_length = ring_view.u16_at(pos);
            let record_length = ring_view.u16_at(pos + 2);
            let len = usize::from(record_length);
            if !(RECORD_HEADER_LEN..=n).contains(&len) {
                log::debug!("walk stops at offset {pos}: record length {len}");
                break;
            }
            visited.push(pos);
            for i in 0..len {
                covered[(pos + i) % n] = true;
            }
            let content = ring_view.copy(pos + RECORD_HEADER_LEN, len - RECORD_HEADER_LEN);
            records.push(ActivityDailyRecord::decode_content(
                previous_record_length,
                record_length,
                &content,
            ));
            if previous_record_length == 0 {
                break;
            }
            let back = usize::from(previous_record_length) % n;
            pos = (pos + n - back) % n;
        }
        records.reverse();

        let mut stale_regions: Vec<StaleRegion> = Vec::new();
        let mut last_stale = None;
        for (offset, (&byte, &is_covered)) in ring.iter().zip(&covered).enumerate() {
            if is_covered || byte == 0 {
                continue;
            }
            match stale_regions.last_mut() {
                Some(region) if last_stale.is_some_and(|l: usize| l + 1 == offset) => region.data.push(byte),
                _ => stale_regions.push(StaleRegion {
                    offset,
                    data: vec![byte],
                }),
            }
            last_stale = Some(offset);
        }
        if !stale_regions.is_empty() {
            log::debug!("{} stale regions outside the walked records", stale_regions.len());
        }

        Self {
            oldest_day_record_index,
            newest_day_record_index,
            ring_length: n,
            records,
            stale_regions,
        }
    }

    /// Rebuild the ring bytes.
    pub fn ring(&self) -> Result<Vec<u8>, EncodeError> {
        let n = self.ring_length;
        let mut ring = vec![0u8; n];
        for region in &self.stale_regions {
            let end = region.offset + region.data.len();
            if end > n {
                return Err(EncodeError::LengthMismatch {
                    field: "stale region",
                    expected: n,
                    actual: end,
                });
            }
            ring[region.offset..end].copy_from_slice(&region.data);
        }
        if self.records.is_empty() {
            return Ok(ring);
        }
        if n == 0 {
            return Err(EncodeError::LengthMismatch {
                field: "activity ring",
                expected: RECORD_HEADER_LEN,
                actual: 0,
            });
        }

        let mut pos = usize::from(self.newest_day_record_index) % n;
        for record in self.records.iter().rev() {
            let len = usize::from(record.record_length);
            let mut bytes = Vec::with_capacity(len.max(RECORD_HEADER_LEN));
            put_u16(&mut bytes, record.previous_record_length);
            put_u16(&mut bytes, record.record_length);
            let mut content = record.content()?;
            content.resize(len.saturating_sub(RECORD_HEADER_LEN), 0);
            bytes.extend_from_slice(&content);
            if bytes.len() > n {
                return Err(EncodeError::LengthMismatch {
                    field: "daily record",
                    expected: n,
                    actual: bytes.len(),
                });
            }
            for (i, b) in bytes.iter().enumerate() {
                ring[(pos + i) % n] = *b;
            }
            let back = usize::from(record.previous_record_length) % n;
            pos = (pos + n - back) % n;
        }
        Ok(ring)
    }
}

impl EfContent for DriverActivity {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        let oldest = r.u16()?;
        let newest = r.u16()?;
        Ok(Self::walk(oldest, newest, r.rest()))
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u16(out, self.oldest_day_record_index);
        put_u16(out, self.newest_day_record_index);
        out.extend_from_slice(&self.ring()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_bytes(prev: u16, date: u32, changes: &[u16]) -> Vec<u8> {
        let len = 12 + 2 * changes.len() as u16;
        let mut out = Vec::new();
        out.extend_from_slice(&prev.to_be_bytes());
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&date.to_be_bytes());
        out.extend_from_slice(&[0x00, 0x42, 0x01, 0x2C]);
        for c in changes {
            out.extend_from_slice(&c.to_be_bytes());
        }
        out
    }

    #[test]
    fn two_records_oldest_first() {
        let first = record_bytes(0, 0x5E0B_E100, &[60, 0x1800 | 120]);
        let second = record_bytes(first.len() as u16, 0x5E0D_3280, &[0x0800 | 30]);
        let mut ring = first.clone();
        ring.extend_from_slice(&second);
        ring.resize(64, 0);

        let activity = DriverActivity::walk(0, first.len() as u16, &ring);
        assert_eq!(activity.records.len(), 2);
        assert_eq!(activity.records[0].changes.len(), 2);
        assert_eq!(activity.records[0].presence_counter, 42);
        assert_eq!(activity.records[0].day_distance, 300);
        assert_eq!(activity.records[1].changes[0].minutes, 30);
        assert!(activity.stale_regions.is_empty());
        assert_eq!(activity.ring().unwrap(), ring);
    }

    #[test]
    fn newest_index_outside_ring_yields_no_records() {
        let ring = [0xAAu8; 16];
        let activity = DriverActivity::walk(0, 16, &ring);
        assert!(activity.records.is_empty());
        assert_eq!(activity.stale_regions.len(), 1);
        assert_eq!(activity.ring().unwrap(), ring.to_vec());
    }

    #[test]
    fn self_referencing_record_stops_the_walk() {
        // previous length equal to the ring length steps back onto itself
        let mut ring = record_bytes(32, 0x5E0B_E100, &[]);
        ring.resize(32, 0);
        let activity = DriverActivity::walk(0, 0, &ring);
        assert_eq!(activity.records.len(), 1);
        assert_eq!(activity.ring().unwrap(), ring);
    }

    #[test]
    fn undecodable_content_is_kept() {
        // record length 7: three content bytes cannot hold a date and counters
        let mut ring = vec![0x00, 0x00, 0x00, 0x07, 0x01, 0x02, 0x03];
        ring.resize(20, 0);
        let activity = DriverActivity::walk(0, 0, &ring);
        assert_eq!(activity.records.len(), 1);
        assert!(!activity.records[0].valid);
        assert_eq!(activity.records[0].verbatim.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(activity.ring().unwrap(), ring);
    }
}
