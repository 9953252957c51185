use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ef::{APPENDIX_SIGNATURE, ElementaryFile, Generation};
use crate::trep::{TransferType, VU_TAG_PREFIX};

/// Card record header: file id (2), appendix (1), length (2).
pub const RECORD_HEADER_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("truncated record header at offset {offset}: {remaining} bytes left")]
    TruncatedHeader { offset: usize, remaining: usize },
    #[error("record at offset {offset} declares {declared} bytes but only {remaining} remain")]
    TruncatedValue {
        offset: usize,
        declared: usize,
        remaining: usize,
    },
}

/// Three-byte card record tag: 16-bit file id plus the appendix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordTag {
    pub fid: u16,
    pub appendix: u8,
}

impl RecordTag {
    pub fn new(fid: u16, generation: Generation, signature: bool) -> Self {
        Self {
            fid,
            appendix: generation.appendix(signature),
        }
    }

    /// The tag as the 24-bit value seen on the wire.
    pub fn as_u24(self) -> u32 {
        (u32::from(self.fid) << 8) | u32::from(self.appendix)
    }

    pub fn is_signature(self) -> bool {
        self.appendix & APPENDIX_SIGNATURE != 0
    }

    pub fn generation(self) -> Generation {
        Generation::from_appendix(self.appendix)
    }

    pub fn elementary_file(self) -> Option<ElementaryFile> {
        ElementaryFile::from_fid(self.fid)
    }
}

/// One framed card record, borrowing its value from the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub tag: RecordTag,
    pub value: &'a [u8],
    /// Offset of the record header in the scanned buffer.
    pub offset: usize,
}

/// Splits a card download into TLV records.
///
/// Reads exactly one record per step and never looks further ahead, so it
/// can drive incremental consumers. After an error the iterator is fused.
#[derive(Debug, Clone)]
pub struct CardScanner<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> CardScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Start scanning at `cursor` instead of the beginning of `data`.
    pub fn at(data: &'a [u8], cursor: usize) -> Self {
        Self {
            data,
            pos: cursor.min(data.len()),
            failed: false,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_record(&mut self) -> Result<Option<RawRecord<'a>>, ScanError> {
        let remaining = self.data.len() - self.pos;
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < RECORD_HEADER_LEN {
            return Err(ScanError::TruncatedHeader {
                offset: self.pos,
                remaining,
            });
        }
        let h = &self.data[self.pos..self.pos + RECORD_HEADER_LEN];
        let tag = RecordTag {
            fid: u16::from_be_bytes([h[0], h[1]]),
            appendix: h[2],
        };
        let declared = usize::from(u16::from_be_bytes([h[3], h[4]]));
        let start = self.pos + RECORD_HEADER_LEN;
        if declared > self.data.len() - start {
            return Err(ScanError::TruncatedValue {
                offset: self.pos,
                declared,
                remaining: self.data.len() - start,
            });
        }
        let record = RawRecord {
            tag,
            value: &self.data[start..start + declared],
            offset: self.pos,
        };
        self.pos = start + declared;
        Ok(Some(record))
    }
}

impl<'a> Iterator for CardScanner<'a> {
    type Item = Result<RawRecord<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Scan a whole card download into records.
pub fn scan_card_records(data: &[u8]) -> Result<Vec<RawRecord<'_>>, ScanError> {
    CardScanner::new(data).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Card,
    VehicleUnit,
    Unknown,
}

/// Classify a download by its leading bytes.
///
/// Card downloads open with the EF_ICC record; VU downloads open with a
/// `0x76 <TREP>` transfer tag.
pub fn infer_file_type(data: &[u8]) -> FileType {
    match data {
        [hi, lo, ..] if u16::from_be_bytes([*hi, *lo]) == ElementaryFile::Icc.fid() => FileType::Card,
        [VU_TAG_PREFIX, trep, ..] if TransferType::from_trep(*trep).is_some() => FileType::VehicleUnit,
        _ => FileType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_bits() {
        let tag = RecordTag {
            fid: 0x0502,
            appendix: 0x03,
        };
        assert!(tag.is_signature());
        assert_eq!(tag.generation(), Generation::Gen2);
        assert_eq!(tag.as_u24(), 0x0502_03);
        assert_eq!(tag.elementary_file(), Some(ElementaryFile::EventsData));
    }

    #[test]
    fn infer_types() {
        assert_eq!(infer_file_type(&[0x00, 0x02, 0x00, 0x00, 0x19]), FileType::Card);
        assert_eq!(infer_file_type(&[0x76, 0x01, 0x00]), FileType::VehicleUnit);
        assert_eq!(infer_file_type(&[0x76, 0x21]), FileType::VehicleUnit);
        assert_eq!(infer_file_type(&[0x76, 0x7F]), FileType::Unknown);
        assert_eq!(infer_file_type(&[0x01]), FileType::Unknown);
        assert_eq!(infer_file_type(&[]), FileType::Unknown);
    }
}
