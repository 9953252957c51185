use crate::codec::EncodeError;
use crate::reader::{RECORD_HEADER_LEN, RawRecord, RecordTag};

/// Append one TLV record: tag, two-byte length, value.
pub fn write_record(out: &mut Vec<u8>, tag: RecordTag, value: &[u8]) -> Result<(), EncodeError> {
    let len = u16::try_from(value.len()).map_err(|_| EncodeError::RecordTooLong(value.len()))?;
    out.reserve(RECORD_HEADER_LEN + value.len());
    out.extend_from_slice(&tag.fid.to_be_bytes());
    out.push(tag.appendix);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(value);
    Ok(())
}

/// Re-frame scanned records. Inverse of [`crate::reader::scan_card_records`].
pub fn write_records<'a>(
    records: impl IntoIterator<Item = &'a RawRecord<'a>>,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    for record in records {
        write_record(&mut out, record.tag, record.value)?;
    }
    Ok(out)
}
