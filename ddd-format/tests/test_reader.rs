use ddd_format::ef::Generation;
use ddd_format::reader::{CardScanner, RecordTag, ScanError, scan_card_records};
use ddd_format::writer::{write_record, write_records};

fn sample_card_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    write_record(&mut out, RecordTag::new(0x0002, Generation::Gen1, false), &[0x11; 25]).unwrap();
    write_record(&mut out, RecordTag::new(0x0005, Generation::Gen1, false), &[0x22; 8]).unwrap();
    write_record(&mut out, RecordTag::new(0x0501, Generation::Gen1, false), &[0x33; 10]).unwrap();
    write_record(&mut out, RecordTag::new(0x0501, Generation::Gen1, true), &[0x44; 128]).unwrap();
    out
}

#[test]
fn test_empty_input_yields_no_records() {
    let mut scanner = CardScanner::new(&[]);
    assert!(scanner.next().is_none());
}

#[test]
fn test_scan_splits_records() {
    let data = sample_card_bytes();
    let records = scan_card_records(&data).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].tag.fid, 0x0002);
    assert_eq!(records[0].value.len(), 25);
    assert_eq!(records[1].offset, 30);
    assert!(records[3].tag.is_signature());
    assert_eq!(records[3].value, &[0x44; 128][..]);
}

#[test]
fn test_truncated_header() {
    let mut data = sample_card_bytes();
    data.extend_from_slice(&[0x05, 0x20, 0x00]);
    let err = scan_card_records(&data).unwrap_err();
    assert_eq!(
        err,
        ScanError::TruncatedHeader {
            offset: data.len() - 3,
            remaining: 3
        }
    );
}

#[test]
fn test_truncated_value() {
    let data = [0x05, 0x20, 0x00, 0x00, 0x10, 0xAA, 0xBB];
    let err = scan_card_records(&data).unwrap_err();
    assert_eq!(
        err,
        ScanError::TruncatedValue {
            offset: 0,
            declared: 16,
            remaining: 2
        }
    );
}

#[test]
fn test_scanner_is_fused_after_error() {
    let data = [0x05, 0x20];
    let mut scanner = CardScanner::new(&data);
    assert!(matches!(scanner.next(), Some(Err(ScanError::TruncatedHeader { .. }))));
    assert!(scanner.next().is_none());
}

#[test]
fn test_scanner_resumes_from_cursor() {
    let data = sample_card_bytes();
    let scanner = CardScanner::at(&data, 30);
    let fids: Vec<u16> = scanner.map(|r| r.unwrap().tag.fid).collect();
    assert_eq!(fids, vec![0x0005, 0x0501, 0x0501]);
}

#[test]
fn test_scan_then_write_is_identity() {
    let data = sample_card_bytes();
    let records = scan_card_records(&data).unwrap();
    let written = write_records(&records).unwrap();
    pretty_assertions::assert_eq!(written, data);
}
