//! Synthetic download builders shared by the integration tests.
#![allow(dead_code)]

use ddd_format::writer::write_record;
use ddd_format::{ElementaryFile, Generation, RecordTag};

/// Fill byte of the signatures the builders attach.
pub const SIGNATURE_BYTE: u8 = 0x5A;

/// Card download written record by record.
#[derive(Default)]
pub struct CardBuilder {
    pub out: Vec<u8>,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, fid: u16, appendix: u8, value: &[u8]) -> Self {
        write_record(&mut self.out, RecordTag { fid, appendix }, value).unwrap();
        self
    }

    /// DATA record of `ef`, followed by a signature when the file is signed.
    pub fn ef(self, ef: ElementaryFile, generation: Generation, value: &[u8]) -> Self {
        let signed = ef.is_signed();
        let builder = self.record(ef.fid(), generation.appendix(false), value);
        if signed {
            let len = match generation {
                Generation::Gen1 => 128,
                Generation::Gen2 => 64,
            };
            builder.record(ef.fid(), generation.appendix(true), &vec![SIGNATURE_BYTE; len])
        } else {
            builder
        }
    }

    pub fn unsigned(self, ef: ElementaryFile, generation: Generation, value: &[u8]) -> Self {
        self.record(ef.fid(), generation.appendix(false), value)
    }

    pub fn gen1(self, ef: ElementaryFile, value: &[u8]) -> Self {
        self.ef(ef, Generation::Gen1, value)
    }

    pub fn gen2(self, ef: ElementaryFile, value: &[u8]) -> Self {
        self.ef(ef, Generation::Gen2, value)
    }

    pub fn build(self) -> Vec<u8> {
        self.out
    }
}

pub fn icc() -> Vec<u8> {
    let mut raw = vec![0x01, 0x00, 0x12, 0x34, 0x56, 0x03, 0x19, 0x01, 0x21];
    raw.extend_from_slice(b"E1-00001");
    raw.extend_from_slice(&[0x07, b'D', b'E', 0x00, 0x11, 0x22, 0x01, 0x02]);
    raw
}

pub fn ic() -> Vec<u8> {
    vec![0xA1, 0xA2, 0xA3, 0xA4, 0x10, 0x20, 0x30, 0x40]
}

/// Code-paged (ISO 8859-1) name field, 36 bytes.
pub fn name(text: &str) -> Vec<u8> {
    let mut out = vec![0x01];
    out.extend_from_slice(text.as_bytes());
    out.resize(36, b' ');
    out
}

/// VehicleRegistrationIdentification, 15 bytes.
pub fn registration(nation: u8, number: &str) -> Vec<u8> {
    let mut out = vec![nation, 0x01];
    out.extend_from_slice(number.as_bytes());
    out.resize(15, b' ');
    out
}

/// FullCardNumber; generation 2 appends the card generation byte.
pub fn full_card_number(card_type: u8, number: &str, generation: Generation) -> Vec<u8> {
    let mut out = vec![card_type, 0x0D];
    out.extend_from_slice(number.as_bytes());
    out.resize(18, b' ');
    if generation == Generation::Gen2 {
        out.push(0x02);
    }
    out
}

pub fn card_identification(card_number: &str) -> Vec<u8> {
    let mut raw = vec![0x0D];
    raw.extend_from_slice(card_number.as_bytes());
    raw.extend(name("KBA"));
    raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00]);
    raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00]);
    raw.extend_from_slice(&[0x6F, 0x8A, 0x0F, 0x80]);
    raw
}

pub fn driver_identification() -> Vec<u8> {
    let mut raw = card_identification("DF00000012345601");
    raw.extend(name("MUSTERMANN"));
    raw.extend(name("ERIKA"));
    raw.extend_from_slice(&[0x19, 0x80, 0x02, 0x29]);
    raw.extend_from_slice(b"de");
    raw
}

pub fn workshop_identification() -> Vec<u8> {
    let mut raw = card_identification("DW00000000077701");
    raw.extend(name("WERKSTATT NORD"));
    raw.extend(name("INDUSTRIESTRASSE 5"));
    raw.extend(name("MEISTER"));
    raw.extend(name("KARL"));
    raw.extend_from_slice(b"de");
    raw
}

/// Driver application identification with the given activity ring size.
pub fn driver_application(generation: Generation, ring_len: u16) -> Vec<u8> {
    let mut raw = vec![0x01, 0x00, 0x01, 0x02, 0x02];
    raw.extend_from_slice(&ring_len.to_be_bytes());
    raw.extend_from_slice(&[0x00, 0x02]);
    match generation {
        Generation::Gen1 => raw.push(0x02),
        Generation::Gen2 => raw.extend_from_slice(&[0x00, 0x02, 0x00, 0x10, 0x00, 0x20, 0x00, 0x30]),
    }
    raw
}

pub fn event_record(event_type: u8, begin: u32) -> Vec<u8> {
    let mut raw = vec![event_type];
    raw.extend_from_slice(&begin.to_be_bytes());
    raw.extend_from_slice(&(begin + 3600).to_be_bytes());
    raw.extend(registration(0x0D, "B AB 1234"));
    raw
}

/// CardActivityDailyRecord bytes with a header matching the content.
pub fn daily_record(prev: u16, date: u32, changes: &[u16]) -> Vec<u8> {
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

/// EF_Driver_Activity_Data value: pointers then the ring.
pub fn driver_activity(oldest: u16, newest: u16, ring: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&oldest.to_be_bytes());
    out.extend_from_slice(&newest.to_be_bytes());
    out.extend_from_slice(ring);
    out
}

/// A 64-byte ring holding two consecutive days.
pub fn two_day_ring() -> (u16, Vec<u8>) {
    let first = daily_record(0, 0x5E0B_E100, &[60, 0x1800 | 120]);
    let second = daily_record(first.len() as u16, 0x5E0D_3280, &[0x0800 | 30]);
    let newest = first.len() as u16;
    let mut ring = first;
    ring.extend(second);
    ring.resize(64, 0);
    (newest, ring)
}

pub fn vehicle_record(generation: Generation) -> Vec<u8> {
    let mut raw = vec![0x00, 0x10, 0x00, 0x00, 0x20, 0x00];
    raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00, 0x5E, 0x0C, 0x32, 0x80]);
    raw.extend(registration(0x0D, "B AB 1234"));
    raw.extend_from_slice(&[0x00, 0x17]);
    if generation == Generation::Gen2 {
        raw.extend_from_slice(b"WDB9634031L123456");
    }
    raw
}

pub fn vehicles_used(generation: Generation) -> Vec<u8> {
    let record = vehicle_record(generation);
    let mut raw = vec![0x00, 0x00];
    raw.extend_from_slice(&record);
    raw.extend(vec![0u8; record.len()]);
    raw
}

pub fn places_gen1() -> Vec<u8> {
    let mut raw = vec![0x00];
    raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00, 0x00, 0x0D, 0x00, 0x00, 0x10, 0x00]);
    raw.extend_from_slice(&[0u8; 10]);
    raw
}

pub fn current_usage() -> Vec<u8> {
    let mut raw = vec![0x5E, 0x0C, 0x32, 0x80];
    raw.extend(registration(0x0D, "B AB 1234"));
    raw
}

pub fn control_activity() -> Vec<u8> {
    let mut raw = vec![0xC0, 0x5E, 0x0B, 0xE1, 0x00];
    raw.extend(full_card_number(0x03, "DC00000001234500", Generation::Gen1));
    raw.extend(registration(0x0D, "B AB 1234"));
    raw.extend_from_slice(&[0x5E, 0x00, 0x00, 0x00, 0x5E, 0x0B, 0xE1, 0x00]);
    raw
}

/// A first generation driver card download with every required file and a
/// few optional ones.
pub fn driver_card_gen1() -> CardBuilder {
    let (newest, ring) = two_day_ring();
    let mut events = event_record(0x02, 0x5E0B_E100);
    events.extend_from_slice(&[0u8; 24]);
    CardBuilder::new()
        .unsigned(ElementaryFile::Icc, Generation::Gen1, &icc())
        .unsigned(ElementaryFile::Ic, Generation::Gen1, &ic())
        .gen1(ElementaryFile::ApplicationIdentification, &driver_application(Generation::Gen1, 64))
        .unsigned(ElementaryFile::CardCertificate, Generation::Gen1, &[0xCE; 194])
        .unsigned(ElementaryFile::CaCertificate, Generation::Gen1, &[0xCA; 194])
        .gen1(ElementaryFile::Identification, &driver_identification())
        .gen1(ElementaryFile::CardDownloadDriver, &[0x5E, 0x0D, 0x32, 0x80])
        .gen1(ElementaryFile::EventsData, &events)
        .gen1(ElementaryFile::FaultsData, &[0u8; 24])
        .gen1(ElementaryFile::DriverActivityData, &driver_activity(0, newest, &ring))
        .gen1(ElementaryFile::VehiclesUsed, &vehicles_used(Generation::Gen1))
        .gen1(ElementaryFile::Places, &places_gen1())
        .gen1(ElementaryFile::CurrentUsage, &current_usage())
        .gen1(ElementaryFile::ControlActivityData, &control_activity())
        .gen1(ElementaryFile::SpecificConditions, &[0x5E, 0x0B, 0xE1, 0x00, 0x03])
}

/// `driver_card_gen1` followed by a second generation application.
pub fn driver_card_gen1_gen2() -> CardBuilder {
    let (newest, ring) = two_day_ring();
    driver_card_gen1()
        .gen2(ElementaryFile::ApplicationIdentification, &driver_application(Generation::Gen2, 64))
        .unsigned(ElementaryFile::CardCertificate, Generation::Gen2, &[0xCE; 205])
        .gen2(ElementaryFile::Identification, &driver_identification())
        .gen2(ElementaryFile::DriverActivityData, &driver_activity(0, newest, &ring))
        .gen2(ElementaryFile::VehiclesUsed, &vehicles_used(Generation::Gen2))
}

/// Workshop application identification; the calibration count follows the
/// place count in both generations.
pub fn workshop_application(generation: Generation, calibrations: u8) -> Vec<u8> {
    let mut raw = vec![0x02, 0x00, 0x01, 0x02, 0x02, 0x00, 0x40, 0x00, 0x02];
    match generation {
        Generation::Gen1 => raw.extend_from_slice(&[0x02, calibrations]),
        Generation::Gen2 => {
            raw.extend_from_slice(&[0x00, 0x02, calibrations]);
            raw.extend_from_slice(&[0x00, 0x10, 0x00, 0x20, 0x00, 0x30]);
        }
    }
    raw
}

/// One populated WorkshopCardCalibrationRecord.
pub fn calibration_record(generation: Generation) -> Vec<u8> {
    let mut raw = vec![0x03];
    raw.extend_from_slice(b"WDB9634031L123456");
    raw.extend(registration(0x0D, "B AB 1234"));
    raw.extend_from_slice(&[0x1F, 0x40, 0x1F, 0x40, 0x0C, 0x80]);
    raw.extend_from_slice(b"315/70 R 22.5  ");
    raw.push(90);
    raw.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x10]);
    raw.extend_from_slice(&[0x5E, 0x0B, 0xE1, 0x00, 0x5E, 0x0B, 0xE1, 0x3C, 0x60, 0x00, 0x00, 0x00]);
    raw.extend_from_slice(b"1381.1010000000 ");
    raw.extend_from_slice(&[0x00, 0x00, 0x30, 0x39, 0x03, 0x19, 0x06, 0x21]);
    raw.extend_from_slice(&[0x00, 0x00, 0xD4, 0x31, 0x03, 0x19, 0x07, 0x21]);
    if generation == Generation::Gen2 {
        raw.extend_from_slice(&[0x00, 0x00, 0x11, 0x22, 0x03, 0x19, 0x08, 0x21]);
        raw.extend_from_slice(&[0x00, 0x00, 0x33, 0x44, 0x03, 0x19, 0x09, 0x21]);
        raw.push(0x01);
        raw.extend_from_slice(&[0x07, 0x00, 0x21, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
        raw.extend_from_slice(&[0u8; 36]);
    }
    raw
}

/// EF_Calibration with one record followed by one empty slot.
pub fn calibration(generation: Generation) -> Vec<u8> {
    let record = calibration_record(generation);
    let mut raw = vec![0x00, 0x01, 0x00];
    raw.extend_from_slice(&record);
    raw.resize(raw.len() + record.len(), 0);
    raw
}

pub fn workshop_card_gen1() -> CardBuilder {
    let (newest, ring) = two_day_ring();
    CardBuilder::new()
        .unsigned(ElementaryFile::Icc, Generation::Gen1, &icc())
        .unsigned(ElementaryFile::Ic, Generation::Gen1, &ic())
        .gen1(ElementaryFile::ApplicationIdentification, &workshop_application(Generation::Gen1, 1))
        .gen1(ElementaryFile::Identification, &workshop_identification())
        .gen1(ElementaryFile::CardDownloadWorkshop, &[0x00, 0x03])
        .gen1(ElementaryFile::Calibration, &calibration(Generation::Gen1))
        .gen1(ElementaryFile::EventsData, &[0u8; 24])
        .gen1(ElementaryFile::FaultsData, &[0u8; 24])
        .gen1(ElementaryFile::DriverActivityData, &driver_activity(0, newest, &ring))
        .gen1(ElementaryFile::VehiclesUsed, &vehicles_used(Generation::Gen1))
        .gen1(ElementaryFile::Places, &places_gen1())
        .gen1(ElementaryFile::ControlActivityData, &control_activity())
}

/// `workshop_card_gen1` followed by a second generation application.
pub fn workshop_card_gen1_gen2() -> CardBuilder {
    workshop_card_gen1()
        .gen2(ElementaryFile::ApplicationIdentification, &workshop_application(Generation::Gen2, 3))
        .gen2(ElementaryFile::Identification, &workshop_identification())
        .gen2(ElementaryFile::CardDownloadWorkshop, &[0x00, 0x01])
        .gen2(ElementaryFile::Calibration, &calibration(Generation::Gen2))
}

// --- Vehicle unit ---

pub const GEN1_SIGNATURE: [u8; 128] = [SIGNATURE_BYTE; 128];

/// TREP 01 payload with no company locks and no controls.
pub fn overview_gen1_payload() -> Vec<u8> {
    let mut raw = vec![0xC1; 194];
    raw.extend_from_slice(&[0xC2; 194]);
    raw.extend_from_slice(b"WDB9634031L123456");
    raw.extend(registration(0x0D, "B AB 1234"));
    raw.extend_from_slice(&[0x5E, 0x0D, 0x32, 0x80]);
    raw.extend_from_slice(&[0x5E, 0x00, 0x00, 0x00, 0x5E, 0x0D, 0x32, 0x80]);
    raw.push(0x11);
    raw.extend_from_slice(&[0x5E, 0x0C, 0x00, 0x00]);
    raw.extend(full_card_number(0x04, "DK00000000012300", Generation::Gen1));
    raw.extend(name("SPEDITION"));
    raw.extend_from_slice(&[0x00, 0x00]);
    raw.extend_from_slice(&GEN1_SIGNATURE);
    raw
}

/// TREP 02 payload for one day. The activity changes include both
/// sentinel values.
pub fn activities_gen1_payload() -> Vec<u8> {
    let mut raw = vec![0x5E, 0x0B, 0xE1, 0x00];
    raw.extend_from_slice(&[0x01, 0x00, 0x00]);
    raw.extend_from_slice(&[0x00, 0x00]);
    raw.extend_from_slice(&[0x00, 0x04]);
    for change in [0x0000u16, 0x1800 | 60, 0x0800 | 600, 0xFFFF] {
        raw.extend_from_slice(&change.to_be_bytes());
    }
    raw.push(0x00);
    raw.extend_from_slice(&[0x00, 0x00]);
    raw.extend_from_slice(&GEN1_SIGNATURE);
    raw
}

pub fn transfer(trep: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x76, trep];
    out.extend_from_slice(payload);
    out
}

pub fn record_array(record_type: u8, size: u16, records: &[&[u8]]) -> Vec<u8> {
    let mut out = vec![record_type];
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());
    for record in records {
        assert_eq!(record.len(), usize::from(size));
        out.extend_from_slice(record);
    }
    out
}

/// Generation 2 overview: VIN, current time and slots status arrays, then
/// the signature.
pub fn overview_gen2_payload() -> Vec<u8> {
    let mut raw = record_array(0x0A, 17, &[b"WDB9634031L123456"]);
    raw.extend(record_array(0x03, 4, &[&[0x5E, 0x0D, 0x32, 0x80]]));
    raw.extend(record_array(0x02, 1, &[&[0x11]]));
    raw.extend(record_array(0x08, 64, &[&[SIGNATURE_BYTE; 64]]));
    raw
}
