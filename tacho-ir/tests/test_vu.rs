mod common;

use common::*;
use ddd_format::{TransferType, VuGeneration};
use pretty_assertions::assert_eq;
use tacho_ir::enums::RecordType;
use tacho_ir::vu::{Transfer, TransferPayload, VuRecord, unmarshal_vu};
use tacho_ir::*;

fn gen1_download() -> Vec<u8> {
    let mut data = transfer(0x01, &overview_gen1_payload());
    data.extend(transfer(0x02, &activities_gen1_payload()));
    data
}

fn unmarshal_vu_file(data: &[u8]) -> VehicleUnitFile {
    match unmarshal_file(data).unwrap() {
        StructuredFile::VehicleUnit(vu) => vu,
        other => panic!("expected a vehicle unit file, got {}", other.kind()),
    }
}

#[test]
fn test_gen1_download_round_trip() {
    let data = gen1_download();
    let vu = unmarshal_vu_file(&data);
    assert_eq!(vu.transfers.len(), 2);
    assert_eq!(vu.raw_len(), 0);
    assert_eq!(vu.generation(), Some(VuGeneration::Gen1));

    let overview = vu.payloads(TransferType::OverviewGen1).next().unwrap();
    let TransferPayload::Overview(overview) = overview else {
        panic!("expected an overview payload");
    };
    assert_eq!(overview.vehicle_identification_number.as_str(), "WDB9634031L123456");
    assert_eq!(overview.vehicle_registration.number.as_str(), "B AB 1234");
    assert_eq!(overview.card_slots_status, 0x11);
    assert!(overview.vu_company_locks.is_empty());

    assert_eq!(marshal_file(&StructuredFile::VehicleUnit(vu)).unwrap(), data);
}

#[test]
fn test_gen1_activity_changes_keep_sentinels() {
    let vu = unmarshal_vu_file(&gen1_download());
    let Some(TransferPayload::Activities(day)) = vu.payloads(TransferType::ActivitiesGen1).next() else {
        panic!("expected an activities payload");
    };
    assert_eq!(day.odometer_value_midnight, 0x010000);
    let raw: Vec<u16> = day.vu_activity_daily_data.iter().map(|c| c.to_u16()).collect();
    assert_eq!(raw, vec![0x0000, 0x1800 | 60, 0x0800 | 600, 0xFFFF]);
}

#[test]
fn test_gen2_record_arrays_round_trip() {
    let data = transfer(0x21, &overview_gen2_payload());
    let vu = unmarshal_vu_file(&data);
    assert_eq!(vu.generation(), Some(VuGeneration::Gen2));

    let Some(TransferPayload::RecordArrays(arrays)) = vu.payloads(TransferType::OverviewGen2).next() else {
        panic!("expected record arrays");
    };
    let types: Vec<RecordType> = arrays.iter().map(|a| a.record_type).collect();
    assert_eq!(
        types,
        vec![
            RecordType::VehicleIdentificationNumber,
            RecordType::CurrentDateTime,
            RecordType::CardSlotsStatus,
            RecordType::Signature,
        ]
    );
    let VuRecord::VehicleIdentificationNumber(vin) = &arrays[0].records[0] else {
        panic!("expected a typed VIN");
    };
    assert_eq!(vin.as_str(), "WDB9634031L123456");
    assert_eq!(arrays[2].records[0], VuRecord::CardSlotsStatus(0x11));

    assert_eq!(marshal_file(&StructuredFile::VehicleUnit(vu)).unwrap(), data);
}

#[test]
fn test_gen2_unknown_record_type_is_raw() {
    let mut payload = record_array(0x7E, 3, &[&[1, 2, 3], &[4, 5, 6]]);
    payload.extend(record_array(0x08, 4, &[&[SIGNATURE_BYTE; 4]]));
    let data = transfer(0x32, &payload);

    let vu = unmarshal_vu_file(&data);
    assert_eq!(vu.generation(), Some(VuGeneration::Gen2V2));
    let Some(TransferPayload::RecordArrays(arrays)) = vu.payloads(TransferType::ActivitiesGen2V2).next() else {
        panic!("expected record arrays");
    };
    assert_eq!(arrays[0].record_type, RecordType::Unrecognized(0x7E));
    assert!(arrays[0].records.iter().all(VuRecord::is_raw));
    assert_eq!(marshal_file(&StructuredFile::VehicleUnit(vu)).unwrap(), data);
}

#[test]
fn test_undecodable_transfer_policies() {
    let mut data = gen1_download();
    // activities transfer announcing far more card insertions than follow
    let broken = transfer(0x02, &[0x5E, 0x0B, 0xE1, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xFF]);
    data.extend_from_slice(&broken);
    data.extend(transfer(0x21, &overview_gen2_payload()));

    let err = unmarshal_vu(&data, UnknownTagPolicy::Fail).unwrap_err();
    assert!(matches!(
        err,
        UnmarshalError::Transfer {
            transfer_type: TransferType::ActivitiesGen1,
            ..
        }
    ));

    let kept = unmarshal_vu(&data, UnknownTagPolicy::PreserveRemainder).unwrap();
    assert_eq!(kept.transfers.len(), 3);
    assert!(matches!(kept.transfers[2], Transfer::Raw(_)));
    assert_eq!(kept.raw_len(), data.len() - gen1_download().len());
    assert_eq!(kept.generation(), Some(VuGeneration::Gen1));

    let options = UnmarshalOptions {
        unknown_vu_tag: UnknownTagPolicy::Resync,
    };
    let StructuredFile::VehicleUnit(resynced) = unmarshal_file_with(&data, &options).unwrap() else {
        panic!("expected a vehicle unit file");
    };
    assert_eq!(resynced.transfers.len(), 4);
    assert_eq!(resynced.transfers[2], Transfer::Raw(broken));
    assert_eq!(resynced.generation(), Some(VuGeneration::Gen2));
    assert_eq!(marshal_file(&StructuredFile::VehicleUnit(resynced)).unwrap(), data);
}

#[test]
fn test_vu_serializes_to_json() {
    let vu = unmarshal_vu_file(&gen1_download());
    let json = serde_json::to_string(&vu).unwrap();
    let back: VehicleUnitFile = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vu);
}
