//! Vehicle unit records shared by generation 1 transfers and generation 2
//! record arrays.
//!
//! Generation 2 layouts differ from generation 1 mostly through the card
//! number, which gains a generation byte, and through longer approval
//! numbers. Every type here takes the generation it is read in.

use ddd_format::codec::{put_fixed, put_u24};
use ddd_format::{
    Datef, Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue,
    TimeReal,
};
use serde::{Deserialize, Serialize};

use crate::enums::{CalibrationPurpose, CardSlotNumber, EventFaultRecordPurpose, EventFaultType, ManualInputFlag};
use crate::types::{
    ControlType, ExtendedSerialNumber, FullCardNumber, GnssPlaceRecord, HolderName, PlaceRecord, VIN_LEN,
    VehicleRegistration, read_name, read_u24, write_name,
};

/// Signature length of generation 1 transfers.
pub const GEN1_SIGNATURE_LEN: usize = 128;
/// Length of a generation 1 certificate.
pub const GEN1_CERTIFICATE_LEN: usize = 194;

pub(crate) fn read_bytes(r: &mut Reader<'_>, n: usize) -> Result<Vec<u8>, DecodeError> {
    Ok(r.take(n)?.to_vec())
}

fn approval_number_len(generation: Generation) -> usize {
    match generation {
        Generation::Gen1 => 8,
        Generation::Gen2 => 16,
    }
}

/// VuDownloadablePeriod (8 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuDownloadablePeriod {
    pub min_downloadable_time: TimeReal,
    pub max_downloadable_time: TimeReal,
}

impl Decode for VuDownloadablePeriod {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            min_downloadable_time: r.decode()?,
            max_downloadable_time: r.decode()?,
        })
    }
}

impl Encode for VuDownloadablePeriod {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.min_downloadable_time.encode(out)?;
        self.max_downloadable_time.encode(out)
    }
}

/// VuDownloadActivityData (58 bytes, 59 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuDownloadActivity {
    pub downloading_time: TimeReal,
    pub full_card_number: FullCardNumber,
    pub company_or_workshop_name: StringValue,
}

impl DecodeGen for VuDownloadActivity {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            downloading_time: r.decode()?,
            full_card_number: FullCardNumber::decode_gen(r, generation)?,
            company_or_workshop_name: read_name(r)?,
        })
    }
}

impl EncodeGen for VuDownloadActivity {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.downloading_time.encode(out)?;
        self.full_card_number.encode_gen(generation, out)?;
        write_name(&self.company_or_workshop_name, out)
    }
}

/// VuCompanyLocksRecord (98 bytes, 99 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuCompanyLock {
    pub lock_in_time: TimeReal,
    pub lock_out_time: TimeReal,
    pub company_name: StringValue,
    pub company_address: StringValue,
    pub company_card_number: FullCardNumber,
}

impl DecodeGen for VuCompanyLock {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            lock_in_time: r.decode()?,
            lock_out_time: r.decode()?,
            company_name: read_name(r)?,
            company_address: read_name(r)?,
            company_card_number: FullCardNumber::decode_gen(r, generation)?,
        })
    }
}

impl EncodeGen for VuCompanyLock {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.lock_in_time.encode(out)?;
        self.lock_out_time.encode(out)?;
        write_name(&self.company_name, out)?;
        write_name(&self.company_address, out)?;
        self.company_card_number.encode_gen(generation, out)
    }
}

/// VuControlActivityRecord (31 bytes, 32 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuControlActivity {
    pub control_type: ControlType,
    pub control_time: TimeReal,
    pub control_card_number: FullCardNumber,
    pub download_period_begin_time: TimeReal,
    pub download_period_end_time: TimeReal,
}

impl DecodeGen for VuControlActivity {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            control_type: r.decode()?,
            control_time: r.decode()?,
            control_card_number: FullCardNumber::decode_gen(r, generation)?,
            download_period_begin_time: r.decode()?,
            download_period_end_time: r.decode()?,
        })
    }
}

impl EncodeGen for VuControlActivity {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.control_type.encode(out)?;
        self.control_time.encode(out)?;
        self.control_card_number.encode_gen(generation, out)?;
        self.download_period_begin_time.encode(out)?;
        self.download_period_end_time.encode(out)
    }
}

/// PreviousVehicleInfo; generation 2 appends the VU generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousVehicleInfo {
    pub vehicle_registration: VehicleRegistration,
    pub card_withdrawal_time: TimeReal,
    pub vu_generation: Option<u8>,
}

/// VuCardIWRecord (129 bytes, 131 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuCardIwRecord {
    pub card_holder_name: HolderName,
    pub full_card_number: FullCardNumber,
    pub card_expiry_date: Datef,
    pub card_insertion_time: TimeReal,
    pub vehicle_odometer_value_at_insertion: u32,
    pub card_slot_number: CardSlotNumber,
    pub card_withdrawal_time: TimeReal,
    pub vehicle_odometer_value_at_withdrawal: u32,
    pub previous_vehicle_info: PreviousVehicleInfo,
    pub manual_input_flag: ManualInputFlag,
}

impl DecodeGen for VuCardIwRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            card_holder_name: r.decode()?,
            full_card_number: FullCardNumber::decode_gen(r, generation)?,
            card_expiry_date: r.decode()?,
            card_insertion_time: r.decode()?,
            vehicle_odometer_value_at_insertion: read_u24(r)?,
            card_slot_number: r.decode()?,
            card_withdrawal_time: r.decode()?,
            vehicle_odometer_value_at_withdrawal: read_u24(r)?,
            previous_vehicle_info: PreviousVehicleInfo {
                vehicle_registration: r.decode()?,
                card_withdrawal_time: r.decode()?,
                vu_generation: match generation {
                    Generation::Gen1 => None,
                    Generation::Gen2 => Some(r.u8()?),
                },
            },
            manual_input_flag: r.decode()?,
        })
    }
}

impl EncodeGen for VuCardIwRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.card_holder_name.encode(out)?;
        self.full_card_number.encode_gen(generation, out)?;
        self.card_expiry_date.encode(out)?;
        self.card_insertion_time.encode(out)?;
        put_u24(out, self.vehicle_odometer_value_at_insertion)?;
        self.card_slot_number.encode(out)?;
        self.card_withdrawal_time.encode(out)?;
        put_u24(out, self.vehicle_odometer_value_at_withdrawal)?;
        let previous = &self.previous_vehicle_info;
        previous.vehicle_registration.encode(out)?;
        previous.card_withdrawal_time.encode(out)?;
        if generation == Generation::Gen2 {
            out.push(previous.vu_generation.unwrap_or(0));
        }
        self.manual_input_flag.encode(out)
    }
}

/// VuPlaceDailyWorkPeriodRecord (28 bytes, 40 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuPlaceRecord {
    pub full_card_number: FullCardNumber,
    pub place_record: PlaceRecord,
}

impl DecodeGen for VuPlaceRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            full_card_number: FullCardNumber::decode_gen(r, generation)?,
            place_record: PlaceRecord::decode_gen(r, generation)?,
        })
    }
}

impl EncodeGen for VuPlaceRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.full_card_number.encode_gen(generation, out)?;
        self.place_record.encode_gen(generation, out)
    }
}

/// Card numbers in the driver and co-driver slots at the start and end of
/// an event or fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCardNumbers {
    pub driver_slot_begin: FullCardNumber,
    pub codriver_slot_begin: FullCardNumber,
    pub driver_slot_end: FullCardNumber,
    pub codriver_slot_end: FullCardNumber,
}

impl DecodeGen for SlotCardNumbers {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            driver_slot_begin: FullCardNumber::decode_gen(r, generation)?,
            codriver_slot_begin: FullCardNumber::decode_gen(r, generation)?,
            driver_slot_end: FullCardNumber::decode_gen(r, generation)?,
            codriver_slot_end: FullCardNumber::decode_gen(r, generation)?,
        })
    }
}

impl EncodeGen for SlotCardNumbers {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.driver_slot_begin.encode_gen(generation, out)?;
        self.codriver_slot_begin.encode_gen(generation, out)?;
        self.driver_slot_end.encode_gen(generation, out)?;
        self.codriver_slot_end.encode_gen(generation, out)
    }
}

/// Bytes following a generation 2 event or fault record, when the record
/// size announces more than the common layout.
fn read_tail(r: &mut Reader<'_>, generation: Generation) -> Vec<u8> {
    match generation {
        Generation::Gen1 => Vec::new(),
        Generation::Gen2 => r.rest().to_vec(),
    }
}

/// VuFaultRecord (82 bytes in generation 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuFaultRecord {
    pub fault_type: EventFaultType,
    pub fault_record_purpose: EventFaultRecordPurpose,
    pub fault_begin_time: TimeReal,
    pub fault_end_time: TimeReal,
    pub card_numbers: SlotCardNumbers,
    pub manufacturer_specific: Vec<u8>,
}

impl DecodeGen for VuFaultRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            fault_type: r.decode()?,
            fault_record_purpose: r.decode()?,
            fault_begin_time: r.decode()?,
            fault_end_time: r.decode()?,
            card_numbers: SlotCardNumbers::decode_gen(r, generation)?,
            manufacturer_specific: read_tail(r, generation),
        })
    }
}

impl EncodeGen for VuFaultRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.fault_type.encode(out)?;
        self.fault_record_purpose.encode(out)?;
        self.fault_begin_time.encode(out)?;
        self.fault_end_time.encode(out)?;
        self.card_numbers.encode_gen(generation, out)?;
        out.extend_from_slice(&self.manufacturer_specific);
        Ok(())
    }
}

/// VuEventRecord (83 bytes in generation 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuEventRecord {
    pub event_type: EventFaultType,
    pub event_record_purpose: EventFaultRecordPurpose,
    pub event_begin_time: TimeReal,
    pub event_end_time: TimeReal,
    pub card_numbers: SlotCardNumbers,
    pub similar_events_number: u8,
    pub manufacturer_specific: Vec<u8>,
}

impl DecodeGen for VuEventRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            event_type: r.decode()?,
            event_record_purpose: r.decode()?,
            event_begin_time: r.decode()?,
            event_end_time: r.decode()?,
            card_numbers: SlotCardNumbers::decode_gen(r, generation)?,
            similar_events_number: r.u8()?,
            manufacturer_specific: read_tail(r, generation),
        })
    }
}

impl EncodeGen for VuEventRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.event_type.encode(out)?;
        self.event_record_purpose.encode(out)?;
        self.event_begin_time.encode(out)?;
        self.event_end_time.encode(out)?;
        self.card_numbers.encode_gen(generation, out)?;
        out.push(self.similar_events_number);
        out.extend_from_slice(&self.manufacturer_specific);
        Ok(())
    }
}

/// VuOverSpeedingControlData (9 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuOverSpeedingControl {
    pub last_overspeed_control_time: TimeReal,
    pub first_overspeed_since: TimeReal,
    pub number_of_overspeed_since: u8,
}

impl Decode for VuOverSpeedingControl {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            last_overspeed_control_time: r.decode()?,
            first_overspeed_since: r.decode()?,
            number_of_overspeed_since: r.u8()?,
        })
    }
}

impl Encode for VuOverSpeedingControl {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.last_overspeed_control_time.encode(out)?;
        self.first_overspeed_since.encode(out)?;
        out.push(self.number_of_overspeed_since);
        Ok(())
    }
}

/// VuOverSpeedingEventRecord (31 bytes, 32 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuOverSpeedingEvent {
    pub event_type: EventFaultType,
    pub event_record_purpose: EventFaultRecordPurpose,
    pub event_begin_time: TimeReal,
    pub event_end_time: TimeReal,
    pub max_speed_value: u8,
    pub average_speed_value: u8,
    pub card_number_driver_slot_begin: FullCardNumber,
    pub similar_events_number: u8,
}

impl DecodeGen for VuOverSpeedingEvent {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            event_type: r.decode()?,
            event_record_purpose: r.decode()?,
            event_begin_time: r.decode()?,
            event_end_time: r.decode()?,
            max_speed_value: r.u8()?,
            average_speed_value: r.u8()?,
            card_number_driver_slot_begin: FullCardNumber::decode_gen(r, generation)?,
            similar_events_number: r.u8()?,
        })
    }
}

impl EncodeGen for VuOverSpeedingEvent {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.event_type.encode(out)?;
        self.event_record_purpose.encode(out)?;
        self.event_begin_time.encode(out)?;
        self.event_end_time.encode(out)?;
        out.push(self.max_speed_value);
        out.push(self.average_speed_value);
        self.card_number_driver_slot_begin.encode_gen(generation, out)?;
        out.push(self.similar_events_number);
        Ok(())
    }
}

/// VuTimeAdjustmentRecord (98 bytes, 99 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuTimeAdjustment {
    pub old_time_value: TimeReal,
    pub new_time_value: TimeReal,
    pub workshop_name: StringValue,
    pub workshop_address: StringValue,
    pub workshop_card_number: FullCardNumber,
}

impl DecodeGen for VuTimeAdjustment {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            old_time_value: r.decode()?,
            new_time_value: r.decode()?,
            workshop_name: read_name(r)?,
            workshop_address: read_name(r)?,
            workshop_card_number: FullCardNumber::decode_gen(r, generation)?,
        })
    }
}

impl EncodeGen for VuTimeAdjustment {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.old_time_value.encode(out)?;
        self.new_time_value.encode(out)?;
        write_name(&self.workshop_name, out)?;
        write_name(&self.workshop_address, out)?;
        self.workshop_card_number.encode_gen(generation, out)
    }
}

/// One minute of second-by-second speeds (64 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuDetailedSpeedBlock {
    pub speed_block_begin_date: TimeReal,
    /// 60 speed values in km/h.
    pub speeds_per_second: Vec<u8>,
}

impl VuDetailedSpeedBlock {
    pub const SPEEDS: usize = 60;
}

impl Decode for VuDetailedSpeedBlock {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            speed_block_begin_date: r.decode()?,
            speeds_per_second: read_bytes(r, Self::SPEEDS)?,
        })
    }
}

impl Encode for VuDetailedSpeedBlock {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.speed_block_begin_date.encode(out)?;
        put_fixed(out, "speeds per second", &self.speeds_per_second, Self::SPEEDS)
    }
}

/// VuIdentification: 116 bytes in generation 1. Generation 2 widens the
/// approval number and appends the VU generation, abilities and, on newer
/// units, further fields kept as `extension`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuIdentification {
    pub vu_manufacturer_name: StringValue,
    pub vu_manufacturer_address: StringValue,
    pub vu_part_number: StringValue,
    pub vu_serial_number: ExtendedSerialNumber,
    pub vu_software_version: StringValue,
    pub vu_software_installation_date: TimeReal,
    pub vu_manufacturing_date: TimeReal,
    pub vu_approval_number: StringValue,
    pub extension: Vec<u8>,
}

impl DecodeGen for VuIdentification {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            vu_manufacturer_name: read_name(r)?,
            vu_manufacturer_address: read_name(r)?,
            vu_part_number: StringValue::read_ia5(r, 16)?,
            vu_serial_number: r.decode()?,
            vu_software_version: StringValue::read_ia5(r, 4)?,
            vu_software_installation_date: r.decode()?,
            vu_manufacturing_date: r.decode()?,
            vu_approval_number: StringValue::read_ia5(r, approval_number_len(generation))?,
            extension: read_tail(r, generation),
        })
    }
}

impl EncodeGen for VuIdentification {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        write_name(&self.vu_manufacturer_name, out)?;
        write_name(&self.vu_manufacturer_address, out)?;
        self.vu_part_number.write_ia5(16, out)?;
        self.vu_serial_number.encode(out)?;
        self.vu_software_version.write_ia5(4, out)?;
        self.vu_software_installation_date.encode(out)?;
        self.vu_manufacturing_date.encode(out)?;
        self.vu_approval_number.write_ia5(approval_number_len(generation), out)?;
        out.extend_from_slice(&self.extension);
        Ok(())
    }
}

/// SensorPaired (20 bytes, 28 in generation 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPaired {
    pub sensor_serial_number: ExtendedSerialNumber,
    pub sensor_approval_number: StringValue,
    pub sensor_pairing_date: TimeReal,
}

impl DecodeGen for SensorPaired {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            sensor_serial_number: r.decode()?,
            sensor_approval_number: StringValue::read_ia5(r, approval_number_len(generation))?,
            sensor_pairing_date: r.decode()?,
        })
    }
}

impl EncodeGen for SensorPaired {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.sensor_serial_number.encode(out)?;
        self.sensor_approval_number
            .write_ia5(approval_number_len(generation), out)?;
        self.sensor_pairing_date.encode(out)
    }
}

/// VuCalibrationRecord (167 bytes, generation 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuCalibrationRecord {
    pub calibration_purpose: CalibrationPurpose,
    pub workshop_name: StringValue,
    pub workshop_address: StringValue,
    pub workshop_card_number: FullCardNumber,
    pub workshop_card_expiry_date: Datef,
    pub vehicle_identification_number: StringValue,
    pub vehicle_registration: VehicleRegistration,
    pub w_vehicle_characteristic_constant: u16,
    pub k_constant_of_recording_equipment: u16,
    pub l_tyre_circumference: u16,
    pub tyre_size: StringValue,
    pub authorised_speed: u8,
    pub old_odometer_value: u32,
    pub new_odometer_value: u32,
    pub old_time_value: TimeReal,
    pub new_time_value: TimeReal,
    pub next_calibration_date: TimeReal,
}

impl DecodeGen for VuCalibrationRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            calibration_purpose: r.decode()?,
            workshop_name: read_name(r)?,
            workshop_address: read_name(r)?,
            workshop_card_number: FullCardNumber::decode_gen(r, generation)?,
            workshop_card_expiry_date: r.decode()?,
            vehicle_identification_number: StringValue::read_ia5(r, VIN_LEN)?,
            vehicle_registration: r.decode()?,
            w_vehicle_characteristic_constant: r.u16()?,
            k_constant_of_recording_equipment: r.u16()?,
            l_tyre_circumference: r.u16()?,
            tyre_size: StringValue::read_ia5(r, 15)?,
            authorised_speed: r.u8()?,
            old_odometer_value: read_u24(r)?,
            new_odometer_value: read_u24(r)?,
            old_time_value: r.decode()?,
            new_time_value: r.decode()?,
            next_calibration_date: r.decode()?,
        })
    }
}

impl EncodeGen for VuCalibrationRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.calibration_purpose.encode(out)?;
        write_name(&self.workshop_name, out)?;
        write_name(&self.workshop_address, out)?;
        self.workshop_card_number.encode_gen(generation, out)?;
        self.workshop_card_expiry_date.encode(out)?;
        self.vehicle_identification_number.write_ia5(VIN_LEN, out)?;
        self.vehicle_registration.encode(out)?;
        self.w_vehicle_characteristic_constant.encode(out)?;
        self.k_constant_of_recording_equipment.encode(out)?;
        self.l_tyre_circumference.encode(out)?;
        self.tyre_size.write_ia5(15, out)?;
        out.push(self.authorised_speed);
        put_u24(out, self.old_odometer_value)?;
        put_u24(out, self.new_odometer_value)?;
        self.old_time_value.encode(out)?;
        self.new_time_value.encode(out)?;
        self.next_calibration_date.encode(out)
    }
}

/// VuGNSSADRecord (56 bytes, generation 2 only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VuGnssAdRecord {
    pub time_stamp: TimeReal,
    pub card_number_driver_slot: FullCardNumber,
    pub card_number_codriver_slot: FullCardNumber,
    pub gnss_place_record: GnssPlaceRecord,
    pub vehicle_odometer_value: u32,
}

impl DecodeGen for VuGnssAdRecord {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError> {
        Ok(Self {
            time_stamp: r.decode()?,
            card_number_driver_slot: FullCardNumber::decode_gen(r, generation)?,
            card_number_codriver_slot: FullCardNumber::decode_gen(r, generation)?,
            gnss_place_record: r.decode()?,
            vehicle_odometer_value: read_u24(r)?,
        })
    }
}

impl EncodeGen for VuGnssAdRecord {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.time_stamp.encode(out)?;
        self.card_number_driver_slot.encode_gen(generation, out)?;
        self.card_number_codriver_slot.encode_gen(generation, out)?;
        self.gnss_place_record.encode(out)?;
        put_u24(out, self.vehicle_odometer_value)
    }
}
