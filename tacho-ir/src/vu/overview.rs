//! Generation 1 overview transfer (TREP 01).

use ddd_format::codec::put_fixed;
use ddd_format::{
    Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, StringValue, TimeReal,
};
use serde::{Deserialize, Serialize};

use super::records::{
    GEN1_CERTIFICATE_LEN, GEN1_SIGNATURE_LEN, VuCompanyLock, VuControlActivity, VuDownloadActivity,
    VuDownloadablePeriod, read_bytes,
};
use super::{read_list_u8, write_list_u8};
use crate::types::{VIN_LEN, VehicleRegistration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewGen1 {
    pub member_state_certificate: Vec<u8>,
    pub vu_certificate: Vec<u8>,
    pub vehicle_identification_number: StringValue,
    pub vehicle_registration: VehicleRegistration,
    pub current_date_time: TimeReal,
    pub vu_downloadable_period: VuDownloadablePeriod,
    pub card_slots_status: u8,
    pub vu_download_activity_data: VuDownloadActivity,
    pub vu_company_locks: Vec<VuCompanyLock>,
    pub vu_control_activity: Vec<VuControlActivity>,
    pub signature: Vec<u8>,
}

impl Decode for OverviewGen1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            member_state_certificate: read_bytes(r, GEN1_CERTIFICATE_LEN)?,
            vu_certificate: read_bytes(r, GEN1_CERTIFICATE_LEN)?,
            vehicle_identification_number: StringValue::read_ia5(r, VIN_LEN)?,
            vehicle_registration: r.decode()?,
            current_date_time: r.decode()?,
            vu_downloadable_period: r.decode()?,
            card_slots_status: r.u8()?,
            vu_download_activity_data: VuDownloadActivity::decode_gen(r, Generation::Gen1)?,
            vu_company_locks: read_list_u8(r)?,
            vu_control_activity: read_list_u8(r)?,
            signature: read_bytes(r, GEN1_SIGNATURE_LEN)?,
        })
    }
}

impl Encode for OverviewGen1 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_fixed(out, "member state certificate", &self.member_state_certificate, GEN1_CERTIFICATE_LEN)?;
        put_fixed(out, "VU certificate", &self.vu_certificate, GEN1_CERTIFICATE_LEN)?;
        self.vehicle_identification_number.write_ia5(VIN_LEN, out)?;
        self.vehicle_registration.encode(out)?;
        self.current_date_time.encode(out)?;
        self.vu_downloadable_period.encode(out)?;
        out.push(self.card_slots_status);
        self.vu_download_activity_data.encode_gen(Generation::Gen1, out)?;
        write_list_u8(&self.vu_company_locks, "company locks", out)?;
        write_list_u8(&self.vu_control_activity, "control activities", out)?;
        put_fixed(out, "signature", &self.signature, GEN1_SIGNATURE_LEN)
    }
}
