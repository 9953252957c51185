//! Generation 1 activities transfer (TREP 02): one calendar day.

use ddd_format::codec::{put_count_u16, put_fixed, put_u24};
use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader, TimeReal};
use serde::{Deserialize, Serialize};

use super::records::{GEN1_SIGNATURE_LEN, VuCardIwRecord, VuPlaceRecord, read_bytes};
use super::{read_list_u16, read_list_u8, write_list_u16, write_list_u8};
use crate::types::{ActivityChangeInfo, SpecificConditionRecord, read_u24};

/// Activity changes are listed with an explicit count here, so every value
/// is kept, including `0x0000` and `0xFFFF`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitiesGen1 {
    pub date_of_day_downloaded: TimeReal,
    pub odometer_value_midnight: u32,
    pub vu_card_iw_data: Vec<VuCardIwRecord>,
    pub vu_activity_daily_data: Vec<ActivityChangeInfo>,
    pub vu_place_daily_work_period_data: Vec<VuPlaceRecord>,
    pub vu_specific_condition_data: Vec<SpecificConditionRecord>,
    pub signature: Vec<u8>,
}

impl Decode for ActivitiesGen1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let date_of_day_downloaded = r.decode()?;
        let odometer_value_midnight = read_u24(r)?;
        let vu_card_iw_data = read_list_u16(r)?;
        let changes = usize::from(r.u16()?);
        let vu_activity_daily_data = r.decode_n(changes)?;
        let vu_place_daily_work_period_data = read_list_u8(r)?;
        let conditions = usize::from(r.u16()?);
        Ok(Self {
            date_of_day_downloaded,
            odometer_value_midnight,
            vu_card_iw_data,
            vu_activity_daily_data,
            vu_place_daily_work_period_data,
            vu_specific_condition_data: r.decode_n(conditions)?,
            signature: read_bytes(r, GEN1_SIGNATURE_LEN)?,
        })
    }
}

impl Encode for ActivitiesGen1 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.date_of_day_downloaded.encode(out)?;
        put_u24(out, self.odometer_value_midnight)?;
        write_list_u16(&self.vu_card_iw_data, "card insertion records", out)?;
        put_count_u16(out, "activity changes", self.vu_activity_daily_data.len())?;
        self.vu_activity_daily_data.encode(out)?;
        write_list_u8(&self.vu_place_daily_work_period_data, "place records", out)?;
        put_count_u16(out, "specific conditions", self.vu_specific_condition_data.len())?;
        self.vu_specific_condition_data.encode(out)?;
        put_fixed(out, "signature", &self.signature, GEN1_SIGNATURE_LEN)
    }
}
