//! Generation 1 events and faults transfer (TREP 03).

use ddd_format::codec::put_fixed;
use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader};
use serde::{Deserialize, Serialize};

use super::records::{
    GEN1_SIGNATURE_LEN, VuEventRecord, VuFaultRecord, VuOverSpeedingControl, VuOverSpeedingEvent, VuTimeAdjustment,
    read_bytes,
};
use super::{read_list_u8, write_list_u8};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsAndFaultsGen1 {
    pub vu_fault_data: Vec<VuFaultRecord>,
    pub vu_event_data: Vec<VuEventRecord>,
    pub vu_over_speeding_control_data: VuOverSpeedingControl,
    pub vu_over_speeding_event_data: Vec<VuOverSpeedingEvent>,
    pub vu_time_adjustment_data: Vec<VuTimeAdjustment>,
    pub signature: Vec<u8>,
}

impl Decode for EventsAndFaultsGen1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            vu_fault_data: read_list_u8(r)?,
            vu_event_data: read_list_u8(r)?,
            vu_over_speeding_control_data: r.decode()?,
            vu_over_speeding_event_data: read_list_u8(r)?,
            vu_time_adjustment_data: read_list_u8(r)?,
            signature: read_bytes(r, GEN1_SIGNATURE_LEN)?,
        })
    }
}

impl Encode for EventsAndFaultsGen1 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        write_list_u8(&self.vu_fault_data, "faults", out)?;
        write_list_u8(&self.vu_event_data, "events", out)?;
        self.vu_over_speeding_control_data.encode(out)?;
        write_list_u8(&self.vu_over_speeding_event_data, "overspeeding events", out)?;
        write_list_u8(&self.vu_time_adjustment_data, "time adjustments", out)?;
        put_fixed(out, "signature", &self.signature, GEN1_SIGNATURE_LEN)
    }
}
