//! Generation 1 technical data transfer (TREP 05).

use ddd_format::codec::put_fixed;
use ddd_format::{Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader};
use serde::{Deserialize, Serialize};

use super::records::{GEN1_SIGNATURE_LEN, SensorPaired, VuCalibrationRecord, VuIdentification, read_bytes};
use super::{read_list_u8, write_list_u8};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDataGen1 {
    pub vu_identification: VuIdentification,
    pub sensor_paired: SensorPaired,
    pub vu_calibration_data: Vec<VuCalibrationRecord>,
    pub signature: Vec<u8>,
}

impl Decode for TechnicalDataGen1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            vu_identification: VuIdentification::decode_gen(r, Generation::Gen1)?,
            sensor_paired: SensorPaired::decode_gen(r, Generation::Gen1)?,
            vu_calibration_data: read_list_u8(r)?,
            signature: read_bytes(r, GEN1_SIGNATURE_LEN)?,
        })
    }
}

impl Encode for TechnicalDataGen1 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.vu_identification.encode_gen(Generation::Gen1, out)?;
        self.sensor_paired.encode_gen(Generation::Gen1, out)?;
        write_list_u8(&self.vu_calibration_data, "calibrations", out)?;
        put_fixed(out, "signature", &self.signature, GEN1_SIGNATURE_LEN)
    }
}
