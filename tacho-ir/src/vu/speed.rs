//! Generation 1 detailed speed transfer (TREP 04).

use ddd_format::codec::{put_count_u16, put_fixed};
use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader};
use serde::{Deserialize, Serialize};

use super::records::{GEN1_SIGNATURE_LEN, VuDetailedSpeedBlock, read_bytes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSpeedGen1 {
    pub vu_detailed_speed_blocks: Vec<VuDetailedSpeedBlock>,
    pub signature: Vec<u8>,
}

impl Decode for DetailedSpeedGen1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let blocks = usize::from(r.u16()?);
        Ok(Self {
            vu_detailed_speed_blocks: r.decode_n(blocks)?,
            signature: read_bytes(r, GEN1_SIGNATURE_LEN)?,
        })
    }
}

impl Encode for DetailedSpeedGen1 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_count_u16(out, "speed blocks", self.vu_detailed_speed_blocks.len())?;
        self.vu_detailed_speed_blocks.encode(out)?;
        put_fixed(out, "signature", &self.signature, GEN1_SIGNATURE_LEN)
    }
}
