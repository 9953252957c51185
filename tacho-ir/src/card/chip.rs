//! EF_ICC and EF_IC: chip identification, never signed.

use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader, StringValue};
use serde::{Deserialize, Serialize};

use crate::types::ExtendedSerialNumber;

/// CardIccIdentification (25 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIccIdentification {
    pub clock_stop: u8,
    pub card_extended_serial_number: ExtendedSerialNumber,
    pub card_approval_number: StringValue,
    pub card_personaliser_id: u8,
    pub embedder_ic_assembler_id: EmbedderIcAssemblerId,
    pub ic_identifier: [u8; 2],
}

/// EmbedderIcAssemblerId (5 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderIcAssemblerId {
    pub country_code: StringValue,
    pub module_embedder: [u8; 2],
    pub manufacturer_information: u8,
}

impl Decode for CardIccIdentification {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            clock_stop: r.u8()?,
            card_extended_serial_number: r.decode()?,
            card_approval_number: StringValue::read_ia5(r, 8)?,
            card_personaliser_id: r.u8()?,
            embedder_ic_assembler_id: EmbedderIcAssemblerId {
                country_code: StringValue::read_ia5(r, 2)?,
                module_embedder: r.array()?,
                manufacturer_information: r.u8()?,
            },
            ic_identifier: r.array()?,
        })
    }
}

impl Encode for CardIccIdentification {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(self.clock_stop);
        self.card_extended_serial_number.encode(out)?;
        self.card_approval_number.write_ia5(8, out)?;
        out.push(self.card_personaliser_id);
        let embedder = &self.embedder_ic_assembler_id;
        embedder.country_code.write_ia5(2, out)?;
        out.extend_from_slice(&embedder.module_embedder);
        out.push(embedder.manufacturer_information);
        out.extend_from_slice(&self.ic_identifier);
        Ok(())
    }
}

/// CardChipIdentification (8 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChipIdentification {
    pub ic_serial_number: [u8; 4],
    pub ic_manufacturing_references: [u8; 4],
}

impl Decode for CardChipIdentification {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            ic_serial_number: r.array()?,
            ic_manufacturing_references: r.array()?,
        })
    }
}

impl Encode for CardChipIdentification {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.ic_serial_number);
        out.extend_from_slice(&self.ic_manufacturing_references);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddd_format::codec::{decode_exact, encode_to_vec};

    #[test]
    fn icc_is_25_bytes() {
        let mut raw = vec![0x01, 0x00, 0x12, 0x34, 0x56, 0x03, 0x19, 0x01, 0x21];
        raw.extend_from_slice(b"E1-00001");
        raw.extend_from_slice(&[0x07, b'D', b'E', 0x00, 0x11, 0x22, 0x01, 0x02]);
        assert_eq!(raw.len(), 25);
        let icc: CardIccIdentification = decode_exact(&raw).unwrap();
        assert_eq!(icc.card_approval_number.as_str(), "E1-00001");
        assert_eq!(icc.embedder_ic_assembler_id.country_code.as_str(), "DE");
        assert_eq!(encode_to_vec(&icc).unwrap(), raw);
    }

    #[test]
    fn short_icc_is_an_error() {
        assert!(decode_exact::<CardIccIdentification>(&[0u8; 24]).is_err());
    }
}
