//! Whole-file entry points: detect the download kind and dispatch.

use ddd_format::reader::scan_card_records;
use ddd_format::{
    DecodeError, ElementaryFile, EncodeError, FileType, Generation, ScanError, TransferType, infer_file_type,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{CardFile, CardType, RawCardFile, infer_card_type, marshal_card, unmarshal_card};
use crate::vu::{UnknownTagPolicy, VehicleUnitFile, marshal_vu, unmarshal_vu};

#[derive(Debug, Error)]
pub enum UnmarshalError {
    #[error("file type not recognised from its leading bytes")]
    UnknownFileType,
    #[error("card record framing: {0}")]
    Scan(#[from] ScanError),
    #[error("{ef}: {source}")]
    Decode { ef: ElementaryFile, source: DecodeError },
    #[error("signature record for file 0x{fid:04X} at offset {offset} follows no data record")]
    UnexpectedSignature { fid: u16, offset: usize },
    #[error("{ef} carries a signature but is not a signed file")]
    SignatureNotAllowed { ef: ElementaryFile },
    #[error("{ef} ({generation:?}) appears more than once")]
    DuplicateElementaryFile { ef: ElementaryFile, generation: Generation },
    #[error("{0} does not belong in a tachograph application")]
    MisplacedElementaryFile(ElementaryFile),
    #[error("required file {0} is missing")]
    MissingElementaryFile(ElementaryFile),
    #[error("unknown transfer tag 0x{tag:04X} at offset {offset}")]
    UnknownTransferTag { tag: u16, offset: usize },
    #[error("truncated transfer tag at offset {offset}")]
    TruncatedTransferTag { offset: usize },
    #[error("{transfer_type:?} transfer at offset {offset}: {source}")]
    Transfer {
        transfer_type: TransferType,
        offset: usize,
        source: DecodeError,
    },
}

#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("card type is unspecified, no template to frame the files with")]
    UnspecifiedCardType,
    #[error("{ef} ({generation:?}) is not part of the {card_type:?} template")]
    NotInTemplate {
        ef: ElementaryFile,
        generation: Generation,
        card_type: CardType,
    },
    #[error("{ef}: {source}")]
    Ef { ef: ElementaryFile, source: EncodeError },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Options for [`unmarshal_file_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnmarshalOptions {
    /// Handling of VU bytes that start no parseable transfer.
    pub unknown_vu_tag: UnknownTagPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuredFile {
    Card(CardFile),
    /// A card download whose record structure matches no card template.
    RawCard(RawCardFile),
    VehicleUnit(VehicleUnitFile),
}

impl StructuredFile {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::RawCard(_) => "raw card",
            Self::VehicleUnit(_) => "vehicle unit",
        }
    }
}

pub fn unmarshal_file(data: &[u8]) -> Result<StructuredFile, UnmarshalError> {
    unmarshal_file_with(data, &UnmarshalOptions::default())
}

pub fn unmarshal_file_with(data: &[u8], options: &UnmarshalOptions) -> Result<StructuredFile, UnmarshalError> {
    match infer_file_type(data) {
        FileType::Card => {
            let records = scan_card_records(data)?;
            let card_type = infer_card_type(&records);
            if card_type == CardType::Unspecified {
                log::debug!("keeping {} card records raw", records.len());
                return Ok(StructuredFile::RawCard(RawCardFile::from_records(&records)));
            }
            Ok(StructuredFile::Card(unmarshal_card(&records, card_type)?))
        }
        FileType::VehicleUnit => Ok(StructuredFile::VehicleUnit(unmarshal_vu(data, options.unknown_vu_tag)?)),
        FileType::Unknown => Err(UnmarshalError::UnknownFileType),
    }
}

pub fn marshal_file(file: &StructuredFile) -> Result<Vec<u8>, MarshalError> {
    match file {
        StructuredFile::Card(card) => marshal_card(card),
        StructuredFile::RawCard(raw) => Ok(raw.to_bytes()?),
        StructuredFile::VehicleUnit(vu) => Ok(marshal_vu(vu)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_leading_bytes() {
        assert!(matches!(unmarshal_file(&[0x12, 0x34]), Err(UnmarshalError::UnknownFileType)));
        assert!(matches!(unmarshal_file(&[]), Err(UnmarshalError::UnknownFileType)));
    }

    #[test]
    fn icc_only_download_is_raw_card() {
        let data = [0x00, 0x02, 0x00, 0x00, 0x02, 0xAB, 0xCD];
        let file = unmarshal_file(&data).unwrap();
        assert_eq!(file.kind(), "raw card");
        assert_eq!(marshal_file(&file).unwrap(), data);
    }

    #[test]
    fn truncated_card_record_is_scan_error() {
        let data = [0x00, 0x02, 0x00, 0x00, 0x19, 0x01];
        assert!(matches!(unmarshal_file(&data), Err(UnmarshalError::Scan(_))));
    }
}
