//! Vehicle-unit downloads: a concatenation of TV-framed transfers.
//!
//! Each transfer starts with a two-byte tag `0x76 TREP` and carries no
//! length; the payload parser for the TREP decides where it ends. A parsed
//! transfer is only accepted when it encodes back to exactly the bytes it
//! consumed, otherwise the bytes are handled like an unknown tag.

pub mod activities;
pub mod events_faults;
pub mod overview;
pub mod record_array;
pub mod records;
pub mod speed;
pub mod technical;

use ddd_format::codec::{put_count_u8, put_count_u16, put_u16};
use ddd_format::trep::VU_TAG_PREFIX;
use ddd_format::{
    Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Generation, Reader, TransferType, VuGeneration,
};
use serde::{Deserialize, Serialize};

use crate::file::UnmarshalError;
use crate::types::{decode_n_gen, encode_all_gen};

pub use activities::ActivitiesGen1;
pub use events_faults::EventsAndFaultsGen1;
pub use overview::OverviewGen1;
pub use record_array::{RecordArray, VuRecord};
pub use speed::DetailedSpeedGen1;
pub use technical::TechnicalDataGen1;

pub(crate) fn read_list_u8<T: DecodeGen>(r: &mut Reader<'_>) -> Result<Vec<T>, DecodeError> {
    let count = usize::from(r.u8()?);
    decode_n_gen(r, count, Generation::Gen1)
}

pub(crate) fn read_list_u16<T: DecodeGen>(r: &mut Reader<'_>) -> Result<Vec<T>, DecodeError> {
    let count = usize::from(r.u16()?);
    decode_n_gen(r, count, Generation::Gen1)
}

pub(crate) fn write_list_u8<T: EncodeGen>(items: &[T], what: &'static str, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    put_count_u8(out, what, items.len())?;
    encode_all_gen(items, Generation::Gen1, out)
}

pub(crate) fn write_list_u16<T: EncodeGen>(items: &[T], what: &'static str, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    put_count_u16(out, what, items.len())?;
    encode_all_gen(items, Generation::Gen1, out)
}

/// What to do with bytes that do not start a transfer the codec can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownTagPolicy {
    /// Abort with an error.
    Fail,
    /// Keep everything from the offending offset on as one raw transfer.
    #[default]
    PreserveRemainder,
    /// Keep the bytes up to the next known tag as a raw transfer and go on.
    Resync,
}

/// Answer to a download interface version request (TREP 00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadInterfaceVersion {
    pub generation: u8,
    pub version: u8,
}

impl Decode for DownloadInterfaceVersion {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            generation: r.u8()?,
            version: r.u8()?,
        })
    }
}

impl Encode for DownloadInterfaceVersion {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&[self.generation, self.version]);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransferPayload {
    DownloadInterfaceVersion(DownloadInterfaceVersion),
    Overview(OverviewGen1),
    Activities(ActivitiesGen1),
    EventsAndFaults(EventsAndFaultsGen1),
    DetailedSpeed(DetailedSpeedGen1),
    TechnicalData(TechnicalDataGen1),
    /// Every generation 2 transfer.
    RecordArrays(Vec<RecordArray>),
}

impl TransferPayload {
    fn decode(transfer_type: TransferType, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(match transfer_type {
            TransferType::DownloadInterfaceVersion => Self::DownloadInterfaceVersion(r.decode()?),
            TransferType::OverviewGen1 => Self::Overview(r.decode()?),
            TransferType::ActivitiesGen1 => Self::Activities(r.decode()?),
            TransferType::EventsAndFaultsGen1 => Self::EventsAndFaults(r.decode()?),
            TransferType::DetailedSpeedGen1 => Self::DetailedSpeed(r.decode()?),
            TransferType::TechnicalDataGen1 => Self::TechnicalData(r.decode()?),
            _ => Self::RecordArrays(record_array::decode_record_arrays(r)?),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match self {
            Self::DownloadInterfaceVersion(v) => v.encode(out),
            Self::Overview(v) => v.encode(out),
            Self::Activities(v) => v.encode(out),
            Self::EventsAndFaults(v) => v.encode(out),
            Self::DetailedSpeed(v) => v.encode(out),
            Self::TechnicalData(v) => v.encode(out),
            Self::RecordArrays(arrays) => record_array::encode_record_arrays(arrays, out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transfer {
    Data {
        transfer_type: TransferType,
        payload: TransferPayload,
    },
    /// Bytes that could not be attributed to a parsed transfer.
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleUnitFile {
    pub transfers: Vec<Transfer>,
}

impl VehicleUnitFile {
    /// Newest generation among the parsed transfers.
    pub fn generation(&self) -> Option<VuGeneration> {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                Transfer::Data { transfer_type, .. } if *transfer_type != TransferType::DownloadInterfaceVersion => {
                    Some(transfer_type.generation())
                }
                _ => None,
            })
            .max()
    }

    pub fn payloads(&self, transfer_type: TransferType) -> impl Iterator<Item = &TransferPayload> {
        self.transfers.iter().filter_map(move |t| match t {
            Transfer::Data {
                transfer_type: tt,
                payload,
            } if *tt == transfer_type => Some(payload),
            _ => None,
        })
    }

    pub fn raw_len(&self) -> usize {
        self.transfers
            .iter()
            .map(|t| match t {
                Transfer::Raw(raw) => raw.len(),
                Transfer::Data { .. } => 0,
            })
            .sum()
    }
}

enum TransferFailure {
    Truncated,
    UnknownTag(u16),
    Decode(TransferType, DecodeError),
    NotReproducible(TransferType),
}

impl TransferFailure {
    fn into_error(self, offset: usize) -> UnmarshalError {
        match self {
            Self::Truncated => UnmarshalError::TruncatedTransferTag { offset },
            Self::UnknownTag(tag) => UnmarshalError::UnknownTransferTag { tag, offset },
            Self::Decode(transfer_type, source) => UnmarshalError::Transfer {
                transfer_type,
                offset,
                source,
            },
            Self::NotReproducible(transfer_type) => UnmarshalError::Transfer {
                transfer_type,
                offset,
                source: DecodeError::InvalidValue {
                    field: "transfer",
                    reason: "does not re-encode to the original bytes".into(),
                },
            },
        }
    }
}

/// Parse one transfer at the start of `data`, returning it with the number
/// of bytes it spans including the tag.
fn parse_transfer(data: &[u8]) -> Result<(TransferType, TransferPayload, usize), TransferFailure> {
    let mut r = Reader::new(data);
    let tag = r.u16().map_err(|_| TransferFailure::Truncated)?;
    let transfer_type = TransferType::from_tag(tag).ok_or(TransferFailure::UnknownTag(tag))?;
    let payload =
        TransferPayload::decode(transfer_type, &mut r).map_err(|e| TransferFailure::Decode(transfer_type, e))?;
    let consumed = r.position();

    let mut out = Vec::with_capacity(consumed);
    put_u16(&mut out, tag);
    match payload.encode(&mut out) {
        Ok(()) if out == data[..consumed] => Ok((transfer_type, payload, consumed)),
        _ => Err(TransferFailure::NotReproducible(transfer_type)),
    }
}

/// First offset at or after `from` holding a known transfer tag.
fn find_next_tag(data: &[u8], from: usize) -> Option<usize> {
    (from..data.len().saturating_sub(1))
        .find(|&i| data[i] == VU_TAG_PREFIX && TransferType::from_trep(data[i + 1]).is_some())
}

pub fn unmarshal_vu(data: &[u8], policy: UnknownTagPolicy) -> Result<VehicleUnitFile, UnmarshalError> {
    let mut transfers = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        match parse_transfer(&data[pos..]) {
            Ok((transfer_type, payload, consumed)) => {
                log::debug!("{:?} transfer at offset {} ({} bytes)", transfer_type, pos, consumed);
                transfers.push(Transfer::Data { transfer_type, payload });
                pos += consumed;
            }
            Err(failure) => {
                let error = failure.into_error(pos);
                match policy {
                    UnknownTagPolicy::Fail => return Err(error),
                    UnknownTagPolicy::PreserveRemainder => {
                        log::warn!("{error}; keeping {} remaining bytes raw", data.len() - pos);
                        transfers.push(Transfer::Raw(data[pos..].to_vec()));
                        break;
                    }
                    UnknownTagPolicy::Resync => {
                        let next = find_next_tag(data, pos + 1).unwrap_or(data.len());
                        log::warn!("{error}; keeping {} bytes raw up to offset {next}", next - pos);
                        transfers.push(Transfer::Raw(data[pos..next].to_vec()));
                        pos = next;
                    }
                }
            }
        }
    }
    Ok(VehicleUnitFile { transfers })
}

pub fn marshal_vu(file: &VehicleUnitFile) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    for transfer in &file.transfers {
        match transfer {
            Transfer::Data { transfer_type, payload } => {
                put_u16(&mut out, transfer_type.tag());
                payload.encode(&mut out)?;
            }
            Transfer::Raw(raw) => out.extend_from_slice(raw),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERFACE_VERSION: [u8; 4] = [0x76, 0x00, 0x02, 0x02];

    #[test]
    fn next_tag_skips_unknown_trep() {
        let data = [0x00, 0x76, 0x06, 0x76, 0x21, 0x00];
        assert_eq!(find_next_tag(&data, 0), Some(3));
        assert_eq!(find_next_tag(&data, 4), None);
        assert_eq!(find_next_tag(&[0x76], 0), None);
    }

    #[test]
    fn interface_version_transfer() {
        let file = unmarshal_vu(&INTERFACE_VERSION, UnknownTagPolicy::Fail).unwrap();
        assert_eq!(
            file.transfers,
            vec![Transfer::Data {
                transfer_type: TransferType::DownloadInterfaceVersion,
                payload: TransferPayload::DownloadInterfaceVersion(DownloadInterfaceVersion {
                    generation: 2,
                    version: 2,
                }),
            }]
        );
        assert_eq!(file.generation(), None);
        assert_eq!(marshal_vu(&file).unwrap(), INTERFACE_VERSION);
    }

    #[test]
    fn trailing_garbage_policies() {
        let mut data = INTERFACE_VERSION.to_vec();
        data.extend_from_slice(&[0xAA, 0xBB]);
        data.extend_from_slice(&INTERFACE_VERSION);

        assert!(matches!(
            unmarshal_vu(&data, UnknownTagPolicy::Fail),
            Err(UnmarshalError::UnknownTransferTag { tag: 0xAABB, offset: 4 })
        ));

        let kept = unmarshal_vu(&data, UnknownTagPolicy::PreserveRemainder).unwrap();
        assert_eq!(kept.transfers.len(), 2);
        assert_eq!(kept.transfers[1], Transfer::Raw(data[4..].to_vec()));
        assert_eq!(marshal_vu(&kept).unwrap(), data);

        let resynced = unmarshal_vu(&data, UnknownTagPolicy::Resync).unwrap();
        assert_eq!(resynced.transfers.len(), 3);
        assert_eq!(resynced.transfers[1], Transfer::Raw(vec![0xAA, 0xBB]));
        assert_eq!(resynced.raw_len(), 2);
        assert_eq!(marshal_vu(&resynced).unwrap(), data);
    }

    #[test]
    fn lone_trailing_byte_is_truncated_tag() {
        let mut data = INTERFACE_VERSION.to_vec();
        data.push(0x76);
        assert!(matches!(
            unmarshal_vu(&data, UnknownTagPolicy::Fail),
            Err(UnmarshalError::TruncatedTransferTag { offset: 4 })
        ));
        let file = unmarshal_vu(&data, UnknownTagPolicy::Resync).unwrap();
        assert_eq!(file.transfers.last(), Some(&Transfer::Raw(vec![0x76])));
    }
}
