//! Card downloads: signature pairing, DF assembly and re-framing.
//!
//! A card download is a flat sequence of TLV records. Known elementary files
//! are routed into one of two dedicated files (`tachograph` for generation 1
//! records, `tachograph_g2` for generation 2), unknown file ids are kept in
//! `proprietary_efs` together with their original record position.

pub mod activity;
pub mod application;
pub mod chip;
pub mod conditions;
pub mod control;
pub mod events;
pub mod identification;
pub mod places;
pub mod template;
pub mod vehicles;
pub mod workshop;

use ddd_format::codec::{encode_to_vec, put_u16};
use ddd_format::ef::APPENDIX_SIGNATURE;
use ddd_format::reader::RawRecord;
use ddd_format::writer::write_record;
use ddd_format::{
    DecodeError, ElementaryFile, EncodeError, Generation, Reader, RecordTag, codec::decode_exact,
};
use serde::{Deserialize, Serialize};

use crate::file::{MarshalError, UnmarshalError};
use crate::types::{FixedSize, Slot, decode_remaining_records, encode_records};

pub use activity::{ActivityDailyRecord, DriverActivity, StaleRegion};
pub use application::{ApplicationIdentification, ApplicationIdentificationV2};
pub use chip::{CardChipIdentification, CardIccIdentification};
pub use conditions::{CurrentUsage, SpecificConditions};
pub use control::{CompanyActivityData, ControlActivityData, ControllerActivityData};
pub use events::{CardEventFaultRecord, EventsData, FaultsData};
pub use identification::{
    CalibrationsSinceDownload, DrivingLicenceInfo, Identification, LastCardDownload,
};
pub use places::{
    BorderCrossings, GnssPlaces, LoadTypeEntries, LoadUnloadOperations, Places,
    PlacesAuthentication,
};
pub use template::{CardType, infer_card_type};
pub use vehicles::{VehicleUnitsUsed, VehiclesUsed};
pub use workshop::Calibration;

/// Length of the zero-filled signature written for a signed EF that holds none.
pub const SIGNATURE_PLACEHOLDER_LEN: usize = 128;

/// What an EF parser needs to know besides its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfContext {
    pub card_type: CardType,
    pub generation: Generation,
}

/// Content of one elementary file.
pub trait EfContent: Sized {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError>;
    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError>;
}

/// Decode a whole EF value and insist that it encodes back to the same bytes.
fn decode_content<T: EfContent>(value: &[u8], ctx: EfContext) -> Result<T, DecodeError> {
    let mut r = Reader::new(value);
    let content = T::decode_ef(&mut r, ctx)?;
    r.expect_end()?;
    let mut out = Vec::with_capacity(value.len());
    match content.encode_ef(ctx, &mut out) {
        Ok(()) if out == value => Ok(content),
        _ => Err(DecodeError::InvalidValue {
            field: "content",
            reason: "does not re-encode to the original bytes".into(),
        }),
    }
}

/// One elementary file: its content plus the detached signature that
/// followed it in the download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEf<T> {
    pub content: Slot<T>,
    pub signature: Option<Vec<u8>>,
}

impl<T> CardEf<T> {
    pub fn new(content: T) -> Self {
        Self {
            content: Slot::Valid(content),
            signature: None,
        }
    }

    pub fn valid(&self) -> Option<&T> {
        self.content.valid()
    }
}

impl<T: EfContent> CardEf<T> {
    fn decode(
        ef: ElementaryFile,
        value: &[u8],
        signature: Option<Vec<u8>>,
        ctx: EfContext,
    ) -> Result<Self, UnmarshalError> {
        let content = match decode_content::<T>(value, ctx) {
            Ok(content) => Slot::Valid(content),
            Err(source) if ef == ElementaryFile::Identification => {
                return Err(UnmarshalError::Decode { ef, source });
            }
            Err(e) => {
                log::warn!("{ef} ({:?}) kept as raw bytes: {e}", ctx.generation);
                Slot::Invalid(value.to_vec())
            }
        };
        Ok(Self { content, signature })
    }

    fn encode(&self, ctx: EfContext) -> Result<Vec<u8>, EncodeError> {
        match &self.content {
            Slot::Valid(content) => {
                let mut out = Vec::new();
                content.encode_ef(ctx, &mut out)?;
                Ok(out)
            }
            Slot::Invalid(raw) => Ok(raw.clone()),
        }
    }
}

/// Certificates and other content carried as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opaque(pub Vec<u8>);

impl EfContent for Opaque {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self(r.rest().to_vec()))
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.0);
        Ok(())
    }
}

/// Fixed-size records behind a two-byte newest-record pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclicRecords<T> {
    pub newest_record_index: u16,
    pub records: Vec<Slot<T>>,
}

impl<T: FixedSize> EfContent for CyclicRecords<T> {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            newest_record_index: r.u16()?,
            records: decode_remaining_records(r, ctx.generation)?,
        })
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u16(out, self.newest_record_index);
        encode_records(&self.records, ctx.generation, out)
    }
}

macro_rules! tachograph_df {
    ($( $ef:ident => $field:ident : $ty:ty ),+ $(,)?) => {
        /// Elementary files of one tachograph application (DF), each optional.
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        pub struct TachographDf {
            $( pub $field: Option<CardEf<$ty>>, )+
        }

        impl TachographDf {
            fn insert(
                &mut self,
                ef: ElementaryFile,
                value: &[u8],
                signature: Option<Vec<u8>>,
                ctx: EfContext,
            ) -> Result<(), UnmarshalError> {
                match ef {
                    $(
                        ElementaryFile::$ef => {
                            if self.$field.is_some() {
                                return Err(UnmarshalError::DuplicateElementaryFile {
                                    ef,
                                    generation: ctx.generation,
                                });
                            }
                            self.$field = Some(CardEf::decode(ef, value, signature, ctx)?);
                        }
                    )+
                    _ => return Err(UnmarshalError::MisplacedElementaryFile(ef)),
                }
                Ok(())
            }

            /// Encoded value and held signature of `ef`, if populated.
            fn encode_ef(
                &self,
                ef: ElementaryFile,
                ctx: EfContext,
            ) -> Result<Option<(Vec<u8>, Option<&[u8]>)>, EncodeError> {
                match ef {
                    $(
                        ElementaryFile::$ef => match &self.$field {
                            Some(file) => Ok(Some((file.encode(ctx)?, file.signature.as_deref()))),
                            None => Ok(None),
                        },
                    )+
                    _ => Ok(None),
                }
            }

            /// Elementary files that hold content.
            pub fn populated(&self) -> Vec<ElementaryFile> {
                let mut out = Vec::new();
                $( if self.$field.is_some() { out.push(ElementaryFile::$ef); } )+
                out
            }

            /// Files whose content could not be decoded and is held raw.
            pub fn invalid(&self) -> Vec<ElementaryFile> {
                let mut out = Vec::new();
                $(
                    if self.$field.as_ref().is_some_and(|f| !f.content.is_valid()) {
                        out.push(ElementaryFile::$ef);
                    }
                )+
                out
            }
        }
    };
}

tachograph_df! {
    ApplicationIdentification => application_identification: ApplicationIdentification,
    CardCertificate => card_certificate: Opaque,
    CardSignCertificate => card_sign_certificate: Opaque,
    CaCertificate => ca_certificate: Opaque,
    LinkCertificate => link_certificate: Opaque,
    Identification => identification: Identification,
    CardDownloadDriver => last_card_download: LastCardDownload,
    CardDownloadWorkshop => calibrations_since_download: CalibrationsSinceDownload,
    DrivingLicenceInfo => driving_licence_info: DrivingLicenceInfo,
    Calibration => calibration: Calibration,
    SensorInstallationData => sensor_installation_data: Opaque,
    EventsData => events_data: EventsData,
    FaultsData => faults_data: FaultsData,
    DriverActivityData => driver_activity_data: DriverActivity,
    VehiclesUsed => vehicles_used: VehiclesUsed,
    Places => places: Places,
    CurrentUsage => current_usage: CurrentUsage,
    ControlActivityData => control_activity_data: ControlActivityData,
    SpecificConditions => specific_conditions: SpecificConditions,
    VehicleUnitsUsed => vehicle_units_used: VehicleUnitsUsed,
    GnssPlaces => gnss_places: GnssPlaces,
    ApplicationIdentificationV2 => application_identification_v2: ApplicationIdentificationV2,
    PlacesAuthentication => places_authentication: PlacesAuthentication,
    GnssPlacesAuthentication => gnss_places_authentication: PlacesAuthentication,
    BorderCrossings => border_crossings: BorderCrossings,
    LoadUnloadOperations => load_unload_operations: LoadUnloadOperations,
    LoadTypeEntries => load_type_entries: LoadTypeEntries,
    ControllerActivityData => controller_activity_data: ControllerActivityData,
    CompanyActivityData => company_activity_data: CompanyActivityData,
}

/// An elementary file the codec does not interpret, replayed verbatim at
/// its original record position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProprietaryEf {
    pub fid: u16,
    pub appendix: u8,
    /// Index of the DATA record in the original record sequence.
    pub position: usize,
    pub data: Vec<u8>,
    pub signature: Option<Vec<u8>>,
}

impl ProprietaryEf {
    pub fn generation(&self) -> Generation {
        Generation::from_appendix(self.appendix)
    }
}

/// Driver, workshop, control or company card download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFile {
    pub card_type: CardType,
    pub icc: CardIccIdentification,
    pub ic: CardChipIdentification,
    pub tachograph: Option<TachographDf>,
    pub tachograph_g2: Option<TachographDf>,
    pub proprietary_efs: Vec<ProprietaryEf>,
}

impl CardFile {
    pub fn df(&self, generation: Generation) -> Option<&TachographDf> {
        match generation {
            Generation::Gen1 => self.tachograph.as_ref(),
            Generation::Gen2 => self.tachograph_g2.as_ref(),
        }
    }
}

/// A card download whose structure matched no card template, kept as its
/// raw record sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardFile {
    pub records: Vec<RawCardRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardRecord {
    pub tag: RecordTag,
    pub value: Vec<u8>,
}

impl RawCardFile {
    pub fn from_records(records: &[RawRecord<'_>]) -> Self {
        Self {
            records: records
                .iter()
                .map(|r| RawCardRecord {
                    tag: r.tag,
                    value: r.value.to_vec(),
                })
                .collect(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        for record in &self.records {
            write_record(&mut out, record.tag, &record.value)?;
        }
        Ok(out)
    }
}

/// Whether `tag` is a plain DATA or SIGNATURE tag of its generation.
fn is_canonical_appendix(tag: RecordTag) -> bool {
    tag.appendix & !(APPENDIX_SIGNATURE | ddd_format::ef::APPENDIX_GEN2) == 0
}

/// Assemble a card file from scanned records.
///
/// Each DATA record may be followed by a SIGNATURE record with the same file
/// id and generation; that record is attached to the file and consumed.
pub fn unmarshal_card(records: &[RawRecord<'_>], card_type: CardType) -> Result<CardFile, UnmarshalError> {
    let mut icc = None;
    let mut ic = None;
    let mut tachograph: Option<TachographDf> = None;
    let mut tachograph_g2: Option<TachographDf> = None;
    let mut proprietary_efs = Vec::new();

    let mut i = 0;
    while i < records.len() {
        let record = &records[i];
        if record.tag.is_signature() {
            return Err(UnmarshalError::UnexpectedSignature {
                fid: record.tag.fid,
                offset: record.offset,
            });
        }
        let signature = records
            .get(i + 1)
            .filter(|next| {
                next.tag.fid == record.tag.fid && next.tag.appendix == record.tag.appendix | APPENDIX_SIGNATURE
            })
            .map(|next| next.value.to_vec());
        let position = i;
        i += 1 + usize::from(signature.is_some());

        let ef = match record.tag.elementary_file() {
            Some(ef) if is_canonical_appendix(record.tag) => ef,
            _ => {
                log::debug!(
                    "keeping file 0x{:04X} (appendix 0x{:02X}) as proprietary",
                    record.tag.fid,
                    record.tag.appendix
                );
                proprietary_efs.push(ProprietaryEf {
                    fid: record.tag.fid,
                    appendix: record.tag.appendix,
                    position,
                    data: record.value.to_vec(),
                    signature,
                });
                continue;
            }
        };
        if signature.is_some() && !ef.is_signed() {
            return Err(UnmarshalError::SignatureNotAllowed { ef });
        }

        match ef {
            ElementaryFile::Icc => {
                icc = Some(decode_exact(record.value).map_err(|source| UnmarshalError::Decode { ef, source })?);
            }
            ElementaryFile::Ic => {
                ic = Some(decode_exact(record.value).map_err(|source| UnmarshalError::Decode { ef, source })?);
            }
            _ => {
                let generation = record.tag.generation();
                let df = match generation {
                    Generation::Gen1 => &mut tachograph,
                    Generation::Gen2 => &mut tachograph_g2,
                };
                df.get_or_insert_with(TachographDf::default).insert(
                    ef,
                    record.value,
                    signature,
                    EfContext { card_type, generation },
                )?;
            }
        }
    }

    let icc = icc.ok_or(UnmarshalError::MissingElementaryFile(ElementaryFile::Icc))?;
    let ic = ic.ok_or(UnmarshalError::MissingElementaryFile(ElementaryFile::Ic))?;
    for df in [&tachograph, &tachograph_g2].into_iter().flatten() {
        if df.identification.is_none() {
            return Err(UnmarshalError::MissingElementaryFile(ElementaryFile::Identification));
        }
    }

    Ok(CardFile {
        card_type,
        icc,
        ic,
        tachograph,
        tachograph_g2,
        proprietary_efs,
    })
}

/// Re-frame a card file in template order.
///
/// Signed files are followed by their held signature, or by a zero-filled
/// placeholder when none is held.
///
/// The output reproduces the bytes `unmarshal_card` read, with one
/// exception: a signed file that arrived without a signature gains the
/// placeholder record, so the output is longer than the input.
pub fn marshal_card(card: &CardFile) -> Result<Vec<u8>, MarshalError> {
    let template = card
        .card_type
        .template()
        .ok_or(MarshalError::UnspecifiedCardType)?;

    for generation in [Generation::Gen1, Generation::Gen2] {
        let Some(df) = card.df(generation) else { continue };
        for ef in df.populated() {
            if !template.iter().any(|e| e.ef == ef && e.generation == generation) {
                return Err(MarshalError::NotInTemplate {
                    ef,
                    generation,
                    card_type: card.card_type,
                });
            }
        }
    }

    let mut records: Vec<(RecordTag, Vec<u8>)> = Vec::new();
    for entry in template {
        let (ef, generation) = (entry.ef, entry.generation);
        match ef {
            ElementaryFile::Icc => records.push((
                RecordTag::new(ef.fid(), generation, false),
                encode_to_vec(&card.icc).map_err(|source| MarshalError::Ef { ef, source })?,
            )),
            ElementaryFile::Ic => records.push((
                RecordTag::new(ef.fid(), generation, false),
                encode_to_vec(&card.ic).map_err(|source| MarshalError::Ef { ef, source })?,
            )),
            _ => {
                let Some(df) = card.df(generation) else { continue };
                let ctx = EfContext {
                    card_type: card.card_type,
                    generation,
                };
                let encoded = df
                    .encode_ef(ef, ctx)
                    .map_err(|source| MarshalError::Ef { ef, source })?;
                let Some((value, signature)) = encoded else { continue };
                records.push((RecordTag::new(ef.fid(), generation, false), value));
                if ef.is_signed() {
                    let signature = match signature {
                        Some(signature) => signature.to_vec(),
                        None => {
                            log::warn!("{ef} ({generation:?}) holds no signature, writing a zero-filled placeholder");
                            vec![0; SIGNATURE_PLACEHOLDER_LEN]
                        }
                    };
                    records.push((RecordTag::new(ef.fid(), generation, true), signature));
                }
            }
        }
    }

    let mut proprietary: Vec<&ProprietaryEf> = card.proprietary_efs.iter().collect();
    proprietary.sort_by_key(|p| p.position);
    for p in proprietary {
        let at = p.position.min(records.len());
        let tag = RecordTag {
            fid: p.fid,
            appendix: p.appendix,
        };
        records.insert(at, (tag, p.data.clone()));
        if let Some(signature) = &p.signature {
            let tag = RecordTag {
                fid: p.fid,
                appendix: p.appendix | APPENDIX_SIGNATURE,
            };
            records.insert(at + 1, (tag, signature.clone()));
        }
    }

    let mut out = Vec::new();
    for (tag, value) in &records {
        write_record(&mut out, *tag, value)?;
    }
    Ok(out)
}
