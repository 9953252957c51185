//! EF_Identification, EF_Card_Download and EF_Driving_Licence_Info.

use ddd_format::codec::put_u16;
use ddd_format::{Datef, DecodeError, Encode, EncodeError, Reader, StringValue, TimeReal};
use serde::{Deserialize, Serialize};

use super::{CardType, EfContext, EfContent};
use crate::enums::NationNumeric;
use crate::types::{CARD_NUMBER_LEN, HolderName, read_name, write_name};

/// CardIdentification (65 bytes), common to every card type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIdentification {
    pub card_issuing_member_state: NationNumeric,
    pub card_number: StringValue,
    pub card_issuing_authority_name: StringValue,
    pub card_issue_date: TimeReal,
    pub card_validity_begin: TimeReal,
    pub card_expiry_date: TimeReal,
}

impl CardIdentification {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            card_issuing_member_state: r.decode()?,
            card_number: StringValue::read_ia5(r, CARD_NUMBER_LEN)?,
            card_issuing_authority_name: read_name(r)?,
            card_issue_date: r.decode()?,
            card_validity_begin: r.decode()?,
            card_expiry_date: r.decode()?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.card_issuing_member_state.encode(out)?;
        self.card_number.write_ia5(CARD_NUMBER_LEN, out)?;
        write_name(&self.card_issuing_authority_name, out)?;
        self.card_issue_date.encode(out)?;
        self.card_validity_begin.encode(out)?;
        self.card_expiry_date.encode(out)
    }
}

/// Holder part of EF_Identification; its layout depends on the card type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardHolder {
    Driver {
        card_holder_name: HolderName,
        card_holder_birth_date: Datef,
        card_holder_preferred_language: StringValue,
    },
    /// Workshop and control cards share one layout (146 bytes).
    Organisation {
        name: StringValue,
        address: StringValue,
        card_holder_name: HolderName,
        card_holder_preferred_language: StringValue,
    },
    Company {
        company_name: StringValue,
        company_address: StringValue,
        card_holder_preferred_language: StringValue,
    },
}

fn read_language(r: &mut Reader<'_>) -> Result<StringValue, DecodeError> {
    StringValue::read_ia5(r, 2)
}

/// Card and holder identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub card: CardIdentification,
    pub holder: CardHolder,
}

impl EfContent for Identification {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        let card = CardIdentification::decode(r)?;
        let holder = match ctx.card_type {
            CardType::DriverCard => CardHolder::Driver {
                card_holder_name: r.decode()?,
                card_holder_birth_date: r.decode()?,
                card_holder_preferred_language: read_language(r)?,
            },
            CardType::WorkshopCard | CardType::ControlCard => CardHolder::Organisation {
                name: read_name(r)?,
                address: read_name(r)?,
                card_holder_name: r.decode()?,
                card_holder_preferred_language: read_language(r)?,
            },
            CardType::CompanyCard => CardHolder::Company {
                company_name: read_name(r)?,
                company_address: read_name(r)?,
                card_holder_preferred_language: read_language(r)?,
            },
            CardType::Unspecified => {
                return Err(DecodeError::InvalidValue {
                    field: "card type",
                    reason: "unspecified".into(),
                });
            }
        };
        Ok(Self { card, holder })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.card.encode(out)?;
        match &self.holder {
            CardHolder::Driver {
                card_holder_name,
                card_holder_birth_date,
                card_holder_preferred_language,
            } => {
                card_holder_name.encode(out)?;
                card_holder_birth_date.encode(out)?;
                card_holder_preferred_language.write_ia5(2, out)
            }
            CardHolder::Organisation {
                name,
                address,
                card_holder_name,
                card_holder_preferred_language,
            } => {
                write_name(name, out)?;
                write_name(address, out)?;
                card_holder_name.encode(out)?;
                card_holder_preferred_language.write_ia5(2, out)
            }
            CardHolder::Company {
                company_name,
                company_address,
                card_holder_preferred_language,
            } => {
                write_name(company_name, out)?;
                write_name(company_address, out)?;
                card_holder_preferred_language.write_ia5(2, out)
            }
        }
    }
}

/// EF_Card_Download on driver cards: time of the last card download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastCardDownload {
    pub last_card_download: TimeReal,
}

impl EfContent for LastCardDownload {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            last_card_download: r.decode()?,
        })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.last_card_download.encode(out)
    }
}

/// EF_Card_Download on workshop cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationsSinceDownload {
    pub no_of_calibrations_since_download: u16,
}

impl EfContent for CalibrationsSinceDownload {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            no_of_calibrations_since_download: r.u16()?,
        })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u16(out, self.no_of_calibrations_since_download);
        Ok(())
    }
}

/// CardDrivingLicenceInformation (53 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingLicenceInfo {
    pub driving_licence_issuing_authority: StringValue,
    pub driving_licence_issuing_nation: NationNumeric,
    pub driving_licence_number: StringValue,
}

impl EfContent for DrivingLicenceInfo {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            driving_licence_issuing_authority: read_name(r)?,
            driving_licence_issuing_nation: r.decode()?,
            driving_licence_number: StringValue::read_ia5(r, 16)?,
        })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        write_name(&self.driving_licence_issuing_authority, out)?;
        self.driving_licence_issuing_nation.encode(out)?;
        self.driving_licence_number.write_ia5(16, out)
    }
}
