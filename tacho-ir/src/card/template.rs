//! Per card type file-structure templates and card-type inference.

use ddd_format::reader::RawRecord;
use ddd_format::{ElementaryFile, Generation};
use serde::{Deserialize, Serialize};

use ddd_format::ElementaryFile as Ef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Unspecified,
    DriverCard,
    WorkshopCard,
    ControlCard,
    CompanyCard,
}

/// One expected elementary file in a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    pub ef: ElementaryFile,
    pub generation: Generation,
    /// May be absent without failing the match.
    pub conditional: bool,
}

const fn required(ef: ElementaryFile) -> TemplateEntry {
    TemplateEntry {
        ef,
        generation: Generation::Gen1,
        conditional: false,
    }
}

const fn optional(ef: ElementaryFile) -> TemplateEntry {
    TemplateEntry {
        ef,
        generation: Generation::Gen1,
        conditional: true,
    }
}

/// Generation 2 files are all conditional: a first generation card has none.
const fn g2(ef: ElementaryFile) -> TemplateEntry {
    TemplateEntry {
        ef,
        generation: Generation::Gen2,
        conditional: true,
    }
}

const DRIVER: &[TemplateEntry] = &[
    required(Ef::Icc),
    required(Ef::Ic),
    required(Ef::ApplicationIdentification),
    optional(Ef::CardCertificate),
    optional(Ef::CaCertificate),
    required(Ef::Identification),
    optional(Ef::CardDownloadDriver),
    optional(Ef::DrivingLicenceInfo),
    required(Ef::EventsData),
    required(Ef::FaultsData),
    required(Ef::DriverActivityData),
    required(Ef::VehiclesUsed),
    required(Ef::Places),
    optional(Ef::CurrentUsage),
    required(Ef::ControlActivityData),
    optional(Ef::SpecificConditions),
    g2(Ef::ApplicationIdentification),
    g2(Ef::CardCertificate),
    g2(Ef::CardSignCertificate),
    g2(Ef::CaCertificate),
    g2(Ef::LinkCertificate),
    g2(Ef::Identification),
    g2(Ef::CardDownloadDriver),
    g2(Ef::DrivingLicenceInfo),
    g2(Ef::EventsData),
    g2(Ef::FaultsData),
    g2(Ef::DriverActivityData),
    g2(Ef::VehiclesUsed),
    g2(Ef::Places),
    g2(Ef::CurrentUsage),
    g2(Ef::ControlActivityData),
    g2(Ef::SpecificConditions),
    g2(Ef::VehicleUnitsUsed),
    g2(Ef::GnssPlaces),
    g2(Ef::ApplicationIdentificationV2),
    g2(Ef::PlacesAuthentication),
    g2(Ef::GnssPlacesAuthentication),
    g2(Ef::BorderCrossings),
    g2(Ef::LoadUnloadOperations),
    g2(Ef::LoadTypeEntries),
];

const WORKSHOP: &[TemplateEntry] = &[
    required(Ef::Icc),
    required(Ef::Ic),
    required(Ef::ApplicationIdentification),
    optional(Ef::CardCertificate),
    optional(Ef::CaCertificate),
    required(Ef::Identification),
    optional(Ef::CardDownloadWorkshop),
    required(Ef::Calibration),
    optional(Ef::SensorInstallationData),
    required(Ef::EventsData),
    required(Ef::FaultsData),
    required(Ef::DriverActivityData),
    required(Ef::VehiclesUsed),
    required(Ef::Places),
    optional(Ef::CurrentUsage),
    required(Ef::ControlActivityData),
    optional(Ef::SpecificConditions),
    g2(Ef::ApplicationIdentification),
    g2(Ef::CardCertificate),
    g2(Ef::CardSignCertificate),
    g2(Ef::CaCertificate),
    g2(Ef::LinkCertificate),
    g2(Ef::Identification),
    g2(Ef::CardDownloadWorkshop),
    g2(Ef::Calibration),
    g2(Ef::SensorInstallationData),
    g2(Ef::EventsData),
    g2(Ef::FaultsData),
    g2(Ef::DriverActivityData),
    g2(Ef::VehiclesUsed),
    g2(Ef::Places),
    g2(Ef::CurrentUsage),
    g2(Ef::ControlActivityData),
    g2(Ef::SpecificConditions),
    g2(Ef::VehicleUnitsUsed),
    g2(Ef::GnssPlaces),
    g2(Ef::ApplicationIdentificationV2),
    g2(Ef::PlacesAuthentication),
    g2(Ef::GnssPlacesAuthentication),
    g2(Ef::BorderCrossings),
    g2(Ef::LoadUnloadOperations),
    g2(Ef::LoadTypeEntries),
];

const CONTROL: &[TemplateEntry] = &[
    required(Ef::Icc),
    required(Ef::Ic),
    required(Ef::ApplicationIdentification),
    optional(Ef::CardCertificate),
    optional(Ef::CaCertificate),
    required(Ef::Identification),
    required(Ef::ControllerActivityData),
    g2(Ef::ApplicationIdentification),
    g2(Ef::CardCertificate),
    g2(Ef::CaCertificate),
    g2(Ef::LinkCertificate),
    g2(Ef::Identification),
    g2(Ef::ControllerActivityData),
];

const COMPANY: &[TemplateEntry] = &[
    required(Ef::Icc),
    required(Ef::Ic),
    required(Ef::ApplicationIdentification),
    optional(Ef::CardCertificate),
    optional(Ef::CaCertificate),
    required(Ef::Identification),
    required(Ef::CompanyActivityData),
    g2(Ef::ApplicationIdentification),
    g2(Ef::CardCertificate),
    g2(Ef::CaCertificate),
    g2(Ef::LinkCertificate),
    g2(Ef::Identification),
    g2(Ef::CompanyActivityData),
];

/// Card types in the order inference tries them.
const TEMPLATES: &[(CardType, &[TemplateEntry])] = &[
    (CardType::DriverCard, DRIVER),
    (CardType::WorkshopCard, WORKSHOP),
    (CardType::ControlCard, CONTROL),
    (CardType::CompanyCard, COMPANY),
];

impl CardType {
    /// Expected record structure; `None` for `Unspecified`.
    pub fn template(self) -> Option<&'static [TemplateEntry]> {
        TEMPLATES.iter().find(|(t, _)| *t == self).map(|(_, entries)| *entries)
    }
}

/// Dual-cursor match of observed files against a template.
///
/// Both cursors advance together on a match. A conditional template entry
/// that does not match is skipped without consuming an observation; a
/// required one fails the match. Entries left over at the end must all be
/// conditional.
pub fn matches_template(observed: &[(ElementaryFile, Generation)], template: &[TemplateEntry]) -> bool {
    let mut t = 0;
    for &(ef, generation) in observed {
        loop {
            let Some(entry) = template.get(t) else {
                return false;
            };
            t += 1;
            if entry.ef == ef && entry.generation == generation {
                break;
            }
            if !entry.conditional {
                return false;
            }
        }
    }
    template[t..].iter().all(|e| e.conditional)
}

/// Infer the card type from the sequence of elementary files in a download.
///
/// Signature records and file ids outside the EF table take no part in the
/// match. The first matching template wins.
pub fn infer_card_type(records: &[RawRecord<'_>]) -> CardType {
    let observed: Vec<(ElementaryFile, Generation)> = records
        .iter()
        .filter(|r| !r.tag.is_signature())
        .filter_map(|r| r.tag.elementary_file().map(|ef| (ef, r.tag.generation())))
        .collect();

    for (card_type, template) in TEMPLATES {
        if matches_template(&observed, template) {
            log::debug!("card structure matches {:?}", card_type);
            return *card_type;
        }
    }
    log::warn!("card structure matches no known card type ({} files)", observed.len());
    CardType::Unspecified
}
