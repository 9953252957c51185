use ddd_format::{ElementaryFile, Generation};
use thiserror::Error;

use crate::card::{CardFile, CardType, DriverActivity};
use crate::file::StructuredFile;
use crate::vu::{Transfer, VehicleUnitFile};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0:?} application has no {1}")]
    MissingFile(Generation, ElementaryFile),
    #[error("{0} ({1:?}) could not be decoded and is held raw")]
    UndecodedFile(ElementaryFile, Generation),
    #[error("driver card has no activity data in either application")]
    NoDriverActivity,
    #[error("{0:?} activity record {1}: record length {2} does not match {3} content bytes")]
    ActivityRecordLength(Generation, usize, u16, usize),
    #[error("{0:?} activity ring of {2} bytes has its newest record pointer at {1}")]
    ActivityPointerOutsideRing(Generation, u16, usize),
    #[error("vehicle unit file holds no transfers")]
    EmptyVehicleUnit,
    #[error("vehicle unit file holds no parsed transfer")]
    NoParsedTransfer,
}

/// Structural checks beyond what decoding enforces. Nothing here stops a
/// file from being re-encoded.
pub fn validate_file(file: &StructuredFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match file {
        StructuredFile::Card(card) => validate_card(card, &mut errors),
        StructuredFile::RawCard(raw) => {
            log::warn!("card with {} records matched no template", raw.records.len());
        }
        StructuredFile::VehicleUnit(vu) => validate_vu(vu, &mut errors),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_card(card: &CardFile, errors: &mut Vec<ValidationError>) {
    let mut has_activity = false;

    for generation in [Generation::Gen1, Generation::Gen2] {
        let Some(df) = card.df(generation) else { continue };

        if df.application_identification.is_none() {
            errors.push(ValidationError::MissingFile(generation, ElementaryFile::ApplicationIdentification));
        }
        if df.identification.is_none() {
            errors.push(ValidationError::MissingFile(generation, ElementaryFile::Identification));
        }
        for ef in df.invalid() {
            errors.push(ValidationError::UndecodedFile(ef, generation));
        }

        if let Some(file) = &df.driver_activity_data {
            has_activity = true;
            if let Some(activity) = file.valid() {
                validate_activity(activity, generation, errors);
            }
        }
    }

    if card.card_type == CardType::DriverCard && !has_activity {
        errors.push(ValidationError::NoDriverActivity);
    }
}

fn validate_activity(activity: &DriverActivity, generation: Generation, errors: &mut Vec<ValidationError>) {
    if usize::from(activity.newest_day_record_index) >= activity.ring_length {
        errors.push(ValidationError::ActivityPointerOutsideRing(
            generation,
            activity.newest_day_record_index,
            activity.ring_length,
        ));
    }

    for (i, record) in activity.records.iter().enumerate() {
        let Ok(content) = record.content() else { continue };
        if usize::from(record.record_length) != 4 + content.len() {
            errors.push(ValidationError::ActivityRecordLength(
                generation,
                i,
                record.record_length,
                content.len(),
            ));
        }
    }
}

fn validate_vu(vu: &VehicleUnitFile, errors: &mut Vec<ValidationError>) {
    if vu.transfers.is_empty() {
        errors.push(ValidationError::EmptyVehicleUnit);
    } else if vu.transfers.iter().all(|t| matches!(t, Transfer::Raw(_))) {
        errors.push(ValidationError::NoParsedTransfer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vehicle_unit() {
        let file = StructuredFile::VehicleUnit(VehicleUnitFile::default());
        let errors = validate_file(&file).unwrap_err();
        assert!(matches!(errors[..], [ValidationError::EmptyVehicleUnit]));
    }

    #[test]
    fn raw_only_vehicle_unit() {
        let file = StructuredFile::VehicleUnit(VehicleUnitFile {
            transfers: vec![Transfer::Raw(vec![0x76, 0x01])],
        });
        let errors = validate_file(&file).unwrap_err();
        assert!(matches!(errors[..], [ValidationError::NoParsedTransfer]));
    }
}
