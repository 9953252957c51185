//! EF_Application_Identification and EF_Application_Identification_V2.

use ddd_format::codec::put_u16;
use ddd_format::{DecodeError, Encode, EncodeError, Generation, Reader};
use serde::{Deserialize, Serialize};

use super::{CardType, EfContext, EfContent};
use crate::enums::EquipmentType;

/// Record counts of a driver or workshop card.
///
/// Generation 1 stores the place count in one byte and has no GNSS,
/// specific condition or VU counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCardApplication {
    pub no_of_events_per_type: u8,
    pub no_of_faults_per_type: u8,
    pub activity_structure_length: u16,
    pub no_of_card_vehicle_records: u16,
    pub no_of_card_place_records: u16,
    pub no_of_gnss_ad_records: Option<u16>,
    pub no_of_specific_condition_records: Option<u16>,
    pub no_of_card_vehicle_unit_records: Option<u16>,
}

impl DriverCardApplication {
    /// Read the counts. Workshop cards carry their calibration count
    /// directly after the place count, ahead of the generation 2 counts.
    fn decode(r: &mut Reader<'_>, generation: Generation, workshop: bool) -> Result<(Self, Option<u8>), DecodeError> {
        let no_of_events_per_type = r.u8()?;
        let no_of_faults_per_type = r.u8()?;
        let activity_structure_length = r.u16()?;
        let no_of_card_vehicle_records = r.u16()?;
        let no_of_card_place_records = match generation {
            Generation::Gen1 => u16::from(r.u8()?),
            Generation::Gen2 => r.u16()?,
        };
        let no_of_calibration_records = if workshop { Some(r.u8()?) } else { None };
        let (no_of_gnss_ad_records, no_of_specific_condition_records, no_of_card_vehicle_unit_records) =
            match generation {
                Generation::Gen1 => (None, None, None),
                Generation::Gen2 => (Some(r.u16()?), Some(r.u16()?), Some(r.u16()?)),
            };
        let app = Self {
            no_of_events_per_type,
            no_of_faults_per_type,
            activity_structure_length,
            no_of_card_vehicle_records,
            no_of_card_place_records,
            no_of_gnss_ad_records,
            no_of_specific_condition_records,
            no_of_card_vehicle_unit_records,
        };
        Ok((app, no_of_calibration_records))
    }

    fn encode(
        &self,
        generation: Generation,
        no_of_calibration_records: Option<u8>,
        out: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        out.push(self.no_of_events_per_type);
        out.push(self.no_of_faults_per_type);
        put_u16(out, self.activity_structure_length);
        put_u16(out, self.no_of_card_vehicle_records);
        match generation {
            Generation::Gen1 => {
                let places = u8::try_from(self.no_of_card_place_records).map_err(|_| EncodeError::IntegerOverflow {
                    value: u64::from(self.no_of_card_place_records),
                    bytes: 1,
                })?;
                out.push(places);
            }
            Generation::Gen2 => put_u16(out, self.no_of_card_place_records),
        }
        if let Some(calibrations) = no_of_calibration_records {
            out.push(calibrations);
        }
        if generation == Generation::Gen2 {
            put_u16(out, self.no_of_gnss_ad_records.unwrap_or(0));
            put_u16(out, self.no_of_specific_condition_records.unwrap_or(0));
            put_u16(out, self.no_of_card_vehicle_unit_records.unwrap_or(0));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardApplication {
    Driver(DriverCardApplication),
    Workshop {
        card: DriverCardApplication,
        no_of_calibration_records: u8,
    },
    Control {
        no_of_control_activity_records: u16,
    },
    Company {
        no_of_company_activity_records: u16,
    },
}

/// Card type, structure version and the record capacities of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationIdentification {
    pub type_of_tachograph_card_id: EquipmentType,
    pub card_structure_version: [u8; 2],
    pub application: CardApplication,
}

impl EfContent for ApplicationIdentification {
    fn decode_ef(r: &mut Reader<'_>, ctx: EfContext) -> Result<Self, DecodeError> {
        let type_of_tachograph_card_id = r.decode()?;
        let card_structure_version = r.array()?;
        let application = match ctx.card_type {
            CardType::DriverCard => CardApplication::Driver(DriverCardApplication::decode(r, ctx.generation, false)?.0),
            CardType::WorkshopCard => {
                let (card, calibrations) = DriverCardApplication::decode(r, ctx.generation, true)?;
                CardApplication::Workshop {
                    card,
                    no_of_calibration_records: calibrations.unwrap_or(0),
                }
            }
            CardType::ControlCard => CardApplication::Control {
                no_of_control_activity_records: r.u16()?,
            },
            CardType::CompanyCard => CardApplication::Company {
                no_of_company_activity_records: r.u16()?,
            },
            CardType::Unspecified => {
                return Err(DecodeError::InvalidValue {
                    field: "card type",
                    reason: "unspecified".into(),
                });
            }
        };
        Ok(Self {
            type_of_tachograph_card_id,
            card_structure_version,
            application,
        })
    }

    fn encode_ef(&self, ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.type_of_tachograph_card_id.encode(out)?;
        out.extend_from_slice(&self.card_structure_version);
        match &self.application {
            CardApplication::Driver(card) => card.encode(ctx.generation, None, out)?,
            CardApplication::Workshop {
                card,
                no_of_calibration_records,
            } => card.encode(ctx.generation, Some(*no_of_calibration_records), out)?,
            CardApplication::Control {
                no_of_control_activity_records,
            } => put_u16(out, *no_of_control_activity_records),
            CardApplication::Company {
                no_of_company_activity_records,
            } => put_u16(out, *no_of_company_activity_records),
        }
        Ok(())
    }
}

/// Generation 2 version 2 capacities (8 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIdentificationV2 {
    pub no_of_border_crossing_records: u16,
    pub no_of_load_unload_records: u16,
    pub no_of_load_type_entry_records: u16,
    pub vu_configuration_length_range: u16,
}

impl EfContent for ApplicationIdentificationV2 {
    fn decode_ef(r: &mut Reader<'_>, _ctx: EfContext) -> Result<Self, DecodeError> {
        Ok(Self {
            no_of_border_crossing_records: r.u16()?,
            no_of_load_unload_records: r.u16()?,
            no_of_load_type_entry_records: r.u16()?,
            vu_configuration_length_range: r.u16()?,
        })
    }

    fn encode_ef(&self, _ctx: EfContext, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        put_u16(out, self.no_of_border_crossing_records);
        put_u16(out, self.no_of_load_unload_records);
        put_u16(out, self.no_of_load_type_entry_records);
        put_u16(out, self.vu_configuration_length_range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(card_type: CardType, generation: Generation) -> EfContext {
        EfContext { card_type, generation }
    }

    #[test]
    fn driver_gen1_and_gen2_lengths() {
        let gen1 = [0x01, 0x00, 0x01, 0x0C, 0x0C, 0x2A, 0x30, 0x00, 0x54, 0x70];
        let mut r = Reader::new(&gen1);
        let app = ApplicationIdentification::decode_ef(&mut r, ctx(CardType::DriverCard, Generation::Gen1)).unwrap();
        assert!(r.is_empty());
        let CardApplication::Driver(driver) = &app.application else {
            panic!("expected driver application");
        };
        assert_eq!(driver.activity_structure_length, 0x2A30);
        assert_eq!(driver.no_of_card_place_records, 0x70);

        let mut gen2 = gen1[..9].to_vec();
        gen2.extend_from_slice(&[0x00, 0x70, 0x00, 0x10, 0x00, 0x20, 0x00, 0x30]);
        assert_eq!(gen2.len(), 17);
        let mut r = Reader::new(&gen2);
        let app = ApplicationIdentification::decode_ef(&mut r, ctx(CardType::DriverCard, Generation::Gen2)).unwrap();
        assert!(r.is_empty());
        let mut out = Vec::new();
        app.encode_ef(ctx(CardType::DriverCard, Generation::Gen2), &mut out).unwrap();
        assert_eq!(out, gen2);
    }

    #[test]
    fn workshop_calibration_count_follows_place_count() {
        let mut gen2 = vec![0x02, 0x01, 0x00, 0x0C, 0x0C, 0x2A, 0x30, 0x00, 0x54];
        gen2.extend_from_slice(&[0x00, 0x58, 0xFF, 0x00, 0x18, 0x00, 0x38, 0x00, 0xFF]);
        let ctx = ctx(CardType::WorkshopCard, Generation::Gen2);
        let mut r = Reader::new(&gen2);
        let app = ApplicationIdentification::decode_ef(&mut r, ctx).unwrap();
        assert!(r.is_empty());
        let CardApplication::Workshop {
            card,
            no_of_calibration_records,
        } = &app.application
        else {
            panic!("expected workshop application");
        };
        assert_eq!(*no_of_calibration_records, 0xFF);
        assert_eq!(card.no_of_card_place_records, 0x58);
        assert_eq!(card.no_of_gnss_ad_records, Some(0x18));
        assert_eq!(card.no_of_specific_condition_records, Some(0x38));
        assert_eq!(card.no_of_card_vehicle_unit_records, Some(0xFF));

        let mut out = Vec::new();
        app.encode_ef(ctx, &mut out).unwrap();
        assert_eq!(out, gen2);
    }

    #[test]
    fn company_is_five_bytes() {
        let raw = [0x04, 0x00, 0x01, 0x00, 0xFF];
        let mut r = Reader::new(&raw);
        let app = ApplicationIdentification::decode_ef(&mut r, ctx(CardType::CompanyCard, Generation::Gen1)).unwrap();
        assert_eq!(app.type_of_tachograph_card_id, EquipmentType::CompanyCard);
        assert_eq!(
            app.application,
            CardApplication::Company {
                no_of_company_activity_records: 255
            }
        );
    }
}
