//! Vehicle-unit transfer tags: `0x76` followed by the TREP byte.

use serde::{Deserialize, Serialize};

/// Leading byte of every VU transfer tag.
pub const VU_TAG_PREFIX: u8 = 0x76;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VuGeneration {
    Gen1,
    Gen2,
    Gen2V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferType {
    DownloadInterfaceVersion,
    OverviewGen1,
    ActivitiesGen1,
    EventsAndFaultsGen1,
    DetailedSpeedGen1,
    TechnicalDataGen1,
    OverviewGen2,
    ActivitiesGen2,
    EventsAndFaultsGen2,
    DetailedSpeedGen2,
    TechnicalDataGen2,
    OverviewGen2V2,
    ActivitiesGen2V2,
    EventsAndFaultsGen2V2,
    DetailedSpeedGen2V2,
    TechnicalDataGen2V2,
}

const TREP_TABLE: &[(TransferType, u8)] = &[
    (TransferType::DownloadInterfaceVersion, 0x00),
    (TransferType::OverviewGen1, 0x01),
    (TransferType::ActivitiesGen1, 0x02),
    (TransferType::EventsAndFaultsGen1, 0x03),
    (TransferType::DetailedSpeedGen1, 0x04),
    (TransferType::TechnicalDataGen1, 0x05),
    (TransferType::OverviewGen2, 0x21),
    (TransferType::ActivitiesGen2, 0x22),
    (TransferType::EventsAndFaultsGen2, 0x23),
    (TransferType::DetailedSpeedGen2, 0x24),
    (TransferType::TechnicalDataGen2, 0x25),
    (TransferType::OverviewGen2V2, 0x31),
    (TransferType::ActivitiesGen2V2, 0x32),
    (TransferType::EventsAndFaultsGen2V2, 0x33),
    (TransferType::DetailedSpeedGen2V2, 0x34),
    (TransferType::TechnicalDataGen2V2, 0x35),
];

impl TransferType {
    pub fn from_trep(trep: u8) -> Option<Self> {
        TREP_TABLE.iter().find(|(_, t)| *t == trep).map(|(tt, _)| *tt)
    }

    pub fn from_tag(tag: u16) -> Option<Self> {
        let [prefix, trep] = tag.to_be_bytes();
        if prefix != VU_TAG_PREFIX {
            return None;
        }
        Self::from_trep(trep)
    }

    pub fn trep(self) -> u8 {
        TREP_TABLE
            .iter()
            .find(|(tt, _)| *tt == self)
            .map_or(0, |(_, t)| *t)
    }

    pub fn tag(self) -> u16 {
        u16::from_be_bytes([VU_TAG_PREFIX, self.trep()])
    }

    /// Download interface version requests only exist on Gen2 version 2 units.
    pub fn generation(self) -> VuGeneration {
        match self.trep() {
            0x01..=0x05 => VuGeneration::Gen1,
            0x21..=0x25 => VuGeneration::Gen2,
            _ => VuGeneration::Gen2V2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_round_trips() {
        for (tt, trep) in TREP_TABLE {
            assert_eq!(TransferType::from_tag(0x7600 | u16::from(*trep)), Some(*tt));
            assert_eq!(tt.tag(), 0x7600 | u16::from(*trep));
        }
    }

    #[test]
    fn foreign_prefix_is_not_a_transfer() {
        assert_eq!(TransferType::from_tag(0x7501), None);
        assert_eq!(TransferType::from_tag(0x7606), None);
    }

    #[test]
    fn generations() {
        assert_eq!(TransferType::OverviewGen1.generation(), VuGeneration::Gen1);
        assert_eq!(TransferType::ActivitiesGen2.generation(), VuGeneration::Gen2);
        assert_eq!(TransferType::TechnicalDataGen2V2.generation(), VuGeneration::Gen2V2);
        assert_eq!(TransferType::DownloadInterfaceVersion.generation(), VuGeneration::Gen2V2);
    }
}
