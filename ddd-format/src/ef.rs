//! Elementary file identities and the record-tag appendix byte.

use serde::{Deserialize, Serialize};

/// Appendix bit marking a SIGNATURE record (clear = DATA).
pub const APPENDIX_SIGNATURE: u8 = 0x01;
/// Appendix bit marking a generation 2 record.
pub const APPENDIX_GEN2: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    Gen1,
    Gen2,
}

impl Generation {
    pub fn from_appendix(appendix: u8) -> Self {
        if appendix & APPENDIX_GEN2 != 0 {
            Self::Gen2
        } else {
            Self::Gen1
        }
    }

    pub fn appendix(self, signature: bool) -> u8 {
        let generation = match self {
            Self::Gen1 => 0,
            Self::Gen2 => APPENDIX_GEN2,
        };
        generation | if signature { APPENDIX_SIGNATURE } else { 0 }
    }
}

/// Elementary files found in card downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementaryFile {
    Icc,
    Ic,
    ApplicationIdentification,
    /// Card_Certificate (Gen1) / CardMA_Certificate (Gen2).
    CardCertificate,
    CardSignCertificate,
    CaCertificate,
    LinkCertificate,
    Identification,
    /// Driver card Card_Download: last card download time.
    CardDownloadDriver,
    /// Workshop card Card_Download: calibrations since last download.
    CardDownloadWorkshop,
    DrivingLicenceInfo,
    EventsData,
    FaultsData,
    DriverActivityData,
    VehiclesUsed,
    Places,
    CurrentUsage,
    ControlActivityData,
    Calibration,
    SensorInstallationData,
    ControllerActivityData,
    CompanyActivityData,
    SpecificConditions,
    VehicleUnitsUsed,
    GnssPlaces,
    ApplicationIdentificationV2,
    PlacesAuthentication,
    GnssPlacesAuthentication,
    BorderCrossings,
    LoadUnloadOperations,
    LoadTypeEntries,
}

const EF_TABLE: &[(ElementaryFile, u16, &str)] = &[
    (ElementaryFile::Icc, 0x0002, "EF_ICC"),
    (ElementaryFile::Ic, 0x0005, "EF_IC"),
    (ElementaryFile::ApplicationIdentification, 0x0501, "EF_Application_Identification"),
    (ElementaryFile::CardCertificate, 0xC100, "EF_Card_Certificate"),
    (ElementaryFile::CardSignCertificate, 0xC101, "EF_CardSignCertificate"),
    (ElementaryFile::CaCertificate, 0xC108, "EF_CA_Certificate"),
    (ElementaryFile::LinkCertificate, 0xC109, "EF_Link_Certificate"),
    (ElementaryFile::Identification, 0x0520, "EF_Identification"),
    (ElementaryFile::CardDownloadDriver, 0x050E, "EF_Card_Download"),
    (ElementaryFile::CardDownloadWorkshop, 0x0509, "EF_Card_Download"),
    (ElementaryFile::DrivingLicenceInfo, 0x0521, "EF_Driving_Licence_Info"),
    (ElementaryFile::EventsData, 0x0502, "EF_Events_Data"),
    (ElementaryFile::FaultsData, 0x0503, "EF_Faults_Data"),
    (ElementaryFile::DriverActivityData, 0x0504, "EF_Driver_Activity_Data"),
    (ElementaryFile::VehiclesUsed, 0x0505, "EF_Vehicles_Used"),
    (ElementaryFile::Places, 0x0506, "EF_Places"),
    (ElementaryFile::CurrentUsage, 0x0507, "EF_Current_Usage"),
    (ElementaryFile::ControlActivityData, 0x0508, "EF_Control_Activity_Data"),
    (ElementaryFile::Calibration, 0x050A, "EF_Calibration"),
    (ElementaryFile::SensorInstallationData, 0x050B, "EF_Sensor_Installation_Data"),
    (ElementaryFile::ControllerActivityData, 0x050C, "EF_Controller_Activity_Data"),
    (ElementaryFile::CompanyActivityData, 0x050D, "EF_Company_Activity_Data"),
    (ElementaryFile::SpecificConditions, 0x0522, "EF_Specific_Conditions"),
    (ElementaryFile::VehicleUnitsUsed, 0x0523, "EF_VehicleUnits_Used"),
    (ElementaryFile::GnssPlaces, 0x0524, "EF_GNSS_Places"),
    (ElementaryFile::ApplicationIdentificationV2, 0x0525, "EF_Application_Identification_V2"),
    (ElementaryFile::PlacesAuthentication, 0x0526, "EF_Places_Authentication"),
    (ElementaryFile::GnssPlacesAuthentication, 0x0527, "EF_GNSS_Places_Authentication"),
    (ElementaryFile::BorderCrossings, 0x0528, "EF_Border_Crossings"),
    (ElementaryFile::LoadUnloadOperations, 0x0529, "EF_Load_Unload_Operations"),
    (ElementaryFile::LoadTypeEntries, 0x0530, "EF_Load_Type_Entries"),
];

impl ElementaryFile {
    pub fn from_fid(fid: u16) -> Option<Self> {
        EF_TABLE.iter().find(|(_, f, _)| *f == fid).map(|(ef, _, _)| *ef)
    }

    pub fn fid(self) -> u16 {
        EF_TABLE
            .iter()
            .find(|(ef, _, _)| *ef == self)
            .map_or(0, |(_, f, _)| *f)
    }

    pub fn name(self) -> &'static str {
        EF_TABLE
            .iter()
            .find(|(ef, _, _)| *ef == self)
            .map_or("EF_Unknown", |(_, _, n)| *n)
    }

    pub fn is_certificate(self) -> bool {
        matches!(
            self,
            Self::CardCertificate | Self::CardSignCertificate | Self::CaCertificate | Self::LinkCertificate
        )
    }

    /// Whether a download follows this EF with a SIGNATURE record.
    pub fn is_signed(self) -> bool {
        !matches!(self, Self::Icc | Self::Ic) && !self.is_certificate()
    }
}

impl std::fmt::Display for ElementaryFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fids_are_unique_and_invertible() {
        for (ef, fid, _) in EF_TABLE {
            assert_eq!(ElementaryFile::from_fid(*fid), Some(*ef));
            assert_eq!(ef.fid(), *fid);
        }
    }

    #[test]
    fn unsigned_files() {
        assert!(!ElementaryFile::Icc.is_signed());
        assert!(!ElementaryFile::Ic.is_signed());
        assert!(!ElementaryFile::CaCertificate.is_signed());
        assert!(ElementaryFile::EventsData.is_signed());
    }

    #[test]
    fn appendix_bits() {
        assert_eq!(Generation::Gen1.appendix(false), 0x00);
        assert_eq!(Generation::Gen1.appendix(true), 0x01);
        assert_eq!(Generation::Gen2.appendix(false), 0x02);
        assert_eq!(Generation::Gen2.appendix(true), 0x03);
        assert_eq!(Generation::from_appendix(0x03), Generation::Gen2);
    }
}
