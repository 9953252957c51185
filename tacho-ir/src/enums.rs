//! One-byte enumerations from the data dictionary.
//!
//! Every enum keeps the wire byte of values it does not know in an
//! `Unrecognized` variant, so out-of-table values written by real equipment
//! are emitted again unchanged.

use ddd_format::{Decode, DecodeError, Encode, EncodeError, Reader};
use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            Unrecognized(u8),
        }

        impl $name {
            pub fn from_wire(value: u8) -> Self {
                match value {
                    $( $value => Self::$variant, )+
                    other => Self::Unrecognized(other),
                }
            }

            pub fn to_wire(self) -> u8 {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Unrecognized(value) => value,
                }
            }

            pub fn is_recognized(self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl Decode for $name {
            fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
                Ok(Self::from_wire(r.u8()?))
            }
        }

        impl Encode for $name {
            fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
                out.push(self.to_wire());
                Ok(())
            }
        }
    };
}

wire_enum! {
    /// EquipmentType: card types and recording equipment.
    pub enum EquipmentType {
        Reserved = 0,
        DriverCard = 1,
        WorkshopCard = 2,
        ControlCard = 3,
        CompanyCard = 4,
        ManufacturingCard = 5,
        VehicleUnit = 6,
        MotionSensor = 7,
        GnssFacility = 8,
        RemoteCommunicationModule = 9,
        ItsInterfaceModule = 10,
        Plaque = 11,
        M1N1Adapter = 12,
        EuropeanRootCa = 13,
        MemberStateCa = 14,
        ExternalGnssConnection = 15,
    }
}

wire_enum! {
    /// NationNumeric.
    pub enum NationNumeric {
        NoInformation = 0x00,
        Austria = 0x01,
        Albania = 0x02,
        Andorra = 0x03,
        Armenia = 0x04,
        Azerbaijan = 0x05,
        Belgium = 0x06,
        Bulgaria = 0x07,
        BosniaAndHerzegovina = 0x08,
        Belarus = 0x09,
        Switzerland = 0x0A,
        Cyprus = 0x0B,
        CzechRepublic = 0x0C,
        Germany = 0x0D,
        Denmark = 0x0E,
        Spain = 0x0F,
        Estonia = 0x10,
        France = 0x11,
        Finland = 0x12,
        Liechtenstein = 0x13,
        FaroeIslands = 0x14,
        UnitedKingdom = 0x15,
        Georgia = 0x16,
        Greece = 0x17,
        Hungary = 0x18,
        Croatia = 0x19,
        Italy = 0x1A,
        Ireland = 0x1B,
        Iceland = 0x1C,
        Kazakhstan = 0x1D,
        Luxembourg = 0x1E,
        Lithuania = 0x1F,
        Latvia = 0x20,
        Malta = 0x21,
        Monaco = 0x22,
        Moldova = 0x23,
        NorthMacedonia = 0x24,
        Norway = 0x25,
        Netherlands = 0x26,
        Portugal = 0x27,
        Poland = 0x28,
        Romania = 0x29,
        SanMarino = 0x2A,
        RussianFederation = 0x2B,
        Sweden = 0x2C,
        Slovakia = 0x2D,
        Slovenia = 0x2E,
        Turkmenistan = 0x2F,
        Turkey = 0x30,
        Ukraine = 0x31,
        VaticanCity = 0x32,
        Yugoslavia = 0x33,
        Montenegro = 0x34,
        Serbia = 0x35,
        Uzbekistan = 0x36,
        Tajikistan = 0x37,
        Kyrgyzstan = 0x38,
        EuropeanCommunity = 0xFD,
        RestOfEurope = 0xFE,
        RestOfWorld = 0xFF,
    }
}

wire_enum! {
    /// EventFaultType. The high nibble is the group (general events,
    /// security breaches, sensor faults, equipment faults, card faults).
    pub enum EventFaultType {
        NoFurtherDetails = 0x00,
        InsertionOfNonValidCard = 0x01,
        CardConflict = 0x02,
        TimeOverlap = 0x03,
        DrivingWithoutAppropriateCard = 0x04,
        CardInsertionWhileDriving = 0x05,
        LastCardSessionNotCorrectlyClosed = 0x06,
        OverSpeeding = 0x07,
        PowerSupplyInterruption = 0x08,
        MotionDataError = 0x09,
        VehicleMotionConflict = 0x0A,
        TimeConflict = 0x0B,
        CommunicationErrorWithRemoteFacility = 0x0C,
        AbsenceOfPositionFromGnss = 0x0D,
        CommunicationErrorWithExternalGnss = 0x0E,
        SecurityBreachNoFurtherDetails = 0x10,
        MotionSensorAuthenticationFailure = 0x11,
        TachographCardAuthenticationFailure = 0x12,
        UnauthorisedChangeOfMotionSensor = 0x13,
        CardDataInputIntegrityError = 0x14,
        StoredUserDataIntegrityError = 0x15,
        InternalDataTransferError = 0x16,
        UnauthorisedCaseOpening = 0x17,
        HardwareSabotage = 0x18,
        TamperDetectionOfGnss = 0x19,
        ExternalGnssAuthenticationFailure = 0x1A,
        ExternalGnssCertificateExpired = 0x1B,
        SensorSecurityBreachNoFurtherDetails = 0x20,
        SensorAuthenticationFailure = 0x21,
        SensorStoredDataIntegrityError = 0x22,
        SensorInternalDataTransferError = 0x23,
        SensorUnauthorisedCaseOpening = 0x24,
        SensorHardwareSabotage = 0x25,
        RecordingEquipmentFaultNoFurtherDetails = 0x30,
        VuInternalFault = 0x31,
        PrinterFault = 0x32,
        DisplayFault = 0x33,
        DownloadingFault = 0x34,
        SensorFault = 0x35,
        InternalGnssReceiverFault = 0x36,
        ExternalGnssFacilityFault = 0x37,
        RemoteCommunicationFacilityFault = 0x38,
        ItsInterfaceFault = 0x39,
        CardFaultNoFurtherDetails = 0x40,
    }
}

wire_enum! {
    pub enum EventFaultRecordPurpose {
        OneOfTenMostRecent = 0x00,
        LongestOfLastTenDays = 0x01,
        OneOfFiveLongestOverLastYear = 0x02,
        LastOfLastTenDays = 0x03,
        MostSeriousOfLastTenDays = 0x04,
        OneOfFiveMostSeriousOverLastYear = 0x05,
        FirstAfterLastCalibration = 0x06,
        ActiveOrOngoing = 0x07,
    }
}

wire_enum! {
    /// EntryTypeDailyWorkPeriod.
    pub enum EntryTypeDailyWorkPeriod {
        BeginCardInsertion = 0,
        EndCardWithdrawal = 1,
        BeginManualEntry = 2,
        EndManualEntry = 3,
        BeginAssumedByVu = 4,
        EndAssumedByVu = 5,
    }
}

wire_enum! {
    pub enum SpecificConditionType {
        Rfu = 0x00,
        OutOfScopeBegin = 0x01,
        OutOfScopeEnd = 0x02,
        FerryTrainCrossingBegin = 0x03,
        FerryTrainCrossingEnd = 0x04,
    }
}

wire_enum! {
    pub enum CalibrationPurpose {
        Reserved = 0x00,
        Activation = 0x01,
        FirstInstallation = 0x02,
        Installation = 0x03,
        PeriodicInspection = 0x04,
        EntryOfVrnByCompany = 0x05,
        TimeAdjustmentWithoutCalibration = 0x06,
    }
}

wire_enum! {
    pub enum CompanyActivityType {
        Reserved = 0,
        CardDownloading = 1,
        VuDownloading = 2,
        VuLockIn = 3,
        VuLockOut = 4,
    }
}

wire_enum! {
    pub enum CardSlotNumber {
        DriverSlot = 0,
        CoDriverSlot = 1,
    }
}

wire_enum! {
    pub enum ManualInputFlag {
        NoEntry = 0,
        ManualEntries = 1,
    }
}

wire_enum! {
    pub enum PositionAuthenticationStatus {
        NotAuthenticated = 0,
        Authenticated = 1,
    }
}

wire_enum! {
    /// OperationType of a load/unload record.
    pub enum OperationType {
        Rfu = 0,
        Load = 1,
        Unload = 2,
        SimultaneousLoadUnload = 3,
    }
}

wire_enum! {
    pub enum LoadType {
        Undefined = 0,
        Goods = 1,
        Passengers = 2,
    }
}

wire_enum! {
    /// Gen2 VU record array types.
    pub enum RecordType {
        ActivityChangeInfo = 0x01,
        CardSlotsStatus = 0x02,
        CurrentDateTime = 0x03,
        MemberStateCertificate = 0x04,
        OdometerValueMidnight = 0x05,
        DateOfDayDownloaded = 0x06,
        SensorPaired = 0x07,
        Signature = 0x08,
        SpecificConditionRecord = 0x09,
        VehicleIdentificationNumber = 0x0A,
        VehicleRegistrationNumber = 0x0B,
        VuCalibrationRecord = 0x0C,
        VuCardIwRecord = 0x0D,
        VuCardRecord = 0x0E,
        VuCertificate = 0x0F,
        VuCompanyLocksRecord = 0x10,
        VuControlActivityRecord = 0x11,
        VuDetailedSpeedBlock = 0x12,
        VuDownloadablePeriod = 0x13,
        VuDownloadActivityData = 0x14,
        VuEventRecord = 0x15,
        VuGnssAdRecord = 0x16,
        VuItsConsentRecord = 0x17,
        VuFaultRecord = 0x18,
        VuIdentification = 0x19,
        VuOverSpeedingControlData = 0x1A,
        VuOverSpeedingEventRecord = 0x1B,
        VuPlaceDailyWorkPeriodRecord = 0x1C,
        VuTimeAdjustmentGnssRecord = 0x1D,
        VuTimeAdjustmentRecord = 0x1E,
        VuPowerSupplyInterruptionRecord = 0x1F,
        SensorPairedRecord = 0x20,
        SensorExternalGnssCoupledRecord = 0x21,
        VuBorderCrossingRecord = 0x22,
        VuLoadUnloadRecord = 0x23,
        VehicleRegistrationIdentification = 0x24,
    }
}
