//! Structured representation of tachograph downloads.
//!
//! `unmarshal_file` turns a card or vehicle-unit download into a
//! [`StructuredFile`]; `marshal_file` writes it back. Unknown files, records
//! and enumeration values are carried through so that a download re-encodes
//! byte for byte.

pub mod card;
pub mod enums;
pub mod file;
pub mod types;
pub mod validate;
pub mod vu;

pub use card::{CardFile, CardType, RawCardFile, infer_card_type};
pub use file::{
    MarshalError, StructuredFile, UnmarshalError, UnmarshalOptions, marshal_file, unmarshal_file,
    unmarshal_file_with,
};
pub use types::Slot;
pub use validate::validate_file;
pub use vu::{UnknownTagPolicy, VehicleUnitFile};
