//! Wire-level building blocks for EU tachograph download files (`.DDD`).
//!
//! This crate knows how bytes are laid out, not what they mean:
//! - primitive field codecs (big-endian integers, BCD, TimeReal, Datef,
//!   fixed-width and code-paged strings)
//! - the card TLV record scanner and its inverse writer
//! - the static elementary-file and TREP tables
//! - file-type inference from the leading bytes
//!
//! Semantic assembly lives in `tacho-ir`.

pub mod bcd;
pub mod codec;
pub mod codepage;
pub mod ef;
pub mod reader;
pub mod strings;
pub mod time;
pub mod trep;
pub mod writer;

pub use codec::{Decode, DecodeError, DecodeGen, Encode, EncodeError, EncodeGen, Reader};
pub use codepage::CodePage;
pub use ef::{ElementaryFile, Generation};
pub use reader::{CardScanner, FileType, RawRecord, RecordTag, ScanError, infer_file_type};
pub use strings::StringValue;
pub use time::{Datef, TimeReal};
pub use trep::{TransferType, VuGeneration};
