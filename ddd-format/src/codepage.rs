//! Code page selector byte used by Name, Address and registration fields.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::codec::EncodeError;

/// Character set of a code-paged string.
///
/// `Ia5` is not a wire value: it tags plain fixed-width strings that carry no
/// selector byte. Unknown selector values are kept in `Unrecognized` and
/// decoded as ISO-8859-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CodePage {
    #[default]
    Ia5,
    Default,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_5,
    Iso8859_7,
    Iso8859_9,
    Iso8859_13,
    Iso8859_15,
    Iso8859_16,
    Koi8R,
    Koi8U,
    Empty,
    Unrecognized(u8),
}

const CODE_PAGES: &[(CodePage, u8)] = &[
    (CodePage::Default, 0),
    (CodePage::Iso8859_1, 1),
    (CodePage::Iso8859_2, 2),
    (CodePage::Iso8859_3, 3),
    (CodePage::Iso8859_5, 5),
    (CodePage::Iso8859_7, 7),
    (CodePage::Iso8859_9, 9),
    (CodePage::Iso8859_13, 13),
    (CodePage::Iso8859_15, 15),
    (CodePage::Iso8859_16, 16),
    (CodePage::Koi8R, 80),
    (CodePage::Koi8U, 85),
    (CodePage::Empty, 255),
];

impl CodePage {
    pub fn from_wire(value: u8) -> Self {
        CODE_PAGES
            .iter()
            .find(|(_, v)| *v == value)
            .map_or(Self::Unrecognized(value), |(cp, _)| *cp)
    }

    /// Selector byte; `Ia5` has none and is written as the default page.
    pub fn to_wire(self) -> u8 {
        match self {
            Self::Unrecognized(v) => v,
            Self::Ia5 => 0,
            cp => CODE_PAGES
                .iter()
                .find(|(c, _)| *c == cp)
                .map_or(0, |(_, v)| *v),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ia5 => "IA5",
            Self::Default => "default",
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Iso8859_2 => "ISO-8859-2",
            Self::Iso8859_3 => "ISO-8859-3",
            Self::Iso8859_5 => "ISO-8859-5",
            Self::Iso8859_7 => "ISO-8859-7",
            Self::Iso8859_9 => "ISO-8859-9",
            Self::Iso8859_13 => "ISO-8859-13",
            Self::Iso8859_15 => "ISO-8859-15",
            Self::Iso8859_16 => "ISO-8859-16",
            Self::Koi8R => "KOI8-R",
            Self::Koi8U => "KOI8-U",
            Self::Empty => "empty",
            Self::Unrecognized(_) => "unrecognized",
        }
    }

    /// encoding_rs table for the page, `None` for the Latin-1 family.
    ///
    /// ISO-8859-9 is served by windows-1254, which agrees with it on every
    /// printable position.
    fn charset(self) -> Option<&'static Encoding> {
        match self {
            Self::Iso8859_2 => Some(encoding_rs::ISO_8859_2),
            Self::Iso8859_3 => Some(encoding_rs::ISO_8859_3),
            Self::Iso8859_5 => Some(encoding_rs::ISO_8859_5),
            Self::Iso8859_7 => Some(encoding_rs::ISO_8859_7),
            Self::Iso8859_9 => Some(encoding_rs::WINDOWS_1254),
            Self::Iso8859_13 => Some(encoding_rs::ISO_8859_13),
            Self::Iso8859_15 => Some(encoding_rs::ISO_8859_15),
            Self::Iso8859_16 => Some(encoding_rs::ISO_8859_16),
            Self::Koi8R => Some(encoding_rs::KOI8_R),
            Self::Koi8U => Some(encoding_rs::KOI8_U),
            _ => None,
        }
    }

    /// Decode `bytes` in this page. Returns `None` when a byte has no
    /// printable mapping, leaving the fallback choice to the caller.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self.charset() {
            Some(enc) => {
                let (text, had_errors) = enc.decode_without_bom_handling(bytes);
                if had_errors || text.chars().any(char::is_control) {
                    None
                } else {
                    Some(text.into_owned())
                }
            }
            None => {
                // ISO-8859-1: every byte is its own code point
                let text: String = bytes.iter().map(|&b| char::from(b)).collect();
                if text.chars().any(char::is_control) {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        match self.charset() {
            Some(enc) => {
                let (bytes, _, had_errors) = enc.encode(text);
                if had_errors {
                    return Err(EncodeError::UnmappableText(self.name().into()));
                }
                Ok(bytes.into_owned())
            }
            None => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)))
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| EncodeError::UnmappableText(self.name().into())),
        }
    }
}
