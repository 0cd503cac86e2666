//! # FastUtf - Byte-Level Unicode Encoding Library
//!
//! Converts text between 7-bit ASCII and UTF-8/16/32 (both byte orders),
//! validates encoded byte buffers, detects the encoding of untrusted input,
//! and reads or rewrites individual code points in place without decoding
//! the whole buffer.
//!
//! ## Features
//!
//! - **Exact validation** with per-encoding framing rules (truncated
//!   sequences, unpaired surrogates, out-of-range values)
//! - **BOM-aware detection** that falls back to ASCII and UTF-8 probing
//! - **All-or-nothing conversion** with optional byte-order mark output
//! - **Random access** to code points at byte offsets, including resizing
//!   replacement
//! - **Character properties** (letters, case, numerals, whitespace) backed
//!   by a pluggable property table
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_utf::{Encoding, Translator};
//!
//! let translator = Translator::new(Encoding::UTF8, Encoding::UTF16BE)
//!     .unwrap()
//!     .with_bom(true);
//!
//! let utf16 = translator.convert("Hi".as_bytes()).unwrap();
//! assert_eq!(utf16, [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]);
//! assert_eq!(fast_utf::detect_encoding(&utf16), Encoding::UTF16BE);
//! ```

#![deny(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

mod codec;
pub mod detection;
pub mod properties;
mod unicode_data;
mod validation;

pub use codec::{
    CodePoints, char_size, code_points, decode_char, encode_char, get_length, push_char,
    replace_char,
};
pub use detection::{DetectionResult, detect, detect_encoding};
pub use properties::{
    CaseClass, Classifier, LetterProperties, PropertyTable, UnicodeTable, is_alpha, is_lower,
    is_newline, is_numeric, is_title, is_upper, is_whitespace, to_lower, to_title, to_upper,
};
pub use validation::is_valid;

/// Largest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during encoding operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Code point argument lies above U+10FFFF
    #[error("invalid code point 0x{code_point:X}: exceeds U+10FFFF")]
    InvalidCodePoint {
        /// The rejected value
        code_point: u32,
    },
    /// Byte index does not start a structurally valid code point
    #[error("byte index {position} does not refer to a valid {encoding} code point")]
    InvalidSequence {
        /// Byte offset of the sequence
        position: usize,
        /// Encoding the bytes were read as
        encoding: Encoding,
    },
    /// Byte index lies past the end of the buffer
    #[error("byte index {position} out of range for a buffer of {len} bytes")]
    IndexOutOfRange {
        /// Requested byte offset
        position: usize,
        /// Buffer length
        len: usize,
    },
    /// Code point has no representation in the target encoding
    #[error("code point U+{code_point:04X} cannot be encoded in {encoding}")]
    Unencodable {
        /// The code point
        code_point: u32,
        /// Target encoding
        encoding: Encoding,
    },
    /// `Encoding::UNKNOWN` was passed where a concrete encoding is required
    #[error("unknown {direction} encoding")]
    UnknownEncoding {
        /// Either `"input"` or `"output"`
        direction: &'static str,
    },
    /// Conversion input failed whole-buffer validation
    #[error("malformed {encoding} input")]
    MalformedInput {
        /// Declared input encoding
        encoding: Encoding,
    },
    /// Serialized encoding id does not name an encoding
    #[error("invalid encoding id {id}")]
    InvalidEncodingId {
        /// The rejected id
        id: u8,
    },
}

/// Coarse error categories shared by all [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A code point argument was out of range
    InvalidCodePoint,
    /// Bytes could not be decoded at the requested position
    Decode,
    /// A value could not be encoded, or the request named no usable encoding
    Encode,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCodePoint { .. } => ErrorKind::InvalidCodePoint,
            Error::InvalidSequence { .. } | Error::IndexOutOfRange { .. } => ErrorKind::Decode,
            Error::Unencodable { .. }
            | Error::UnknownEncoding { .. }
            | Error::MalformedInput { .. }
            | Error::InvalidEncodingId { .. } => ErrorKind::Encode,
        }
    }
}

/// Supported character encodings
///
/// The discriminants are stable and are what the tag serializes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[allow(clippy::upper_case_acronyms)]
#[repr(u8)]
pub enum Encoding {
    /// Result of failed detection; never accepted by encode/decode operations
    UNKNOWN = 0,
    /// ASCII (7-bit, 0-127)
    ASCII = 1,
    /// UTF-8 Unicode encoding (variable length, 1-4 bytes)
    UTF8 = 2,
    /// UTF-16BE Unicode encoding (big endian)
    UTF16BE = 3,
    /// UTF-16LE Unicode encoding (little endian)
    UTF16LE = 4,
    /// UTF-32BE Unicode encoding (big endian)
    UTF32BE = 5,
    /// UTF-32LE Unicode encoding (little endian)
    UTF32LE = 6,
}

impl Encoding {
    /// Every concrete encoding, in id order
    pub const SUPPORTED: [Encoding; 6] = [
        Encoding::ASCII,
        Encoding::UTF8,
        Encoding::UTF16BE,
        Encoding::UTF16LE,
        Encoding::UTF32BE,
        Encoding::UTF32LE,
    ];

    /// Get the canonical name of this encoding
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UNKNOWN => "unknown",
            Encoding::ASCII => "US-ASCII",
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF16BE => "UTF-16BE",
            Encoding::UTF16LE => "UTF-16LE",
            Encoding::UTF32BE => "UTF-32BE",
            Encoding::UTF32LE => "UTF-32LE",
        }
    }

    /// Stable integer id of this encoding
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether this is one of the six concrete encodings
    pub fn is_known(self) -> bool {
        self != Encoding::UNKNOWN
    }

    /// Check if this encoding uses variable-length character representation
    pub fn is_multibyte(self) -> bool {
        matches!(
            self,
            Encoding::UTF8 | Encoding::UTF16BE | Encoding::UTF16LE
        )
    }

    /// Size in bytes of one code unit
    pub fn unit_size(self) -> Option<usize> {
        match self {
            Encoding::UNKNOWN => None,
            Encoding::ASCII | Encoding::UTF8 => Some(1),
            Encoding::UTF16BE | Encoding::UTF16LE => Some(2),
            Encoding::UTF32BE | Encoding::UTF32LE => Some(4),
        }
    }

    /// Get the byte order mark (BOM) for this encoding if it has one
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::UTF8 => Some(&[0xEF, 0xBB, 0xBF]),
            Encoding::UTF16BE => Some(&[0xFE, 0xFF]),
            Encoding::UTF16LE => Some(&[0xFF, 0xFE]),
            Encoding::UTF32BE => Some(&[0x00, 0x00, 0xFE, 0xFF]),
            Encoding::UTF32LE => Some(&[0xFF, 0xFE, 0x00, 0x00]),
            Encoding::ASCII | Encoding::UNKNOWN => None,
        }
    }

    /// Strip one leading byte order mark of this encoding, if present
    pub fn strip_bom(self, input: &[u8]) -> &[u8] {
        match self.bom() {
            Some(bom) => input.strip_prefix(bom).unwrap_or(input),
            None => input,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Encoding> for u8 {
    fn from(encoding: Encoding) -> u8 {
        encoding.id()
    }
}

impl TryFrom<u8> for Encoding {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Encoding::UNKNOWN),
            1 => Ok(Encoding::ASCII),
            2 => Ok(Encoding::UTF8),
            3 => Ok(Encoding::UTF16BE),
            4 => Ok(Encoding::UTF16LE),
            5 => Ok(Encoding::UTF32BE),
            6 => Ok(Encoding::UTF32LE),
            _ => Err(Error::InvalidEncodingId { id }),
        }
    }
}

/// Serializable description of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Encoding of the input buffer
    pub from: Encoding,
    /// Encoding of the output buffer
    pub to: Encoding,
    /// Emit the output encoding's byte order mark first
    #[serde(default)]
    pub include_bom: bool,
}

/// Whole-buffer encoding converter
///
/// Input is validated in full before any output is produced, so a
/// conversion either succeeds completely or returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    from: Encoding,
    to: Encoding,
    include_bom: bool,
}

impl Translator {
    /// Create a new translator between two encodings
    pub fn new(from: Encoding, to: Encoding) -> Result<Self> {
        if !from.is_known() {
            return Err(Error::UnknownEncoding { direction: "input" });
        }
        if !to.is_known() {
            return Err(Error::UnknownEncoding {
                direction: "output",
            });
        }
        Ok(Self {
            from,
            to,
            include_bom: false,
        })
    }

    /// Create a translator from a configuration value
    pub fn from_options(options: &ConversionOptions) -> Result<Self> {
        Ok(Self::new(options.from, options.to)?.with_bom(options.include_bom))
    }

    /// Set whether output starts with the target encoding's BOM
    pub fn with_bom(mut self, include_bom: bool) -> Self {
        self.include_bom = include_bom;
        self
    }

    /// Get source encoding
    pub fn from_encoding(&self) -> Encoding {
        self.from
    }

    /// Get target encoding
    pub fn to_encoding(&self) -> Encoding {
        self.to
    }

    /// Whether output starts with a BOM
    pub fn includes_bom(&self) -> bool {
        self.include_bom
    }

    /// Convert data from source to target encoding
    ///
    /// A single leading BOM of the source encoding is dropped from the
    /// input. Every remaining code point is re-encoded in order.
    pub fn convert(&self, input: &[u8]) -> Result<Vec<u8>> {
        if !is_valid(input, self.from) {
            debug!(encoding = %self.from, len = input.len(), "rejecting malformed input");
            return Err(Error::MalformedInput {
                encoding: self.from,
            });
        }

        let body = self.from.strip_bom(input);
        let mut output = Vec::with_capacity(body.len() + 4);

        if self.include_bom {
            if let Some(bom) = self.to.bom() {
                output.extend_from_slice(bom);
            }
        }

        for item in code_points(body, self.from) {
            let (_, code_point) = item?;
            codec::encode_into(code_point, self.to, &mut output)?;
        }

        debug!(
            from = %self.from,
            to = %self.to,
            bytes_in = input.len(),
            bytes_out = output.len(),
            "converted buffer"
        );
        Ok(output)
    }
}

/// Convert a buffer between encodings in one call
pub fn convert_encoding(
    input: &[u8],
    from: Encoding,
    to: Encoding,
    include_bom: bool,
) -> Result<Vec<u8>> {
    Translator::new(from, to)?.with_bom(include_bom).convert(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_to_utf16le() {
        let output = convert_encoding("Hi€".as_bytes(), Encoding::UTF8, Encoding::UTF16LE, false)
            .unwrap();
        assert_eq!(output, [0x48, 0x00, 0x69, 0x00, 0xAC, 0x20]);
    }

    #[test]
    fn test_utf16_endianness_conversion() {
        let le_to_be = Translator::new(Encoding::UTF16LE, Encoding::UTF16BE).unwrap();

        let le_input = &[0x48, 0x00, 0x3D, 0xD8, 0x00, 0xDE];
        let be_output = le_to_be.convert(le_input).unwrap();
        assert_eq!(be_output, [0x00, 0x48, 0xD8, 0x3D, 0xDE, 0x00]);

        let be_to_le = Translator::new(Encoding::UTF16BE, Encoding::UTF16LE).unwrap();
        assert_eq!(be_to_le.convert(&be_output).unwrap(), le_input);
    }

    #[test]
    fn test_utf32_output() {
        let output =
            convert_encoding("A😀".as_bytes(), Encoding::UTF8, Encoding::UTF32BE, false).unwrap();
        assert_eq!(output, [0, 0, 0, 0x41, 0, 0x01, 0xF6, 0x00]);

        let output =
            convert_encoding("A😀".as_bytes(), Encoding::UTF8, Encoding::UTF32LE, false).unwrap();
        assert_eq!(output, [0x41, 0, 0, 0, 0x00, 0xF6, 0x01, 0]);
    }

    #[test]
    fn test_bom_emitted_for_target() {
        for encoding in Encoding::SUPPORTED {
            let output = convert_encoding(b"x", Encoding::ASCII, encoding, true).unwrap();
            let bom = encoding.bom().unwrap_or(&[]);
            assert!(output.starts_with(bom), "{encoding}");
            assert_eq!(&output[bom.len()..], encode_char('x' as u32, encoding).unwrap());
        }
    }

    #[test]
    fn test_input_bom_skipped_once() {
        let input = [0xEF, 0xBB, 0xBF, 0xEF, 0xBB, 0xBF, b'a'];
        let output = convert_encoding(&input, Encoding::UTF8, Encoding::UTF16BE, false).unwrap();
        // The second mark is content, a ZERO WIDTH NO-BREAK SPACE
        assert_eq!(output, [0xFE, 0xFF, 0x00, 0x61]);
    }

    #[test]
    fn test_input_bom_replaced_by_output_bom() {
        let input = [0xFF, 0xFE, 0x41, 0x00];
        let output = convert_encoding(&input, Encoding::UTF16LE, Encoding::UTF8, true).unwrap();
        assert_eq!(output, [0xEF, 0xBB, 0xBF, 0x41]);
    }

    #[test]
    fn test_unknown_encodings_rejected() {
        assert_eq!(
            Translator::new(Encoding::UNKNOWN, Encoding::UTF8),
            Err(Error::UnknownEncoding { direction: "input" })
        );
        let err = convert_encoding(b"a", Encoding::UTF8, Encoding::UNKNOWN, false).unwrap_err();
        assert_eq!(err.to_string(), "unknown output encoding");
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_malformed_input_rejected() {
        let err = convert_encoding(&[0x41, 0xE2, 0x82], Encoding::UTF8, Encoding::UTF16LE, false)
            .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput {
                encoding: Encoding::UTF8
            }
        );
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_unrepresentable_output_fails_whole_conversion() {
        let err = convert_encoding("ab€".as_bytes(), Encoding::UTF8, Encoding::ASCII, false)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Unencodable {
                code_point: 0x20AC,
                encoding: Encoding::ASCII
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(
            convert_encoding(&[], Encoding::UTF32LE, Encoding::UTF8, false)
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            convert_encoding(&[], Encoding::UTF32LE, Encoding::UTF16BE, true).unwrap(),
            [0xFE, 0xFF]
        );
    }

    #[test]
    fn test_encoding_properties() {
        assert_eq!(Encoding::UTF8.name(), "UTF-8");
        assert_eq!(Encoding::UTF32LE.to_string(), "UTF-32LE");
        assert!(Encoding::UTF8.is_multibyte());
        assert!(!Encoding::UTF32BE.is_multibyte());
        assert_eq!(Encoding::UTF16LE.unit_size(), Some(2));
        assert_eq!(Encoding::UNKNOWN.unit_size(), None);
        assert_eq!(Encoding::ASCII.bom(), None);
        assert_eq!(Encoding::UTF8.bom(), Some([0xEF, 0xBB, 0xBF].as_slice()));
    }

    #[test]
    fn test_stable_ids() {
        let ids: Vec<u8> = Encoding::SUPPORTED.iter().map(|e| e.id()).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
        assert_eq!(Encoding::UNKNOWN.id(), 0);
        for id in 0..=6 {
            assert_eq!(Encoding::try_from(id).unwrap().id(), id);
        }
        assert_eq!(Encoding::try_from(7), Err(Error::InvalidEncodingId { id: 7 }));
    }

    #[test]
    fn test_encoding_serializes_as_id() {
        assert_eq!(serde_json::to_string(&Encoding::UTF16LE).unwrap(), "4");
        let encoding: Encoding = serde_json::from_str("5").unwrap();
        assert_eq!(encoding, Encoding::UTF32BE);
        assert!(serde_json::from_str::<Encoding>("9").is_err());
    }

    #[test]
    fn test_translator_from_options() {
        let options: ConversionOptions =
            serde_json::from_str(r#"{"from": 2, "to": 3, "include_bom": true}"#).unwrap();
        let translator = Translator::from_options(&options).unwrap();
        assert_eq!(translator.from_encoding(), Encoding::UTF8);
        assert_eq!(translator.to_encoding(), Encoding::UTF16BE);
        assert!(translator.includes_bom());

        let options: ConversionOptions = serde_json::from_str(r#"{"from": 1, "to": 0}"#).unwrap();
        assert!(!options.include_bom);
        assert!(Translator::from_options(&options).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidSequence {
            position: 3,
            encoding: Encoding::UTF16BE,
        };
        assert_eq!(
            err.to_string(),
            "byte index 3 does not refer to a valid UTF-16BE code point"
        );
        assert_eq!(
            Error::Unencodable {
                code_point: 0xD800,
                encoding: Encoding::UTF16LE
            }
            .to_string(),
            "code point U+D800 cannot be encoded in UTF-16LE"
        );
    }
}
