//! Encoding detection from byte order marks and validity probing
//!
//! Detection tries, in order: the UTF-32BE, UTF-32LE, UTF-16BE and UTF-16LE
//! byte order marks (each only if the whole buffer also validates in that
//! encoding), then plain ASCII, then UTF-8. The four-byte marks are checked
//! first because the UTF-32LE mark `FF FE 00 00` starts with the UTF-16LE
//! mark `FF FE`.

use serde::Serialize;
use tracing::trace;

use crate::{Encoding, is_valid};

/// Encodings announced by a byte order mark, in probing order
const BOM_PROBES: [Encoding; 4] = [
    Encoding::UTF32BE,
    Encoding::UTF32LE,
    Encoding::UTF16BE,
    Encoding::UTF16LE,
];

/// Encodings probed by validity alone when no mark matched
const FALLBACK_PROBES: [Encoding; 2] = [Encoding::ASCII, Encoding::UTF8];

/// Result of encoding detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// Most likely encoding, or [`Encoding::UNKNOWN`]
    pub encoding: Encoding,
    /// The byte order mark the buffer starts with, if any
    pub bom: Option<&'static [u8]>,
}

impl DetectionResult {
    /// Whether a BOM was detected
    pub fn bom_detected(&self) -> bool {
        self.bom.is_some()
    }

    /// The buffer with the detected BOM removed
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let skip = self.bom.map_or(0, <[u8]>::len);
        &data[skip.min(data.len())..]
    }
}

/// Detect encoding of the given data
pub fn detect(data: &[u8]) -> DetectionResult {
    for encoding in BOM_PROBES {
        let Some(bom) = encoding.bom() else { continue };
        if data.starts_with(bom) {
            if is_valid(data, encoding) {
                trace!(%encoding, "byte order mark matched");
                return DetectionResult {
                    encoding,
                    bom: Some(bom),
                };
            }
            trace!(%encoding, "byte order mark present but buffer is invalid");
        }
    }

    for encoding in FALLBACK_PROBES {
        if is_valid(data, encoding) {
            trace!(%encoding, "buffer validates");
            let bom = encoding.bom().filter(|bom| data.starts_with(bom));
            return DetectionResult { encoding, bom };
        }
    }

    trace!(len = data.len(), "no encoding matched");
    DetectionResult {
        encoding: Encoding::UNKNOWN,
        bom: None,
    }
}

/// Detect the encoding for a buffer
pub fn detect_encoding(data: &[u8]) -> Encoding {
    detect(data).encoding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf32le_bom_precedes_utf16le() {
        let result = detect(&[0xFF, 0xFE, 0x00, 0x00]);
        assert_eq!(result.encoding, Encoding::UTF32LE);
        assert!(result.bom_detected());
    }

    #[test]
    fn test_utf32be_bom() {
        let data = [0x00, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x00, 0x41];
        assert_eq!(detect_encoding(&data), Encoding::UTF32BE);
        assert_eq!(detect(&data).payload(&data), [0x00, 0x00, 0x00, 0x41]);
    }

    #[test]
    fn test_utf16_boms() {
        let le = [0xFF, 0xFE, b'H', 0x00, b'i', 0x00];
        let result = detect(&le);
        assert_eq!(result.encoding, Encoding::UTF16LE);
        assert_eq!(result.bom, Some([0xFF, 0xFE].as_slice()));

        let be = [0xFE, 0xFF, 0x00, b'H'];
        assert_eq!(detect_encoding(&be), Encoding::UTF16BE);
    }

    #[test]
    fn test_utf32le_bom_with_invalid_body_falls_back() {
        // Not valid UTF-32LE (trailing bytes) but valid UTF-16LE
        let data = [0xFF, 0xFE, 0x00, 0x00, 0x41, 0x00];
        assert_eq!(detect_encoding(&data), Encoding::UTF16LE);
    }

    #[test]
    fn test_bom_with_invalid_body() {
        // UTF-16BE mark followed by a lone high surrogate
        let data = [0xFE, 0xFF, 0xD8, 0x00];
        assert_eq!(detect_encoding(&data), Encoding::UNKNOWN);
    }

    #[test]
    fn test_ascii_detection() {
        let result = detect(b"Hello, World! This is plain ASCII text.");
        assert_eq!(result.encoding, Encoding::ASCII);
        assert!(!result.bom_detected());
        assert_eq!(detect_encoding(&[]), Encoding::ASCII);
    }

    #[test]
    fn test_utf8_detection() {
        let text = "Hello 世界! This contains Unicode: 😀".as_bytes();
        assert_eq!(detect_encoding(text), Encoding::UTF8);

        let mut with_bom = vec![0xEF, 0xBB, 0xBF];
        with_bom.extend_from_slice(b"abc");
        let result = detect(&with_bom);
        assert_eq!(result.encoding, Encoding::UTF8);
        assert!(result.bom_detected());
        assert_eq!(result.payload(&with_bom), b"abc");
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_encoding(&[0x41, 0xFF, 0x42]), Encoding::UNKNOWN);
        assert_eq!(detect(&[0xC3]).payload(&[0xC3]), [0xC3]);
    }

    #[test]
    fn test_bomless_utf16_is_not_guessed() {
        // No statistical guessing: NUL-interleaved ASCII is still ASCII
        assert_eq!(detect_encoding(&[b'H', 0x00, b'i', 0x00]), Encoding::ASCII);
    }
}
