//! Whole-buffer validation

use crate::Encoding;
use crate::codec::char_size;

/// Determine whether a buffer is valid in a particular encoding
///
/// Valid means the buffer splits into complete code points with nothing
/// left over. An empty buffer is valid in every concrete encoding;
/// nothing is valid as [`Encoding::UNKNOWN`].
pub fn is_valid(input: &[u8], encoding: Encoding) -> bool {
    if !encoding.is_known() {
        return false;
    }

    let mut pos = 0;
    while pos < input.len() {
        match char_size(input, pos, encoding) {
            Some(size) => pos += size,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        for encoding in Encoding::SUPPORTED {
            assert!(is_valid(&[], encoding), "{encoding}");
        }
        assert!(!is_valid(&[], Encoding::UNKNOWN));
    }

    #[test]
    fn test_ascii() {
        assert!(is_valid(b"Hello, World!\n", Encoding::ASCII));
        assert!(!is_valid(&[b'a', 0x80], Encoding::ASCII));
    }

    #[test]
    fn test_utf8() {
        assert!(is_valid("Hello 世界! 😀".as_bytes(), Encoding::UTF8));
        assert!(!is_valid(&[0xE2, 0x82], Encoding::UTF8));
        assert!(!is_valid(&[b'a', 0xE2, 0x82, 0xAC, 0x80], Encoding::UTF8));
    }

    #[test]
    fn test_utf16_remainder() {
        assert!(is_valid(&[0x00, 0x41, 0xD8, 0x3D, 0xDE, 0x00], Encoding::UTF16BE));
        assert!(!is_valid(&[0x00, 0x41, 0x00], Encoding::UTF16BE));
        assert!(!is_valid(&[0x00, 0x41, 0xD8, 0x3D], Encoding::UTF16BE));
        assert!(!is_valid(&[0x00, 0xDC], Encoding::UTF16LE));
    }

    #[test]
    fn test_utf32() {
        assert!(is_valid(&[0x41, 0, 0, 0, 0x00, 0xF6, 0x01, 0], Encoding::UTF32LE));
        assert!(!is_valid(&[0x41, 0, 0, 0, 0x00], Encoding::UTF32LE));
        assert!(!is_valid(&[0x00, 0x00, 0x11, 0x00], Encoding::UTF32LE));
    }
}
