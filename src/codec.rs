//! Per-code-point decoding and encoding for ASCII, UTF-8, UTF-16 and UTF-32
//!
//! Everything in this module works on borrowed byte slices and a position.
//! Probing (`char_size`) reports an invalid sequence as `None`; the
//! operations that produce values report it as an [`Error`].

use crate::{Encoding, Error, MAX_CODE_POINT, Result};

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;
const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

/// Decode the code point starting at `pos`, returning it with its byte length.
///
/// This is the single framing routine; `char_size` and `decode_char` are
/// views of it so the two can never disagree.
pub(crate) fn decode_at(input: &[u8], pos: usize, encoding: Encoding) -> Option<(u32, usize)> {
    let rest = input.get(pos..).filter(|rest| !rest.is_empty())?;
    match encoding {
        Encoding::ASCII => (rest[0] <= 0x7F).then_some((rest[0] as u32, 1)),
        Encoding::UTF8 => decode_utf8(rest),
        Encoding::UTF16BE => decode_utf16(rest, u16::from_be_bytes),
        Encoding::UTF16LE => decode_utf16(rest, u16::from_le_bytes),
        Encoding::UTF32BE => decode_utf32(rest, u32::from_be_bytes),
        Encoding::UTF32LE => decode_utf32(rest, u32::from_le_bytes),
        Encoding::UNKNOWN => None,
    }
}

fn decode_utf8(rest: &[u8]) -> Option<(u32, usize)> {
    let lead = rest[0];
    let (len, bits) = match lead {
        0x00..=0x7F => return Some((lead as u32, 1)),
        0xC0..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        0xF0..=0xF7 => (4, lead & 0x07),
        _ => return None,
    };

    let mut code_point = bits as u32;
    for &byte in rest.get(1..len)? {
        if byte & 0xC0 != 0x80 {
            return None;
        }
        code_point = (code_point << 6) | (byte & 0x3F) as u32;
    }

    // Overlong forms are accepted; only the upper bound is enforced.
    (code_point <= MAX_CODE_POINT).then_some((code_point, len))
}

fn decode_utf16(rest: &[u8], unit: fn([u8; 2]) -> u16) -> Option<(u32, usize)> {
    let high = unit(rest.get(..2)?.try_into().ok()?) as u32;
    if !SURROGATES.contains(&high) {
        return Some((high, 2));
    }
    if !HIGH_SURROGATES.contains(&high) {
        return None;
    }

    let low = unit(rest.get(2..4)?.try_into().ok()?) as u32;
    if !LOW_SURROGATES.contains(&low) {
        return None;
    }

    Some((0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), 4))
}

fn decode_utf32(rest: &[u8], word: fn([u8; 4]) -> u32) -> Option<(u32, usize)> {
    let code_point = word(rest.get(..4)?.try_into().ok()?);
    (code_point <= MAX_CODE_POINT).then_some((code_point, 4))
}

/// Number of bytes of the code point starting at `pos`.
///
/// Returns `None` when no valid code point starts there, including when
/// `pos` is at or past the end of the buffer or `encoding` is
/// [`Encoding::UNKNOWN`].
pub fn char_size(input: &[u8], pos: usize, encoding: Encoding) -> Option<usize> {
    decode_at(input, pos, encoding).map(|(_, size)| size)
}

/// Get the code point at a byte index
pub fn decode_char(input: &[u8], pos: usize, encoding: Encoding) -> Result<u32> {
    if !encoding.is_known() {
        return Err(Error::UnknownEncoding { direction: "input" });
    }
    if pos >= input.len() {
        return Err(Error::IndexOutOfRange {
            position: pos,
            len: input.len(),
        });
    }
    decode_at(input, pos, encoding)
        .map(|(code_point, _)| code_point)
        .ok_or(Error::InvalidSequence {
            position: pos,
            encoding,
        })
}

/// Append the encoded form of `code_point` to `output`.
///
/// Nothing is written when an error is returned.
pub(crate) fn encode_into(code_point: u32, encoding: Encoding, output: &mut Vec<u8>) -> Result<()> {
    if code_point > MAX_CODE_POINT {
        return Err(Error::InvalidCodePoint { code_point });
    }

    match encoding {
        Encoding::ASCII => {
            if code_point > 0x7F {
                return Err(Error::Unencodable {
                    code_point,
                    encoding,
                });
            }
            output.push(code_point as u8);
        }
        Encoding::UTF8 => match code_point {
            0x0000..=0x007F => output.push(code_point as u8),
            0x0080..=0x07FF => output.extend_from_slice(&[
                0xC0 | (code_point >> 6) as u8,
                0x80 | (code_point & 0x3F) as u8,
            ]),
            0x0800..=0xFFFF => output.extend_from_slice(&[
                0xE0 | (code_point >> 12) as u8,
                0x80 | ((code_point >> 6) & 0x3F) as u8,
                0x80 | (code_point & 0x3F) as u8,
            ]),
            _ => output.extend_from_slice(&[
                0xF0 | (code_point >> 18) as u8,
                0x80 | ((code_point >> 12) & 0x3F) as u8,
                0x80 | ((code_point >> 6) & 0x3F) as u8,
                0x80 | (code_point & 0x3F) as u8,
            ]),
        },
        Encoding::UTF16BE | Encoding::UTF16LE => {
            if SURROGATES.contains(&code_point) {
                return Err(Error::Unencodable {
                    code_point,
                    encoding,
                });
            }
            let unit = if encoding == Encoding::UTF16BE {
                u16::to_be_bytes
            } else {
                u16::to_le_bytes
            };
            if code_point <= 0xFFFF {
                output.extend_from_slice(&unit(code_point as u16));
            } else {
                let offset = code_point - 0x10000;
                output.extend_from_slice(&unit((0xD800 + (offset >> 10)) as u16));
                output.extend_from_slice(&unit((0xDC00 + (offset & 0x3FF)) as u16));
            }
        }
        Encoding::UTF32BE => output.extend_from_slice(&code_point.to_be_bytes()),
        Encoding::UTF32LE => output.extend_from_slice(&code_point.to_le_bytes()),
        Encoding::UNKNOWN => {
            return Err(Error::UnknownEncoding {
                direction: "output",
            });
        }
    }
    Ok(())
}

/// Encode a single code point
pub fn encode_char(code_point: u32, encoding: Encoding) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(4);
    encode_into(code_point, encoding, &mut output)?;
    Ok(output)
}

/// Add a code point to the end of a buffer
pub fn push_char(buffer: &mut Vec<u8>, code_point: u32, encoding: Encoding) -> Result<()> {
    encode_into(code_point, encoding, buffer)
}

/// Replace the code point at a byte index
///
/// The buffer grows or shrinks when the replacement has a different encoded
/// length; bytes after the replaced code point keep their order. On error
/// the buffer is left untouched.
pub fn replace_char(
    buffer: &mut Vec<u8>,
    pos: usize,
    code_point: u32,
    encoding: Encoding,
) -> Result<()> {
    if !encoding.is_known() {
        return Err(Error::UnknownEncoding {
            direction: "output",
        });
    }
    let old_size = char_size(buffer, pos, encoding).ok_or_else(|| {
        if pos >= buffer.len() {
            Error::IndexOutOfRange {
                position: pos,
                len: buffer.len(),
            }
        } else {
            Error::InvalidSequence {
                position: pos,
                encoding,
            }
        }
    })?;

    let replacement = encode_char(code_point, encoding)?;
    if replacement.len() == old_size {
        buffer[pos..pos + old_size].copy_from_slice(&replacement);
    } else {
        buffer.splice(pos..pos + old_size, replacement);
    }
    Ok(())
}

/// Iterator over the code points of an encoded buffer
///
/// Yields `(byte_offset, code_point)` pairs. The first invalid sequence is
/// reported as an error, after which iteration ends.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    input: &'a [u8],
    pos: usize,
    encoding: Encoding,
    failed: bool,
}

impl Iterator for CodePoints<'_> {
    type Item = Result<(usize, u32)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        match decode_at(self.input, self.pos, self.encoding) {
            Some((code_point, size)) => {
                let start = self.pos;
                self.pos += size;
                Some(Ok((start, code_point)))
            }
            None => {
                self.failed = true;
                Some(Err(Error::InvalidSequence {
                    position: self.pos,
                    encoding: self.encoding,
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            let remaining = self.input.len() - self.pos;
            (0, Some(remaining))
        }
    }
}

/// Iterate over the code points of `input`
///
/// [`Encoding::UNKNOWN`] yields an error for any non-empty input.
pub fn code_points(input: &[u8], encoding: Encoding) -> CodePoints<'_> {
    CodePoints {
        input,
        pos: 0,
        encoding,
        failed: false,
    }
}

/// Get the number of code points in a buffer
pub fn get_length(input: &[u8], encoding: Encoding) -> Result<usize> {
    if !encoding.is_known() {
        return Err(Error::UnknownEncoding { direction: "input" });
    }
    code_points(input, encoding).try_fold(0, |count, item| item.map(|_| count + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_ascii_framing() {
        assert_eq!(char_size(b"A", 0, Encoding::ASCII), Some(1));
        assert_eq!(char_size(&[0x80], 0, Encoding::ASCII), None);
        assert_eq!(decode_char(b"xyz", 2, Encoding::ASCII), Ok(b'z' as u32));
        assert_eq!(
            encode_char(0x80, Encoding::ASCII),
            Err(Error::Unencodable {
                code_point: 0x80,
                encoding: Encoding::ASCII
            })
        );
    }

    #[test]
    fn test_utf8_sizes() {
        let input = "A€😀é".as_bytes();
        assert_eq!(char_size(input, 0, Encoding::UTF8), Some(1));
        assert_eq!(char_size(input, 1, Encoding::UTF8), Some(3));
        assert_eq!(char_size(input, 4, Encoding::UTF8), Some(4));
        assert_eq!(char_size(input, 8, Encoding::UTF8), Some(2));
        // Mid-sequence offsets are not resynchronised
        assert_eq!(char_size(input, 2, Encoding::UTF8), None);
    }

    #[test]
    fn test_utf8_truncation_rejected() {
        assert_eq!(char_size(&[0xE2, 0x82], 0, Encoding::UTF8), None);
        assert_eq!(char_size(&[0xF0, 0x9F, 0x98], 0, Encoding::UTF8), None);
        assert_eq!(char_size(&[0xC3], 0, Encoding::UTF8), None);
    }

    #[test]
    fn test_utf8_bad_bytes() {
        // Continuation byte as lead
        assert_eq!(char_size(&[0x80], 0, Encoding::UTF8), None);
        // Lead bytes above 0xF7
        assert_eq!(char_size(&[0xF8, 0x80, 0x80, 0x80], 0, Encoding::UTF8), None);
        assert_eq!(char_size(&[0xFF], 0, Encoding::UTF8), None);
        // Non-continuation inside a sequence
        assert_eq!(char_size(&[0xE2, 0x41, 0xAC], 0, Encoding::UTF8), None);
        // 0x110000 is above the range
        assert_eq!(char_size(&[0xF4, 0x90, 0x80, 0x80], 0, Encoding::UTF8), None);
        assert_eq!(
            decode_char(&[0xF4, 0x8F, 0xBF, 0xBF], 0, Encoding::UTF8),
            Ok(MAX_CODE_POINT)
        );
    }

    #[test]
    fn test_utf8_overlong_is_lenient() {
        // Two-byte form of '/' passes the pattern check
        assert_eq!(decode_char(&[0xC0, 0xAF], 0, Encoding::UTF8), Ok(0x2F));
        // Encoded surrogates are decodable in UTF-8
        assert_eq!(decode_char(&[0xED, 0xA0, 0x80], 0, Encoding::UTF8), Ok(0xD800));
    }

    #[test]
    fn test_utf8_encode_ranges() {
        assert_eq!(encode_char(0x7F, Encoding::UTF8).unwrap(), [0x7F]);
        assert_eq!(encode_char(0x80, Encoding::UTF8).unwrap(), [0xC2, 0x80]);
        assert_eq!(encode_char(0x7FF, Encoding::UTF8).unwrap(), [0xDF, 0xBF]);
        assert_eq!(encode_char(0x800, Encoding::UTF8).unwrap(), [0xE0, 0xA0, 0x80]);
        assert_eq!(encode_char(0x20AC, Encoding::UTF8).unwrap(), [0xE2, 0x82, 0xAC]);
        assert_eq!(
            encode_char(0x1F600, Encoding::UTF8).unwrap(),
            [0xF0, 0x9F, 0x98, 0x80]
        );
        assert_eq!(
            encode_char(MAX_CODE_POINT, Encoding::UTF8).unwrap(),
            [0xF4, 0x8F, 0xBF, 0xBF]
        );
    }

    #[test]
    fn test_utf16_surrogate_boundary() {
        assert_eq!(
            encode_char(0x10000, Encoding::UTF16BE).unwrap(),
            [0xD8, 0x00, 0xDC, 0x00]
        );
        assert_eq!(
            decode_char(&[0xD8, 0x00, 0xDC, 0x00], 0, Encoding::UTF16BE),
            Ok(0x10000)
        );
        let err = encode_char(0xD800, Encoding::UTF16BE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);
        assert!(encode_char(0xDFFF, Encoding::UTF16LE).is_err());
        assert_eq!(
            encode_char(MAX_CODE_POINT, Encoding::UTF16LE).unwrap(),
            [0xFF, 0xDB, 0xFF, 0xDF]
        );
    }

    #[test]
    fn test_utf16_invalid_sequences() {
        // Lone low surrogate
        assert_eq!(char_size(&[0xDC, 0x00, 0x00, 0x41], 0, Encoding::UTF16BE), None);
        // High surrogate followed by a non-surrogate
        assert_eq!(char_size(&[0xD8, 0x00, 0x00, 0x41], 0, Encoding::UTF16BE), None);
        // High surrogate at end of buffer
        assert_eq!(char_size(&[0x00, 0xD8], 0, Encoding::UTF16LE), None);
        // Odd trailing byte
        assert_eq!(char_size(&[0x41], 0, Encoding::UTF16LE), None);
        assert_eq!(char_size(&[0x41, 0x00], 0, Encoding::UTF16LE), Some(2));
        assert_eq!(char_size(&[0xFF, 0xFF], 0, Encoding::UTF16LE), Some(2));
    }

    #[test]
    fn test_utf32_framing() {
        assert_eq!(
            decode_char(&[0x00, 0x10, 0xFF, 0xFF], 0, Encoding::UTF32BE),
            Ok(MAX_CODE_POINT)
        );
        assert_eq!(char_size(&[0x00, 0x11, 0x00, 0x00], 0, Encoding::UTF32BE), None);
        assert_eq!(char_size(&[0x00, 0x00, 0x11, 0x00], 0, Encoding::UTF32LE), None);
        assert_eq!(char_size(&[0x41, 0x00, 0x00], 0, Encoding::UTF32LE), None);
        assert_eq!(encode_char(0x41, Encoding::UTF32LE).unwrap(), [0x41, 0, 0, 0]);
        // Surrogate values are plain 32-bit words
        assert_eq!(
            encode_char(0xD800, Encoding::UTF32BE).unwrap(),
            [0x00, 0x00, 0xD8, 0x00]
        );
    }

    #[test]
    fn test_out_of_range_code_point() {
        for encoding in Encoding::SUPPORTED {
            assert_eq!(
                encode_char(0x110000, encoding),
                Err(Error::InvalidCodePoint {
                    code_point: 0x110000
                })
            );
        }
    }

    #[test]
    fn test_position_errors() {
        assert_eq!(char_size(b"ab", 2, Encoding::ASCII), None);
        assert_eq!(
            decode_char(b"ab", 5, Encoding::ASCII),
            Err(Error::IndexOutOfRange { position: 5, len: 2 })
        );
        assert_eq!(
            decode_char("é".as_bytes(), 1, Encoding::UTF8),
            Err(Error::InvalidSequence {
                position: 1,
                encoding: Encoding::UTF8
            })
        );
    }

    #[test]
    fn test_unknown_encoding() {
        assert_eq!(char_size(b"a", 0, Encoding::UNKNOWN), None);
        assert!(decode_char(b"a", 0, Encoding::UNKNOWN).is_err());
        assert!(encode_char(0x41, Encoding::UNKNOWN).is_err());
        assert!(get_length(b"a", Encoding::UNKNOWN).is_err());
    }

    #[test]
    fn test_get_length() {
        let input = [0x41, 0xE2, 0x82, 0xAC, 0xF0, 0x9F, 0x98, 0x80];
        assert_eq!(get_length(&input, Encoding::UTF8), Ok(3));
        assert_eq!(get_length(&[], Encoding::UTF16BE), Ok(0));
        assert_eq!(
            get_length(&[0x41, 0x00, 0x00, 0xDC], Encoding::UTF16LE),
            Err(Error::InvalidSequence {
                position: 2,
                encoding: Encoding::UTF16LE
            })
        );
    }

    #[test]
    fn test_code_points_iterator() {
        let input = "a😀b".encode_utf16().flat_map(u16::to_be_bytes).collect::<Vec<_>>();
        let items: Vec<_> = code_points(&input, Encoding::UTF16BE)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(items, [(0, 0x61), (2, 0x1F600), (6, 0x62)]);

        let mut iter = code_points(&[0x61, 0xFF, 0x62], Encoding::UTF8);
        assert_eq!(iter.next(), Some(Ok((0, 0x61))));
        assert!(matches!(iter.next(), Some(Err(_))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_push_char() {
        let mut buffer = b"a".to_vec();
        push_char(&mut buffer, 0x1F600, Encoding::UTF16LE).unwrap();
        assert_eq!(buffer, [b'a', 0x3D, 0xD8, 0x00, 0xDE]);

        assert!(push_char(&mut buffer, 0xDC00, Encoding::UTF16LE).is_err());
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_replace_same_size() {
        let mut buffer = b"cat".to_vec();
        replace_char(&mut buffer, 1, 'u' as u32, Encoding::ASCII).unwrap();
        assert_eq!(buffer, b"cut");
    }

    #[test]
    fn test_replace_grows_buffer() {
        let mut buffer = "a€b".as_bytes().to_vec();
        replace_char(&mut buffer, 1, 0x1F600, Encoding::UTF8).unwrap();
        assert_eq!(buffer, "a😀b".as_bytes());
        assert_eq!(get_length(&buffer, Encoding::UTF8), Ok(3));
    }

    #[test]
    fn test_replace_shrinks_buffer() {
        let mut buffer = "x😀yz".as_bytes().to_vec();
        replace_char(&mut buffer, 1, 'e' as u32, Encoding::UTF8).unwrap();
        assert_eq!(buffer, b"xeyz");

        let mut buffer = vec![0x00, 0x41, 0xD8, 0x3D, 0xDE, 0x00, 0x00, 0x42];
        replace_char(&mut buffer, 2, 0x43, Encoding::UTF16BE).unwrap();
        assert_eq!(buffer, [0x00, 0x41, 0x00, 0x43, 0x00, 0x42]);
    }

    #[test]
    fn test_replace_failure_leaves_buffer() {
        let mut buffer = "é!".as_bytes().to_vec();
        let original = buffer.clone();

        assert_eq!(
            replace_char(&mut buffer, 1, 'e' as u32, Encoding::UTF8),
            Err(Error::InvalidSequence {
                position: 1,
                encoding: Encoding::UTF8
            })
        );
        assert!(replace_char(&mut buffer, 0, 0x110000, Encoding::UTF8).is_err());
        assert!(replace_char(&mut buffer, 9, 'e' as u32, Encoding::UTF8).is_err());
        assert!(replace_char(&mut buffer, 0, 'e' as u32, Encoding::UNKNOWN).is_err());
        assert_eq!(buffer, original);
    }
}
