//! Property-based tests for conversion, detection and validation.
//!
//! Text is generated as Rust strings (so it never contains surrogate code
//! points) and encoded through the library before each property is checked.

use fast_utf::{
    Encoding, char_size, code_points, convert_encoding, decode_char, detect_encoding, encode_char,
    get_length, is_valid,
};
use proptest::prelude::*;

const UNICODE_ENCODINGS: [Encoding; 5] = [
    Encoding::UTF8,
    Encoding::UTF16BE,
    Encoding::UTF16LE,
    Encoding::UTF32BE,
    Encoding::UTF32LE,
];

/// Text that does not start with U+FEFF, which conversion would treat as a BOM.
fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..48)
        .prop_map(|chars| chars.into_iter().collect::<String>())
        .prop_filter("leading byte order mark", |text| !text.starts_with('\u{FEFF}'))
}

fn ascii_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..0x80, 0..64)
}

fn encoding_strategy() -> impl Strategy<Value = Encoding> {
    prop::sample::select(Encoding::SUPPORTED.to_vec())
}

fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    convert_encoding(text.as_bytes(), Encoding::UTF8, encoding, false).expect("valid text")
}

proptest! {
    #[test]
    fn unicode_round_trip(text in text_strategy()) {
        for from in UNICODE_ENCODINGS {
            let original = encode(&text, from);
            for to in UNICODE_ENCODINGS {
                let there = convert_encoding(&original, from, to, false).unwrap();
                let back = convert_encoding(&there, to, from, false).unwrap();
                prop_assert_eq!(&back, &original, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn ascii_round_trip(data in ascii_strategy(), to in encoding_strategy()) {
        let there = convert_encoding(&data, Encoding::ASCII, to, false).unwrap();
        let back = convert_encoding(&there, to, Encoding::ASCII, false).unwrap();
        prop_assert_eq!(back, data);
    }

    #[test]
    fn bom_prefix_and_detection(text in text_strategy(), to in encoding_strategy()) {
        prop_assume!(to != Encoding::ASCII || text.is_ascii());
        let output = convert_encoding(text.as_bytes(), Encoding::UTF8, to, true).unwrap();
        let bom = to.bom().unwrap_or(&[]);
        prop_assert!(output.starts_with(bom));

        let mut rewrapped = bom.to_vec();
        rewrapped.extend_from_slice(&output[bom.len()..]);
        prop_assert_eq!(detect_encoding(&rewrapped), detect_encoding(&output));

        // Only the UTF-16LE mark is a prefix of another mark
        if to.bom().is_some() && to != Encoding::UTF16LE {
            prop_assert_eq!(detect_encoding(&output), to);
        }
    }

    #[test]
    fn validator_agrees_with_decoding(
        data in prop::collection::vec(any::<u8>(), 0..32),
        encoding in encoding_strategy(),
    ) {
        let decodes = code_points(&data, encoding).all(|item| item.is_ok());
        prop_assert_eq!(is_valid(&data, encoding), decodes);
        prop_assert_eq!(get_length(&data, encoding).is_ok(), decodes);
    }

    #[test]
    fn single_code_point_framing(ch in any::<char>(), encoding in encoding_strategy()) {
        let code_point = ch as u32;
        match encode_char(code_point, encoding) {
            Ok(bytes) => {
                prop_assert_eq!(char_size(&bytes, 0, encoding), Some(bytes.len()));
                prop_assert_eq!(decode_char(&bytes, 0, encoding).unwrap(), code_point);
                // Every proper prefix is a truncated sequence
                for cut in 1..bytes.len() {
                    prop_assert_eq!(char_size(&bytes[..cut], 0, encoding), None);
                }
            }
            Err(_) => prop_assert!(encoding == Encoding::ASCII && code_point > 0x7F),
        }
    }

    #[test]
    fn length_counts_chars(text in text_strategy()) {
        for encoding in UNICODE_ENCODINGS {
            let encoded = encode(&text, encoding);
            prop_assert_eq!(get_length(&encoded, encoding).unwrap(), text.chars().count());
        }
    }
}
