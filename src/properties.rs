//! Character classification and case mapping
//!
//! Queries go through a [`PropertyTable`], a read-only lookup keyed by code
//! point. [`UnicodeTable`] is the built-in table, compiled from the Unicode
//! Character Database into sorted range arrays and searched with binary
//! search. The crate-level functions (`is_alpha`, `to_upper`, ...) use it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::unicode_data;
use crate::{Error, MAX_CODE_POINT, Result};

/// Letter case of a code point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CaseClass {
    /// A letter without case (modifier letters, ideographs, ...)
    Uncased,
    /// Uppercase letter
    Upper,
    /// Lowercase letter
    Lower,
    /// Titlecase letter (digraphs such as U+01C5)
    Title,
}

/// Properties of a code point that is a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterProperties {
    /// Case of the letter
    pub case: CaseClass,
    /// Simple uppercase mapping, if it differs from the letter
    pub upper: Option<u32>,
    /// Simple lowercase mapping, if it differs from the letter
    pub lower: Option<u32>,
    /// Simple titlecase mapping, if it differs from the letter
    pub title: Option<u32>,
}

/// Read-only source of character properties
///
/// Implementations receive only in-range code points.
pub trait PropertyTable {
    /// Letter properties, or `None` if the code point is not a letter
    fn lookup(&self, code_point: u32) -> Option<LetterProperties>;

    /// Whether the code point is a number
    fn is_numeric(&self, code_point: u32) -> bool;

    /// Whether the code point is whitespace
    fn is_whitespace(&self, code_point: u32) -> bool;

    /// Whether the code point separates lines
    fn is_newline(&self, code_point: u32) -> bool;
}

impl<T: PropertyTable + ?Sized> PropertyTable for &T {
    fn lookup(&self, code_point: u32) -> Option<LetterProperties> {
        (**self).lookup(code_point)
    }

    fn is_numeric(&self, code_point: u32) -> bool {
        (**self).is_numeric(code_point)
    }

    fn is_whitespace(&self, code_point: u32) -> bool {
        (**self).is_whitespace(code_point)
    }

    fn is_newline(&self, code_point: u32) -> bool {
        (**self).is_newline(code_point)
    }
}

/// Built-in property table generated from the Unicode Character Database
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeTable;

impl UnicodeTable {
    /// Unicode version the table was generated from
    pub fn unicode_version(&self) -> &'static str {
        unicode_data::UNICODE_VERSION
    }
}

fn range_order(start: u32, end: u32, code_point: u32) -> Ordering {
    if end < code_point {
        Ordering::Less
    } else if start > code_point {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn in_ranges(ranges: &[(u32, u32)], code_point: u32) -> bool {
    ranges
        .binary_search_by(|&(start, end)| range_order(start, end, code_point))
        .is_ok()
}

fn mapped(pairs: &[(u32, u32)], code_point: u32) -> Option<u32> {
    pairs
        .binary_search_by_key(&code_point, |&(from, _)| from)
        .ok()
        .map(|index| pairs[index].1)
}

impl PropertyTable for UnicodeTable {
    fn lookup(&self, code_point: u32) -> Option<LetterProperties> {
        let letters = unicode_data::LETTERS;
        let index = letters
            .binary_search_by(|&(start, end, _)| range_order(start, end, code_point))
            .ok()?;

        Some(LetterProperties {
            case: letters[index].2,
            upper: mapped(unicode_data::UPPER_MAP, code_point),
            lower: mapped(unicode_data::LOWER_MAP, code_point),
            title: mapped(unicode_data::TITLE_MAP, code_point),
        })
    }

    fn is_numeric(&self, code_point: u32) -> bool {
        in_ranges(unicode_data::NUMERIC, code_point)
    }

    fn is_whitespace(&self, code_point: u32) -> bool {
        in_ranges(unicode_data::WHITESPACE, code_point)
    }

    fn is_newline(&self, code_point: u32) -> bool {
        in_ranges(unicode_data::NEWLINES, code_point)
    }
}

/// Character property queries over a [`PropertyTable`]
///
/// Every query rejects code points above U+10FFFF before touching the table.
#[derive(Debug, Clone, Default)]
pub struct Classifier<T = UnicodeTable> {
    table: T,
}

impl<T: PropertyTable> Classifier<T> {
    /// Create a classifier over a property table
    pub const fn new(table: T) -> Self {
        Self { table }
    }

    /// The underlying property table
    pub fn table(&self) -> &T {
        &self.table
    }

    fn letter(&self, code_point: u32) -> Result<Option<LetterProperties>> {
        check(code_point)?;
        Ok(self.table.lookup(code_point))
    }

    fn case_is(&self, code_point: u32, case: CaseClass) -> Result<bool> {
        Ok(self
            .letter(code_point)?
            .is_some_and(|letter| letter.case == case))
    }

    /// Determine whether a code point is a letter
    pub fn is_alpha(&self, code_point: u32) -> Result<bool> {
        Ok(self.letter(code_point)?.is_some())
    }

    /// Determine whether a code point is uppercase
    pub fn is_upper(&self, code_point: u32) -> Result<bool> {
        self.case_is(code_point, CaseClass::Upper)
    }

    /// Determine whether a code point is lowercase
    pub fn is_lower(&self, code_point: u32) -> Result<bool> {
        self.case_is(code_point, CaseClass::Lower)
    }

    /// Determine whether a code point is titlecase
    pub fn is_title(&self, code_point: u32) -> Result<bool> {
        self.case_is(code_point, CaseClass::Title)
    }

    /// Determine whether a code point is a number
    pub fn is_numeric(&self, code_point: u32) -> Result<bool> {
        check(code_point)?;
        Ok(self.table.is_numeric(code_point))
    }

    /// Determine whether a code point is whitespace
    pub fn is_whitespace(&self, code_point: u32) -> Result<bool> {
        check(code_point)?;
        Ok(self.table.is_whitespace(code_point))
    }

    /// Determine whether a code point is a line separator
    pub fn is_newline(&self, code_point: u32) -> Result<bool> {
        check(code_point)?;
        Ok(self.table.is_newline(code_point))
    }

    /// Convert a code point to uppercase (the input if no uppercase form exists)
    pub fn to_upper(&self, code_point: u32) -> Result<u32> {
        Ok(self
            .letter(code_point)?
            .and_then(|letter| letter.upper)
            .unwrap_or(code_point))
    }

    /// Convert a code point to lowercase (the input if no lowercase form exists)
    pub fn to_lower(&self, code_point: u32) -> Result<u32> {
        Ok(self
            .letter(code_point)?
            .and_then(|letter| letter.lower)
            .unwrap_or(code_point))
    }

    /// Convert a code point to titlecase (the input if no titlecase form exists)
    pub fn to_title(&self, code_point: u32) -> Result<u32> {
        Ok(self
            .letter(code_point)?
            .and_then(|letter| letter.title)
            .unwrap_or(code_point))
    }
}

fn check(code_point: u32) -> Result<()> {
    if code_point > MAX_CODE_POINT {
        return Err(Error::InvalidCodePoint { code_point });
    }
    Ok(())
}

static UNICODE: Classifier<UnicodeTable> = Classifier::new(UnicodeTable);

/// Determine whether a code point is a letter
pub fn is_alpha(code_point: u32) -> Result<bool> {
    UNICODE.is_alpha(code_point)
}

/// Determine whether a code point is uppercase
pub fn is_upper(code_point: u32) -> Result<bool> {
    UNICODE.is_upper(code_point)
}

/// Determine whether a code point is lowercase
pub fn is_lower(code_point: u32) -> Result<bool> {
    UNICODE.is_lower(code_point)
}

/// Determine whether a code point is titlecase
pub fn is_title(code_point: u32) -> Result<bool> {
    UNICODE.is_title(code_point)
}

/// Determine whether a code point is a number
pub fn is_numeric(code_point: u32) -> Result<bool> {
    UNICODE.is_numeric(code_point)
}

/// Determine whether a code point is whitespace
pub fn is_whitespace(code_point: u32) -> Result<bool> {
    UNICODE.is_whitespace(code_point)
}

/// Determine whether a code point is a line separator
pub fn is_newline(code_point: u32) -> Result<bool> {
    UNICODE.is_newline(code_point)
}

/// Convert a code point to uppercase
pub fn to_upper(code_point: u32) -> Result<u32> {
    UNICODE.to_upper(code_point)
}

/// Convert a code point to lowercase
pub fn to_lower(code_point: u32) -> Result<u32> {
    UNICODE.to_lower(code_point)
}

/// Convert a code point to titlecase
pub fn to_title(code_point: u32) -> Result<u32> {
    UNICODE.to_title(code_point)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ErrorKind;

    fn is_sorted_disjoint(ranges: impl Iterator<Item = (u32, u32)>) -> bool {
        let mut last = None;
        for (start, end) in ranges {
            if start > end || last.is_some_and(|prev| prev >= start) {
                return false;
            }
            last = Some(end);
        }
        true
    }

    #[test]
    fn test_tables_are_searchable() {
        assert!(is_sorted_disjoint(
            unicode_data::LETTERS.iter().map(|&(s, e, _)| (s, e))
        ));
        for table in [
            unicode_data::NUMERIC,
            unicode_data::WHITESPACE,
            unicode_data::NEWLINES,
        ] {
            assert!(is_sorted_disjoint(table.iter().copied()));
        }
        for table in [
            unicode_data::UPPER_MAP,
            unicode_data::LOWER_MAP,
            unicode_data::TITLE_MAP,
        ] {
            assert!(is_sorted_disjoint(table.iter().map(|&(from, _)| (from, from))));
        }
    }

    #[test]
    fn test_letters() {
        assert_eq!(is_alpha('A' as u32), Ok(true));
        assert_eq!(is_alpha('é' as u32), Ok(true));
        assert_eq!(is_alpha('中' as u32), Ok(true));
        assert_eq!(is_alpha('ʰ' as u32), Ok(true));
        assert_eq!(is_alpha('1' as u32), Ok(false));
        assert_eq!(is_alpha(' ' as u32), Ok(false));
        assert_eq!(is_alpha(0xD800), Ok(false));
    }

    #[test]
    fn test_case_classes() {
        assert_eq!(is_upper('Q' as u32), Ok(true));
        assert_eq!(is_upper('q' as u32), Ok(false));
        assert_eq!(is_lower('ß' as u32), Ok(true));
        assert_eq!(is_title(0x01C5), Ok(true));
        assert_eq!(is_upper(0x01C5), Ok(false));
        assert_eq!(is_lower('中' as u32), Ok(false));
        assert_eq!(
            UnicodeTable.lookup('中' as u32).map(|letter| letter.case),
            Some(CaseClass::Uncased)
        );
    }

    #[test]
    fn test_numbers_and_spaces() {
        assert_eq!(is_numeric('7' as u32), Ok(true));
        assert_eq!(is_numeric('½' as u32), Ok(true));
        assert_eq!(is_numeric(0x2160), Ok(true));
        assert_eq!(is_numeric('x' as u32), Ok(false));

        assert_eq!(is_whitespace(' ' as u32), Ok(true));
        assert_eq!(is_whitespace('\t' as u32), Ok(true));
        assert_eq!(is_whitespace(0x3000), Ok(true));
        assert_eq!(is_whitespace('_' as u32), Ok(false));

        assert_eq!(is_newline('\n' as u32), Ok(true));
        assert_eq!(is_newline(0x2029), Ok(true));
        assert_eq!(is_newline(0x85), Ok(true));
        assert_eq!(is_newline(' ' as u32), Ok(false));
    }

    #[test]
    fn test_case_mapping() {
        assert_eq!(to_upper('a' as u32), Ok('A' as u32));
        assert_eq!(to_lower('Ä' as u32), Ok('ä' as u32));
        assert_eq!(to_title('a' as u32), Ok('A' as u32));
        assert_eq!(to_upper(0x01C6), Ok(0x01C4));
        assert_eq!(to_title(0x01C6), Ok(0x01C5));
        assert_eq!(to_lower(0x01C5), Ok(0x01C6));
    }

    #[test]
    fn test_simple_mapping_where_full_mapping_expands() {
        // İ lowercases to "i\u{307}" in full; the simple form is plain i
        assert_eq!(to_lower(0x0130), Ok(0x0069));
        // ᾳ uppercases to "ΑΙ" in full; the simple form is ᾼ
        assert_eq!(to_upper(0x1FB3), Ok(0x1FBC));
        assert_eq!(to_title(0x1FB3), Ok(0x1FBC));
        assert_eq!(to_upper(0x1F80), Ok(0x1F88));
        assert_eq!(to_upper(0x1FC3), Ok(0x1FCC));
        assert_eq!(to_upper(0x1FF3), Ok(0x1FFC));
        // ᾼ has no simple uppercase of its own
        assert_eq!(to_upper(0x1FBC), Ok(0x1FBC));
    }

    #[test]
    fn test_mapping_identity() {
        assert_eq!(to_upper('1' as u32), Ok('1' as u32));
        assert_eq!(to_upper('A' as u32), Ok('A' as u32));
        // Full mapping is "SS"; there is no single code point form
        assert_eq!(to_upper('ß' as u32), Ok('ß' as u32));
        // Circled letters are symbols, so their case forms are not applied
        assert_eq!(to_upper(0x24D0), Ok(0x24D0));
        assert_eq!(to_lower(0x10FFFF), Ok(0x10FFFF));
    }

    #[test]
    fn test_invalid_code_point() {
        let invalid = MAX_CODE_POINT + 1;
        let checks = [
            is_alpha(invalid),
            is_upper(invalid),
            is_lower(invalid),
            is_title(invalid),
            is_numeric(invalid),
            is_whitespace(invalid),
            is_newline(invalid),
        ];
        for result in checks {
            let err = result.unwrap_err();
            assert_eq!(err, Error::InvalidCodePoint { code_point: invalid });
            assert_eq!(err.kind(), ErrorKind::InvalidCodePoint);
        }
        for result in [to_upper(invalid), to_lower(invalid), to_title(invalid)] {
            assert!(result.is_err());
        }
    }

    #[derive(Default)]
    struct TinyTable {
        letters: HashMap<u32, LetterProperties>,
    }

    impl PropertyTable for TinyTable {
        fn lookup(&self, code_point: u32) -> Option<LetterProperties> {
            self.letters.get(&code_point).copied()
        }

        fn is_numeric(&self, code_point: u32) -> bool {
            code_point == '#' as u32
        }

        fn is_whitespace(&self, _code_point: u32) -> bool {
            false
        }

        fn is_newline(&self, _code_point: u32) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_table() {
        let mut table = TinyTable::default();
        table.letters.insert(
            'x' as u32,
            LetterProperties {
                case: CaseClass::Lower,
                upper: Some('Y' as u32),
                lower: None,
                title: None,
            },
        );

        let classifier = Classifier::new(&table);
        assert_eq!(classifier.is_lower('x' as u32), Ok(true));
        assert_eq!(classifier.to_upper('x' as u32), Ok('Y' as u32));
        assert_eq!(classifier.to_lower('x' as u32), Ok('x' as u32));
        assert_eq!(classifier.is_alpha('a' as u32), Ok(false));
        assert_eq!(classifier.is_numeric('#' as u32), Ok(true));
        assert!(classifier.is_whitespace(0x110000).is_err());
    }
}
