// Copyright 2024 The JsonCompare Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalar equivalence rules for semantic comparison.
//!
//! The three string coercions accept disjoint sets of strings: offset
//! date-times must carry an offset, local date-times must not, and nothing
//! that starts like a date parses as a UUID. Comparing "in the first format
//! both sides parse" is therefore the same as comparing canonical forms,
//! which is how both comparison and hashing are defined.

use crate::json_diff::options::ValueComparison;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Number;
use uuid::Uuid;

const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const LOCAL_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// An exact decimal: `digits × 10^exponent`.
///
/// `digits` has no leading or trailing zeros; zero is the empty string with
/// exponent 0 and no sign, so `0`, `-0.0` and `0e7` are all the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    /// Parse a JSON number literal. `None` if the text is not a number or its
    /// exponent does not fit.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (mantissa, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(idx) => (&rest[..idx], rest[idx + 1..].parse::<i64>().ok()?),
            None => (rest, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((_, "")) => return None,
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };

        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !is_digits(int_part) || !is_digits(frac_part) {
            return None;
        }

        let mut exponent = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;

        let all = format!("{}{}", int_part, frac_part);
        let significant = all.trim_start_matches('0');
        let digits = significant.trim_end_matches('0');

        if digits.is_empty() {
            return Some(Self::zero());
        }

        let trailing_zeros = i64::try_from(significant.len() - digits.len()).ok()?;
        exponent = exponent.checked_add(trailing_zeros)?;

        Some(Self {
            negative,
            digits: digits.to_string(),
            exponent,
        })
    }

    fn zero() -> Self {
        Self {
            negative: false,
            digits: String::new(),
            exponent: 0,
        }
    }
}

/// The value a number is compared by under semantic comparison.
///
/// Semantic equality is equality of canonical forms, so equal numbers always
/// hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CanonicalNumber {
    Decimal(Decimal),
    Float(u64),
    Raw(String),
}

pub(crate) fn canonical_number(number: &Number) -> CanonicalNumber {
    let text = number.to_string();
    if let Some(decimal) = Decimal::parse(&text) {
        return CanonicalNumber::Decimal(decimal);
    }

    // only literals whose exponent overflows get here
    match number.as_f64() {
        Some(float) if float == 0.0 => CanonicalNumber::Decimal(Decimal::zero()),
        Some(float) => CanonicalNumber::Float(float.to_bits()),
        None => CanonicalNumber::Raw(text),
    }
}

pub(crate) fn numbers_equal(left: &Number, right: &Number, mode: ValueComparison) -> bool {
    match mode {
        ValueComparison::Exact => left.to_string() == right.to_string(),
        ValueComparison::Semantic => canonical_number(left) == canonical_number(right),
    }
}

/// The value a string is compared by under semantic comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CanonicalString<'a> {
    Instant(DateTime<Utc>),
    Local(NaiveDateTime),
    Uuid(Uuid),
    Raw(&'a str),
}

pub(crate) fn canonical_string(s: &str) -> CanonicalString<'_> {
    if let Some(instant) = parse_offset_date_time(s) {
        return CanonicalString::Instant(instant.with_timezone(&Utc));
    }
    if let Some(local) = parse_local_date_time(s) {
        return CanonicalString::Local(local);
    }
    if let Some(uuid) = parse_uuid(s) {
        return CanonicalString::Uuid(uuid);
    }

    CanonicalString::Raw(s)
}

pub(crate) fn strings_equal(left: &str, right: &str, mode: ValueComparison) -> bool {
    if left == right {
        return true;
    }

    match mode {
        ValueComparison::Exact => false,
        ValueComparison::Semantic => canonical_string(left) == canonical_string(right),
    }
}

// `YYYY-MM-DD` prefix; keeps chrono away from strings like "1-2-3".
fn looks_like_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[..10]
            .iter()
            .enumerate()
            .all(|(idx, b)| idx == 4 || idx == 7 || b.is_ascii_digit())
}

fn parse_offset_date_time(s: &str) -> Option<DateTime<FixedOffset>> {
    if !looks_like_date(s) {
        return None;
    }

    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        OFFSET_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(s, format).ok())
    })
}

fn parse_local_date_time(s: &str) -> Option<NaiveDateTime> {
    if !looks_like_date(s) {
        return None;
    }

    LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_uuid(s: &str) -> Option<Uuid> {
    Uuid::parse_str(s).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    fn number(text: &str) -> Number {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_decimal_parse() {
        assert_eq!(Decimal::parse("1.50"), Decimal::parse("1.5"));
        assert_eq!(Decimal::parse("15e-1"), Decimal::parse("1.5"));
        assert_eq!(Decimal::parse("100"), Decimal::parse("1E2"));
        assert_eq!(Decimal::parse("0"), Decimal::parse("-0.000"));
        assert_eq!(Decimal::parse("0"), Decimal::parse("0e99"));
        assert_ne!(Decimal::parse("-1"), Decimal::parse("1"));
        assert_ne!(Decimal::parse("1.05"), Decimal::parse("1.5"));

        let decimal = Decimal::parse("-0012.3400e+3").unwrap();
        assert!(decimal.negative);
        assert_eq!(decimal.digits, "1234");
        assert_eq!(decimal.exponent, 1);

        assert!(Decimal::parse("1e99999999999999999999").is_none());
        assert!(Decimal::parse("abc").is_none());
        assert!(Decimal::parse("1.").is_none());
        assert!(Decimal::parse(".5").is_none());
    }

    #[test]
    fn test_decimal_is_exact() {
        // both round to the same f64
        assert_ne!(
            Decimal::parse("0.10000000000000000001"),
            Decimal::parse("0.1")
        );
        assert!(!numbers_equal(
            &number("0.10000000000000000001"),
            &number("0.1"),
            ValueComparison::Semantic
        ));
    }

    #[test]
    fn test_numbers_equal() {
        assert!(numbers_equal(&number("1.50"), &number("1.5"), ValueComparison::Semantic));
        assert!(!numbers_equal(&number("1.50"), &number("1.5"), ValueComparison::Exact));
        assert!(numbers_equal(&number("1.5"), &number("1.5"), ValueComparison::Exact));
        assert!(numbers_equal(&number("1"), &number("1.0"), ValueComparison::Semantic));
        assert!(!numbers_equal(&number("1"), &number("2"), ValueComparison::Semantic));
        assert!(numbers_equal(&number("-0"), &number("0"), ValueComparison::Semantic));
        assert!(numbers_equal(&number("12e-1"), &number("1.2"), ValueComparison::Semantic));
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number(&number("1.50")), canonical_number(&number("1.5")));
        assert_eq!(canonical_number(&number("-0.0")), canonical_number(&number("0")));
        assert_ne!(canonical_number(&number("1.5")), canonical_number(&number("-1.5")));
    }

    #[test]
    fn test_overflowing_exponents() {
        let zero = canonical_number(&number("0"));
        for text in [
            "1e-99999999999999999999",
            "-1e-99999999999999999999",
            "0e99999999999999999999",
            "0.0e-99999999999999999999",
        ] {
            assert_eq!(canonical_number(&number(text)), zero, "{text}");
            assert!(numbers_equal(&number(text), &number("0"), ValueComparison::Semantic));
            assert!(numbers_equal(&number(text), &number("-0.0"), ValueComparison::Semantic));
        }

        // underflow to zero does not make a representable decimal zero
        assert!(!numbers_equal(
            &number("1e-99999999999999999999"),
            &number("1e-400"),
            ValueComparison::Semantic
        ));
        assert!(!numbers_equal(
            &number("1e-99999999999999999999"),
            &number("0"),
            ValueComparison::Exact
        ));
    }

    #[test]
    fn test_strings_equal_dates() {
        let semantic = ValueComparison::Semantic;
        assert!(strings_equal("2024-01-01T00:00:00Z", "2024-01-01T00:00:00.000Z", semantic));
        assert!(strings_equal("2024-01-01T02:00:00+02:00", "2024-01-01T00:00:00Z", semantic));
        assert!(strings_equal("2024-01-01 00:00:00+00:00", "2024-01-01T00:00:00Z", semantic));
        assert!(strings_equal("2024-01-01T00:00:00", "2024-01-01T00:00:00.0", semantic));
        assert!(strings_equal("2024-01-01", "2024-01-01T00:00:00", semantic));
        assert!(!strings_equal("2024-01-01T00:00:00", "2024-01-01T00:00:00Z", semantic));
        assert!(!strings_equal("2024-01-01T00:00:01Z", "2024-01-01T00:00:00Z", semantic));
        assert!(!strings_equal(
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00.000Z",
            ValueComparison::Exact
        ));
    }

    #[test]
    fn test_strings_equal_uuids() {
        let semantic = ValueComparison::Semantic;
        let lower = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert!(strings_equal(lower, &lower.to_uppercase(), semantic));
        assert!(strings_equal(lower, "{67e55044-10b1-426f-9247-bb680e5fe0c8}", semantic));
        assert!(strings_equal(lower, "67e5504410b1426f9247bb680e5fe0c8", semantic));
        assert!(!strings_equal(lower, "67e55044-10b1-426f-9247-bb680e5fe0c9", semantic));
        assert!(!strings_equal(lower, &lower.to_uppercase(), ValueComparison::Exact));
    }

    #[test]
    fn test_strings_fall_back_to_raw() {
        assert!(!strings_equal("abc", "ABC", ValueComparison::Semantic));
        assert!(!strings_equal("1-2-3", "0001-02-03", ValueComparison::Semantic));
        assert!(strings_equal("abc", "abc", ValueComparison::Semantic));
    }

    #[test]
    fn test_canonical_forms_are_disjoint() {
        assert!(matches!(
            canonical_string("2024-01-01T00:00:00Z"),
            CanonicalString::Instant(_)
        ));
        assert!(matches!(
            canonical_string("2024-01-01T00:00:00"),
            CanonicalString::Local(_)
        ));
        assert!(matches!(
            canonical_string("67e55044-10b1-426f-9247-bb680e5fe0c8"),
            CanonicalString::Uuid(_)
        ));
        assert!(matches!(canonical_string("hello"), CanonicalString::Raw("hello")));
        assert_eq!(
            canonical_string("2024-01-01T00:00:00Z"),
            canonical_string("2024-01-01T01:00:00+01:00")
        );
    }
}
