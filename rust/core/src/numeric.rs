// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric field parsing
//!
//! IDF fields are plain text; numbers are recognised with nom and converted
//! with fast-float.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Recognise a decimal literal: 12, -3.5, .25, 1.5E-3, +7.
fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Parse a whole field as a finite number
///
/// Keywords such as `autocalculate` or an empty field yield `None`.
#[inline]
pub fn parse_number(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    fast_float::parse::<f64, _>(trimmed)
        .ok()
        .filter(|v| v.is_finite())
}

/// Find the first numeric literal anywhere in `text`
///
/// `"Until: 24:00,21.1"` yields 24.0; callers that need to skip time
/// tokens filter fields before calling this.
pub fn first_number(text: &str) -> Option<f64> {
    for (i, c) in text.char_indices() {
        if !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+') {
            continue;
        }
        if let Ok((_, literal)) = number_literal(&text[i..]) {
            if let Some(value) = parse_number(literal) {
                return Some(value);
            }
        }
    }
    None
}

/// True if the field is one of the "compute it for me" keywords
#[inline]
pub fn is_auto_keyword(field: &str) -> bool {
    let f = field.trim();
    f.is_empty() || f.eq_ignore_ascii_case("autocalculate") || f.eq_ignore_ascii_case("autosize")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("3.14,"), Ok((",", "3.14")));
        assert_eq!(number_literal("-.5"), Ok(("", "-.5")));
        assert_eq!(number_literal("1.5E-10"), Ok(("", "1.5E-10")));
        assert_eq!(number_literal("7."), Ok(("", "7.")));
        assert!(number_literal("abc").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 21.5 "), Some(21.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("autocalculate"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("12 W"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("21.1"), Some(21.1));
        assert_eq!(first_number("value is -4.5 C"), Some(-4.5));
        assert_eq!(first_number("Zone2"), Some(2.0));
        assert_eq!(first_number("no digits - here."), None);
    }

    #[test]
    fn test_auto_keyword() {
        assert!(is_auto_keyword("AutoCalculate"));
        assert!(is_auto_keyword("  "));
        assert!(!is_auto_keyword("12.0"));
    }
}
