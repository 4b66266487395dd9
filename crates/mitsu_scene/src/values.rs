//! Attribute text parsing: numeric token lists, booleans and `$variable`
//! substitution.
//!
//! Numeric lists follow the scene dialect's loose token rules: tokens are
//! lexed as the longest numeric prefix after skipping ASCII whitespace, and
//! at most one punctuation byte is consumed between tokens (runs of
//! punctuation are not collapsed). Parsing stops at the first token that
//! fails to convert and reports how many tokens were read up to that point.

use std::collections::HashMap;

use mitsu_math::Vec3;

use crate::error::{LoadError, LoadResult};

/// Variable name to replacement text, seeded by the loader's external
/// arguments and extended by in-document `<default>` declarations.
pub type Arguments = HashMap<String, String>;

/// Lex the longest float prefix of `s` after leading ASCII whitespace.
/// Returns the value and the number of bytes consumed (whitespace included).
fn lex_number(s: &str) -> Option<(f32, usize)> {
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }

    let start = i;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }

    let mut digits = 0;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mark = i;
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let mut exp_digits = 0;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
            exp_digits += 1;
        }
        if exp_digits == 0 {
            // Not an exponent after all, e.g. "1e" or "2e+"
            i = mark;
        }
    }

    let value = s[start..i].parse::<f32>().ok()?;
    Some((value, i))
}

/// Lex the longest base-10 integer prefix of `s` after leading whitespace.
fn lex_integer(s: &str) -> Option<(i64, usize)> {
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }

    let start = i;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let mut digits = 0;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if digits == 0 {
        return None;
    }

    let value = s[start..i].parse::<i64>().ok()?;
    Some((value, i))
}

fn parse_scalars<T: Copy>(
    s: &str,
    out: &mut [T],
    lex: impl Fn(&str) -> Option<(T, usize)>,
) -> usize {
    let bytes = s.as_bytes();
    let mut offset = 0;
    let mut count = 0;

    while count < out.len() && offset < s.len() {
        match lex(&s[offset..]) {
            Some((value, used)) => {
                out[count] = value;
                count += 1;
                offset += used;
                if offset >= s.len() {
                    break;
                }
                // Exactly one separator byte between tokens
                if bytes[offset].is_ascii_punctuation() {
                    offset += 1;
                }
            }
            None => break,
        }
    }

    count
}

/// Parse up to `out.len()` floats from `s`; returns the number parsed.
pub(crate) fn parse_numbers(s: &str, out: &mut [f32]) -> usize {
    parse_scalars(s, out, lex_number)
}

/// Parse up to `out.len()` integers from `s`; returns the number parsed.
pub(crate) fn parse_integers(s: &str, out: &mut [i64]) -> usize {
    parse_scalars(s, out, lex_integer)
}

/// Parse a 3-component vector. At least one component must parse; missing
/// trailing components take `fill` (0 in most contexts, 1 for the
/// uniform-scale convenience form).
pub(crate) fn parse_vector(s: &str, fill: f32) -> Option<Vec3> {
    let mut tmp = [0.0f32; 3];
    let count = parse_numbers(s, &mut tmp);
    if count == 0 {
        return None;
    }
    Some(Vec3::new(
        tmp[0],
        if count >= 2 { tmp[1] } else { fill },
        if count >= 3 { tmp[2] } else { fill },
    ))
}

/// Booleans must spell exactly "true" or "false"; anything else is no value.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Replace `$identifier` tokens (identifier = maximal alphanumeric run) with
/// entries from the argument container. An unknown identifier is fatal; a
/// bare `$` with no identifier is dropped.
pub(crate) fn substitute(text: &str, args: &Arguments) -> LoadResult<String> {
    if !text.contains('$') {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&n) = chars.peek() {
            if n.is_ascii_alphanumeric() {
                name.push(n);
                chars.next();
            } else {
                break;
            }
        }

        if !name.is_empty() {
            match args.get(&name) {
                Some(value) => out.push_str(value),
                None => return Err(LoadError::UnknownVariable(name)),
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_mixed_punctuation() {
        let mut out = [0.0f32; 3];
        assert_eq!(parse_numbers("5.6e1, 42.0; 7", &mut out), 3);
        assert_eq!(out, [56.0, 42.0, 7.0]);
    }

    #[test]
    fn test_parse_numbers_stops_at_bad_token() {
        let mut out = [0.0f32; 3];
        assert_eq!(parse_numbers("1.5, x, 3", &mut out), 1);
        assert_eq!(out[0], 1.5);

        assert_eq!(parse_numbers("", &mut out), 0);
        assert_eq!(parse_numbers("abc", &mut out), 0);
    }

    #[test]
    fn test_parse_numbers_separator_not_collapsed() {
        // Two adjacent separators mean the second token starts at ';',
        // which is not a number.
        let mut out = [0.0f32; 3];
        assert_eq!(parse_numbers("1,;2", &mut out), 1);
    }

    #[test]
    fn test_parse_integers_stops_at_decimal_point() {
        let mut out = [0i64; 2];
        assert_eq!(parse_integers("5.6", &mut out), 2);
        assert_eq!(out, [5, 6]);
    }

    #[test]
    fn test_parse_vector_fill() {
        assert_eq!(parse_vector("5", 0.0), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(parse_vector("5", 1.0), Some(Vec3::new(5.0, 1.0, 1.0)));
        assert_eq!(parse_vector("1 2", 0.0), Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(parse_vector("", 0.0), None);
    }

    #[test]
    fn test_parse_bool_exact() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("True"), None);
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn test_substitute() {
        let mut args = Arguments::new();
        args.insert("radius".to_string(), "2.5".to_string());

        assert_eq!(substitute("$radius", &args).unwrap(), "2.5");
        assert_eq!(substitute("r=$radius!", &args).unwrap(), "r=2.5!");
        assert_eq!(substitute("plain text", &args).unwrap(), "plain text");
        // A '$' with no identifier is dropped
        assert_eq!(substitute("a$-b", &args).unwrap(), "a-b");
    }

    #[test]
    fn test_substitute_unknown_is_fatal() {
        let args = Arguments::new();
        assert!(matches!(
            substitute("$missing", &args),
            Err(LoadError::UnknownVariable(name)) if name == "missing"
        ));
    }
}
