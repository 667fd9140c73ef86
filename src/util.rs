//! Small shared utilities.
//!
//! Numeric parsing helpers used by the field cache (leading-literal parses)
//! and the typed range filter (whole-term parses).

/// Parse the leading integer literal of a term, ignoring any trailing text.
///
/// `"42nd"` parses as `42`, `"-7"` as `-7`. Returns `None` if the term does
/// not start with a digit (after an optional sign) or the literal overflows.
pub fn parse_leading_int(term: &str) -> Option<i64> {
    let bytes = term.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    term[..end].parse().ok()
}

/// Parse the leading float literal of a term, ignoring any trailing text.
///
/// Accepts an optional sign, digits, an optional fractional part, and an
/// optional exponent. `"3.5kg"` parses as `3.5`.
pub fn parse_leading_float(term: &str) -> Option<f32> {
    let bytes = term.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start {
        return None;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    term[..end].parse().ok()
}

/// Parse a term as a number, requiring the entire term to be consumed.
///
/// Used by the typed range filter: a term with trailing garbage is treated
/// as outside any numeric range, not as its numeric prefix.
pub fn parse_whole_number(term: &str) -> Option<f64> {
    term.parse().ok()
}
