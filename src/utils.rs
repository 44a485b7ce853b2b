/// Utility functions for numeric field parsing and radio address handling
use crate::radio::ADDRESS_WIDTH;

fn skip_c_whitespace(s: &str) -> &str {
    // Same set as C isspace(), which includes vertical tab and form feed
    s.trim_start_matches(&[' ', '\t', '\n', '\r', '\x0b', '\x0c'][..])
}

/// Length of the optional sign plus the run of ASCII digits that follows it
fn signed_digits_len(bytes: &[u8]) -> (usize, usize) {
    let sign = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    (sign, digits)
}

/// Parse an integer the way `atol` does
///
/// Leading whitespace is skipped, an optional sign is accepted and parsing
/// stops at the first non-digit. Text without a numeric prefix yields 0.
/// Values outside the `i32` range saturate.
pub fn parse_int_lenient(input: &str) -> i32 {
    let s = skip_c_whitespace(input);
    let bytes = s.as_bytes();
    let (sign, digits) = signed_digits_len(bytes);
    if digits == 0 {
        return 0;
    }

    let negative = sign == 1 && bytes[0] == b'-';
    let mut value: i64 = 0;
    for b in &bytes[sign..sign + digits] {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }
    if negative {
        value = -value;
    }

    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parse a decimal float the way `atof` does
///
/// Accepts `[sign] digits [. digits] [e [sign] digits]` after leading
/// whitespace and ignores whatever follows. Text without a numeric prefix
/// yields 0.0. Always uses `.` as the decimal separator.
pub fn parse_float_lenient(input: &str) -> f32 {
    let s = skip_c_whitespace(input);
    let bytes = s.as_bytes();

    let (sign, int_digits) = signed_digits_len(bytes);
    let mut end = sign + int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        end += 1 + frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let (exp_sign, exp_digits) = signed_digits_len(&bytes[end + 1..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    let mut number = &s[..end];
    if number.ends_with('.') {
        number = &number[..number.len() - 1];
    }

    number.parse::<f32>().unwrap_or(0.0)
}

/// Parse a receive pipe address written as `01:23:45:67:89`
///
/// Bytes are hexadecimal and may be separated by `:`, `-` or nothing at all.
pub fn parse_address(input: &str) -> Result<[u8; ADDRESS_WIDTH], String> {
    let hex: String = input
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();

    if hex.len() != ADDRESS_WIDTH * 2 || !hex.is_ascii() {
        return Err(format!(
            "radio address '{}' must be {} hex bytes",
            input, ADDRESS_WIDTH
        ));
    }

    let mut address = [0u8; ADDRESS_WIDTH];
    for (i, byte) in address.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|e| format!("radio address '{}': {}", input, e))?;
    }

    Ok(address)
}

/// Format a receive pipe address for logging
pub fn format_address(address: &[u8; ADDRESS_WIDTH]) -> String {
    address
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient("512"), 512);
        assert_eq!(parse_int_lenient("  -17"), -17);
        assert_eq!(parse_int_lenient("+8"), 8);
        assert_eq!(parse_int_lenient("35\r\n"), 35);
        assert_eq!(parse_int_lenient("12abc"), 12);
        assert_eq!(parse_int_lenient("23.7"), 23);
        assert_eq!(parse_int_lenient(""), 0);
        assert_eq!(parse_int_lenient("abc"), 0);
        assert_eq!(parse_int_lenient("-"), 0);
        assert_eq!(parse_int_lenient("99999999999"), i32::MAX);
        assert_eq!(parse_int_lenient("-99999999999"), i32::MIN);
    }

    #[test]
    fn test_parse_float_lenient() {
        assert_eq!(parse_float_lenient("23.70"), 23.7);
        assert_eq!(parse_float_lenient(" -4.5"), -4.5);
        assert_eq!(parse_float_lenient("65.40xyz"), 65.4);
        assert_eq!(parse_float_lenient("7."), 7.0);
        assert_eq!(parse_float_lenient(".5"), 0.5);
        assert_eq!(parse_float_lenient("1e2"), 100.0);
        assert_eq!(parse_float_lenient("3e"), 3.0);
        assert_eq!(parse_float_lenient("2,5"), 2.0);
        assert_eq!(parse_float_lenient(""), 0.0);
        assert_eq!(parse_float_lenient("."), 0.0);
        assert_eq!(parse_float_lenient("nan"), 0.0);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("01:23:45:67:89"),
            Ok([0x01, 0x23, 0x45, 0x67, 0x89])
        );
        assert_eq!(
            parse_address("abcdef0102"),
            Ok([0xAB, 0xCD, 0xEF, 0x01, 0x02])
        );
        assert!(parse_address("01:23:45:67").is_err());
        assert!(parse_address("zz:23:45:67:89").is_err());
    }

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address(&[0x01, 0x23, 0x45, 0x67, 0x89]),
            "01:23:45:67:89"
        );
    }
}
