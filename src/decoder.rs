//! Base64 and unicode-escape decoding

use crate::text::{check_well_formed, display_lossy, ESCAPE_HEX_DIGITS, ESCAPE_PREFIX_LEN};
use anyhow::{Context, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::warn;

/// Standard alphabet, padding optional, non-zero trailing bits ignored
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a Base64 string holding UTF-8 bytes back into text.
///
/// The input is first checked for lone surrogates; an ill-formed input
/// yields `Ok(None)` and a warning. Structurally invalid Base64 (bad
/// alphabet, impossible length, misplaced padding) is an error, with
/// [`base64::DecodeError`] as its source. Decoded bytes that are not valid
/// UTF-8 are replaced with U+FFFD.
pub fn decode(base64: &[u16]) -> Result<Option<String>> {
    if let Err(err) = check_well_formed(base64) {
        warn!(
            error = %err,
            "Cannot process a string with lone surrogates: [{}]",
            display_lossy(base64)
        );
        return Ok(None);
    }

    // Well-formed input converts without replacement
    let input = String::from_utf16_lossy(base64);
    decode_str(&input).map(Some)
}

/// Decode a Base64 string holding UTF-8 bytes back into text.
///
/// ASCII whitespace (line breaks from wrapped output) is ignored.
pub fn decode_str(base64: &str) -> Result<String> {
    let bytes = base64_to_bytes(base64)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode standard-alphabet Base64 into raw bytes.
///
/// Trailing `=` padding may be omitted.
pub fn base64_to_bytes(base64: &str) -> Result<Vec<u8>> {
    let filtered = filter_base64_data(base64);
    LENIENT
        .decode(filtered.as_bytes())
        .with_context(|| format!("Failed to decode base64 ({} bytes)", base64.len()))
}

/// Filter base64 data by removing ASCII whitespace
fn filter_base64_data(data: &str) -> String {
    data.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Replace every `\uXXXX` sequence with the UTF-16 code unit it names.
///
/// Exactly four hex digits (either case) are consumed; anything else after
/// `\u` is kept literally. Adjacent escapes forming a surrogate pair are
/// decoded unit by unit, which yields the same pair in the output.
pub fn from_unicode_escape(escaped: &str) -> Vec<u16> {
    let bytes = escaped.as_bytes();
    let mut output = Vec::with_capacity(escaped.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'u') {
            let digits_start = i + ESCAPE_PREFIX_LEN;
            let digits = bytes.get(digits_start..digits_start + ESCAPE_HEX_DIGITS);
            if let Some(unit) = digits.and_then(parse_hex_unit) {
                output.extend(escaped[literal_start..i].encode_utf16());
                output.push(unit);
                i = digits_start + ESCAPE_HEX_DIGITS;
                literal_start = i;
                continue;
            }
        }
        i += 1;
    }

    output.extend(escaped[literal_start..].encode_utf16());
    output
}

/// Like [`from_unicode_escape`], replacing lone surrogates with U+FFFD
pub fn from_unicode_escape_to_string(escaped: &str) -> String {
    String::from_utf16_lossy(&from_unicode_escape(escaped))
}

fn parse_hex_unit(digits: &[u8]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, &digit| {
        let value = char::from(digit).to_digit(16)?;
        Some((acc << 4) | value as u16)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, to_unicode_escape};
    use crate::test_util::capture_logs;
    use crate::text::to_utf16;
    use proptest::prelude::*;

    #[test]
    fn test_decode_hello() {
        let decoded = decode(&to_utf16("SGVsbG8=")).unwrap();
        assert_eq!(decoded.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(decode_str("4pyT").unwrap(), "✓");
        assert_eq!(decode_str("8J+YgA==").unwrap(), "😀");
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(decode_str("SGVs\nbG8=\r\n").unwrap(), "Hello");
    }

    #[test]
    fn test_decode_rejects_lone_surrogate_input() {
        let mut input = to_utf16("SGVsbG8=");
        input.push(0xD800);
        assert_eq!(decode(&input).unwrap(), None);
    }

    #[test]
    fn test_decode_lone_surrogate_logs_warning() {
        let (logs, _guard) = capture_logs();

        let mut input = to_utf16("SGVs");
        input.push(0xDC00);
        assert_eq!(decode(&input).unwrap(), None);

        let output = logs.output();
        assert_eq!(output.lines().count(), 1, "unexpected log output: {}", output);
        assert!(output.contains("WARN"));
        assert!(output.contains("Cannot process a string with lone surrogates: [SGVs\u{FFFD}]"));
        assert!(output.contains("error=Unpaired low surrogate 0xDC00 at index 4"));
    }

    #[test]
    fn test_decode_invalid_alphabet_is_error() {
        let err = decode(&to_utf16("SGVs*G8=")).unwrap_err();
        assert!(err.downcast_ref::<base64::DecodeError>().is_some());
        assert_eq!(err.to_string(), "Failed to decode base64 (8 bytes)");
    }

    #[test]
    fn test_decode_error_does_not_echo_input() {
        let input = format!("{}*", "QUFB".repeat(1000));
        let err = decode_str(&input).unwrap_err();
        assert_eq!(err.to_string(), "Failed to decode base64 (4001 bytes)");
    }

    #[test]
    fn test_decode_invalid_length_is_error() {
        assert!(decode_str("S").is_err());
        assert!(decode_str("SGVsb").is_err());
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        assert_eq!(decode_str("SGVsbG8").unwrap(), "Hello");
        assert_eq!(decode_str("Zg").unwrap(), "f");
    }

    #[test]
    fn test_decode_ignores_trailing_bits() {
        // '9' leaves non-zero bits after the last byte
        assert_eq!(decode_str("SGVsbG9=").unwrap(), "Hello");
    }

    #[test]
    fn test_decode_invalid_utf8_is_replaced() {
        // 0xFF 0xFE is never valid UTF-8
        assert_eq!(decode_str("//4=").unwrap(), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_base64_to_bytes() {
        assert_eq!(base64_to_bytes("/9j/4A==").unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_from_unicode_escape_hello() {
        let text = from_unicode_escape_to_string("\\u0048\\u0065\\u006c\\u006c\\u006f");
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_from_unicode_escape_mixed_literal() {
        assert_eq!(
            from_unicode_escape_to_string("caff\\u00e8 al \\u0062ar"),
            "caffè al bar"
        );
    }

    #[test]
    fn test_from_unicode_escape_uppercase_hex() {
        assert_eq!(from_unicode_escape_to_string("\\u00C9"), "É");
    }

    #[test]
    fn test_from_unicode_escape_passthrough() {
        let plain = "no escapes here, just \\n and \\x41";
        assert_eq!(from_unicode_escape(plain), to_utf16(plain));
    }

    #[test]
    fn test_from_unicode_escape_short_or_invalid_digits() {
        assert_eq!(from_unicode_escape_to_string("\\u12"), "\\u12");
        assert_eq!(from_unicode_escape_to_string("\\u12G4"), "\\u12G4");
        assert_eq!(from_unicode_escape_to_string("end\\u"), "end\\u");
    }

    #[test]
    fn test_from_unicode_escape_takes_four_digits_only() {
        // A five digit escape decodes its first four digits
        assert_eq!(from_unicode_escape("\\u1f600"), vec![0x1F60, u16::from(b'0')]);
    }

    #[test]
    fn test_from_unicode_escape_escaped_backslash() {
        assert_eq!(from_unicode_escape_to_string("\\\\u0041"), "\\A");
    }

    #[test]
    fn test_from_unicode_escape_surrogates_stay_raw() {
        assert_eq!(from_unicode_escape("\\ud83d\\ude00"), vec![0xD83D, 0xDE00]);
        assert_eq!(from_unicode_escape("\\ud800"), vec![0xD800]);
        assert_eq!(from_unicode_escape_to_string("\\ud800"), "\u{FFFD}");
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(text in any::<String>()) {
            let encoded = encode(&to_utf16(&text)).unwrap();
            let decoded = decode(&to_utf16(&encoded)).unwrap();
            prop_assert_eq!(decoded, Some(text));
        }

        #[test]
        fn prop_unicode_escape_round_trip(units in prop::collection::vec(any::<u16>(), 0..64)) {
            prop_assert_eq!(from_unicode_escape(&to_unicode_escape(&units)), units);
        }

        #[test]
        fn prop_unescape_is_identity_without_escapes(text in "[^\\\\]*") {
            prop_assert_eq!(from_unicode_escape(&text), to_utf16(&text));
        }
    }
}
