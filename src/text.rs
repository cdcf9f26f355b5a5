//! UTF-16 text model shared by the encoder and decoder

use std::fmt;

// Surrogate ranges
pub const HIGH_SURROGATE_START: u16 = 0xD800;
pub const HIGH_SURROGATE_END: u16 = 0xDBFF;
pub const LOW_SURROGATE_START: u16 = 0xDC00;
pub const LOW_SURROGATE_END: u16 = 0xDFFF;

/// Prefix of a unicode escape sequence
pub const ESCAPE_PREFIX: &str = "\\u";
/// Length of [`ESCAPE_PREFIX`] in bytes
pub const ESCAPE_PREFIX_LEN: usize = 2; // len("\\u")
/// Number of hex digits in a fixed-width escape
pub const ESCAPE_HEX_DIGITS: usize = 4;

/// Options for unicode escaping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeOptions {
    /// Combine surrogate pairs into a single code point escape.
    ///
    /// Code points above `U+FFFF` are then written with 5 or 6 hex digits,
    /// which is not a valid fixed-width `\uXXXX` sequence.
    pub surrogate_aware: bool,
}

impl EscapeOptions {
    /// Options for code point escaping
    pub fn surrogate_aware() -> Self {
        Self { surrogate_aware: true }
    }
}

/// Kind of an unpaired surrogate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurrogateKind {
    /// High surrogate not followed by a low surrogate
    High,
    /// Low surrogate not preceded by a high surrogate
    Low,
}

/// A lone surrogate found in a UTF-16 sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoneSurrogate {
    /// Position of the offending code unit
    pub index: usize,
    /// The offending code unit
    pub unit: u16,
    pub kind: SurrogateKind,
}

impl fmt::Display for LoneSurrogate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SurrogateKind::High => write!(
                f,
                "Unpaired high surrogate 0x{:04X} at index {}",
                self.unit, self.index
            ),
            SurrogateKind::Low => write!(
                f,
                "Unpaired low surrogate 0x{:04X} at index {}",
                self.unit, self.index
            ),
        }
    }
}

impl std::error::Error for LoneSurrogate {}

/// Whether `unit` is in `0xD800..=0xDBFF`
pub fn is_high_surrogate(unit: u16) -> bool {
    (HIGH_SURROGATE_START..=HIGH_SURROGATE_END).contains(&unit)
}

/// Whether `unit` is in `0xDC00..=0xDFFF`
pub fn is_low_surrogate(unit: u16) -> bool {
    (LOW_SURROGATE_START..=LOW_SURROGATE_END).contains(&unit)
}

/// Check that every surrogate in `units` is part of a valid pair.
///
/// Returns the first lone surrogate on failure.
pub fn check_well_formed(units: &[u16]) -> Result<(), LoneSurrogate> {
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if is_high_surrogate(unit) {
            match units.get(i + 1) {
                Some(&next) if is_low_surrogate(next) => {
                    i += 2;
                    continue;
                }
                _ => {
                    return Err(LoneSurrogate {
                        index: i,
                        unit,
                        kind: SurrogateKind::High,
                    })
                }
            }
        }
        if is_low_surrogate(unit) {
            return Err(LoneSurrogate {
                index: i,
                unit,
                kind: SurrogateKind::Low,
            });
        }
        i += 1;
    }
    Ok(())
}

/// Whether `units` contains no lone surrogate
pub fn is_well_formed(units: &[u16]) -> bool {
    check_well_formed(units).is_ok()
}

/// Render possibly ill-formed text for diagnostics, replacing lone surrogates
pub fn display_lossy(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Convert text to UTF-16 code units
pub fn to_utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}
