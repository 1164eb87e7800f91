//! # Microline Control Codes
//!
//! This module implements the escape-code protocol spoken by the OKI
//! Microline 321 family of 9-pin dot-matrix printers.
//!
//! ## Protocol Overview
//!
//! Commands are short byte sequences, most starting with ESC (0x1B). Unlike
//! ESC/POS-style protocols, numeric parameters are sent as zero-padded
//! ASCII decimal strings rather than binary bytes:
//!
//! - **Left margin**: `ESC % C` + 3-digit column
//! - **Right margin**: `ESC % R` + 4-digit column
//! - **Line skip**: `ESC VT` + 2-digit line count
//!
//! Margin columns are measured in 1/120th of an inch. The digit widths are
//! hard protocol limits: a column or skip count that does not fit its field
//! cannot be sent at all.
//!
//! ## Fonts and Character Pitch
//!
//! | Selection | Bytes | Notes |
//! |-----------|-------------|-------|
//! | NLQ | ESC `-` | near letter quality |
//! | NLQ Gothic | ESC `3` | |
//! | Utility | ESC `0` | draft, the power-on default we use |
//! | HSD | ESC `#` `0` | high speed draft |
//! | 10 CPI | RS | |
//! | 12 CPI | FS | |
//! | 15 CPI | ESC `g` | |
//! | 17.1 CPI | GS | exactly 120/7 chars per inch |
//! | 20 CPI | ESC `#` `3` | |
//!
//! These byte values were determined against physical hardware; they must
//! be reproduced bit-exact.

use crate::error::MicrolineError;

// ============================================================================
// CONTROL BYTES
// ============================================================================

/// ESC (Escape) - command prefix byte
pub const ESC: u8 = 0x1B;

/// VT (Vertical Tab) - second byte of the line-skip command
pub const VT: u8 = 0x0B;

/// LF (Line Feed) - print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// CR (Carriage Return) - return the print head to the left stop
pub const CR: u8 = 0x0D;

/// FF (Form Feed) - advance to the next page.
///
/// Present in the protocol but never emitted by this driver: form-feed
/// paging bypasses the position tracker, so all vertical movement goes
/// through line skips instead.
pub const FF: u8 = 0x0C;

/// Maximum line count a single skip command can carry (2-digit field).
pub const MAX_LINE_SKIP: u32 = 99;

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Font modes supported by the Microline 321.
///
/// Exactly one font is active at a time. Selecting one is a pure emission;
/// the printer keeps no queryable font state, so the session remembers the
/// last selection it sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Near letter quality (courier)
    Nlq,
    /// Near letter quality, gothic typeface
    NlqGothic,
    /// Utility / draft
    Util,
    /// High speed draft
    Hsd,
}

impl Font {
    /// All font modes, in table order.
    pub const ALL: [Font; 4] = [Font::Nlq, Font::NlqGothic, Font::Util, Font::Hsd];

    /// Escape sequence selecting this font.
    pub fn code(self) -> &'static [u8] {
        match self {
            Font::Nlq => &[ESC, b'-'],
            Font::NlqGothic => &[ESC, b'3'],
            Font::Util => &[ESC, b'0'],
            Font::Hsd => &[ESC, b'#', b'0'],
        }
    }

    /// Wire name used by job payloads and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Font::Nlq => "NLQ",
            Font::NlqGothic => "NLQ_GOTHIC",
            Font::Util => "UTIL",
            Font::Hsd => "HSD",
        }
    }
}

impl std::str::FromStr for Font {
    type Err = MicrolineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Font::ALL
            .into_iter()
            .find(|font| font.name() == s)
            .ok_or_else(|| MicrolineError::UnknownFont(s.to_string()))
    }
}

// ============================================================================
// CHARACTER PITCH (CPI)
// ============================================================================

/// Character pitch settings, in characters per inch.
///
/// The pitch determines how many characters fit in the physical text width
/// between the margin columns. 17.1 CPI is not actually 17.1: the hardware
/// pitch is 120/7 chars per inch, which is why [`Cpi::chars_per_inch`]
/// returns a rational rather than a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cpi {
    Cpi10,
    Cpi12,
    Cpi15,
    /// 120/7 ≈ 17.14 chars per inch, marketed as "17.1"
    Cpi17,
    Cpi20,
}

impl Cpi {
    /// All pitch settings, in table order.
    pub const ALL: [Cpi; 5] = [Cpi::Cpi10, Cpi::Cpi12, Cpi::Cpi15, Cpi::Cpi17, Cpi::Cpi20];

    /// Escape sequence selecting this pitch.
    pub fn code(self) -> &'static [u8] {
        match self {
            Cpi::Cpi10 => &[0x1E],
            Cpi::Cpi12 => &[0x1C],
            Cpi::Cpi15 => &[ESC, b'g'],
            Cpi::Cpi17 => &[0x1D],
            Cpi::Cpi20 => &[ESC, b'#', b'3'],
        }
    }

    /// Characters per inch as an exact rational (numerator, denominator).
    pub fn chars_per_inch(self) -> (u32, u32) {
        match self {
            Cpi::Cpi10 => (10, 1),
            Cpi::Cpi12 => (12, 1),
            Cpi::Cpi15 => (15, 1),
            Cpi::Cpi17 => (120, 7),
            Cpi::Cpi20 => (20, 1),
        }
    }

    /// Wire name used by job payloads and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Cpi::Cpi10 => "10CPI",
            Cpi::Cpi12 => "12CPI",
            Cpi::Cpi15 => "15CPI",
            Cpi::Cpi17 => "17.1CPI",
            Cpi::Cpi20 => "20CPI",
        }
    }
}

impl std::str::FromStr for Cpi {
    type Err = MicrolineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cpi::ALL
            .into_iter()
            .find(|cpi| cpi.name() == s)
            .ok_or_else(|| MicrolineError::UnknownCpi(s.to_string()))
    }
}

// ============================================================================
// MARGIN AND MOVEMENT COMMANDS
// ============================================================================

/// # Set Left Margin (ESC % C nnn)
///
/// Places the left margin at an absolute column, in 1/120th-inch units
/// measured from the carriage home position.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC % C n n n |
/// | Hex     | 1B 25 43 + 3 ASCII digits |
///
/// ## Errors
///
/// `MarginOutOfRange` if `col` does not fit in 3 decimal digits (0-999).
/// This is a hard field-width limit, not a soft warning.
pub fn left_margin(col: u32) -> Result<Vec<u8>, MicrolineError> {
    if col > 999 {
        return Err(MicrolineError::MarginOutOfRange {
            col: col as i64,
            digits: 3,
        });
    }
    let mut bytes = vec![ESC, b'%', b'C'];
    bytes.extend(format!("{:03}", col).into_bytes());
    Ok(bytes)
}

/// # Set Right Margin (ESC % R nnnn)
///
/// Places the right margin at an absolute column, in 1/120th-inch units.
/// Same encoding as [`left_margin`] but with a 4-digit field (0-9999).
pub fn right_margin(col: u32) -> Result<Vec<u8>, MicrolineError> {
    if col > 9999 {
        return Err(MicrolineError::MarginOutOfRange {
            col: col as i64,
            digits: 4,
        });
    }
    let mut bytes = vec![ESC, b'%', b'R'];
    bytes.extend(format!("{:04}", col).into_bytes());
    Ok(bytes)
}

/// # Skip Lines (ESC VT nn)
///
/// Advances the paper by `n` lines without printing. The count is a
/// 2-digit ASCII decimal field, so a single command can skip at most
/// [`MAX_LINE_SKIP`] lines; longer movements must be split into multiple
/// commands (the session's `skip_lines` does this).
///
/// ## Errors
///
/// `SkipTooLarge` if `n` exceeds 99.
pub fn line_skip(n: u32) -> Result<Vec<u8>, MicrolineError> {
    if n > MAX_LINE_SKIP {
        return Err(MicrolineError::SkipTooLarge(n));
    }
    let mut bytes = vec![ESC, VT];
    bytes.extend(format!("{:02}", n).into_bytes());
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_font_codes() {
        assert_eq!(Font::Nlq.code(), &[27, 45]);
        assert_eq!(Font::NlqGothic.code(), &[27, 51]);
        assert_eq!(Font::Util.code(), &[27, 48]);
        assert_eq!(Font::Hsd.code(), &[27, 35, 48]);
    }

    #[test]
    fn test_cpi_codes() {
        assert_eq!(Cpi::Cpi10.code(), &[30]);
        assert_eq!(Cpi::Cpi12.code(), &[28]);
        assert_eq!(Cpi::Cpi15.code(), &[27, 103]);
        assert_eq!(Cpi::Cpi17.code(), &[29]);
        assert_eq!(Cpi::Cpi20.code(), &[27, 35, 51]);
    }

    #[test]
    fn test_cpi_17_is_rational() {
        let (num, den) = Cpi::Cpi17.chars_per_inch();
        assert_eq!((num, den), (120, 7));
    }

    #[test]
    fn test_font_name_round_trip() {
        for font in Font::ALL {
            let parsed: Font = font.name().parse().unwrap();
            assert_eq!(parsed, font);
        }
    }

    #[test]
    fn test_cpi_name_round_trip() {
        for cpi in Cpi::ALL {
            let parsed: Cpi = cpi.name().parse().unwrap();
            assert_eq!(parsed, cpi);
        }
    }

    #[test]
    fn test_codes_are_unique_and_invertible() {
        // Decoding a selection's bytes by table lookup must recover it
        for font in Font::ALL {
            let matches: Vec<Font> = Font::ALL
                .into_iter()
                .filter(|f| f.code() == font.code())
                .collect();
            assert_eq!(matches, vec![font]);
        }
        for cpi in Cpi::ALL {
            let matches: Vec<Cpi> = Cpi::ALL
                .into_iter()
                .filter(|c| c.code() == cpi.code())
                .collect();
            assert_eq!(matches, vec![cpi]);
        }
    }

    #[test]
    fn test_unknown_font_and_cpi() {
        assert!(matches!(
            "COMIC_SANS".parse::<Font>(),
            Err(MicrolineError::UnknownFont(_))
        ));
        assert!(matches!(
            "11CPI".parse::<Cpi>(),
            Err(MicrolineError::UnknownCpi(_))
        ));
    }

    #[test]
    fn test_left_margin_zero_padding() {
        assert_eq!(left_margin(24).unwrap(), vec![27, b'%', b'C', b'0', b'2', b'4']);
        assert_eq!(left_margin(0).unwrap(), vec![27, b'%', b'C', b'0', b'0', b'0']);
        assert_eq!(left_margin(999).unwrap(), vec![27, b'%', b'C', b'9', b'9', b'9']);
    }

    #[test]
    fn test_right_margin_zero_padding() {
        assert_eq!(
            right_margin(924).unwrap(),
            vec![27, b'%', b'R', b'0', b'9', b'2', b'4']
        );
        assert_eq!(
            right_margin(9999).unwrap(),
            vec![27, b'%', b'R', b'9', b'9', b'9', b'9']
        );
    }

    #[test]
    fn test_margin_field_limits() {
        assert!(matches!(
            left_margin(1000),
            Err(MicrolineError::MarginOutOfRange { col: 1000, digits: 3 })
        ));
        assert!(matches!(
            right_margin(10_000),
            Err(MicrolineError::MarginOutOfRange { col: 10_000, digits: 4 })
        ));
    }

    #[test]
    fn test_line_skip_encoding() {
        assert_eq!(line_skip(3).unwrap(), vec![27, 11, b'0', b'3']);
        assert_eq!(line_skip(99).unwrap(), vec![27, 11, b'9', b'9']);
        assert_eq!(line_skip(0).unwrap(), vec![27, 11, b'0', b'0']);
    }

    #[test]
    fn test_line_skip_limit() {
        assert!(matches!(line_skip(100), Err(MicrolineError::SkipTooLarge(100))));
    }
}
