//! Size literal parsing.
//!
//! Worker settings express memory limits either as raw byte counts
//! (`419430400`) or as size literals (`"400.megabytes"`). Both resolve to a
//! byte count once, at load time.

use std::fmt;
use std::str::FromStr;

use crate::settings::error::{SettingsError, SettingsResult};

/// Bytes in one megabyte (2^20).
pub const MEGABYTE: u64 = 1 << 20;

/// Bytes in one gigabyte (2^30).
pub const GIGABYTE: u64 = 1 << 30;

/// Recognized size literal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    /// Byte multiplier for this unit.
    pub const fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Megabytes => MEGABYTE,
            SizeUnit::Gigabytes => GIGABYTE,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Megabytes => "megabytes",
            SizeUnit::Gigabytes => "gigabytes",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "megabytes" => Some(SizeUnit::Megabytes),
            "gigabytes" => Some(SizeUnit::Gigabytes),
            _ => None,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw attribute value as it appears in a loaded document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    /// Already a byte (or unit) count.
    Integer(u64),
    /// `<magnitude>.<unit>` literal.
    SizeLiteral { magnitude: Magnitude, unit: SizeUnit },
}

/// Numeric part of a size literal.
///
/// Whole numbers are kept exact; fractional magnitudes are multiplied in
/// floating point and rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    Whole(u64),
    Fractional(f64),
}

impl RawValue {
    /// Resolve to a canonical integer count.
    pub fn resolve(self) -> SettingsResult<u64> {
        match self {
            RawValue::Integer(value) => Ok(value),
            RawValue::SizeLiteral { magnitude, unit } => {
                let resolved = match magnitude {
                    Magnitude::Whole(n) => n.checked_mul(unit.multiplier()),
                    Magnitude::Fractional(n) => {
                        let bytes = (n * unit.multiplier() as f64).round();
                        (bytes.is_finite() && bytes < u64::MAX as f64).then_some(bytes as u64)
                    }
                };
                resolved.ok_or_else(|| SettingsError::MalformedLiteral {
                    value: format!("{}.{}", magnitude, unit),
                })
            }
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::Whole(n) => write!(f, "{}", n),
            Magnitude::Fractional(n) => write!(f, "{}", n),
        }
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        RawValue::Integer(value)
    }
}

impl FromStr for RawValue {
    type Err = SettingsError;

    /// Parse a `<positive number>.<unit>` literal.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || SettingsError::MalformedLiteral {
            value: text.to_string(),
        };

        let (number, suffix) = text.rsplit_once('.').ok_or_else(malformed)?;
        let unit = SizeUnit::from_suffix(suffix).ok_or_else(malformed)?;
        let magnitude = parse_magnitude(number).ok_or_else(malformed)?;

        Ok(RawValue::SizeLiteral { magnitude, unit })
    }
}

/// Accepts `123` or `1.5`; rejects signs, exponents and zero.
fn parse_magnitude(number: &str) -> Option<Magnitude> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return None;
    }

    let magnitude = match fraction {
        None => Magnitude::Whole(whole.parse().ok()?),
        Some(_) => Magnitude::Fractional(number.parse().ok()?),
    };

    match magnitude {
        Magnitude::Whole(0) => None,
        Magnitude::Fractional(n) if n <= 0.0 => None,
        m => Some(m),
    }
}

/// Parse a size literal string straight to its byte count.
pub fn parse_size(text: &str) -> SettingsResult<u64> {
    text.parse::<RawValue>()?.resolve()
}

/// Parse a raw value (integer or literal) to its canonical count.
pub fn parse(raw: impl Into<RawValue>) -> SettingsResult<u64> {
    raw.into().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_is_unchanged() {
        assert_eq!(parse(419_430_400u64).unwrap(), 419_430_400);
        assert_eq!(parse(0u64).unwrap(), 0);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_size("2.gigabytes").unwrap(), 2_147_483_648);
        assert_eq!(parse_size("1.gigabytes").unwrap(), 1_073_741_824);
        assert_eq!(parse_size("500.megabytes").unwrap(), 524_288_000);
        assert_eq!(parse_size("400.megabytes").unwrap(), 419_430_400);
        for n in [1u64, 7, 64, 1024] {
            assert_eq!(parse_size(&format!("{}.megabytes", n)).unwrap(), n * MEGABYTE);
            assert_eq!(parse_size(&format!("{}.gigabytes", n)).unwrap(), n * GIGABYTE);
        }
    }

    #[test]
    fn test_fractional_magnitude_rounds() {
        assert_eq!(parse_size("1.5.gigabytes").unwrap(), 1_610_612_736);
        assert_eq!(parse_size("0.5.megabytes").unwrap(), 524_288);
    }

    #[test]
    fn test_malformed() {
        for bad in [
            "two.gigabytes",
            "5.kilobytes",
            "gigabytes",
            "2gigabytes",
            "-2.gigabytes",
            "0.megabytes",
            "1e3.megabytes",
            ".gigabytes",
            "2.Gigabytes",
            "",
        ] {
            assert!(
                matches!(parse_size(bad), Err(SettingsError::MalformedLiteral { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_overflow_is_malformed() {
        let err = parse_size("99999999999999999.gigabytes").unwrap_err();
        assert!(matches!(err, SettingsError::MalformedLiteral { .. }));
    }

    #[test]
    fn test_fractional_overflow_boundary() {
        // Exactly 2^64 bytes.
        let err = parse_size("17179869184.0.gigabytes").unwrap_err();
        assert!(matches!(err, SettingsError::MalformedLiteral { .. }));
        assert_eq!(
            parse_size("17179869183.5.gigabytes").unwrap(),
            u64::MAX - (GIGABYTE / 2 - 1)
        );
    }
}
