//! Octal file permission values.

use std::fmt;
use std::str::FromStr;

use super::SettingsError;

/// Unix permission bits as the sync tool's `chmod` setting holds them.
///
/// Parsed from `755`, `0755` or `0o755`; displayed as `0o755`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Wraps raw permission bits.
    pub fn new(bits: u32) -> Self {
        Self(bits & 0o7777)
    }

    /// Raw permission bits.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl FromStr for FileMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidChmod {
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(invalid());
        }
        // A legacy leading zero (`0755`) is just another octal digit
        let significant = digits.trim_start_matches('0');
        if significant.len() > 4 {
            return Err(invalid());
        }

        u32::from_str_radix(digits, 8)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0o{:o}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_variants() {
        assert_eq!("755".parse::<FileMode>().unwrap().bits(), 0o755);
        assert_eq!("0755".parse::<FileMode>().unwrap().bits(), 0o755);
        assert_eq!("0o644".parse::<FileMode>().unwrap().bits(), 0o644);
        assert_eq!("0O600".parse::<FileMode>().unwrap().bits(), 0o600);
        assert_eq!("4755".parse::<FileMode>().unwrap().bits(), 0o4755);
    }

    #[test]
    fn test_rejects_non_octal() {
        for bad in ["789", "", "0o", "0x755", "rw-r--r--", "77777", "-755"] {
            assert!(
                matches!(bad.parse::<FileMode>(), Err(SettingsError::InvalidChmod { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_octal_literal() {
        assert_eq!(FileMode::new(0o755).to_string(), "0o755");
        assert_eq!(FileMode::new(493).to_string(), "0o755");
    }
}
