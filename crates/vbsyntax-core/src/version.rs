//! Language version gate.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The language version the scanner and parser accept.
///
/// Version 8.0 adds generics (`Of`), unsigned integer types and literal
/// suffixes, `Global`, `Using`, `Continue`, `IsNot`, `TryCast`, operator
/// declarations, `Partial` types and `Me` in `Handles` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum LanguageVersion {
    VisualBasic71 = 71,
    #[default]
    VisualBasic80 = 80,
}

impl LanguageVersion {
    /// The newest version understood.
    pub const LATEST: LanguageVersion = LanguageVersion::VisualBasic80;

    /// Whether constructs introduced in version 8.0 are available.
    #[inline]
    pub fn supports_v8(self) -> bool {
        self >= LanguageVersion::VisualBasic80
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageVersion::VisualBasic71 => f.write_str("Visual Basic 7.1"),
            LanguageVersion::VisualBasic80 => f.write_str("Visual Basic 8.0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_latest() {
        assert_eq!(LanguageVersion::default(), LanguageVersion::LATEST);
        assert!(LanguageVersion::default().supports_v8());
        assert!(!LanguageVersion::VisualBasic71.supports_v8());
    }

    #[test]
    fn primitive_round_trip() {
        let raw: u8 = LanguageVersion::VisualBasic71.into();
        assert_eq!(raw, 71);
        assert_eq!(
            LanguageVersion::try_from(80u8).ok(),
            Some(LanguageVersion::VisualBasic80)
        );
        assert!(LanguageVersion::try_from(90u8).is_err());
    }
}
