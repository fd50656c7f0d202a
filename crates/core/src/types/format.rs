//! Embroidery-machine file format codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`FileFormat`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum FileFormatError {
    /// The input string is empty or all whitespace.
    #[error("file format cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("file format must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("file format may only contain letters and digits")]
    InvalidCharacter,
}

/// An embroidery-machine file format code (e.g. JEF, DST, PES).
///
/// Codes are stored uppercase; parsing trims whitespace and uppercases the
/// input, so `" jef "` and `"JEF"` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FileFormat(String);

impl FileFormat {
    /// Maximum length of a format code.
    pub const MAX_LENGTH: usize = 8;

    /// The default format assumed when a cart line omits one.
    pub const DEFAULT: &'static str = "JEF";

    /// Parse a `FileFormat`, trimming and uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than 8
    /// characters, or contains non-alphanumeric characters.
    pub fn parse(s: &str) -> Result<Self, FileFormatError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(FileFormatError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(FileFormatError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FileFormatError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Parse an optional client-supplied code, falling back to
    /// [`Self::DEFAULT`] when the input is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is present, non-blank, and invalid.
    pub fn parse_or_default(s: Option<&str>) -> Result<Self, FileFormatError> {
        match s {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw),
            _ => Self::parse(Self::DEFAULT),
        }
    }

    /// Returns the format code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `FileFormat` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a list of client- or seed-supplied format codes: trim, uppercase,
/// drop blanks and invalid entries, and deduplicate preserving first-seen
/// order.
#[must_use]
pub fn normalize_formats<I, S>(formats: I) -> Vec<FileFormat>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for raw in formats {
        if let Ok(format) = FileFormat::parse(raw.as_ref())
            && !seen.contains(&format)
        {
            seen.push(format);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases_and_trims() {
        let f = FileFormat::parse(" jef ").expect("valid");
        assert_eq!(f.as_str(), "JEF");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(FileFormat::parse("   "), Err(FileFormatError::Empty)));
    }

    #[test]
    fn test_parse_rejects_punctuation() {
        assert!(matches!(
            FileFormat::parse(".JEF"),
            Err(FileFormatError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(
            FileFormat::parse_or_default(None).expect("default").as_str(),
            "JEF"
        );
        assert_eq!(
            FileFormat::parse_or_default(Some("")).expect("default").as_str(),
            "JEF"
        );
        assert_eq!(
            FileFormat::parse_or_default(Some("pes")).expect("valid").as_str(),
            "PES"
        );
    }

    #[test]
    fn test_normalize_formats_dedups_and_uppercases() {
        let normalized = normalize_formats(["jef", "PES", " jef ", "", "dst"]);
        let codes: Vec<&str> = normalized.iter().map(FileFormat::as_str).collect();
        assert_eq!(codes, vec!["JEF", "PES", "DST"]);
    }
}
