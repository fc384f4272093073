//! Email address type used as the lookup key for users.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// An email address, kept exactly as the user typed it.
///
/// Equality is byte-for-byte: `a@b.com`, `A@b.com` and ` a@b.com ` are
/// three different users. Nothing is trimmed or case-folded.
///
/// Stored values deserialize verbatim, so a legacy record with an odd
/// address never makes a whole document unreadable. New input goes
/// through [`Email::parse`].
///
/// ```
/// use chef_em_casa_core::Email;
///
/// assert!(Email::parse("cozinha@example.com").is_ok());
/// assert!(Email::parse("   ").is_err());
/// assert_ne!(
///     Email::parse("a@b.com").unwrap(),
///     Email::parse("A@b.com").unwrap(),
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Accept a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or longer than 254 bytes.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Whether this value would be accepted by [`Email::parse`].
    ///
    /// Deserialized values skip that check.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        Self::parse(&self.0).is_ok()
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether two addresses differ only by ASCII case.
    ///
    /// Lookups do not use this; it exists so callers can tell a user that
    /// an account exists under a differently-cased address.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<String> for Email {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user+receitas@example.com.br").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
    }

    #[test]
    fn test_parse_keeps_input_verbatim() {
        let padded = Email::parse(" a@b.com ").unwrap();
        let plain = Email::parse("a@b.com").unwrap();
        assert_eq!(padded.as_str(), " a@b.com ");
        assert_ne!(padded, plain);
        assert!(!padded.eq_ignore_case(&plain));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_address_without_at_is_accepted() {
        let email = Email::parse("legacy-no-at").unwrap();
        assert_eq!(email.as_str(), "legacy-no-at");
    }

    #[test]
    fn test_case_is_preserved_and_significant() {
        let lower = Email::parse("a@b.com").unwrap();
        let upper = Email::parse("A@b.com").unwrap();
        assert_eq!(upper.as_str(), "A@b.com");
        assert_ne!(lower, upper);
        assert!(lower.eq_ignore_case(&upper));
    }

    #[test]
    fn test_serde_is_plain_string() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");
    }

    #[test]
    fn test_deserialize_is_verbatim() {
        let email: Email = serde_json::from_str("\" chef@example.com\"").unwrap();
        assert_eq!(email.as_str(), " chef@example.com");

        let blank: Email = serde_json::from_str("\"\"").unwrap();
        assert!(!blank.is_acceptable());
    }
}
