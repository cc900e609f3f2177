//! Contact detail types used by checkout and customer profiles.
//!
//! These mirror the delivery form constraints: a non-empty name, a phone
//! number of plausible length, and a complete street address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`FullName`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum FullNameError {
    /// The input string is empty.
    #[error("name is required")]
    Empty,
    /// The input string is too long.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A customer's full name as entered on the delivery form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Maximum length of a full name.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `FullName` from a string. Leading/trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than 100 characters.
    pub fn parse(s: &str) -> Result<Self, FullNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FullNameError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `FullName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FullName {
    type Err = FullNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The number is shorter than the minimum length.
    #[error("valid phone number required")]
    TooShort,
    /// The number is longer than the maximum length.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The number contains characters other than digits, `+`, `-`, or spaces.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
}

/// A phone number.
///
/// Validation is deliberately loose (length plus a character whitelist);
/// numbers are dialed by the courier, not by this system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum length of a phone number.
    pub const MIN_LENGTH: usize = 10;
    /// Maximum length of a phone number.
    pub const MAX_LENGTH: usize = 15;

    /// Parse a `Phone` from a string. Leading/trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is shorter than 10 characters,
    /// longer than 15, or contains characters other than digits, `+`, `-`,
    /// or spaces.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.len() < Self::MIN_LENGTH {
            return Err(PhoneError::TooShort);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        {
            return Err(PhoneError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing an [`Address`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AddressError {
    /// The address is shorter than the minimum length.
    #[error("complete address required")]
    TooShort,
    /// The address is longer than the maximum length.
    #[error("address must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A delivery address.
///
/// The minimum length filters out obviously incomplete input ("Mumbai");
/// no structural parsing is attempted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Minimum length of a delivery address.
    pub const MIN_LENGTH: usize = 10;
    /// Maximum length of a delivery address.
    pub const MAX_LENGTH: usize = 500;

    /// Parse an `Address` from a string. Leading/trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is shorter than 10 characters or
    /// longer than 500.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        if trimmed.len() < Self::MIN_LENGTH {
            return Err(AddressError::TooShort);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(AddressError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Address` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_valid() {
        let name = FullName::parse("Priya Sharma").unwrap();
        assert_eq!(name.as_str(), "Priya Sharma");
    }

    #[test]
    fn test_full_name_trims() {
        let name = FullName::parse("  Priya Sharma  ").unwrap();
        assert_eq!(name.as_str(), "Priya Sharma");
    }

    #[test]
    fn test_full_name_empty() {
        assert!(matches!(FullName::parse(""), Err(FullNameError::Empty)));
        assert!(matches!(FullName::parse("   "), Err(FullNameError::Empty)));
    }

    #[test]
    fn test_full_name_too_long() {
        let long = "a".repeat(101);
        assert!(matches!(
            FullName::parse(&long),
            Err(FullNameError::TooLong { max: 100 })
        ));
    }

    #[test]
    fn test_full_name_max_boundary() {
        let exact = "a".repeat(100);
        assert!(FullName::parse(&exact).is_ok());
    }

    #[test]
    fn test_phone_valid() {
        assert!(Phone::parse("9876543210").is_ok());
        assert!(Phone::parse("+91 98765 4321").is_ok());
        assert!(Phone::parse("022-2612-3456").is_ok());
    }

    #[test]
    fn test_phone_too_short() {
        assert!(matches!(Phone::parse("123"), Err(PhoneError::TooShort)));
        assert!(matches!(Phone::parse("123456789"), Err(PhoneError::TooShort)));
    }

    #[test]
    fn test_phone_too_long() {
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::TooLong { max: 15 })
        ));
    }

    #[test]
    fn test_phone_invalid_characters() {
        assert!(matches!(
            Phone::parse("98765abc43"),
            Err(PhoneError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_phone_length_boundaries() {
        assert!(Phone::parse("1234567890").is_ok()); // exactly 10
        assert!(Phone::parse("123456789012345").is_ok()); // exactly 15
    }

    #[test]
    fn test_address_valid() {
        let addr = Address::parse("12 MG Road, Mumbai, Maharashtra 400001").unwrap();
        assert_eq!(addr.as_str(), "12 MG Road, Mumbai, Maharashtra 400001");
    }

    #[test]
    fn test_address_too_short() {
        assert!(matches!(Address::parse("Mumbai"), Err(AddressError::TooShort)));
    }

    #[test]
    fn test_address_too_long() {
        let long = "a".repeat(501);
        assert!(matches!(
            Address::parse(&long),
            Err(AddressError::TooLong { max: 500 })
        ));
    }

    #[test]
    fn test_address_min_boundary() {
        assert!(Address::parse("1234567890").is_ok()); // exactly 10
    }
}
