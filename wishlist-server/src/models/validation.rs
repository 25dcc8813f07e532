//! Validated input strings
//!
//! Construction is the only check: once a caller holds an `OwnerEmail` or
//! a `WishTitle`, the value is known to be non-empty.

use crate::error::WishError;

/// Owner identity. Any non-empty string; the email format is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerEmail(String);

impl OwnerEmail {
    /// # Example
    /// ```
    /// use wishlist_server::models::OwnerEmail;
    ///
    /// assert!(OwnerEmail::new("a@x.com").is_ok());
    /// assert!(OwnerEmail::new("not-an-email").is_ok());
    /// assert!(OwnerEmail::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, WishError> {
        if s.is_empty() {
            return Err(WishError::OwnerEmailRequired);
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Wish title. Duplicates are allowed, emptiness is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WishTitle(String);

impl WishTitle {
    pub fn new(s: &str) -> Result<Self, WishError> {
        if s.is_empty() {
            return Err(WishError::TitleRequired);
        }
        Ok(Self(s.to_owned()))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
