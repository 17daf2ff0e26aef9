use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short identifier for a shortened URL.
///
/// Identifiers are exactly [`ShortId::LENGTH`] characters drawn from the
/// URL-safe alphabet `[A-Za-z0-9_-]`, compared case-sensitively. The
/// identifier is the public path segment of a short link and the primary key
/// of its stored mapping, so this shape is stable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortId(String);

impl ShortId {
    /// Number of characters in every identifier.
    pub const LENGTH: usize = 7;

    /// Creates a `ShortId` after validating the input.
    ///
    /// Use this for identifiers arriving from untrusted sources, e.g. a path
    /// segment of an incoming resolve request.
    pub fn new(id: impl Into<String>) -> Result<Self, ShortenerError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `ShortId` without validation.
    ///
    /// Use this only for identifiers produced by trusted internal sources
    /// (generators whose output alphabet and length are already correct).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), ShortenerError> {
        if id.len() != Self::LENGTH {
            return Err(ShortenerError::InvalidId(format!(
                "length must be exactly {}, got {}",
                Self::LENGTH,
                id.len()
            )));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ShortenerError::InvalidId(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl Display for ShortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
