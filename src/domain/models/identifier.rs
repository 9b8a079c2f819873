use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
}

/// An account handle keying every lookup. Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// Per-request lookup context. Carries the fallback identifier so no
/// process-wide "current identifier" is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    default_identifier: Identifier,
}

impl SearchContext {
    pub fn new(default_identifier: Identifier) -> Self {
        Self { default_identifier }
    }

    pub fn default_identifier(&self) -> &Identifier {
        &self.default_identifier
    }

    /// Picks the identifier to load after validation.
    pub fn resolve(&self, found: bool, candidate: Identifier) -> Identifier {
        if found {
            candidate
        } else {
            self.default_identifier.clone()
        }
    }
}
