use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of an encoded contestant id: a SHA-256 digest as lowercase hex.
pub const CONTESTANT_ID_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("expected {CONTESTANT_ID_LEN} hex characters, got {0}")]
    InvalidLength(usize),

    #[error("contestant id must be lowercase hex")]
    InvalidCharacter,
}

/// Stable identifier of one contestant in one quiz/group.
///
/// Derived from `(name, quiz, group)` so the same triple always maps to the
/// same id, which lets registration be idempotent without a mapping table.
/// The quiz id and group are compared case-insensitively, the name is not.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContestantId(String);

impl ContestantId {
    /// Derive the id for a contestant triple.
    ///
    /// Each field is hashed with its byte length in front, so no choice of
    /// characters inside one field can imitate a field boundary.
    pub fn derive(name: &str, quiz_id: &str, group: &str) -> Self {
        let quiz_id = quiz_id.to_lowercase();
        let group = group.to_lowercase();

        let mut hasher = Sha256::new();
        for field in [name, quiz_id.as_str(), group.as_str()] {
            hasher.update(format!("{}:", field.len()).as_bytes());
            hasher.update(field.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Validate a client-supplied id (cookie or form value).
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        let s = s.trim();
        if s.len() != CONTESTANT_ID_LEN {
            return Err(IdentityError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(IdentityError::InvalidCharacter);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ContestantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContestantId({})", self.0)
    }
}

impl fmt::Display for ContestantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContestantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ContestantId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContestantId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
