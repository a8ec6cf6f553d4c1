//! # Id
//!
//! Sortable document identifiers.
//!
//! Documents created by the in-memory store get a ULID `_id`. Documents that come
//! from MongoDB carry a 24 character hex object id instead; both forms are accepted
//! wherever a document id is expected.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;
use ulid::Ulid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Unexpected};

use crate::regex;

/// A semi-globally unique and sortable identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u128);

/// Errors that can occur when parsing an `Id` from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("invalid id string")]
    InvalidString,
}

impl Id {
    #[must_use]
    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Generates a new random sortable ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().0)
    }

    /// Generate multiple random sortable IDs.
    ///
    /// Generated IDs are monotonically increasing, so documents inserted in one
    /// batch keep their insertion order when sorted by `_id`.
    ///
    /// # Panics
    ///
    /// Panics if the ULID generator overflows within a single millisecond.
    #[must_use]
    pub fn generate_multiple(count: usize) -> Vec<Self> {
        let mut ids = Vec::with_capacity(count);
        let mut g = ulid::Generator::new();
        for _ in 0..count {
            ids.push(Self::new(g.generate().unwrap().0));
        }
        ids
    }

    /// Milliseconds since the unix epoch encoded in the id.
    #[must_use]
    pub fn timestamp_ms(self) -> u64 {
        Ulid::from(self.0).timestamp_ms()
    }
}

/// Checks whether `value` is a valid document id, either a ULID or a
/// 24 character hex object id.
pub fn is_document_id(value: &str) -> bool {
    value.parse::<Id>().is_ok() || regex!("^[0-9a-fA-F]{24}$").is_match(value)
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Ulid(self.0).fmt(f)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_str(s)
            .map(From::from)
            .map_err(|_| ParseIdError::InvalidString)
    }
}

impl From<Id> for u128 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl From<Ulid> for Id {
    fn from(ulid: Ulid) -> Self {
        Self(ulid.into())
    }
}

impl From<Id> for Ulid {
    fn from(id: Id) -> Self {
        Self::from(id.0)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value = String::deserialize(deserializer)?;
        value.parse::<Self>().map_err(|_| {
            <D as Deserializer<'de>>::Error::invalid_value(Unexpected::Str(value.as_str()), &"Id")
        })
    }
}
