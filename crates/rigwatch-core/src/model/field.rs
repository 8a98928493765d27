// ── Field sentinel ──
//
// Distinguishes "the daemon did not report this" from a real zero or
// empty value. Every decoded record field is a `Field<T>`.

use std::fmt;

use serde::{Serialize, Serializer};

/// Key of every snapshot map: the integer id taken from the response.
///
/// Records that arrive without an id are kept under `Unavailable`.
pub type RigKey = Field<i64>;

/// A record field that is either present in the source data or explicitly
/// unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Field<T> {
    Available(T),
    #[default]
    Unavailable,
}

impl<T> Field<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Borrow the value, if present.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Available(v) => Field::Available(v),
            Self::Unavailable => Field::Unavailable,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Available(v) => Field::Available(f(v)),
            Self::Unavailable => Field::Unavailable,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Available(v) => v,
            Self::Unavailable => default,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(v) => v.fmt(f),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Serialized as the bare value, or `null` when unavailable.
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(v) => serializer.serialize_some(v),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}
