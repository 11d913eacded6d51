//! Fallback chains
//!
//! Several plan inputs come from a preferred source with a fallback behind it
//! (live weather by city, then by coordinates; model price, then the static
//! table). [`Resolution`] records which step produced the value so callers
//! can report the source instead of guessing it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Resolution<T> {
    Primary(T),
    Fallback(T),
    Unavailable,
}

impl<T> Resolution<T> {
    /// Start a chain from the preferred source
    pub fn primary(value: Option<T>) -> Self {
        match value {
            Some(v) => Resolution::Primary(v),
            None => Resolution::Unavailable,
        }
    }

    /// Consult the fallback only when nothing was resolved yet.
    /// The closure is not called once a value is present.
    pub fn or_fallback(self, fallback: impl FnOnce() -> Option<T>) -> Self {
        match self {
            Resolution::Unavailable => match fallback() {
                Some(v) => Resolution::Fallback(v),
                None => Resolution::Unavailable,
            },
            resolved => resolved,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Resolution::Unavailable)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Resolution::Primary(v) | Resolution::Fallback(v) => Some(v),
            Resolution::Unavailable => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Resolution::Primary(v) | Resolution::Fallback(v) => Some(v),
            Resolution::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Primary(v) => Resolution::Primary(f(v)),
            Resolution::Fallback(v) => Resolution::Fallback(f(v)),
            Resolution::Unavailable => Resolution::Unavailable,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_wins() {
        let mut called = false;
        let r = Resolution::primary(Some(1)).or_fallback(|| {
            called = true;
            Some(2)
        });
        assert_eq!(r, Resolution::Primary(1));
        assert!(!called);
    }

    #[test]
    fn test_fallback_then_unavailable() {
        let r = Resolution::<i32>::primary(None).or_fallback(|| Some(2));
        assert_eq!(r, Resolution::Fallback(2));

        let r = Resolution::<i32>::primary(None).or_fallback(|| None);
        assert!(!r.is_available());
        assert_eq!(r.unwrap_or(7), 7);
    }

    #[test]
    fn test_map_keeps_state() {
        let r = Resolution::Fallback(2).map(|v| v * 10);
        assert_eq!(r, Resolution::Fallback(20));
        assert_eq!(r.value(), Some(&20));
    }
}
