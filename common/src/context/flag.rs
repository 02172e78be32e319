use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An optional feature switch stored in the context
///
/// Persisted as the literal strings `"true"` or `"false"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flag(bool);

impl Flag {
    pub const ENABLED: Flag = Flag(true);
    pub const DISABLED: Flag = Flag(false);

    /// Interpret free-form user input
    ///
    /// `true`, `1` and `yes` (in any case) enable the flag, everything else disables it.
    pub fn coerce(input: &str) -> Self {
        let input = input.to_lowercase();
        Flag(matches!(input.as_str(), "true" | "1" | "yes"))
    }

    /// Parse a stored value, accepting only the two canonical spellings
    pub fn parse(stored: &str) -> Option<Self> {
        if stored.eq_ignore_ascii_case("true") {
            Some(Flag::ENABLED)
        } else if stored.eq_ignore_ascii_case("false") {
            Some(Flag::DISABLED)
        } else {
            None
        }
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        if self.0 {
            "true"
        } else {
            "false"
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag(value)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Hand-edited documents sometimes carry real booleans
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Bool(bool),
            Text(String),
        }

        match Stored::deserialize(deserializer)? {
            Stored::Bool(value) => Ok(Flag(value)),
            Stored::Text(text) => Flag::parse(&text).ok_or_else(|| {
                D::Error::custom(format!("expected \"true\" or \"false\", found {text:?}"))
            }),
        }
    }
}
