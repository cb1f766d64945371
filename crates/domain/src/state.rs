//! Raw entity state as reported by the registry.
//!
//! The registry is schemaless: every state is a string, with two reserved
//! words (`unknown`, `unavailable`) marking a value that cannot be used.
//! A state that does not exist at all is modelled as `Option::None` by
//! callers.

use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";
const UNAVAILABLE: &str = "unavailable";

/// Current state of an external entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StateValue {
    Unknown,
    Unavailable,
    Value(String),
}

impl StateValue {
    /// Wrap a raw registry string, recognising the reserved sentinels.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(UNKNOWN) {
            Self::Unknown
        } else if trimmed.eq_ignore_ascii_case(UNAVAILABLE) {
            Self::Unavailable
        } else {
            Self::Value(trimmed.to_string())
        }
    }

    /// Shorthand for an `on`/`off` state.
    #[must_use]
    pub fn switch(on: bool) -> Self {
        Self::Value(if on { "on" } else { "off" }.to_string())
    }

    /// The usable value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unknown | Self::Unavailable => None,
        }
    }

    /// Interpret the state as a finite number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Interpret the state as a boolean: `on` (any case) is true, any other
    /// usable value is false.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value().map(|v| v.eq_ignore_ascii_case("on"))
    }

    /// Lower-cased value, for enumerated sources.
    #[must_use]
    pub fn as_enum(&self) -> Option<String> {
        self.value().map(str::to_ascii_lowercase)
    }

    /// Whether a possibly-missing state carries no usable value.
    #[must_use]
    pub fn is_blank(state: Option<&Self>) -> bool {
        state.is_none_or(|s| s.value().is_none())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<StateValue> for String {
    fn from(value: StateValue) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for StateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str(UNKNOWN),
            Self::Unavailable => f.write_str(UNAVAILABLE),
            Self::Value(v) => f.write_str(v),
        }
    }
}
