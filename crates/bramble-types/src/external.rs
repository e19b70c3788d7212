use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document-scoped waypoint identifier.
///
/// Authors label waypoints with ids that are only meaningful inside one
/// uploaded document; the loader remaps them to storage-assigned
/// [`WaypointId`](crate::WaypointId)s. Both integer and string labels are
/// accepted, and the two spaces are distinct: `1` and `"1"` are different ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(i64),
    Text(String),
}

impl ExternalId {
    /// Extract an external id from an untyped JSON value.
    ///
    /// Returns `None` for anything other than an integer or a string
    /// (floats, booleans, nulls, and containers are not valid ids).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Debug for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "ExternalId({n})"),
            Self::Text(s) => write!(f, "ExternalId({s:?})"),
        }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ExternalId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ExternalId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ExternalId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
