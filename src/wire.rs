use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The tagged attribute representation understood by the database.
///
/// Tags mirror the wire JSON convention: `{"S": "abc"}`, `{"N": "3.14"}`,
/// `{"NULL": true}`, and so on. Numbers travel as decimal strings and binary
/// values as base64 text. `Empty` models an attribute value with no populated
/// field; it has no wire form and is filtered out of composite containers
/// during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireValue {
    /// String attribute
    S(String),
    /// Number attribute, serialized as a decimal string
    N(String),
    /// Binary attribute, base64 text
    B(String),
    /// Boolean attribute
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Null attribute
    #[serde(rename = "NULL")]
    Null(bool),
    /// List attribute
    L(Vec<WireValue>),
    /// Map attribute; order is preserved so that response rows keep their
    /// encounter order
    M(IndexMap<String, WireValue>),
    /// String set attribute
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Number set attribute (decimal strings)
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Binary set attribute (base64 text)
    #[serde(rename = "BS")]
    Bs(Vec<String>),
    /// An attribute value carrying no field at all. Never serialized.
    #[serde(skip)]
    Empty,
}

impl WireValue {
    /// The wire null value, `{"NULL": true}`.
    #[must_use]
    pub fn null() -> Self {
        WireValue::Null(true)
    }

    /// True for the unpopulated sentinel, which must never reach the wire.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, WireValue::Empty)
    }

    /// The wire tag name, used in error messages and logs.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            WireValue::S(_) => "S",
            WireValue::N(_) => "N",
            WireValue::B(_) => "B",
            WireValue::Bool(_) => "BOOL",
            WireValue::Null(_) => "NULL",
            WireValue::L(_) => "L",
            WireValue::M(_) => "M",
            WireValue::Ss(_) => "SS",
            WireValue::Ns(_) => "NS",
            WireValue::Bs(_) => "BS",
            WireValue::Empty => "(empty)",
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str(self.tag()),
        }
    }
}
