// SPDX-License-Identifier: MIT

//! Type definitions for TR-064 responses

use std::collections::HashMap;

use crate::error::Result;

/// One decoded TR-064 argument value.
///
/// The wire format is text; values parsed out of SOAP bodies arrive as
/// `Str`. Computed aggregates insert `Int` and `Bool` directly so that
/// downstream coercion stays explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    /// Renders the value the way it appears in an output token.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
        }
    }

    /// Boolean coercion used for flags like `NewActive`.
    ///
    /// TR-064 booleans come over the wire as "0"/"1"; "true"/"false" is
    /// accepted as well.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        }
    }

    /// String view of textual values, `None` for the other kinds.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Arguments returned by one TR-064 action call.
///
/// May be empty; a failed query and a query with no output arguments look
/// the same to consumers, and both degrade to omitted fields.
pub type SoapResponse = HashMap<String, Value>;

/// Capability to invoke one remote action on the router.
///
/// The collector is generic over this trait so that tests can substitute
/// canned responses for the TR-064 transport.
pub trait RouterClient {
    /// Calls `action` on `service` with the given input arguments.
    fn call(
        &mut self,
        service: &str,
        action: &str,
        args: &[(&str, String)],
    ) -> impl Future<Output = Result<SoapResponse>> + Send;
}
