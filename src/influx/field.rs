// SPDX-License-Identifier: MIT

//! Field extraction: raw response values to line-protocol tokens

use crate::fritz::{SoapResponse, Value};

/// Serialization kind of one output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `name=123i`, InfluxDB integer marker
    Integer,
    /// `name=1.5`, bare value
    Float,
    /// `name="text"`, embedded quotes stripped
    Str,
}

/// One serialized `name=value` token, or nothing.
///
/// An empty token means "omit this field"; the row assembler drops it
/// without leaving a separator behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field(Option<String>);

impl Field {
    /// The omitted field.
    #[must_use]
    pub fn absent() -> Self {
        Field(None)
    }

    /// Integer-kind token.
    #[must_use]
    pub fn integer(name: &str, value: &str) -> Self {
        Field(Some(format!("{name}={value}i")))
    }

    /// Float-kind token, no marker and no quoting.
    #[must_use]
    pub fn float(name: &str, value: &str) -> Self {
        Field(Some(format!("{name}={value}")))
    }

    /// String-kind token. Double quotes inside the value would break the
    /// line protocol and are stripped.
    #[must_use]
    pub fn string(name: &str, value: &str) -> Self {
        let clean: String = value.chars().filter(|&c| c != '"').collect();
        Field(Some(format!("{name}=\"{clean}\"")))
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Token text; empty for an absent field.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

/// Extracts `key` from a response as a token named after the key.
///
/// Absence of the key is routine (failed query, optional hardware
/// feature) and yields the absent token. A present key always yields a
/// token, even when its value renders empty.
#[must_use]
pub fn extract(response: &SoapResponse, key: &str, kind: FieldKind) -> Field {
    extract_as(response, key, kind, key)
}

/// Extracts `key` under a different output name.
#[must_use]
pub fn extract_as(response: &SoapResponse, key: &str, kind: FieldKind, name: &str) -> Field {
    let Some(value) = response.get(key) else {
        return Field::absent();
    };
    from_value(name, value, kind)
}

fn from_value(name: &str, value: &Value, kind: FieldKind) -> Field {
    let text = value.display();
    match kind {
        FieldKind::Integer => Field::integer(name, &text),
        FieldKind::Float => Field::float(name, &text),
        FieldKind::Str => Field::string(name, &text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(pairs: &[(&str, &str)]) -> SoapResponse {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Str(v.to_string())))
            .collect()
    }

    #[test]
    fn test_missing_key_is_absent() {
        let resp = response(&[("NewUpTime", "120")]);
        for kind in [FieldKind::Integer, FieldKind::Float, FieldKind::Str] {
            assert!(extract(&resp, "NewMissing", kind).is_absent());
        }
        assert!(extract(&HashMap::new(), "NewUpTime", FieldKind::Integer).is_absent());
    }

    #[test]
    fn test_integer_suffix() {
        let resp = response(&[("NewUpTime", "120")]);
        let field = extract(&resp, "NewUpTime", FieldKind::Integer);
        assert_eq!(field.as_str(), "NewUpTime=120i");
    }

    #[test]
    fn test_string_quoting() {
        let resp = response(&[("NewModelName", "FRITZ!Box 7590")]);
        let field = extract(&resp, "NewModelName", FieldKind::Str);
        assert_eq!(field.as_str(), "NewModelName=\"FRITZ!Box 7590\"");
    }

    #[test]
    fn test_string_strips_embedded_quotes() {
        let resp = response(&[("NewSSID", "my \"quoted\" net")]);
        let field = extract(&resp, "NewSSID", FieldKind::Str);
        assert_eq!(field.as_str(), "NewSSID=\"my quoted net\"");
        // only the surrounding quotes survive
        assert_eq!(field.as_str().matches('"').count(), 2);
    }

    #[test]
    fn test_float_unmarked() {
        let resp = response(&[("NewTotalBytesSent64", "123456789012")]);
        let field = extract_as(
            &resp,
            "NewTotalBytesSent64",
            FieldKind::Float,
            "TotalBytesSent64",
        );
        assert_eq!(field.as_str(), "TotalBytesSent64=123456789012");
    }

    #[test]
    fn test_rename() {
        let resp = response(&[("NewUptime", "99")]);
        let field = extract_as(&resp, "NewUptime", FieldKind::Integer, "ConnectionTime");
        assert_eq!(field.as_str(), "ConnectionTime=99i");
    }

    #[test]
    fn test_present_empty_value_still_yields_token() {
        let resp = response(&[("NewLastConnectionError", "")]);
        let field = extract_as(&resp, "NewLastConnectionError", FieldKind::Str, "LastError");
        assert!(!field.is_absent());
        assert_eq!(field.as_str(), "LastError=\"\"");
    }

    #[test]
    fn test_int_value_display() {
        let resp: SoapResponse =
            [("HostsKnown".to_string(), Value::Int(5))].into_iter().collect();
        let field = extract(&resp, "HostsKnown", FieldKind::Integer);
        assert_eq!(field.as_str(), "HostsKnown=5i");
    }
}
