// SPDX-License-Identifier: MIT

//! Row assembly: ordered tokens to one record body

use super::field::Field;

/// Router-protocol prefix carried by raw argument names. Stripped from the
/// assembled body so it never reaches the output schema.
const PROTOCOL_PREFIX: &str = "New";

/// Joins the non-absent tokens with commas and strips the protocol prefix.
///
/// The result never starts or ends with a comma and never contains two in
/// a row, regardless of how many input tokens were absent. An all-absent
/// input yields the empty string.
#[must_use]
pub fn assemble(fields: &[Field]) -> String {
    let body: Vec<&str> = fields
        .iter()
        .filter(|f| !f.is_absent())
        .map(Field::as_str)
        .collect();
    body.join(",").replace(PROTOCOL_PREFIX, "")
}
