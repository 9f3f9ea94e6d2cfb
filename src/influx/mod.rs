// SPDX-License-Identifier: MIT

//! InfluxDB line-protocol serialization
//!
//! Turns partially-absent router responses into stable output lines:
//! `field` extracts single tokens, `row` assembles them into record
//! bodies, `emit` writes the tagged lines.

mod emit;
mod field;
mod row;

pub use emit::LineEmitter;
pub use field::{extract, extract_as, Field, FieldKind};
pub use row::assemble;
