// SPDX-License-Identifier: MIT

//! # FritzBox Exporter
//!
//! Exports FritzBox router metrics as InfluxDB line-protocol records on
//! stdout, for consumption by Telegraf's `exec` input.
//!
//! One invocation is one snapshot: the exporter connects to the router's
//! TR-064 management interface, queries a fixed set of services, and
//! prints one line per metric category. Individual query failures degrade
//! to omitted fields; only an unreachable router is fatal.
//!
//! ## Main modules
//! - `collector`: query orchestration and host-table aggregation
//! - `config`: configuration management
//! - `error`: error types
//! - `fritz`: TR-064 device interaction
//! - `influx`: line-protocol serialization

pub mod collector;
pub mod config;
pub mod error;
pub mod fritz;
pub mod influx;

// Re-export commonly used types
/// Application configuration
pub use config::Config;

/// Application error and result type
pub use error::{AppError, Result};

/// TR-064 client and the capability seam the collector runs against
pub use fritz::{FritzClient, RouterClient, SoapResponse, Value};

/// Collection pass output
pub use collector::{collect, CategoryRecord, HostAggregate, Snapshot};

/// Line-protocol serialization
pub use influx::{assemble, extract, extract_as, Field, FieldKind, LineEmitter};
