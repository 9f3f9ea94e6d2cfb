//! FritzBox TR-064 client module
//!
//! This module provides functionality to talk to a FritzBox router over the
//! TR-064 management protocol: fetching the device description, addressing
//! services by name, and calling actions with Digest authentication.

mod client;
mod connection;
mod types;

// Re-export public types and functions
pub use client::FritzClient;
pub use types::{RouterClient, SoapResponse, Value};
