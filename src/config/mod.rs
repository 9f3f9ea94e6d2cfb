// SPDX-License-Identifier: MIT

//! Configuration module for FritzBox Exporter application
//!
//! Loads and parses configuration from environment variables and JSON.

use serde::Deserialize;


/// Default configuration values
pub mod defaults {
    pub const ADDRESS: &str = "169.254.1.1";
    pub const PORT: u16 = 49000;
    pub const USERNAME: &str = "admin";
    pub const MEASUREMENT: &str = "FritzBox";
    pub const TIMEOUT_SECS: u64 = 2;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const ADDRESS: &str = "FRITZ_IP_ADDRESS";
    pub const PORT: &str = "FRITZ_TCP_PORT";
    pub const USERNAME: &str = "FRITZ_USERNAME";
    pub const PASSWORD: &str = "FRITZ_PASSWORD";
    pub const MEASUREMENT: &str = "FRITZBOX_MEASUREMENT";
    pub const IS_DSL: &str = "FRITZBOX_IS_DSL";
    pub const INTERNET_FACING: &str = "FRITZBOX_INTERNET_FACING";
    pub const TIMEOUT_SECS: &str = "FRITZBOX_TIMEOUT_SECS";
    pub const CONFIG_JSON: &str = "FRITZBOX_CONFIG";
}

/// Application-wide configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// InfluxDB measurement name, first element of every output line
    pub measurement: String,
    /// Uplink is DSL (false for cable or plain IP uplinks)
    pub is_dsl: bool,
    /// Router holds a public address; enables external IP and DNS fields
    pub internet_facing: bool,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: defaults::ADDRESS.to_string(),
            port: defaults::PORT,
            username: defaults::USERNAME.to_string(),
            password: String::new(),
            measurement: defaults::MEASUREMENT.to_string(),
            is_dsl: true,
            internet_facing: true,
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// `FRITZBOX_CONFIG` may hold the whole configuration as one JSON
    /// object; individual variables are consulted otherwise. Reads the
    /// environment only; loading a `.env` file is the caller's business.
    pub fn from_env() -> Self {
        if let Ok(config_json) = std::env::var(env_vars::CONFIG_JSON) {
            match serde_json::from_str(&config_json) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {}. Falling back to individual variables.",
                        env_vars::CONFIG_JSON,
                        e
                    );
                }
            }
        }

        let mut config = Config::default();
        if let Ok(address) = std::env::var(env_vars::ADDRESS) {
            config.address = address;
        }
        if let Some(port) = read_parsed(env_vars::PORT) {
            config.port = port;
        }
        if let Ok(username) = std::env::var(env_vars::USERNAME) {
            config.username = username;
        }
        if let Ok(password) = std::env::var(env_vars::PASSWORD) {
            config.password = password;
        }
        if let Ok(measurement) = std::env::var(env_vars::MEASUREMENT) {
            config.measurement = measurement;
        }
        if let Some(is_dsl) = read_bool(env_vars::IS_DSL) {
            config.is_dsl = is_dsl;
        }
        if let Some(facing) = read_bool(env_vars::INTERNET_FACING) {
            config.internet_facing = facing;
        }
        if let Some(timeout) = read_parsed(env_vars::TIMEOUT_SECS) {
            config.timeout_secs = timeout;
        }
        config
    }

    /// Validates the configuration before any connection attempt
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("Router address cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Err(format!(
                "Password required (set {})",
                env_vars::PASSWORD
            ));
        }
        if self.measurement.trim().is_empty() {
            return Err("Measurement name cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be at least one second".to_string());
        }
        Ok(())
    }
}

fn read_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn read_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!("Ignoring unrecognized boolean value for {}: {}", name, value);
            None
        }
    }
}
