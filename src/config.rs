//! # Configuration Management
//!
//! Configuration for replication packet channels.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ## Memory Bounds
//! - `queue_capacity` caps how many decoded packets wait for the consumer
//! - `max_packet_size` caps how large a reassembled packet may grow

use crate::core::frame::{HEADER_LEN, MAX_FRAME_BODY_LEN};
use crate::error::{ChannelError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default number of packets buffered between the receive loop and the consumer
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default initial capacity of the read buffer
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default largest logical packet accepted (1 GiB)
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1024 * 1024 * 1024;

/// Settings for one packet channel
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Name used in log spans and wrapped errors
    pub name: String,

    /// Maximum number of entries in the delivery queue
    pub queue_capacity: usize,

    /// Initial read buffer capacity in bytes
    pub read_buffer_capacity: usize,

    /// Largest reassembled packet body in bytes
    pub max_packet_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: String::from("replication"),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

impl ChannelConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ChannelError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ChannelError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ChannelError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("REPL_WIRE_CHANNEL_NAME") {
            config.name = name;
        }

        if let Ok(capacity) = std::env::var("REPL_WIRE_QUEUE_CAPACITY") {
            config.queue_capacity = parse_env("REPL_WIRE_QUEUE_CAPACITY", &capacity)?;
        }

        if let Ok(capacity) = std::env::var("REPL_WIRE_READ_BUFFER_CAPACITY") {
            config.read_buffer_capacity = parse_env("REPL_WIRE_READ_BUFFER_CAPACITY", &capacity)?;
        }

        if let Ok(size) = std::env::var("REPL_WIRE_MAX_PACKET_SIZE") {
            config.max_packet_size = parse_env("REPL_WIRE_MAX_PACKET_SIZE", &size)?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Validate the configuration
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Channel name cannot be empty".to_string());
        } else if self.name.len() > 64 {
            errors.push(format!(
                "Channel name too long: {} characters (maximum: 64)",
                self.name.len()
            ));
        }

        if self.queue_capacity == 0 {
            errors.push("Queue capacity must be greater than 0".to_string());
        } else if self.queue_capacity > 1_000_000 {
            errors.push(format!(
                "Queue capacity too large: {} (max recommended: 1,000,000)",
                self.queue_capacity
            ));
        }

        if self.read_buffer_capacity < HEADER_LEN {
            errors.push(format!(
                "Read buffer capacity too small: {} (minimum: {HEADER_LEN} bytes)",
                self.read_buffer_capacity
            ));
        }

        if self.max_packet_size < MAX_FRAME_BODY_LEN {
            errors.push(format!(
                "Max packet size too small: {} (minimum: {MAX_FRAME_BODY_LEN} bytes)",
                self.max_packet_size
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChannelError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_env(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|e| ChannelError::ConfigError(format!("Invalid value for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ChannelConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.queue_capacity, 100);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ChannelConfig::from_toml("name = \"binlog\"\nqueue_capacity = 8\n").unwrap();
        assert_eq!(config.name, "binlog");
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.max_packet_size, DEFAULT_MAX_PACKET_SIZE);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ChannelConfig::from_toml("queue_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ChannelError::ConfigError(_)));
    }

    #[test]
    fn zero_capacity_and_tiny_packets_are_rejected() {
        let config = ChannelConfig::default_with_overrides(|c| {
            c.queue_capacity = 0;
            c.max_packet_size = 1024;
        });

        assert_eq!(config.validate().len(), 2);
        assert!(config.validate_strict().is_err());
    }

    #[test]
    fn example_config_round_trips() {
        let text = ChannelConfig::example_config();
        let parsed = ChannelConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.read_buffer_capacity, DEFAULT_READ_BUFFER_CAPACITY);
    }
}
