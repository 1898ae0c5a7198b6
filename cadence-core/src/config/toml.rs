//! TOML configuration loading
//!
//! Missing tables and keys fall back to their defaults:
//!
//! ```toml
//! station_count = 5
//!
//! [scheduler]
//! travel_margin_ms = 1200
//!
//! [maintenance]
//! enabled = false
//! ```

use super::types::{ConfigError, MachineConfig};

/// Parse and validate a machine configuration
pub fn from_toml(input: &str) -> Result<MachineConfig, ConfigError> {
    let config: MachineConfig = ::toml::from_str(input).map_err(|_| ConfigError::Parse)?;
    config.validate()?;
    Ok(config)
}
