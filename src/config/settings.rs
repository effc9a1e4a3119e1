//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format. Every
//! section is optional and falls back to its `Default`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Largest accepted `selection.group_decimals`.
pub const MAX_GROUP_DECIMALS: u32 = 12;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Digi-Key API endpoints and credentials.
    #[serde(default)]
    pub api: ApiConfig,

    /// Search paging and default filters.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Footprint geometry settings.
    #[serde(default)]
    pub footprint: FootprintConfig,

    /// Cheapest-per-value selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.page_size == 0 {
            return Err(ConfigError::validation("fetch.page_size must be at least 1"));
        }
        if self.footprint.pad_size.is_nan() || self.footprint.pad_size <= 0.0 {
            return Err(ConfigError::validation(format!(
                "footprint.pad_size must be positive, got {}",
                self.footprint.pad_size
            )));
        }
        if self.selection.group_decimals > MAX_GROUP_DECIMALS {
            return Err(ConfigError::validation(format!(
                "selection.group_decimals must be at most {MAX_GROUP_DECIMALS}, got {}",
                self.selection.group_decimals
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::validation("api.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Digi-Key API configuration.
///
/// Credentials are never stored in the file; only the names of the environment
/// variables that hold them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// OAuth2 token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Keyword search endpoint.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Environment variable holding the client ID.
    #[serde(default = "default_client_id_env")]
    pub client_id_env: String,

    /// Environment variable holding the client secret.
    #[serde(default = "default_client_secret_env")]
    pub client_secret_env: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            search_url: default_search_url(),
            client_id_env: default_client_id_env(),
            client_secret_env: default_client_secret_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_token_url() -> String {
    "https://api.digikey.com/v1/oauth2/token".to_string()
}

fn default_search_url() -> String {
    "https://api.digikey.com/products/v4/search/keyword".to_string()
}

fn default_client_id_env() -> String {
    "DIGIKEY_CLIENT_ID".to_string()
}

fn default_client_secret_env() -> String {
    "DIGIKEY_CLIENT_SECRET".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Search configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Power rating used for resistor searches when none is given.
    #[serde(default = "default_power")]
    pub power: String,

    /// Voltage rating used for capacitor searches when none is given.
    #[serde(default = "default_voltage")]
    pub voltage: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            power: default_power(),
            voltage: default_voltage(),
        }
    }
}

const fn default_page_size() -> u32 {
    50
}

fn default_power() -> String {
    "0.25W".to_string()
}

fn default_voltage() -> String {
    "6.3v".to_string()
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory footprint files are written to. Created if missing.
    #[serde(default = "default_footprint_dir")]
    pub footprint_dir: PathBuf,

    /// Symbol library file.
    #[serde(default = "default_symbol_library")]
    pub symbol_library: PathBuf,

    /// Footprint library nickname referenced by resistor symbols.
    #[serde(default = "default_resistor_nickname")]
    pub resistor_nickname: String,

    /// Footprint library nickname referenced by capacitor symbols.
    #[serde(default = "default_capacitor_nickname")]
    pub capacitor_nickname: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            footprint_dir: default_footprint_dir(),
            symbol_library: default_symbol_library(),
            resistor_nickname: default_resistor_nickname(),
            capacitor_nickname: default_capacitor_nickname(),
        }
    }
}

fn default_footprint_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_symbol_library() -> PathBuf {
    PathBuf::from("symbolLibrary.kicad_sym")
}

fn default_resistor_nickname() -> String {
    "DigikeyResistors".to_string()
}

fn default_capacitor_nickname() -> String {
    "DigikeyCapacitors".to_string()
}

/// Footprint geometry configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FootprintConfig {
    /// Through-hole pad diameter in mm.
    #[serde(default = "default_pad_size")]
    pub pad_size: f64,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            pad_size: default_pad_size(),
        }
    }
}

const fn default_pad_size() -> f64 {
    1.4
}

/// Selection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Decimal places of the base-unit magnitude used to group equal values.
    ///
    /// Capacitances are grouped in farads, so the default of 3 puts every
    /// capacitor below 1 mF into one group. Raise it (e.g. to 9) for capacitors.
    #[serde(default = "default_group_decimals")]
    pub group_decimals: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            group_decimals: default_group_decimals(),
        }
    }
}

const fn default_group_decimals() -> u32 {
    crate::units::GROUP_KEY_DECIMALS
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch.page_size, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "api": {
                "token_url": "https://sandbox-api.digikey.com/v1/oauth2/token",
                "search_url": "https://sandbox-api.digikey.com/products/v4/search/keyword",
                "client_id_env": "DK_ID",
                "client_secret_env": "DK_SECRET",
                "timeout_secs": 10
            },
            "fetch": {
                "page_size": 25,
                "power": "1/8W",
                "voltage": "16v"
            },
            "output": {
                "footprint_dir": "footprints",
                "symbol_library": "lib/Digikey.kicad_sym",
                "resistor_nickname": "MyResistors",
                "capacitor_nickname": "MyCapacitors"
            },
            "footprint": {
                "pad_size": 1.6
            },
            "selection": {
                "group_decimals": 9
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.api.token_url.starts_with("https://sandbox-api"));
        assert_eq!(config.api.client_id_env, "DK_ID");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.fetch.page_size, 25);
        assert_eq!(config.fetch.power, "1/8W");
        assert_eq!(config.output.footprint_dir, PathBuf::from("footprints"));
        assert_eq!(config.output.resistor_nickname, "MyResistors");
        assert!((config.footprint.pad_size - 1.6).abs() < f64::EPSILON);
        assert_eq!(config.selection.group_decimals, 9);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn section_defaults() {
        let api = ApiConfig::default();
        assert_eq!(api.client_id_env, "DIGIKEY_CLIENT_ID");
        assert_eq!(api.client_secret_env, "DIGIKEY_CLIENT_SECRET");
        assert_eq!(api.timeout_secs, 30);

        let fetch = FetchConfig::default();
        assert_eq!(fetch.power, "0.25W");
        assert_eq!(fetch.voltage, "6.3v");

        let output = OutputConfig::default();
        assert_eq!(output.footprint_dir, PathBuf::from("."));
        assert_eq!(
            output.symbol_library,
            PathBuf::from("symbolLibrary.kicad_sym")
        );
        assert_eq!(output.resistor_nickname, "DigikeyResistors");
        assert_eq!(output.capacitor_nickname, "DigikeyCapacitors");

        assert!((FootprintConfig::default().pad_size - 1.4).abs() < f64::EPSILON);
        assert_eq!(SelectionConfig::default().group_decimals, 3);
    }

    #[test]
    fn reject_zero_page_size() {
        let json = r#"{ "fetch": { "page_size": 0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_non_positive_pad() {
        let json = r#"{ "footprint": { "pad_size": 0.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_excessive_group_decimals() {
        let json = r#"{ "selection": { "group_decimals": 13 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{ "fetch": { "pages": 3 } }"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
