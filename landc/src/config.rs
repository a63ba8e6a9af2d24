//! Ledger configuration loader and defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use lib_economy::{MonthCalendar, DEFAULT_GENESIS_MONTH_START};
use lib_oracle::OracleConfig;
use lib_tokens::{DEFAULT_DECIMALS, DEFAULT_NAME, DEFAULT_SYMBOL};
use lib_types::{Address, Timestamp, DECIMALS};

use crate::error::{LedgerError, LedgerResult};

/// Default config filename in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "landc.toml";

/// Default supply in whole tokens
pub const DEFAULT_INITIAL_SUPPLY_TOKENS: u64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LandcConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub token: TokenSettings,
    #[serde(default)]
    pub roles: RoleSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenSettings {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Whole tokens minted into the reserve pool
    pub initial_supply: u64,
}

/// Identities are hex-encoded 32-byte addresses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoleSettings {
    /// Deploying authority: configures distributions and properties
    pub authority: Address,
    /// Sole claimant of the maintenance fee
    pub maintainer: Address,
    pub oracle_writer: Address,
    pub reserve_pool: Address,
    pub rent_pool: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// First month start a distribution may be configured for
    pub genesis_month_start: Timestamp,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LandcConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            token: TokenSettings::default(),
            roles: RoleSettings::default(),
            schedule: ScheduleSettings::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: DEFAULT_INITIAL_SUPPLY_TOKENS,
        }
    }
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self {
            authority: Address::from_label("landc/authority"),
            maintainer: Address::from_label("landc/maintainer"),
            oracle_writer: Address::from_label("landc/oracle-writer"),
            reserve_pool: Address::from_label("landc/reserve-pool"),
            rent_pool: Address::from_label("landc/rent-pool"),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            genesis_month_start: DEFAULT_GENESIS_MONTH_START,
        }
    }
}

impl RoleSettings {
    fn pools(&self) -> [(&'static str, Address); 2] {
        [("reserve_pool", self.reserve_pool), ("rent_pool", self.rent_pool)]
    }

    fn identities(&self) -> [(&'static str, Address); 3] {
        [
            ("authority", self.authority),
            ("maintainer", self.maintainer),
            ("oracle_writer", self.oracle_writer),
        ]
    }
}

impl LandcConfig {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.token.initial_supply == 0 {
            return Err(LedgerError::InvalidConfiguration(
                "token.initial_supply must be non-zero".to_string(),
            ));
        }
        if self.token.decimals != DECIMALS {
            return Err(LedgerError::InvalidConfiguration(format!(
                "token.decimals must be {}, got {}",
                DECIMALS, self.token.decimals
            )));
        }

        let roles = &self.roles;
        if roles.reserve_pool == roles.rent_pool {
            return Err(LedgerError::InvalidConfiguration(
                "roles.reserve_pool and roles.rent_pool must differ".to_string(),
            ));
        }
        for (pool_name, pool) in roles.pools() {
            for (role_name, identity) in roles.identities() {
                if pool == identity {
                    return Err(LedgerError::InvalidConfiguration(format!(
                        "roles.{} cannot also be roles.{}",
                        role_name, pool_name
                    )));
                }
            }
        }

        MonthCalendar::new(self.schedule.genesis_month_start).map_err(|e| {
            LedgerError::InvalidConfiguration(format!("schedule.genesis_month_start: {}", e))
        })?;

        if self.log_level.trim().is_empty() {
            return Err(LedgerError::InvalidConfiguration(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> LedgerResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LedgerError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILENAME)
}

/// Load from `path`, or from the default path if present, or fall back to
/// defaults. An explicitly given path must exist.
pub fn load_config(path: Option<&str>) -> LedgerResult<LandcConfig> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        if path.is_some() {
            return Err(LedgerError::ConfigError(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        return Ok(LandcConfig::default());
    }

    load_config_strict(&config_path)
}

pub fn load_config_strict(path: &Path) -> LedgerResult<LandcConfig> {
    if !path.exists() {
        return Err(LedgerError::ConfigError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path).map_err(|e| LedgerError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let config: LandcConfig = toml::from_str(&raw).map_err(|e| LedgerError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}
