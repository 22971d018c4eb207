//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize `BANK_`-prefixed variables into a type-safe struct.

use serde::Deserialize;

/// How replies are written back to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `BANK_INITIAL_FUNDS` (optional): opening internal funds, defaults to 1,000,000
/// - `BANK_OFFICERS` (optional): number of officers on staff at startup, defaults to 2
/// - `BANK_CASHIERS` (optional): number of cashiers on staff at startup, defaults to 5
/// - `BANK_OUTPUT` (optional): `text` or `json`, defaults to `text`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_initial_funds")]
    pub initial_funds: u64,

    #[serde(default = "default_officers")]
    pub officers: u32,

    #[serde(default = "default_cashiers")]
    pub cashiers: u32,

    #[serde(default)]
    pub output: OutputFormat,
}

fn default_initial_funds() -> u64 {
    1_000_000
}

fn default_officers() -> u32 {
    2
}

fn default_cashiers() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_funds: default_initial_funds(),
            officers: default_officers(),
            cashiers: default_cashiers(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads `BANK_*` variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into its expected type (e.g. `BANK_OFFICERS=two`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted: initial_funds -> BANK_INITIAL_FUNDS
        envy::prefixed("BANK_").from_env::<Config>()
    }
}
