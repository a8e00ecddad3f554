//! Core configuration and validation for the CoinHarbor wallet backend.
//!
//! This crate provides:
//! - Application configuration structs with runnable defaults
//! - Figment-based config loading (TOML + environment merge)
//! - Request-payload validation helpers shared by the HTTP layer

pub mod config;
pub mod config_loader;
pub mod validation;

pub use config::{
    AdminConfig, AdminCredential, AppConfig, DatabaseConfig, PriceFeedConfig, ServerConfig,
    SettlementConfig, StorageBackend, StorageConfig,
};
pub use config_loader::ConfigLoader;
pub use validation::{is_valid_approval_code, parse_non_negative_amount, parse_positive_amount};
