use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub price_feed: PriceFeedConfig,
    pub settlement: SettlementConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which `Store` implementation the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// A fixed admin console credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Fixed admin console credentials checked at `/api/admin/auth/login`.
    pub credentials: Vec<AdminCredential>,
    /// The three approval codes required by balance actions.
    pub approval_codes: Vec<String>,
    /// HMAC secret for admin bearer tokens.
    pub jwt_secret: String,
    /// Token validity window in hours.
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFeedConfig {
    pub api_url: String,
    /// How long a fetched price stays fresh.
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Minimum age of a pending transaction before it settles.
    pub delay_secs: u64,
    /// How often the settlement worker scans for due transactions.
    pub poll_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/coinharbor".to_string(),
                max_connections: 10,
            },
            admin: AdminConfig {
                credentials: vec![AdminCredential {
                    id: 1,
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                    name: "Platform Admin".to_string(),
                }],
                approval_codes: vec![
                    "666666".to_string(),
                    "666666".to_string(),
                    "666666".to_string(),
                ],
                jwt_secret: "change-me-in-production".to_string(),
                token_ttl_hours: 8,
            },
            price_feed: PriceFeedConfig {
                api_url: "https://api.coingecko.com/api/v3".to_string(),
                cache_ttl_secs: 30,
            },
            settlement: SettlementConfig {
                delay_secs: 10,
                poll_interval_secs: 2,
            },
        }
    }
}
