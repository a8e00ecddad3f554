//! Storage, domain models, and price feed for the CoinHarbor wallet
//! backend.
//!
//! This crate provides:
//! - Domain models for all wallet entities
//! - The `Store` capability trait with in-memory and `PostgreSQL` backends
//! - Per-entity repositories for typed database access
//! - The Bitcoin price feed client with its short-lived cache
//! - The settlement worker that completes pending trades

pub mod memory;
pub mod models;
pub mod postgres;
pub mod pricefeed;
pub mod repositories;
pub mod seed;
pub mod settlement;
pub mod store;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use pricefeed::{convert_usd, format_btc, BitcoinPrice, BitcoinPriceFeed, BtcConversion};
pub use seed::seed_store;
pub use settlement::{volume_weighted_average, SettlementWorker};
pub use store::Store;

// Re-export models
pub use models::{
    BalanceAction, BalanceActionKind, CryptoAsset, Holding, HoldingUpdate, NewBalanceAction,
    NewCryptoAsset, NewHolding, NewPortfolio, NewTransaction, NewUser, Portfolio, PortfolioUpdate,
    Transaction, TransactionKind, TransactionStatus, TransactionUpdate, User, UserUpdate,
};

// Re-export repositories
pub use repositories::{
    AssetRepository, BalanceActionRepository, HoldingRepository, PortfolioRepository,
    Repositories, TransactionRepository, UserRepository,
};
