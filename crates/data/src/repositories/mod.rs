//! Database repositories for the CoinHarbor wallet backend.
//!
//! Each repository provides typed access to a specific table. All of them
//! are thin single-statement wrappers; cross-entity coordination lives in
//! the callers.

pub mod asset_repo;
pub mod balance_action_repo;
pub mod holding_repo;
pub mod portfolio_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use asset_repo::AssetRepository;
pub use balance_action_repo::BalanceActionRepository;
pub use holding_repo::HoldingRepository;
pub use portfolio_repo::PortfolioRepository;
pub use transaction_repo::TransactionRepository;
pub use user_repo::UserRepository;

use sqlx::PgPool;

/// Creates all repositories from a single database pool.
pub struct Repositories {
    pub users: UserRepository,
    pub portfolios: PortfolioRepository,
    pub holdings: HoldingRepository,
    pub transactions: TransactionRepository,
    pub assets: AssetRepository,
    pub balance_actions: BalanceActionRepository,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            portfolios: PortfolioRepository::new(pool.clone()),
            holdings: HoldingRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            balance_actions: BalanceActionRepository::new(pool),
        }
    }
}
