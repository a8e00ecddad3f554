//! Seed data for the asset catalog and a demo account.

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::models::{BalanceActionKind, NewBalanceAction, NewCryptoAsset, NewPortfolio, NewUser};
use crate::store::Store;

/// The built-in asset catalog.
fn catalog() -> Vec<NewCryptoAsset> {
    let asset = |symbol: &str, name: &str, price: Decimal, change: f64, cap: Decimal, vol: Decimal| {
        NewCryptoAsset {
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: price,
            change_24h: change,
            market_cap: cap,
            volume_24h: vol,
        }
    };

    vec![
        asset("BTC", "Bitcoin", dec!(108524.84), 2.35, dec!(2145000000000), dec!(48200000000)),
        asset("ETH", "Ethereum", dec!(3910.22), 1.12, dec!(470400000000), dec!(21500000000)),
        asset("USDT", "Tether", dec!(1.00), 0.01, dec!(118300000000), dec!(65100000000)),
        asset("SOL", "Solana", dec!(186.40), -0.84, dec!(87600000000), dec!(3900000000)),
        asset("XRP", "XRP", dec!(2.87), 0.45, dec!(163500000000), dec!(5200000000)),
        asset("ADA", "Cardano", dec!(0.92), -1.73, dec!(32400000000), dec!(1100000000)),
    ]
}

/// Seeds the asset catalog and a demo user with a zero-balance portfolio.
///
/// Idempotent: assets upsert by symbol and the demo user is only created
/// when its email is absent.
///
/// # Errors
/// Returns an error if any store operation fails.
pub async fn seed_store(store: &dyn Store) -> Result<()> {
    let assets = catalog();
    let asset_count = assets.len();
    for asset in assets {
        store.upsert_crypto_asset(asset).await?;
    }
    info!("seeded {asset_count} catalog assets");

    if store.get_user_by_email("demo@coinharbor.io").await?.is_none() {
        let user = store
            .create_user(NewUser {
                username: "demo".to_string(),
                email: "demo@coinharbor.io".to_string(),
                password: "demo1234".to_string(),
                first_name: "Demo".to_string(),
                last_name: "User".to_string(),
                address: None,
            })
            .await?;
        store.create_portfolio(NewPortfolio::empty(user.id)).await?;
        store
            .create_balance_action(NewBalanceAction {
                user_id: user.id,
                admin_id: 0,
                action: BalanceActionKind::SystemInit,
                amount: Decimal::ZERO,
                currency: None,
                reason: "portfolio initialized".to_string(),
                wallet_address: None,
                tx_hash: None,
            })
            .await?;
        info!("seeded demo user {}", user.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        seed_store(&store).await.unwrap();
        seed_store(&store).await.unwrap();

        let assets = store.list_crypto_assets().await.unwrap();
        assert_eq!(assets.len(), 6);
        assert!(store.get_crypto_asset("btc").await.unwrap().is_some());

        let demo = store
            .get_user_by_email("demo@coinharbor.io")
            .await
            .unwrap()
            .unwrap();
        let portfolio = store.get_portfolio(demo.id).await.unwrap().unwrap();
        assert_eq!(portfolio.total_balance, Decimal::ZERO);

        let ledger = store.get_user_balance_actions(demo.id).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].action, "system_init");
    }
}
