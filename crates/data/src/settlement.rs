//! Settlement worker for pending trade orders.
//!
//! Orders are acknowledged immediately as `pending`; this worker flips them
//! to `completed` once they are older than the settlement delay, and for
//! buys updates or creates the corresponding holding with a
//! volume-weighted average price recompute. Because the queue is the
//! durable `pending` rows themselves, settlement survives a process
//! restart.
//!
//! Sell orders settle without reducing holdings — the original system never
//! implemented the reduction and no decrement formula is invented here.

use anyhow::Result;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{
    HoldingUpdate, NewHolding, Transaction, TransactionStatus, TransactionUpdate,
};
use crate::store::Store;

/// Computes the volume-weighted average entry price after a fill.
#[must_use]
pub fn volume_weighted_average(
    old_amount: Decimal,
    old_price: Decimal,
    fill_amount: Decimal,
    fill_price: Decimal,
) -> Decimal {
    let total = old_amount + fill_amount;
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (old_amount * old_price + fill_amount * fill_price) / total
}

/// Background worker that completes due pending transactions.
pub struct SettlementWorker {
    store: Arc<dyn Store>,
    delay_secs: u64,
    poll_interval_secs: u64,
}

impl SettlementWorker {
    /// Creates a new settlement worker.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, delay_secs: u64, poll_interval_secs: u64) -> Self {
        Self {
            store,
            delay_secs,
            poll_interval_secs,
        }
    }

    /// Runs the settlement loop until the process exits.
    pub async fn run(self) {
        info!(
            "settlement worker started (delay {}s, poll {}s)",
            self.delay_secs, self.poll_interval_secs
        );

        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(self.poll_interval_secs.max(1)));
        loop {
            interval.tick().await;
            match self.settle_due().await {
                Ok(0) => {}
                Ok(settled) => info!("settled {settled} transaction(s)"),
                Err(e) => error!("settlement pass failed: {e:#}"),
            }
        }
    }

    /// Settles every pending transaction older than the delay. Returns the
    /// number of transactions completed.
    ///
    /// # Errors
    /// Returns an error if the due-transaction scan fails; individual
    /// settlement failures are logged and skipped so one bad row cannot
    /// stall the queue.
    pub async fn settle_due(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::seconds(self.delay_secs as i64);
        let due = self.store.pending_transactions_before(cutoff).await?;

        let mut settled = 0;
        for transaction in due {
            match self.settle_one(&transaction).await {
                Ok(()) => settled += 1,
                Err(e) => error!(
                    "failed to settle transaction {}: {e:#}",
                    transaction.id
                ),
            }
        }

        Ok(settled)
    }

    async fn settle_one(&self, transaction: &Transaction) -> Result<()> {
        self.store
            .update_transaction(
                transaction.id,
                TransactionUpdate {
                    status: Some(TransactionStatus::Completed),
                },
            )
            .await?;

        if transaction.is_buy() {
            self.apply_buy_to_holdings(transaction).await?;
        }

        Ok(())
    }

    async fn apply_buy_to_holdings(&self, transaction: &Transaction) -> Result<()> {
        let Some(portfolio) = self.store.get_portfolio(transaction.user_id).await? else {
            warn!(
                "no portfolio for user {}, skipping holding update",
                transaction.user_id
            );
            return Ok(());
        };

        let holdings = self.store.get_holdings(portfolio.id).await?;
        let existing = holdings
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(&transaction.symbol));

        match existing {
            Some(holding) => {
                let average_price = volume_weighted_average(
                    holding.amount,
                    holding.average_price,
                    transaction.amount,
                    transaction.price,
                );
                self.store
                    .update_holding(
                        holding.id,
                        HoldingUpdate {
                            amount: Some(holding.amount + transaction.amount),
                            average_price: Some(average_price),
                            current_price: Some(transaction.price),
                        },
                    )
                    .await?;
            }
            None => {
                self.store
                    .create_holding(NewHolding {
                        portfolio_id: portfolio.id,
                        symbol: transaction.symbol.clone(),
                        amount: transaction.amount,
                        average_price: transaction.price,
                        current_price: transaction.price,
                    })
                    .await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{NewPortfolio, NewTransaction, NewUser, TransactionKind};
    use rust_decimal_macros::dec;

    #[test]
    fn vwap_of_two_fills() {
        // 1 @ 100 then 1 @ 200 -> 150
        assert_eq!(
            volume_weighted_average(dec!(1), dec!(100), dec!(1), dec!(200)),
            dec!(150)
        );
        // 3 @ 10 then 1 @ 50 -> 20
        assert_eq!(
            volume_weighted_average(dec!(3), dec!(10), dec!(1), dec!(50)),
            dec!(20)
        );
        assert_eq!(
            volume_weighted_average(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO
        );
    }

    async fn setup() -> (Arc<MemoryStore>, i64, i64) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(NewUser {
                username: "trader".to_string(),
                email: "trader@example.com".to_string(),
                password: "pass".to_string(),
                first_name: "Test".to_string(),
                last_name: "Trader".to_string(),
                address: None,
            })
            .await
            .unwrap();
        let portfolio = store
            .create_portfolio(NewPortfolio::empty(user.id))
            .await
            .unwrap();
        (store, user.id, portfolio.id)
    }

    async fn place_buy(store: &MemoryStore, user_id: i64, amount: Decimal, price: Decimal) {
        store
            .create_transaction(NewTransaction {
                user_id,
                kind: TransactionKind::Buy,
                symbol: "BTC".to_string(),
                amount,
                price,
                fee: Decimal::ZERO,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn buys_settle_into_a_single_averaged_holding() {
        let (store, user_id, portfolio_id) = setup().await;
        place_buy(&store, user_id, dec!(1), dec!(100)).await;
        place_buy(&store, user_id, dec!(1), dec!(200)).await;

        let worker = SettlementWorker::new(store.clone(), 0, 1);
        let settled = worker.settle_due().await.unwrap();
        assert_eq!(settled, 2);

        let holdings = store.get_holdings(portfolio_id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].amount, dec!(2));
        assert_eq!(holdings[0].average_price, dec!(150));
        assert_eq!(holdings[0].current_price, dec!(200));

        let transactions = store.get_transactions(user_id).await.unwrap();
        assert!(transactions.iter().all(|t| t.status == "completed"));
    }

    #[tokio::test]
    async fn sells_settle_without_touching_holdings() {
        let (store, user_id, portfolio_id) = setup().await;
        store
            .create_transaction(NewTransaction {
                user_id,
                kind: TransactionKind::Sell,
                symbol: "BTC".to_string(),
                amount: dec!(1),
                price: dec!(100),
                fee: Decimal::ZERO,
            })
            .await
            .unwrap();

        let worker = SettlementWorker::new(store.clone(), 0, 1);
        assert_eq!(worker.settle_due().await.unwrap(), 1);

        assert!(store.get_holdings(portfolio_id).await.unwrap().is_empty());
        let transactions = store.get_transactions(user_id).await.unwrap();
        assert_eq!(transactions[0].status, "completed");
    }

    #[tokio::test]
    async fn transactions_younger_than_the_delay_stay_pending() {
        let (store, user_id, _) = setup().await;
        place_buy(&store, user_id, dec!(1), dec!(100)).await;

        // One hour delay: nothing is due yet.
        let worker = SettlementWorker::new(store.clone(), 3600, 1);
        assert_eq!(worker.settle_due().await.unwrap(), 0);

        let transactions = store.get_transactions(user_id).await.unwrap();
        assert_eq!(transactions[0].status, "pending");
    }
}
