//! Bitcoin price feed client with a short-lived cache.
//!
//! Fetches BTC/USD spot price and 24h change from the CoinGecko
//! simple-price endpoint. Results stay fresh for a configurable TTL
//! (30 seconds by default). Upstream failure is never surfaced to
//! callers: the last good value is served regardless of staleness, and a
//! fixed fallback price covers the cold-cache case.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

/// Default CoinGecko API base.
const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Default freshness window in seconds.
const DEFAULT_CACHE_TTL_SECS: i64 = 30;

/// Served when the upstream is unreachable and nothing is cached yet.
fn fallback_price() -> Decimal {
    dec!(108524.84)
}

/// A BTC/USD spot observation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinPrice {
    #[serde(with = "rust_decimal::serde::str")]
    pub usd: Decimal,
    pub change_24h: f64,
    #[serde(rename = "timestamp")]
    pub fetched_at: DateTime<Utc>,
    /// True when served from the cache rather than a live fetch.
    pub cached: bool,
}

/// Result of converting a USD amount into BTC units.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BtcConversion {
    #[serde(with = "rust_decimal::serde::str")]
    pub usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub btc: Decimal,
    pub formatted: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Client for the external BTC/USD price source.
pub struct BitcoinPriceFeed {
    client: reqwest::Client,
    api_url: String,
    cache_ttl_secs: i64,
    cache: RwLock<Option<BitcoinPrice>>,
}

impl Default for BitcoinPriceFeed {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string(), DEFAULT_CACHE_TTL_SECS as u64)
    }
}

impl BitcoinPriceFeed {
    /// Creates a price feed client for the given API base and cache TTL.
    #[must_use]
    pub fn new(api_url: String, cache_ttl_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            cache_ttl_secs: cache_ttl_secs as i64,
            cache: RwLock::new(None),
        }
    }

    /// Returns the current BTC/USD price, from cache when fresh.
    ///
    /// Never fails: a fetch error falls back to the last cached value, and
    /// with a cold cache to the fixed fallback price.
    pub async fn get_price(&self) -> BitcoinPrice {
        if let Some(cached) = self.fresh_cached().await {
            return cached;
        }

        match self.fetch_spot().await {
            Ok(fresh) => {
                *self.cache.write().await = Some(fresh.clone());
                fresh
            }
            Err(e) => {
                warn!("bitcoin price fetch failed, degrading to cache: {e:#}");
                let cache = self.cache.read().await;
                match cache.as_ref() {
                    // Stale is better than nothing.
                    Some(last_good) => BitcoinPrice {
                        cached: true,
                        ..last_good.clone()
                    },
                    None => BitcoinPrice {
                        usd: fallback_price(),
                        change_24h: 0.0,
                        fetched_at: Utc::now(),
                        cached: false,
                    },
                }
            }
        }
    }

    /// Converts a non-negative USD amount into BTC units at the current
    /// price, with the tiered display format.
    pub async fn convert(&self, usd: Decimal) -> BtcConversion {
        let price = self.get_price().await;
        let btc = convert_usd(usd, price.usd);
        BtcConversion {
            usd,
            btc,
            formatted: format_btc(btc),
            price: price.usd,
        }
    }

    async fn fresh_cached(&self) -> Option<BitcoinPrice> {
        let cache = self.cache.read().await;
        let price = cache.as_ref()?;
        let age = (Utc::now() - price.fetched_at).num_seconds();
        if age < self.cache_ttl_secs {
            Some(BitcoinPrice {
                cached: true,
                ..price.clone()
            })
        } else {
            None
        }
    }

    async fn fetch_spot(&self) -> Result<BitcoinPrice> {
        let url = format!(
            "{}/simple/price?ids=bitcoin&vs_currencies=usd&include_24hr_change=true",
            self.api_url
        );

        let response: SimplePriceResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entry = response
            .bitcoin
            .ok_or_else(|| anyhow!("no bitcoin entry in price response"))?;
        let usd = Decimal::try_from(entry.usd)?.round_dp(2);

        Ok(BitcoinPrice {
            usd,
            change_24h: entry.usd_24h_change.unwrap_or(0.0),
            fetched_at: Utc::now(),
            cached: false,
        })
    }
}

/// Exact USD→BTC division, 8 fraction digits.
#[must_use]
pub fn convert_usd(usd: Decimal, price: Decimal) -> Decimal {
    if price.is_zero() {
        return Decimal::ZERO;
    }
    (usd / price).round_dp(8)
}

/// Tiered display format: whole BTC above 1, mBTC down to a thousandth,
/// integer satoshis below that.
#[must_use]
pub fn format_btc(btc: Decimal) -> String {
    if btc >= Decimal::ONE {
        format!("{} BTC", btc.round_dp(4).normalize())
    } else if btc >= dec!(0.001) {
        format!("{} mBTC", (btc * dec!(1000)).round_dp(2).normalize())
    } else {
        format!("{} sats", (btc * dec!(100000000)).round_dp(0).normalize())
    }
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<SimplePriceEntry>,
}

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: f64,
    usd_24h_change: Option<f64>,
}
