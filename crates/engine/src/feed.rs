use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use common::{MarketDataSource, MarketSnapshot, Result, TickerStats};

/// Latest published snapshot, shared with request-time consumers (API
/// handlers, manual close). Empty until the first successful poll.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<Arc<MarketSnapshot>>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self) -> Option<Arc<MarketSnapshot>> {
        self.inner.read().await.clone()
    }

    pub(crate) async fn publish(&self, snapshot: Arc<MarketSnapshot>) {
        *self.inner.write().await = Some(snapshot);
    }
}

/// One source's last good fetch and when it happened.
struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

/// Polls the market-data source on a fixed interval and publishes merged
/// snapshots.
///
/// The three bulk feeds (symbols, tickers, funding) are fetched
/// concurrently and fail independently. A failed feed is served from its
/// last good copy for up to one poll interval plus the staleness window;
/// past that, stale funding degrades to "absent" (rates default to 0)
/// while stale tickers or symbols skip the cycle entirely, leaving the
/// previous snapshot in place — evaluators never see partial data.
pub struct MarketFeed {
    source: Arc<dyn MarketDataSource>,
    snapshot_tx: broadcast::Sender<Arc<MarketSnapshot>>,
    cache: SnapshotCache,
    poll_interval: Duration,
    staleness: Duration,
}

impl MarketFeed {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        snapshot_tx: broadcast::Sender<Arc<MarketSnapshot>>,
        cache: SnapshotCache,
        poll_interval: Duration,
        staleness: Duration,
    ) -> Self {
        Self {
            source,
            snapshot_tx,
            cache,
            poll_interval,
            staleness,
        }
    }

    /// Run the poll loop forever. Call inside `tokio::spawn`; the engine
    /// cancels it by aborting the task on Stop.
    pub async fn run(self) {
        let mut tick = interval(self.poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let max_age = self.poll_interval + self.staleness;

        let mut symbols: Option<Cached<Vec<String>>> = None;
        let mut tickers: Option<Cached<Vec<TickerStats>>> = None;
        let mut funding: Option<Cached<HashMap<String, f64>>> = None;

        info!(interval = ?self.poll_interval, "Market feed polling started");
        loop {
            tick.tick().await;
            let now = Instant::now();

            let (symbols_res, tickers_res, funding_res) = tokio::join!(
                self.source.tradable_symbols(),
                self.source.ticker_snapshot(),
                self.source.funding_rates(),
            );
            refresh(&mut symbols, symbols_res, now, "symbols");
            refresh(&mut tickers, tickers_res, now, "tickers");
            refresh(&mut funding, funding_res, now, "funding rates");

            let (Some(sym), Some(tick_data)) = (&symbols, &tickers) else {
                warn!("No market data yet — skipping cycle");
                continue;
            };
            if now - sym.fetched_at > max_age || now - tick_data.fetched_at > max_age {
                warn!("Symbol or ticker data too stale — keeping previous snapshot");
                continue;
            }

            let empty = HashMap::new();
            let rates = match &funding {
                Some(f) if now - f.fetched_at <= max_age => &f.value,
                _ => {
                    debug!("Funding rates unavailable or stale — defaulting to 0");
                    &empty
                }
            };

            let records = market::normalize(&sym.value, &tick_data.value, rates);
            let snapshot = Arc::new(MarketSnapshot {
                records,
                taken_at: Utc::now(),
            });
            debug!(symbols = snapshot.records.len(), "Publishing market snapshot");
            self.cache.publish(snapshot.clone()).await;
            // Ignore send errors (no active receivers).
            let _ = self.snapshot_tx.send(snapshot);
        }
    }
}

fn refresh<T>(slot: &mut Option<Cached<T>>, result: Result<T>, now: Instant, feed: &str) {
    match result {
        Ok(value) => {
            *slot = Some(Cached {
                value,
                fetched_at: now,
            })
        }
        Err(e) => warn!(feed, error = %e, "Market fetch failed — will retry next tick"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::Error;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Source whose ticker feed can be failed on demand.
    struct FlakySource {
        fail_tickers: AtomicBool,
        fail_funding: AtomicBool,
    }

    impl FlakySource {
        fn new() -> Self {
            Self {
                fail_tickers: AtomicBool::new(false),
                fail_funding: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for FlakySource {
        async fn tradable_symbols(&self) -> Result<Vec<String>> {
            Ok(vec!["BTCUSDT".to_string()])
        }

        async fn ticker_snapshot(&self) -> Result<Vec<TickerStats>> {
            if self.fail_tickers.load(Ordering::SeqCst) {
                return Err(Error::Http("connection reset".to_string()));
            }
            Ok(vec![TickerStats {
                symbol: "BTCUSDT".to_string(),
                last_price: 50_000.0,
                change_pct_24h: 1.0,
                quote_volume: 1e6,
                high_24h: 51_000.0,
                low_24h: 49_000.0,
            }])
        }

        async fn funding_rates(&self) -> Result<HashMap<String, f64>> {
            if self.fail_funding.load(Ordering::SeqCst) {
                return Err(Error::Http("connection reset".to_string()));
            }
            Ok(HashMap::from([("BTCUSDT".to_string(), 0.0003)]))
        }

        async fn open_interest(&self, _symbol: &str) -> Result<f64> {
            Ok(0.0)
        }
    }

    fn feed_with(source: Arc<FlakySource>, poll_ms: u64) -> (MarketFeed, SnapshotCache) {
        let (tx, _rx) = broadcast::channel(16);
        let cache = SnapshotCache::new();
        let feed = MarketFeed::new(
            source,
            tx,
            cache.clone(),
            Duration::from_millis(poll_ms),
            Duration::from_millis(poll_ms / 2),
        );
        (feed, cache)
    }

    #[tokio::test]
    async fn publishes_merged_snapshot() {
        let source = Arc::new(FlakySource::new());
        let (feed, cache) = feed_with(source, 10);
        let task = tokio::spawn(feed.run());

        tokio::time::sleep(Duration::from_millis(30)).await;
        task.abort();

        let snapshot = cache.latest().await.expect("snapshot published");
        assert_eq!(snapshot.records.len(), 1);
        assert!((snapshot.records[0].funding_rate - 0.0003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn ticker_outage_keeps_last_snapshot() {
        let source = Arc::new(FlakySource::new());
        let (feed, cache) = feed_with(source.clone(), 10);
        let task = tokio::spawn(feed.run());

        tokio::time::sleep(Duration::from_millis(25)).await;
        let before = cache.latest().await.expect("snapshot published");

        source.fail_tickers.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        // Feed kept serving: the cache still holds a snapshot (last good
        // data), and it never went empty.
        let after = cache.latest().await.expect("snapshot retained");
        assert_eq!(after.records.len(), before.records.len());
    }

    #[tokio::test]
    async fn funding_outage_degrades_to_zero_rates() {
        let source = Arc::new(FlakySource::new());
        source.fail_funding.store(true, Ordering::SeqCst);
        let (feed, cache) = feed_with(source, 10);
        let task = tokio::spawn(feed.run());

        tokio::time::sleep(Duration::from_millis(30)).await;
        task.abort();

        let snapshot = cache.latest().await.expect("snapshot published");
        assert_eq!(snapshot.records[0].funding_rate, 0.0);
    }
}
