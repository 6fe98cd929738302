use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{info, warn};

use common::{EngineCommand, EngineState, MarketDataSource, MarketSnapshot};

use crate::feed::{MarketFeed, SnapshotCache};

/// Cloneable handle passed to other crates (API, manager).
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    state: Arc<RwLock<EngineState>>,
    snapshot_tx: broadcast::Sender<Arc<MarketSnapshot>>,
}

impl EngineHandle {
    pub async fn send(&self, cmd: EngineCommand) {
        let _ = self.command_tx.send(cmd).await;
    }

    pub async fn state(&self) -> EngineState {
        *self.state.read().await
    }

    /// Shared state cell, for components that gate work on the engine state.
    pub fn state_handle(&self) -> Arc<RwLock<EngineState>> {
        self.state.clone()
    }

    /// Subscribe to the market snapshot broadcast.
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<Arc<MarketSnapshot>> {
        self.snapshot_tx.subscribe()
    }
}

/// The main engine: owns the market feed task and processes commands.
///
/// Start spawns the poll loop, Stop aborts it (no timers survive a closed
/// consumer), Pause keeps the feed publishing for the dashboard while the
/// manager suppresses trade opens, Resume lifts the suppression.
pub struct Engine {
    source: Arc<dyn MarketDataSource>,
    cache: SnapshotCache,
    poll_interval: Duration,
    staleness: Duration,
    state: Arc<RwLock<EngineState>>,
    snapshot_tx: broadcast::Sender<Arc<MarketSnapshot>>,
    command_rx: mpsc::Receiver<EngineCommand>,
    #[allow(dead_code)] // kept to prevent channel close
    command_tx: mpsc::Sender<EngineCommand>,
}

impl Engine {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        cache: SnapshotCache,
        poll_interval: Duration,
        staleness: Duration,
    ) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, _) = broadcast::channel(64);
        let state = Arc::new(RwLock::new(EngineState::Stopped));

        let handle = EngineHandle {
            command_tx: command_tx.clone(),
            state: state.clone(),
            snapshot_tx: snapshot_tx.clone(),
        };

        let engine = Engine {
            source,
            cache,
            poll_interval,
            staleness,
            state,
            snapshot_tx,
            command_rx,
            command_tx,
        };

        (engine, handle)
    }

    /// Run the engine. This task drives feed spawning and command
    /// processing. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!("Engine initialized in Stopped state. Waiting for Start command.");

        let mut feed_task: Option<tokio::task::JoinHandle<()>> = None;

        loop {
            match self.command_rx.recv().await {
                Some(EngineCommand::Start) => {
                    let current = *self.state.read().await;
                    if current == EngineState::Running {
                        info!("Engine already running");
                        continue;
                    }
                    // A paused session leaves its feed alive; replace it.
                    if let Some(h) = feed_task.take() {
                        h.abort();
                    }

                    info!(interval = ?self.poll_interval, "Starting market feed");
                    *self.state.write().await = EngineState::Running;

                    let feed = MarketFeed::new(
                        self.source.clone(),
                        self.snapshot_tx.clone(),
                        self.cache.clone(),
                        self.poll_interval,
                        self.staleness,
                    );
                    feed_task = Some(tokio::spawn(feed.run()));
                }

                Some(EngineCommand::Stop) => {
                    info!("Engine stopping — aborting market feed task");
                    *self.state.write().await = EngineState::Stopped;
                    if let Some(h) = feed_task.take() {
                        h.abort();
                    }
                }

                Some(EngineCommand::Pause) => {
                    let current = *self.state.read().await;
                    if current == EngineState::Running {
                        info!("Engine paused — feed continues, trade opens suppressed");
                        *self.state.write().await = EngineState::Paused;
                    }
                }

                Some(EngineCommand::Resume) => {
                    let current = *self.state.read().await;
                    if current == EngineState::Paused {
                        info!("Engine resumed");
                        *self.state.write().await = EngineState::Running;
                    }
                }

                None => {
                    warn!("Engine command channel closed — shutting down");
                    if let Some(h) = feed_task.take() {
                        h.abort();
                    }
                    break;
                }
            }
        }
    }
}
