//! The per-game poll loop.
//!
//! One cycle fetches every configured page, parses each one and folds the
//! results into a new [`GameSnapshot`] on top of the previous one. State
//! travels explicitly through [`PollState`]; the background task in
//! [`spawn_poller`] just threads it from one cycle to the next.

mod config;

pub use config::PollConfig;

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::{join_all, select_all};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::app::{CourtsideError, Result};
use crate::assembler::assemble;
use crate::domain::{GameRef, GameSnapshot, PageKind};
use crate::fetcher::{FetchConfig, Fetcher};
use crate::parser::{PartialSnapshot, Parser};
use crate::store::SnapshotStore;

/// Everything one cycle needs from the previous one
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Cycles run so far, including ones without data
    pub iteration: u64,
    pub last_snapshot: Option<GameSnapshot>,
    /// Page kinds whose plain GET came back unusable and whose render worked
    pub render_required: BTreeSet<PageKind>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from a stored snapshot
    pub fn resume(snapshot: GameSnapshot) -> Self {
        Self {
            iteration: 0,
            last_snapshot: Some(snapshot),
            render_required: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Fetching,
    NoData,
    Live {
        new_events: usize,
        total_events: usize,
    },
}

impl std::fmt::Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollStatus::Fetching => f.write_str("fetching"),
            PollStatus::NoData => f.write_str("no data"),
            PollStatus::Live {
                new_events,
                total_events,
            } => write!(f, "live, +{} events ({} total)", new_events, total_events),
        }
    }
}

/// Published to consumers after every status change
#[derive(Debug, Clone)]
pub struct PollUpdate {
    pub game_id: String,
    pub iteration: u64,
    pub status: PollStatus,
    /// The snapshot produced by this cycle, only for `Live`
    pub snapshot: Option<GameSnapshot>,
}

/// Outcome of fetching one page with retries
struct PageFetch {
    kind: PageKind,
    body: Result<String>,
    rendered: bool,
}

/// Vendor stats markup always carries `aj_` ids or classes
fn looks_populated(body: &str) -> bool {
    body.contains("aj_")
}

fn is_required(kind: PageKind) -> bool {
    matches!(kind, PageKind::Index | PageKind::PlayByPlay)
}

/// Fetch, parse and assemble for one game
pub struct Pipeline<F: Fetcher> {
    game: GameRef,
    fetcher: F,
    parser: Parser,
    fetch_config: FetchConfig,
    poll_config: PollConfig,
    store: Option<Arc<dyn SnapshotStore + Send + Sync>>,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(
        game: GameRef,
        fetcher: F,
        parser: Parser,
        fetch_config: FetchConfig,
        poll_config: PollConfig,
    ) -> Self {
        Self {
            game,
            fetcher,
            parser,
            fetch_config,
            poll_config,
            store: None,
        }
    }

    /// Persist every live snapshot to `store`
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore + Send + Sync>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn game(&self) -> &GameRef {
        &self.game
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll_config
    }

    /// Run one poll cycle
    pub async fn poll_once(&self, mut state: PollState) -> (PollState, PollStatus) {
        state.iteration += 1;

        let pages: Vec<(PageKind, String)> = self
            .poll_config
            .pages
            .iter()
            .filter_map(|&kind| self.game.page_url(kind).map(|url| (kind, url)))
            .collect();

        let fetches = join_all(pages.iter().map(|(kind, url)| {
            self.fetch_page(*kind, url, state.render_required.contains(kind))
        }))
        .await;

        let mut partial = PartialSnapshot::default();
        let mut missing_required = Vec::new();

        for fetch in fetches {
            match fetch.body {
                Ok(body) => {
                    if fetch.rendered && state.render_required.insert(fetch.kind) {
                        info!(page = %fetch.kind, "Page needs rendering from now on");
                    }
                    partial.merge(self.parser.parse(&body, fetch.kind));
                }
                Err(e) => {
                    warn!(page = %fetch.kind, "Giving up on page this cycle: {}", e);
                    // Next cycle starts over with a plain GET
                    state.render_required.remove(&fetch.kind);
                    if is_required(fetch.kind) {
                        missing_required.push(fetch.kind);
                    }
                }
            }
        }

        if !missing_required.is_empty() || partial.pages.is_empty() {
            info!(
                game = %self.game.game_id,
                iteration = state.iteration,
                "No data this cycle, keeping last snapshot"
            );
            return (state, PollStatus::NoData);
        }

        let prior = state.last_snapshot.take();
        let snapshot = assemble(&self.game.game_id, partial, prior.as_ref());
        let previous = prior.as_ref().map_or(0, |p| p.events.len());
        let new_events = snapshot.events.len().saturating_sub(previous);
        let total_events = snapshot.events.len();

        if let Some(store) = &self.store {
            match store.save_snapshot(&snapshot) {
                Ok(stored) => debug!(stored, "Saved snapshot"),
                Err(e) => error!("Failed to save snapshot: {}", e),
            }
        }

        info!(
            game = %self.game.game_id,
            iteration = snapshot.iteration,
            score = %format!("{}-{}", snapshot.score.home, snapshot.score.away),
            new_events,
            total_events,
            "Poll cycle complete"
        );

        state.last_snapshot = Some(snapshot);
        (
            state,
            PollStatus::Live {
                new_events,
                total_events,
            },
        )
    }

    /// GET first, rendering only when the GET body is unusable; retried
    /// with a fixed delay
    async fn fetch_page(&self, kind: PageKind, url: &str, render_known: bool) -> PageFetch {
        let attempts = self.poll_config.retry_attempts.max(1);
        let mut render = render_known;
        let mut last_err = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.poll_config.retry_delay()).await;
            }

            if !render {
                match self.get(url).await {
                    Ok(body) => {
                        return PageFetch {
                            kind,
                            body: Ok(body),
                            rendered: false,
                        }
                    }
                    Err(e @ CourtsideError::ShortBody { .. }) => {
                        warn!(page = %kind, "Plain fetch unusable, rendering instead: {}", e);
                        render = true;
                    }
                    // Transport failure, retry the GET
                    Err(e) => {
                        let transient = e.is_transient();
                        if transient && attempt < attempts {
                            warn!(page = %kind, attempt, "Fetch failed, retrying: {}", e);
                        }
                        last_err = Some(e);
                        if !transient {
                            break;
                        }
                        continue;
                    }
                }
            }

            let timeout = self.fetch_config.timeout_for(true);
            match self.fetcher.fetch(url, true, timeout).await {
                Ok(body) => {
                    return PageFetch {
                        kind,
                        body: Ok(body),
                        rendered: true,
                    }
                }
                Err(e) => {
                    let transient = e.is_transient();
                    if transient && attempt < attempts {
                        warn!(page = %kind, attempt, "Render failed, retrying: {}", e);
                    }
                    last_err = Some(e);
                    if !transient {
                        break;
                    }
                }
            }
        }

        PageFetch {
            kind,
            body: Err(last_err.unwrap_or_else(|| {
                CourtsideError::Other(format!("no attempt made for {}", url))
            })),
            rendered: false,
        }
    }

    async fn get(&self, url: &str) -> Result<String> {
        let body = self
            .fetcher
            .fetch(url, false, self.fetch_config.timeout_for(false))
            .await?;
        if looks_populated(&body) {
            Ok(body)
        } else {
            Err(CourtsideError::ShortBody {
                url: url.to_string(),
                len: body.len(),
            })
        }
    }

    /// Release the fetcher's browser
    pub async fn close(mut self) {
        self.fetcher.close().await;
    }
}

/// Messages to a running poller
#[derive(Debug)]
pub enum PollerMessage {
    /// Skip the rest of the current wait
    PollNow,
    Shutdown,
}

/// Handle to a poll loop running on its own task
pub struct PollerHandle {
    game_id: String,
    tx: mpsc::Sender<PollerMessage>,
    updates: mpsc::Receiver<PollUpdate>,
    task: JoinHandle<PollState>,
}

impl PollerHandle {
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Next update, or `None` once the loop has stopped
    pub async fn recv(&mut self) -> Option<PollUpdate> {
        self.updates.recv().await
    }

    pub async fn poll_now(&self) {
        if let Err(e) = self.tx.send(PollerMessage::PollNow).await {
            warn!("Poller is not running: {}", e);
        }
    }

    /// Stop after the current cycle and return the final state
    pub async fn shutdown(self) -> PollState {
        let _ = self.tx.send(PollerMessage::Shutdown).await;
        self.join().await
    }

    /// Wait for the loop to stop on its own
    pub async fn join(self) -> PollState {
        match self.task.await {
            Ok(state) => state,
            Err(e) => {
                error!("Poller task failed: {}", e);
                PollState::default()
            }
        }
    }
}

struct Poller<F: Fetcher> {
    pipeline: Pipeline<F>,
    rx: mpsc::Receiver<PollerMessage>,
    updates: mpsc::Sender<PollUpdate>,
}

impl<F: Fetcher + 'static> Poller<F> {
    async fn publish(&self, iteration: u64, status: PollStatus, snapshot: Option<GameSnapshot>) {
        let update = PollUpdate {
            game_id: self.pipeline.game().game_id.clone(),
            iteration,
            status,
            snapshot,
        };
        if self.updates.send(update).await.is_err() {
            debug!("No one is listening for poll updates");
        }
    }

    async fn run(mut self, mut state: PollState) -> PollState {
        info!(game = %self.pipeline.game().game_id, "Poller started");
        let interval = self.pipeline.poll_config().interval();
        let max_iterations = self.pipeline.poll_config().max_iterations;

        loop {
            if max_iterations.is_some_and(|max| state.iteration >= max) {
                info!("Reached iteration limit");
                break;
            }

            self.publish(state.iteration + 1, PollStatus::Fetching, None).await;
            let (next, status) = self.pipeline.poll_once(state).await;
            state = next;

            let snapshot = match status {
                PollStatus::Live { .. } => state.last_snapshot.clone(),
                _ => None,
            };
            self.publish(state.iteration, status, snapshot).await;

            if max_iterations.is_some_and(|max| state.iteration >= max) {
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                msg = self.rx.recv() => match msg {
                    Some(PollerMessage::PollNow) => {}
                    Some(PollerMessage::Shutdown) | None => {
                        info!("Poller shutting down");
                        break;
                    }
                },
            }
        }

        self.pipeline.close().await;
        state
    }
}

/// Spawn a poll loop for one game
pub fn spawn_poller<F: Fetcher + 'static>(pipeline: Pipeline<F>, state: PollState) -> PollerHandle {
    let (tx, rx) = mpsc::channel(16);
    let (update_tx, updates) = mpsc::channel(64);
    let game_id = pipeline.game().game_id.clone();

    let poller = Poller {
        pipeline,
        rx,
        updates: update_tx,
    };
    let task = tokio::spawn(poller.run(state));

    PollerHandle {
        game_id,
        tx,
        updates,
        task,
    }
}

/// Several games polled side by side, each on its own loop and fetcher
pub struct PollerGroup {
    running: Vec<PollerHandle>,
    stopped: Vec<PollerHandle>,
}

impl PollerGroup {
    pub fn new(handles: Vec<PollerHandle>) -> Self {
        Self {
            running: handles,
            stopped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.running.len() + self.stopped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Next update from any game, or `None` once every loop has stopped
    pub async fn recv(&mut self) -> Option<PollUpdate> {
        while !self.running.is_empty() {
            let (update, index, pending) =
                select_all(self.running.iter_mut().map(|h| Box::pin(h.recv()))).await;
            drop(pending);

            match update {
                Some(update) => return Some(update),
                None => {
                    let done = self.running.swap_remove(index);
                    debug!(game = %done.game_id, "Poller finished");
                    self.stopped.push(done);
                }
            }
        }
        None
    }

    /// Stop every loop and return each game's final state
    pub async fn shutdown(self) -> Vec<(String, PollState)> {
        let handles = self.running.into_iter().chain(self.stopped);
        join_all(handles.map(|handle| async move {
            let game_id = handle.game_id.clone();
            (game_id, handle.shutdown().await)
        }))
        .await
    }
}
