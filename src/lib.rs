//! # Courtside
//!
//! Live basketball game stats, scraped from the vendor's public stats pages.
//!
//! ## Architecture
//!
//! Every poll cycle runs the same pipeline:
//!
//! ```text
//! Fetcher → Parser (per page kind) → Classifier → Assembler → Store
//!                                                    ↑
//!                                               Aggregator
//! ```
//!
//! - [`fetcher`]: HTTP GET or headless-browser render of a page
//! - [`parser`]: structural extraction of scoreboard, box score, play-by-play
//! - [`classifier`]: play text to event type and points
//! - [`assembler`]: one append-only [`GameSnapshot`](domain::GameSnapshot) per cycle
//! - [`poller`]: the loop tying it together on a background task
//!
//! ## Quick Start
//!
//! ```bash
//! # Follow a game live
//! courtside watch 2799694
//!
//! # Two games side by side
//! courtside watch 2799694 2799701
//!
//! # One cycle, full snapshot as JSON
//! courtside snapshot 2799694 --json
//!
//! # Parse a saved page offline
//! courtside parse ./bs.html
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// configuration and parser, and builds poll pipelines.
pub mod app;

/// Per-player totals and score flow derived from the event list.
pub mod aggregator;

/// Combines parsed pages with the previous snapshot.
///
/// Enforces the append-only event log and non-decreasing scores.
pub mod assembler;

/// Rule table mapping play descriptions to [`EventType`](domain::EventType).
pub mod classifier;

/// Command-line interface using clap.
///
/// - `watch <game>...` - Poll one or more games until stopped
/// - `snapshot <game>...` - Poll each game once
/// - `show <game>` - Print the stored snapshot
/// - `list` - List stored games
/// - `remove <game>` - Delete a stored game
/// - `parse <file>` - Parse a saved page offline
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/courtside/config.toml` with `[fetch]`, `[poll]`
/// and `[parser]` sections.
pub mod config;

/// Core domain models.
///
/// - [`GameRef`](domain::GameRef): a resolved game and its page URLs
/// - [`PageKind`](domain::PageKind): which vendor page some markup came from
/// - [`PbpEvent`](domain::PbpEvent): one classified play
/// - [`GameSnapshot`](domain::GameSnapshot): everything known after a poll
pub mod domain;

/// Page fetching over HTTP or through headless Chrome.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`PageFetcher`](fetcher::PageFetcher): reqwest plus a lazily launched chromiumoxide browser
pub mod fetcher;

/// Structural parsing of vendor pages.
pub mod parser;

/// The poll pipeline and its background task.
pub mod poller;

/// SQLite persistence layer.
///
/// - [`SnapshotStore`](store::SnapshotStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
