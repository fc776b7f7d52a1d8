//! # Freshet
//!
//! Forwards new posts from RSS/Atom feeds to Discord channels, keeping a
//! per-channel delivery cursor so runs are idempotent.
//!
//! ## Architecture
//!
//! One invocation is a single pass:
//!
//! ```text
//! Bootstrap → Store (load) → ParallelForwarder → Forwarder per channel
//!                                                  ├── Fetcher → Normalizer
//!                                                  └── Notifier
//!            Store (write back mutated channels) ←┘
//! ```
//!
//! - [`bootstrap`]: seeds newly configured channels with the default feed
//!   catalog, positioned past existing history
//! - [`forwarder`]: per-channel dedup and delivery engine, fanned out with
//!   a bounded semaphore
//! - [`store`]: SQLite persistence with versioned full-document write-back
//! - [`runner`]: drives one run end to end and aggregates the result
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe a channel
//! freshet add 123456789012345678 https://blog.rust-lang.org/feed.xml
//!
//! # List its subscriptions
//! freshet list 123456789012345678
//!
//! # One delivery pass (invoke from cron or any scheduler)
//! freshet run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all
/// components: store, fetcher, notifier, parallel forwarder, catalog.
pub mod app;

/// One-time seeding of configured channels with the default catalog.
pub mod bootstrap;

/// Command-line interface using clap.
///
/// - `run` - one delivery pass over every channel
/// - `add <channel> <url>` - subscribe a channel to a feed
/// - `remove <channel> <identifier>` - unsubscribe by number, name, or URL
/// - `list <channel>` - list a channel's subscriptions
pub mod cli;

/// Settings (TOML file + environment overrides) and the default feed
/// catalog.
pub mod config;

/// Core domain models.
///
/// - [`Channel`](domain::Channel): a delivery target and its subscriptions
/// - [`FeedSubscription`](domain::FeedSubscription): one feed with its
///   delivery cursor
/// - [`RemoteItem`](domain::RemoteItem): one fetched entry, never persisted
pub mod domain;

/// Feed fetching with bounded retries.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`fetch_with_retry`](fetcher::fetch_with_retry): linear-backoff wrapper
pub mod fetcher;

/// The dedup and forwarding engine.
///
/// - [`Forwarder`](forwarder::Forwarder): walks a channel's feeds and
///   delivers items newer than each cursor
/// - [`ParallelForwarder`](forwarder::ParallelForwarder): semaphore-bounded
///   fan-out across channels
pub mod forwarder;

/// Feed parsing and normalization into domain items.
pub mod normalizer;

/// Message delivery.
///
/// - [`Notifier`](notifier::Notifier): async trait for sending one message
/// - [`DiscordNotifier`](notifier::DiscordNotifier): Discord REST
///   implementation
pub mod notifier;

/// Drives one run: bootstrap, fan out, write back, report.
pub mod runner;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
