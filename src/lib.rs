//! # Quotidian
//!
//! A daily quote-over-photo poster. Your filesystem is the queue: a
//! directory of downloaded photos, a CSV of quotes, and an append-only
//! CSV of everything already posted. Each day at a configured time the
//! next quote is drawn onto the next photo and published with a credited
//! caption.
//!
//! # Architecture: Prepare, Then Drain
//!
//! A scheduling run has two phases with a confirmation gate between
//! them:
//!
//! ```text
//! 1. Prepare   stores  →  jobs      (compose images, build captions — read-only)
//! 2. Dispatch  jobs    →  posts     (one per day; consume stores per success)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Previewability**: every caption and composed image exists on disk
//!   before anything is published, so the operator confirms the real
//!   output, not a description of it.
//! - **Crash safety**: stores are only mutated after a post succeeds, in
//!   [`ledger::Ledger::commit_post`]. A failed or cancelled run leaves
//!   the queue exactly as it was.
//! - **Testability**: preparation is a pure function over the stores,
//!   and the dispatcher talks to the posting API through a trait, so the
//!   whole lifecycle runs under test with mocks and a temp directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ledger`] | The three persisted stores: photos (JSON map), quotes (CSV), posted history (append-only CSV) |
//! | [`remote`] | External collaborators behind traits: photo provider, quote scraper, posting API |
//! | [`compose`] | Quote-over-photo rendering: adaptive layout math plus the pixel work |
//! | [`caption`] | Caption assembly under the post length budget, with random hashtags |
//! | [`prepare`] | Turns the next N quotes and photos into ready jobs without consuming anything |
//! | [`dispatch`] | The daily scheduling loop: confirmation, condvar-based waiting, post-then-commit |
//! | [`config`] | TOML + environment configuration; credentials checked only by the commands that need them |
//! | [`types`] | Shared value types serialized in the stores (`PhotoRecord`, `Quote`, `TweetRecord`, `Job`) |
//!
//! # Design Decisions
//!
//! ## Plain Files Over a Database
//!
//! All three stores are whole-file formats — JSON and CSV — rewritten
//! through a sibling temp file and an atomic rename. They stay readable
//! and editable by hand, which matters for a queue a human curates. The
//! cost is a single-writer constraint: one process instance per store
//! set.
//!
//! ## Contrast-Adaptive Composition
//!
//! The text color scheme is picked from the photo's mean luminance: dark
//! photos get light text over a light translucent box, light photos the
//! inverse. Font size, wrapping width, and the watermark size all scale
//! with the photo's dimensions, so one set of ratios serves every
//! orientation. The math lives in [`compose::layout`] as pure functions;
//! [`compose::render`] only pushes pixels.
//!
//! ## Pure-Rust Rendering (No ImageMagick)
//!
//! Composition uses the `image` crate for decoding, resizing (Lanczos3)
//! and encoding, and `rusttype` for glyph rasterization. No system
//! dependencies: the binary is self-contained.
//!
//! ## Post-Then-Commit Consumption
//!
//! A photo, its quote, and the composed image are deleted only after the
//! posting API returned a post id, and the audit row is appended in the
//! same commit. Every other path — decline, cancellation, any error —
//! leaves the stores untouched. Duplicate posts are prevented by
//! consumption, not by deduplication.

pub mod caption;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod ledger;
pub mod prepare;
pub mod remote;
pub mod types;
