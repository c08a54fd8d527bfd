//! The resource ledger: three independent persisted stores tracking
//! downloaded photos, available quotes, and posted history.
//!
//! # Design
//!
//! Each store is a plain file readable and writable as a whole — no
//! partial-update format, no database:
//!
//! - [`photos`] — `downloaded_photos.json`, a map of photo id to
//!   metadata, living alongside the photo JPEGs
//! - [`quotes`] — a `Quote,Author` CSV, order-significant
//! - [`tweeted`] — an append-only CSV audit log whose row count drives
//!   the "post #N" sequence numbering
//!
//! Every rewrite goes through a sibling temp file plus an atomic rename,
//! so an interrupted run never leaves a half-written store. That is a
//! single-writer guarantee only: exactly one process instance may
//! operate on a given store set at a time.
//!
//! Consumption of a photo (entry + backing JPEG), its composed temp
//! image, and the quote row happens only through [`Ledger::commit_post`],
//! after the external post succeeded. A failed post consumes nothing.

pub mod photos;
pub mod quotes;
pub mod tweeted;

use crate::types::{Job, TweetRecord};
use chrono::Local;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use photos::PhotosStore;
pub use quotes::QuotesStore;
pub use tweeted::TweetedStore;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The three stores a scheduling run operates on.
pub struct Ledger {
    pub photos: PhotosStore,
    pub quotes: QuotesStore,
    pub tweeted: TweetedStore,
}

impl Ledger {
    /// Open all three stores. The photo directory and the posted-history
    /// file are created empty when missing; the quotes file must already
    /// exist by the time it is read.
    pub fn open(
        photos_dir: &Path,
        quotes_path: &Path,
        tweeted_path: &Path,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            photos: PhotosStore::open(photos_dir)?,
            quotes: QuotesStore::new(quotes_path),
            tweeted: TweetedStore::open(tweeted_path)?,
        })
    }

    /// Commit the consumption for one successfully posted job.
    ///
    /// Order: delete the source JPEG, delete the composed temp image,
    /// drop the photo entry, remove the quote row, append the audit
    /// record. Callers must only invoke this after the post call
    /// returned a post id.
    pub fn commit_post(&mut self, job: &Job, post_id: &str) -> Result<(), LedgerError> {
        info!(photo_id = %job.photo_id, "removing consumed photo and quote");
        fs::remove_file(self.photos.image_path(&job.photo_id))?;
        fs::remove_file(&job.image_path)?;
        self.photos.remove(&job.photo_id);
        self.photos.save()?;
        self.quotes.remove(&job.quote)?;
        self.tweeted.append(&TweetRecord {
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tweet_id: post_id.to_string(),
            photo_id: job.photo_id.clone(),
            photographer: job.photographer.clone(),
            link: job.link.clone(),
            quote: job.quote.clone(),
            author: job.author.clone(),
        })?;
        Ok(())
    }
}

/// Write a store file through a sibling temp file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
