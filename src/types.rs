//! Shared value types used across the pipeline.
//!
//! These are plain immutable data with structural equality — no behavior
//! attached. `PhotoRecord` and `Quote` are the serialized shapes of the
//! photo and quote stores; `TweetRecord` is one row of the append-only
//! audit log; `Job` is the fully prepared unit of work the dispatcher
//! consumes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for one downloaded photo, keyed by photo id in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub photographer: String,
    pub url: String,
    pub link: String,
}

/// One quotation. Store order is selection priority:
/// first-available-first-used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quotation text, without surrounding quotation marks.
    #[serde(rename = "Quote")]
    pub text: String,
    #[serde(rename = "Author")]
    pub author: String,
}

/// A fully prepared post: composed image on disk plus its caption.
///
/// Immutable once built; consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub photo_id: String,
    pub photographer: String,
    pub link: String,
    pub quote: String,
    pub author: String,
    /// Composed image in the ephemeral media directory.
    pub image_path: PathBuf,
    pub caption: String,
}

/// One row of the append-only posted-history log.
///
/// Field order is the CSV column order:
/// `created_at,tweet_id,photo_id,photographer,link,quote,author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRecord {
    pub created_at: String,
    pub tweet_id: String,
    pub photo_id: String,
    pub photographer: String,
    pub link: String,
    pub quote: String,
    pub author: String,
}
