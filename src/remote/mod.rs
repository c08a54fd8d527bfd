//! External collaborators: the photo provider, the quote source, and
//! the posting API.
//!
//! Each collaborator sits behind a trait so the pipeline can be
//! exercised with mocks; the production implementations are thin
//! blocking `reqwest` clients. Failures here are fatal for the current
//! operation — there are no retries at either network boundary.

pub mod photos;
pub mod poster;
pub mod quotes;

use crate::ledger::LedgerError;
use thiserror::Error;

pub use photos::{
    FetchReport, Orientation, PhotoFilters, PhotoProvider, PhotoSize, UnsplashClient, fetch_photos,
};
pub use poster::{HttpPoster, MediaHandle, Poster};
pub use quotes::{QuoteSource, WebQuoteSource};

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{status} error from provider: {message}")]
    Provider { status: u16, message: String },
    #[error("Provider response carries no url for size {0:?}")]
    MissingSize(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
