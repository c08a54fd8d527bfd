//! Batch preparation: turns the next N quotes and photos into ready
//! [`Job`]s — composed image on disk, caption built, nothing consumed.
//!
//! Preparation peeks at the stores without mutating them; consumption is
//! deferred to [`crate::ledger::Ledger::commit_post`] after each post
//! succeeds. Availability is checked up front so a short store aborts
//! before any composed image exists.

use crate::caption::{CAPTION_BUDGET, build_caption};
use crate::compose::{AssetComposer, ComposeError};
use crate::ledger::{Ledger, LedgerError};
use crate::types::Job;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("Not enough quotes: requested {requested}, available {available}")]
    NotEnoughQuotes { requested: usize, available: usize },
    #[error("Not enough photos: requested {requested}, available {available}")]
    NotEnoughPhotos { requested: usize, available: usize },
    #[error("Photo file {0} has no ledger entry")]
    UnknownPhoto(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Prepare `count` jobs: pair the first `count` quotes with the first
/// `count` photos (file-name order), compose each image into
/// `media_dir`, and build each caption. Sequence numbers continue from
/// the posted-history row count, fixed for the whole batch here.
pub fn prepare_jobs(
    ledger: &Ledger,
    composer: &dyn AssetComposer,
    media_dir: &Path,
    count: usize,
    hashtags: &[String],
) -> Result<Vec<Job>, PrepareError> {
    let quotes = ledger.quotes.load()?;
    if quotes.len() < count {
        return Err(PrepareError::NotEnoughQuotes {
            requested: count,
            available: quotes.len(),
        });
    }
    let images = ledger.photos.image_files()?;
    if images.len() < count {
        return Err(PrepareError::NotEnoughPhotos {
            requested: count,
            available: images.len(),
        });
    }

    let base = ledger.tweeted.count()?;
    fs::create_dir_all(media_dir).map_err(LedgerError::from)?;

    let mut jobs = Vec::with_capacity(count);
    for (i, (quote, image)) in quotes.into_iter().zip(images).take(count).enumerate() {
        let photo_id = image
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| PrepareError::UnknownPhoto(image.display().to_string()))?;
        let record = ledger
            .photos
            .get(&photo_id)
            .ok_or_else(|| PrepareError::UnknownPhoto(photo_id.clone()))?
            .clone();

        let sequence = base + i as u64 + 1;
        let image_path = media_dir.join(format!("{sequence}.jpg"));
        info!(photo_id = %photo_id, sequence, "composing post image");
        composer.compose_file(&image, &quote.text, &quote.author, &image_path)?;

        let caption = build_caption(
            sequence,
            &record.photographer,
            &record.link,
            hashtags,
            CAPTION_BUDGET,
        );
        jobs.push(Job {
            photo_id,
            photographer: record.photographer,
            link: record.link,
            quote: quote.text,
            author: quote.author,
            image_path,
            caption,
        });
    }
    Ok(jobs)
}
