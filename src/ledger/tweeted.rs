//! The posted-history store: an append-only CSV audit log.
//!
//! Columns: `created_at,tweet_id,photo_id,photographer,link,quote,author`.
//! The row count defines the running "post #N" sequence — the next
//! sequence number is row count + 1, computed once at preparation time
//! for a whole batch.

use super::LedgerError;
use crate::types::TweetRecord;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const COLUMNS: [&str; 7] = [
    "created_at",
    "tweet_id",
    "photo_id",
    "photographer",
    "link",
    "quote",
    "author",
];

#[derive(Debug)]
pub struct TweetedStore {
    path: PathBuf,
}

impl TweetedStore {
    /// Open the log, creating it with a header row when missing.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(COLUMNS)?;
            writer.flush()?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of posts recorded so far.
    pub fn count(&self) -> Result<u64, LedgerError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut count = 0u64;
        for row in reader.records() {
            row?;
            count += 1;
        }
        Ok(count)
    }

    /// Sequence number the next post will carry.
    pub fn next_sequence(&self) -> Result<u64, LedgerError> {
        Ok(self.count()? + 1)
    }

    /// Append one record. The log is never rewritten.
    pub fn append(&self, record: &TweetRecord) -> Result<(), LedgerError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn records(&self) -> Result<Vec<TweetRecord>, LedgerError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}
