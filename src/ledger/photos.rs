//! The downloaded-photos store: a JSON map of photo id to metadata,
//! living next to the photo JPEGs it describes.
//!
//! Invariant: one JPEG per undeleted entry. A photo is consumed by
//! deleting both the file and the entry, which happens only through the
//! post-commit path in [`super::Ledger`].

use super::{LedgerError, write_atomic};
use crate::types::PhotoRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the store file within the photo directory.
pub const STORE_FILENAME: &str = "downloaded_photos.json";

#[derive(Debug)]
pub struct PhotosStore {
    dir: PathBuf,
    entries: HashMap<String, PhotoRecord>,
}

impl PhotosStore {
    /// Open the store in `dir`, creating the directory and an empty
    /// store file when missing.
    pub fn open(dir: &Path) -> Result<Self, LedgerError> {
        let path = dir.join(STORE_FILENAME);
        if !path.exists() {
            fs::create_dir_all(dir)?;
            let store = Self {
                dir: dir.to_path_buf(),
                entries: HashMap::new(),
            };
            store.save()?;
            return Ok(store);
        }
        let content = fs::read_to_string(&path)?;
        let entries: HashMap<String, PhotoRecord> = serde_json::from_str(&content)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PhotoRecord> {
        self.entries.get(id)
    }

    /// Keep only the requested photos not already present.
    ///
    /// This is the idempotence rule for downloads: re-requesting a set
    /// of ids that is fully present yields an empty plan and mutates
    /// nothing.
    pub fn plan_downloads(
        &self,
        requested: Vec<(String, PhotoRecord)>,
    ) -> Vec<(String, PhotoRecord)> {
        requested
            .into_iter()
            .filter(|(id, _)| !self.entries.contains_key(id))
            .collect()
    }

    /// Record a downloaded photo. Never overwrites an existing entry.
    pub fn insert(&mut self, id: String, record: PhotoRecord) {
        self.entries.entry(id).or_insert(record);
    }

    pub fn remove(&mut self, id: &str) -> Option<PhotoRecord> {
        self.entries.remove(id)
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.dir.join(STORE_FILENAME), json.as_bytes())?;
        Ok(())
    }

    /// Path of the backing JPEG for a photo id.
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.jpg"))
    }

    /// All JPEGs currently present in the photo directory, sorted by
    /// file name for a stable preparation order.
    pub fn image_files(&self) -> Result<Vec<PathBuf>, LedgerError> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("jpg"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}
