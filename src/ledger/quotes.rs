//! The quotes store: a `Quote,Author` CSV whose row order is selection
//! priority.
//!
//! Preparation only peeks; rows are removed one at a time as posts
//! succeed, by exact match on the quote text. The original ledger this
//! replaces removed rows by substring containment, which could take
//! unrelated quotes with it — exact equality is the deliberate fix.

use super::{LedgerError, write_atomic};
use crate::types::Quote;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct QuotesStore {
    path: PathBuf,
}

impl QuotesStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All quotes, in priority order.
    pub fn load(&self) -> Result<Vec<Quote>, LedgerError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut quotes = Vec::new();
        for row in reader.deserialize() {
            quotes.push(row?);
        }
        Ok(quotes)
    }

    /// Rewrite the whole store.
    pub fn save(&self, quotes: &[Quote]) -> Result<(), LedgerError> {
        let bytes = to_csv(quotes)?;
        write_atomic(&self.path, &bytes)?;
        Ok(())
    }

    /// Remove the first `count` quotes and return them.
    pub fn take(&self, count: usize) -> Result<Vec<Quote>, LedgerError> {
        let mut quotes = self.load()?;
        let tail = quotes.split_off(count.min(quotes.len()));
        self.save(&tail)?;
        Ok(quotes)
    }

    /// Remove every row whose quote text equals `text` exactly.
    /// Returns true when something was removed.
    pub fn remove(&self, text: &str) -> Result<bool, LedgerError> {
        let quotes = self.load()?;
        let before = quotes.len();
        let kept: Vec<Quote> = quotes.into_iter().filter(|q| q.text != text).collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.save(&kept)?;
        Ok(true)
    }
}

fn to_csv(quotes: &[Quote]) -> Result<Vec<u8>, LedgerError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        if quotes.is_empty() {
            // serde only emits headers alongside the first record
            writer.write_record(["Quote", "Author"])?;
        }
        for quote in quotes {
            writer.serialize(quote)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quote(text: &str, author: &str) -> Quote {
        Quote {
            text: text.into(),
            author: author.into(),
        }
    }

    fn store_with(quotes: &[Quote]) -> (TempDir, QuotesStore) {
        let tmp = TempDir::new().unwrap();
        let store = QuotesStore::new(&tmp.path().join("quotes.csv"));
        store.save(quotes).unwrap();
        (tmp, store)
    }

    // =========================================================================
    // Roundtrip
    // =========================================================================

    #[test]
    fn save_and_load_preserve_order() {
        let quotes = vec![
            quote("Into the forest I go", "John Muir"),
            quote("The mountains are calling", "John Muir"),
            quote("Adopt the pace of nature", "Ralph Waldo Emerson"),
        ];
        let (_tmp, store) = store_with(&quotes);
        assert_eq!(store.load().unwrap(), quotes);
    }

    #[test]
    fn header_row_is_quote_author() {
        let (tmp, store) = store_with(&[quote("a", "b")]);
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("Quote,Author"));
        drop(tmp);
    }

    #[test]
    fn commas_and_quotes_in_text_survive() {
        let tricky = vec![quote("Trees, rivers, \"stone\"", "A, B")];
        let (_tmp, store) = store_with(&tricky);
        assert_eq!(store.load().unwrap(), tricky);
    }

    #[test]
    fn empty_store_roundtrips() {
        let (_tmp, store) = store_with(&[]);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = QuotesStore::new(&tmp.path().join("absent.csv"));
        assert!(store.load().is_err());
    }

    // =========================================================================
    // Take
    // =========================================================================

    #[test]
    fn take_returns_head_and_rewrites_tail() {
        let (_tmp, store) = store_with(&[quote("a", "1"), quote("b", "2"), quote("c", "3")]);
        let taken = store.take(2).unwrap();
        assert_eq!(taken, vec![quote("a", "1"), quote("b", "2")]);
        assert_eq!(store.load().unwrap(), vec![quote("c", "3")]);
    }

    #[test]
    fn take_more_than_available_empties_store() {
        let (_tmp, store) = store_with(&[quote("a", "1")]);
        let taken = store.take(5).unwrap();
        assert_eq!(taken.len(), 1);
        assert!(store.load().unwrap().is_empty());
    }

    // =========================================================================
    // Removal
    // =========================================================================

    #[test]
    fn remove_exact_match_only() {
        // "Life is good" must not remove "Life is good enough".
        let (_tmp, store) = store_with(&[
            quote("Life is good", "A"),
            quote("Life is good enough", "B"),
        ]);
        assert!(store.remove("Life is good").unwrap());
        assert_eq!(
            store.load().unwrap(),
            vec![quote("Life is good enough", "B")]
        );
    }

    #[test]
    fn remove_missing_text_is_noop() {
        let (_tmp, store) = store_with(&[quote("a", "1")]);
        assert!(!store.remove("zzz").unwrap());
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
