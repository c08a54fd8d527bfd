//! End-to-end lifecycle through the public API: seed the three stores,
//! prepare a batch, drive the dispatcher with a mock poster, and check
//! that exactly the posted resources were consumed.
//!
//! Rendering is stubbed (no font asset in the test environment); the
//! composition pipeline itself is covered by the unit tests in
//! `compose`. Batches are a single job each because the dispatcher
//! waits a day between firings.

use chrono::{Duration as ChronoDuration, Local};
use quotidian::compose::{AssetComposer, ComposeError};
use quotidian::dispatch::{CancelToken, Dispatcher, Outcome};
use quotidian::ledger::Ledger;
use quotidian::prepare::prepare_jobs;
use quotidian::remote::{MediaHandle, Poster, RemoteError};
use quotidian::types::{PhotoRecord, Quote};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

struct StubComposer;

impl AssetComposer for StubComposer {
    fn compose_file(
        &self,
        image: &Path,
        _quote: &str,
        _author: &str,
        save: &Path,
    ) -> Result<(), ComposeError> {
        std::fs::copy(image, save)?;
        Ok(())
    }
}

struct RecordingPoster {
    posts: Mutex<Vec<String>>,
}

impl RecordingPoster {
    fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
        }
    }
}

impl Poster for RecordingPoster {
    fn upload_media(&self, _bytes: &[u8]) -> Result<MediaHandle, RemoteError> {
        Ok(MediaHandle("media-1".into()))
    }

    fn create_post(&self, caption: &str, _media: &MediaHandle) -> Result<String, RemoteError> {
        let mut posts = self.posts.lock().unwrap();
        posts.push(caption.to_string());
        Ok(format!("post-{}", posts.len()))
    }
}

fn seed(tmp: &TempDir, photos: u32, quotes: u32) -> Ledger {
    let mut ledger = Ledger::open(
        &tmp.path().join("photos"),
        &tmp.path().join("quotes.csv"),
        &tmp.path().join("tweeted.csv"),
    )
    .unwrap();
    for n in 1..=photos {
        let id = format!("photo-{n}");
        std::fs::write(ledger.photos.image_path(&id), format!("jpeg {n}")).unwrap();
        ledger.photos.insert(
            id,
            PhotoRecord {
                photographer: format!("Photographer {n}"),
                url: format!("https://images.example/raw/{n}"),
                link: format!("https://images.example/photos/{n}"),
            },
        );
    }
    ledger.photos.save().unwrap();
    let rows: Vec<Quote> = (1..=quotes)
        .map(|n| Quote {
            text: format!("Quote number {n}"),
            author: format!("Author {n}"),
        })
        .collect();
    ledger.quotes.save(&rows).unwrap();
    ledger
}

fn post_one(ledger: &mut Ledger, poster: &RecordingPoster, media_dir: &Path) {
    let jobs = prepare_jobs(ledger, &StubComposer, media_dir, 1, &[]).unwrap();
    let fire = (Local::now() + ChronoDuration::seconds(1)).time();
    let report = Dispatcher::new(ledger, poster, fire, CancelToken::new())
        .run(jobs, media_dir, &mut Cursor::new("yes\n"))
        .unwrap();
    assert_eq!(report.outcome, Outcome::Drained);
    assert_eq!(report.fired, 1);
}

#[test]
fn posting_consumes_exactly_the_posted_pair() {
    let tmp = TempDir::new().unwrap();
    let mut ledger = seed(&tmp, 3, 3);
    let media_dir = tmp.path().join("media");
    let poster = RecordingPoster::new();

    post_one(&mut ledger, &poster, &media_dir);

    // The first photo/quote pair is gone, the rest remain.
    assert_eq!(ledger.photos.len(), 2);
    assert!(!ledger.photos.contains("photo-1"));
    assert!(!ledger.photos.image_path("photo-1").exists());
    assert!(ledger.photos.image_path("photo-2").exists());
    let remaining = ledger.quotes.load().unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].text, "Quote number 2");

    // One audit row, carrying the post id and the consumed pair.
    let history = ledger.tweeted.records().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].tweet_id, "post-1");
    assert_eq!(history[0].photo_id, "photo-1");
    assert_eq!(history[0].quote, "Quote number 1");
    assert_eq!(history[0].photographer, "Photographer 1");

    // Scratch media cleaned up on drain.
    assert!(!media_dir.exists());
}

#[test]
fn successive_runs_continue_the_sequence() {
    let tmp = TempDir::new().unwrap();
    let mut ledger = seed(&tmp, 2, 2);
    let media_dir = tmp.path().join("media");
    let poster = RecordingPoster::new();

    post_one(&mut ledger, &poster, &media_dir);
    post_one(&mut ledger, &poster, &media_dir);

    let posts = poster.posts.lock().unwrap();
    assert!(posts[0].starts_with("Quote Of The Day #1\n"));
    assert!(posts[1].starts_with("Quote Of The Day #2\n"));

    // Queue fully drained.
    assert!(ledger.photos.is_empty());
    assert!(ledger.quotes.load().unwrap().is_empty());
    assert_eq!(ledger.tweeted.count().unwrap(), 2);
}

#[test]
fn declined_run_consumes_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut ledger = seed(&tmp, 2, 2);
    let media_dir = tmp.path().join("media");
    let poster = RecordingPoster::new();

    let jobs = prepare_jobs(&ledger, &StubComposer, &media_dir, 2, &[]).unwrap();
    let fire = (Local::now() + ChronoDuration::seconds(1)).time();
    let report = Dispatcher::new(&mut ledger, &poster, fire, CancelToken::new())
        .run(jobs, &media_dir, &mut Cursor::new("no\n"))
        .unwrap();

    assert_eq!(report.fired, 0);
    assert!(poster.posts.lock().unwrap().is_empty());
    assert_eq!(ledger.photos.len(), 2);
    assert_eq!(ledger.quotes.load().unwrap().len(), 2);
    assert_eq!(ledger.tweeted.count().unwrap(), 0);
    assert!(!media_dir.exists());
}
