//! The scheduling loop: confirm a prepared batch, then post one job per
//! day at the configured fire time until the batch drains.
//!
//! Waiting is condvar-based so a cancellation (Ctrl-C) wakes the loop
//! immediately instead of being noticed on the next poll. The composed
//! media directory is removed on every terminal outcome — drained,
//! declined, or cancelled — but left in place when a run fails, so the
//! failure can be inspected.

use crate::ledger::{Ledger, LedgerError};
use crate::remote::{Poster, RemoteError};
use crate::types::Job;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Shared cancellation flag, signalled from another thread (the Ctrl-C
/// handler) and observed by the waiting dispatch loop.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock().unwrap() = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap()
    }

    /// Block for up to `timeout`. Returns false when the wait ended
    /// because of a cancellation.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let mut cancelled = flag.lock().unwrap();
        while !*cancelled {
            let (guard, result) = condvar.wait_timeout(cancelled, timeout).unwrap();
            cancelled = guard;
            if result.timed_out() {
                return !*cancelled;
            }
        }
        false
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The wall-clock instant of the next firing: today at `fire` if that is
/// still ahead, otherwise tomorrow at `fire`.
pub fn next_fire(now: NaiveDateTime, fire: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(fire);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// How a dispatch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every job was posted (or the batch was declined before starting).
    Drained,
    /// A cancellation stopped the run between posts.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub fired: usize,
}

/// Drives a prepared batch through daily posting.
pub struct Dispatcher<'a, P: Poster> {
    ledger: &'a mut Ledger,
    poster: &'a P,
    fire_time: NaiveTime,
    cancel: CancelToken,
}

impl<'a, P: Poster> Dispatcher<'a, P> {
    pub fn new(
        ledger: &'a mut Ledger,
        poster: &'a P,
        fire_time: NaiveTime,
        cancel: CancelToken,
    ) -> Self {
        Self {
            ledger,
            poster,
            fire_time,
            cancel,
        }
    }

    /// Preview the batch, ask for confirmation on `input`, then post one
    /// job per firing. Returns how the run ended and how many jobs fired.
    pub fn run(
        &mut self,
        jobs: Vec<Job>,
        media_dir: &Path,
        input: &mut dyn BufRead,
    ) -> Result<RunReport, DispatchError> {
        for (i, job) in jobs.iter().enumerate() {
            println!("--- post {} of {} ---", i + 1, jobs.len());
            println!("image: {}", job.image_path.display());
            println!("{}", job.caption);
        }
        println!(
            "Post these {} job(s) daily at {}? (yes/no)",
            jobs.len(),
            self.fire_time.format("%H:%M")
        );
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if answer.trim() != "yes" {
            warn!("batch declined, nothing will be posted");
            remove_media_dir(media_dir)?;
            return Ok(RunReport {
                outcome: Outcome::Drained,
                fired: 0,
            });
        }

        let mut fired = 0;
        for job in &jobs {
            if !self.wait_until_fire() {
                warn!(fired, "dispatch cancelled");
                remove_media_dir(media_dir)?;
                return Ok(RunReport {
                    outcome: Outcome::Cancelled,
                    fired,
                });
            }
            self.fire(job)?;
            fired += 1;
        }

        info!(fired, "batch drained");
        remove_media_dir(media_dir)?;
        Ok(RunReport {
            outcome: Outcome::Drained,
            fired,
        })
    }

    /// Sleep until the next fire instant. Returns false when cancelled.
    /// The target is recomputed against the wall clock after every slice
    /// so a suspended machine does not fire early or twice.
    fn wait_until_fire(&self) -> bool {
        let target = next_fire(Local::now().naive_local(), self.fire_time);
        info!(at = %target, "waiting for next firing");
        loop {
            let now = Local::now().naive_local();
            if now >= target {
                return !self.cancel.is_cancelled();
            }
            let remaining = (target - now)
                .to_std()
                .unwrap_or(Duration::from_millis(0))
                .min(Duration::from_millis(250));
            if !self.cancel.wait_for(remaining) {
                return false;
            }
        }
    }

    fn fire(&mut self, job: &Job) -> Result<(), DispatchError> {
        info!(photo_id = %job.photo_id, "posting");
        let bytes = fs::read(&job.image_path)?;
        let media = self.poster.upload_media(&bytes)?;
        let post_id = self.poster.create_post(&job.caption, &media)?;
        self.ledger.commit_post(job, &post_id)?;
        info!(post_id = %post_id, "posted and committed");
        Ok(())
    }
}

fn remove_media_dir(media_dir: &Path) -> Result<(), DispatchError> {
    match fs::remove_dir_all(media_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
