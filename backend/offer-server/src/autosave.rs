//! Background task that writes the form draft once edits go quiet.
//!
//! The session publishes every effective change as a [`FormState`] snapshot
//! on a `watch` channel. Each new snapshot restarts the quiet period; when it
//! elapses only the latest snapshot is written. [`DraftFeed::clear`] drops
//! whatever is pending (used after the form is cleared or submitted).
//!
//! Writes and [`DraftFeed::clear`] take the same lock, and the task reads the
//! pending snapshot only once it holds it. A clear therefore lands after any
//! write already in flight, and no write starts from a snapshot taken before
//! the clear.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use offer_form::{encode_draft, FormState};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::persistence::DraftStore;

/// Sending half held by the session.
pub struct DraftFeed {
    changes: watch::Sender<Option<FormState>>,
    store: Arc<dyn DraftStore>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl DraftFeed {
    pub fn new(store: Arc<dyn DraftStore>, key: String) -> (Self, watch::Receiver<Option<FormState>>) {
        let (changes, receiver) = watch::channel(None);
        let feed = Self {
            changes,
            store,
            key,
            write_lock: Arc::new(Mutex::new(())),
        };
        (feed, receiver)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue `state` for the next write.
    pub fn queue(&self, state: FormState) {
        self.changes.send_replace(Some(state));
    }

    /// Drop the pending snapshot and delete the stored draft.
    pub async fn clear(&self) -> Result<()> {
        let _writing = self.write_lock.lock().await;
        self.changes.send_replace(None);
        self.store.remove(&self.key).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AutosaveTiming {
    pub debounce: Duration,
    pub indicator: Duration,
}

/// Read side of the "draft saved" indicator.
#[derive(Debug, Clone)]
pub struct SavedIndicator {
    saved_at: watch::Receiver<Option<Instant>>,
    window: Duration,
}

impl SavedIndicator {
    /// When the last successful write happened.
    pub fn last_saved(&self) -> Option<Instant> {
        *self.saved_at.borrow()
    }

    /// `true` while the indicator should be on.
    pub fn is_visible(&self) -> bool {
        self.last_saved().is_some_and(|at| at.elapsed() < self.window)
    }
}

pub struct Autosave {
    indicator: SavedIndicator,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Spawn the writer as a background [`tokio`] task.
pub fn spawn(store: Arc<dyn DraftStore>, key: String, timing: AutosaveTiming) -> (DraftFeed, Autosave) {
    let (feed, changes) = DraftFeed::new(store.clone(), key.clone());
    let (saved_tx, saved_at) = watch::channel(None);
    let cancel = CancellationToken::new();

    let task = tokio::spawn(run(
        Writer {
            store,
            key,
            lock: feed.write_lock.clone(),
        },
        timing.debounce,
        changes,
        saved_tx,
        cancel.clone(),
    ));

    let autosave = Autosave {
        indicator: SavedIndicator {
            saved_at,
            window: timing.indicator,
        },
        cancel,
        task,
    };
    (feed, autosave)
}

impl Autosave {
    pub fn indicator(&self) -> SavedIndicator {
        self.indicator.clone()
    }

    /// Stop the task. A pending draft is not written.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!("Autosave task ended abnormally: {e}");
        }
    }
}

struct Writer {
    store: Arc<dyn DraftStore>,
    key: String,
    lock: Arc<Mutex<()>>,
}

async fn run(
    writer: Writer,
    debounce: Duration,
    mut changes: watch::Receiver<Option<FormState>>,
    saved_at: watch::Sender<Option<Instant>>,
    cancel: CancellationToken,
) {
    info!(
        "Autosave started (key: {}, debounce: {debounce:?})",
        writer.key
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Each further change restarts the quiet period.
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Autosave cancelled with an unsaved change");
                    return;
                }
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = sleep(debounce) => break,
            }
        }

        let saved = {
            let _writing = writer.lock.lock().await;
            let pending = changes.borrow_and_update().clone();
            match pending {
                Some(state) => write(writer.store.as_ref(), &writer.key, &state).await,
                None => {
                    debug!("Pending draft dropped");
                    false
                }
            }
        };
        if saved {
            saved_at.send_replace(Some(Instant::now()));
        }
    }

    info!("Autosave stopped");
}

async fn write(store: &dyn DraftStore, key: &str, state: &FormState) -> bool {
    let raw = match encode_draft(state, Utc::now().timestamp_millis()) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Autosave could not encode the draft: {e}");
            return false;
        }
    };
    match store.save(key, &raw).await {
        Ok(()) => {
            debug!("Draft saved ({} bytes)", raw.len());
            true
        }
        Err(e) => {
            error!("Autosave write failed: {e}");
            false
        }
    }
}
