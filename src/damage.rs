//! Damage tracking: invalidated rectangles plus a best-effort refresh signal.
//!
//! The tracker is the *damage scope*. Its lock guards only the dirty list
//! and the refresh signal and never calls back into widgets, so it can be
//! taken while the compositor's tree lock is held, but never the reverse.

use crate::layout::Rect;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Accumulates dirty rectangles between render passes.
#[derive(Debug)]
pub struct DamageTracker {
    dirty: Mutex<Vec<Rect>>,
    refresh_tx: Sender<()>,
    refresh_rx: Receiver<()>,
}

impl DamageTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        // One slot: a pending refresh already covers any later damage.
        let (refresh_tx, refresh_rx) = bounded(1);
        Self {
            dirty: Mutex::new(Vec::new()),
            refresh_tx,
            refresh_rx,
        }
    }

    /// Record `rect` as needing a redraw and ping the refresh signal.
    ///
    /// Empty rectangles are dropped.
    pub fn invalidate(&self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut dirty = self.dirty.lock().unwrap_or_else(PoisonError::into_inner);
        dirty.push(rect);
        // Full means a refresh is already pending.
        let _ = self.refresh_tx.try_send(());
    }

    /// Take the pending dirty list, leaving it empty.
    pub fn take(&self) -> Vec<Rect> {
        let mut dirty = self.dirty.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *dirty)
    }

    /// Number of rectangles waiting for the next render.
    pub fn pending(&self) -> usize {
        self.dirty.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Ping the refresh signal without recording damage.
    pub fn request_refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// A receiver for the refresh signal.
    ///
    /// Delivery is not guaranteed and several invalidations may collapse
    /// into one notification; treat it as a hint to render.
    pub fn refresh_signal(&self) -> Receiver<()> {
        self.refresh_rx.clone()
    }
}

impl Default for DamageTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle through which widgets report damage.
///
/// The compositor hands one to every widget that implements
/// [`InvalidationAware`](crate::widget::InvalidationAware).
#[derive(Clone, Debug)]
pub struct Invalidator {
    tracker: Arc<DamageTracker>,
}

impl Invalidator {
    /// Create a handle reporting into `tracker`.
    pub const fn new(tracker: Arc<DamageTracker>) -> Self {
        Self { tracker }
    }

    /// Mark `rect` as needing a redraw.
    #[inline]
    pub fn invalidate(&self, rect: Rect) {
        self.tracker.invalidate(rect);
    }
}
