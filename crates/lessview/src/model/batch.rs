//! Notification batching.
//!
//! A batch is a scope in which per-item notifications are held back. When the
//! outermost scope closes, a single [`ListChange::Reset`] is emitted if anything
//! changed inside it. Scopes nest; only the outermost one flushes.

use std::fmt;

use lessview_core::logging::targets;
use parking_lot::Mutex;

use super::signals::{ListChange, ListSignals};

#[derive(Debug, Default)]
struct BatchState {
    depth: usize,
    dirty: bool,
}

/// Routes changes to listeners, coalescing them while a batch is open.
#[derive(Debug, Default)]
pub(crate) struct ChangeNotifier {
    signals: ListSignals,
    batch: Mutex<BatchState>,
}

impl ChangeNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// Emits `change`, or records it for the enclosing batch.
    pub(crate) fn notify(&self, change: ListChange) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.dirty = true;
                tracing::trace!(target: targets::MODEL, %change, "change suppressed by batch");
                return;
            }
        }
        self.signals.list_changed.emit(change);
    }

    pub(crate) fn begin(&self) -> BatchGuard<'_> {
        self.batch.lock().depth += 1;
        BatchGuard { notifier: self }
    }

    pub(crate) fn is_batching(&self) -> bool {
        self.batch.lock().depth > 0
    }

    fn mark_dirty(&self) {
        self.batch.lock().dirty = true;
    }

    fn end(&self) {
        let flush = {
            let mut batch = self.batch.lock();
            batch.depth -= 1;
            if batch.depth == 0 && batch.dirty {
                batch.dirty = false;
                true
            } else {
                false
            }
        };
        if flush {
            self.signals.list_changed.emit(ListChange::Reset);
        }
    }
}

/// An open notification batch.
///
/// Created by [`SortableList::batch`](super::SortableList::batch). Dropping the
/// guard closes the batch, including when unwinding from a panic.
///
/// # Example
///
/// ```
/// use lessview::model::SortableList;
///
/// let list = SortableList::new(vec![1, 2, 3]);
/// {
///     let _batch = list.batch();
///     list.push(4);
///     list.push(5);
/// } // one Reset is emitted here instead of two ItemAdded
/// assert_eq!(list.len(), 5);
/// ```
#[must_use = "the batch closes as soon as the guard is dropped"]
pub struct BatchGuard<'a> {
    notifier: &'a ChangeNotifier,
}

impl BatchGuard<'_> {
    /// Forces a reset when the outermost batch closes, even if no
    /// notification was suppressed.
    pub fn invalidate(&self) {
        self.notifier.mark_dirty();
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.notifier.end();
    }
}

impl fmt::Debug for BatchGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchGuard").finish_non_exhaustive()
    }
}
