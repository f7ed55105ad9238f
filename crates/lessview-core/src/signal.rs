//! Change notification channels.
//!
//! A [`Signal`] carries one kind of notification from an owner (such as a
//! record list) to any number of listeners. Listeners are plain closures and
//! are called synchronously on the thread that calls [`Signal::emit`].
//!
//! Connecting returns a [`ConnectionId`] for later removal, or a
//! [`ConnectionGuard`] that removes the listener when it goes out of scope.
//!
//! # Re-entrancy
//!
//! The set of connected slots is snapshotted before the first slot runs and no
//! lock is held while slots execute. A slot may therefore connect, disconnect,
//! or emit on the same signal. Changes made by a slot take effect from the next
//! emission: a slot disconnected mid-emission still receives the current one.
//!
//! # Example
//!
//! ```
//! use lessview_core::Signal;
//!
//! let rows_changed = Signal::<usize>::new();
//! let listener = rows_changed.connect(|count| println!("{count} rows"));
//!
//! rows_changed.emit(3);
//! assert!(rows_changed.disconnect(listener));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle to one connected listener, returned by [`Signal::connect`].
    ///
    /// Handles are never reused: once disconnected, an id stays invalid even
    /// if its slot is recycled.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification channel delivering `&Args` to every connected listener.
///
/// `Signal` is `Send + Sync`; listeners run on whichever thread emits.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Creates a signal without listeners.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Adds a listener and returns its handle.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Adds a listener that stays connected until the returned guard drops.
    ///
    /// The guard borrows the signal, so it cannot outlive it.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: self.connect(slot),
        }
    }

    /// Removes a listener. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Removes every listener.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected listeners.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Drops emissions while `blocked` is set. Dropped emissions are not
    /// replayed on unblocking.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Returns `true` while emissions are being dropped.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Delivers `args` to the listeners connected at the time of the call, in
    /// the order they were connected.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "emit dropped while blocked");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, listeners = slots.len(), "emit");

        for slot in &slots {
            (**slot)(&args);
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

/// Keeps a listener connected for as long as the guard lives.
///
/// Returned by [`Signal::connect_scoped`].
///
/// ```
/// use lessview_core::Signal;
///
/// let saved = Signal::<String>::new();
/// {
///     let _log = saved.connect_scoped(|path| println!("saved {path}"));
///     assert_eq!(saved.connection_count(), 1);
/// }
/// assert_eq!(saved.connection_count(), 0);
/// ```
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// Handle of the guarded listener.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

impl<Args: 'static> fmt::Debug for ConnectionGuard<'_, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}
