//! Change notifications emitted by list models.

use std::fmt;

use lessview_core::Signal;

/// The kind of structural change a list reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListChangeKind {
    /// A record was added.
    ItemAdded,
    /// A record was removed.
    ItemRemoved,
    /// A record was replaced or modified in place.
    ItemChanged,
    /// The whole list must be re-read.
    Reset,
}

/// A single change notification.
///
/// Per-item changes carry the row they affect. `Reset` carries no row: after
/// a reset, listeners should treat every row as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListChange {
    /// A record was added at the given row.
    ItemAdded(usize),
    /// The record at the given row was removed.
    ItemRemoved(usize),
    /// The record at the given row changed.
    ItemChanged(usize),
    /// The list was reordered or rebuilt.
    Reset,
}

impl ListChange {
    /// Returns the kind of this change.
    pub fn kind(&self) -> ListChangeKind {
        match self {
            ListChange::ItemAdded(_) => ListChangeKind::ItemAdded,
            ListChange::ItemRemoved(_) => ListChangeKind::ItemRemoved,
            ListChange::ItemChanged(_) => ListChangeKind::ItemChanged,
            ListChange::Reset => ListChangeKind::Reset,
        }
    }

    /// Returns the affected row, or `None` for a reset.
    pub fn index(&self) -> Option<usize> {
        match *self {
            ListChange::ItemAdded(row) | ListChange::ItemRemoved(row) | ListChange::ItemChanged(row) => {
                Some(row)
            }
            ListChange::Reset => None,
        }
    }

    /// Returns `true` if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self, ListChange::Reset)
    }
}

impl fmt::Display for ListChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListChange::ItemAdded(row) => write!(f, "item added at {row}"),
            ListChange::ItemRemoved(row) => write!(f, "item removed at {row}"),
            ListChange::ItemChanged(row) => write!(f, "item changed at {row}"),
            ListChange::Reset => write!(f, "list reset"),
        }
    }
}

/// Signals emitted by list models.
///
/// Views connect to these signals to stay synchronized with the list.
#[derive(Debug, Default)]
pub struct ListSignals {
    /// Emitted after every externally visible change.
    pub list_changed: Signal<ListChange>,
}

impl ListSignals {
    /// Creates a new set of signals with no connections.
    pub fn new() -> Self {
        Self::default()
    }
}
