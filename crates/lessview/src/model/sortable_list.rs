//! Observable, sortable list model.
//!
//! `SortableList<T>` keeps an ordered sequence of records, can reorder it by any
//! registered field, and can always return to the order it was built with.
//! Every externally visible change is announced through [`ListSignals`].

use std::fmt;

use lessview_core::logging::targets;
use lessview_core::{ConnectionId, PerfSpan};
use parking_lot::RwLock;

use super::batch::{BatchGuard, ChangeNotifier};
use super::error::{ListError, Result};
use super::field::{FieldComparator, SortDirection, SortField};
use super::signals::{ListChange, ListSignals};
use super::value::FieldValue;

/// Type alias for a boxed change listener.
type Listener = Box<dyn Fn(&ListChange) + Send + Sync>;

struct SortState<T> {
    field: Option<SortField<T>>,
    direction: SortDirection,
}

impl<T> Default for SortState<T> {
    fn default() -> Self {
        Self {
            field: None,
            direction: SortDirection::Ascending,
        }
    }
}

/// A list of records that can be sorted by field and restored to its
/// original order, with change notifications.
///
/// # Ordering
///
/// The list is always in one of two states:
///
/// - **Unsorted**: records are in the order the list was built with, followed
///   by any records added since.
/// - **Sorted**: records are in the order imposed by the last
///   [`apply_sort`](Self::apply_sort). Sorting is stable.
///
/// Adding or replacing records while sorted does not re-sort them.
/// [`remove_sort`](Self::remove_sort) rebuilds the list from the records it
/// was constructed with, discarding later additions and removals.
///
/// # Notifications
///
/// Single-record mutations emit `ItemAdded`, `ItemRemoved` or `ItemChanged`.
/// Construction, sorting and removing the sort each emit exactly one `Reset`.
/// Inside a [`batch`](Self::batch) all notifications are coalesced into one
/// `Reset` when the batch closes.
///
/// No lock is held while listeners run, so a listener may read or mutate the
/// list. Field accessors run while the list is locked and must not touch it.
///
/// # Example
///
/// ```
/// use lessview::model::{FieldValue, SortDirection, SortField, SortableList};
///
/// #[derive(Clone)]
/// struct FileRow {
///     name: String,
///     size: u64,
/// }
///
/// let list = SortableList::builder(vec![
///     FileRow { name: "b.dll".into(), size: 30 },
///     FileRow { name: "a.exe".into(), size: 120 },
/// ])
/// .field(SortField::new("name", |r: &FileRow| FieldValue::from(&r.name)).unwrap())
/// .field(SortField::new("size", |r: &FileRow| FieldValue::from(r.size)).unwrap())
/// .build()
/// .unwrap();
///
/// list.apply_sort("name", SortDirection::Ascending).unwrap();
/// assert_eq!(list.get(0).unwrap().name, "a.exe");
///
/// list.remove_sort();
/// assert_eq!(list.get(0).unwrap().name, "b.dll");
/// ```
pub struct SortableList<T> {
    items: RwLock<Vec<T>>,
    /// The records the list was built with; read-only after construction.
    original: Vec<T>,
    fields: RwLock<Vec<SortField<T>>>,
    sort: RwLock<SortState<T>>,
    notifier: ChangeNotifier,
}

impl<T: Clone + Send + Sync + 'static> SortableList<T> {
    /// Creates a list holding its own copy of `items`, in iteration order.
    ///
    /// The construction `Reset` fires before any listener can be connected;
    /// use [`builder`](Self::builder) to observe it.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let list = Self::empty_with(items.into_iter().collect(), Vec::new());
        list.reset_from_original();
        list
    }

    /// Starts building a list from `items`.
    pub fn builder(items: impl IntoIterator<Item = T>) -> SortableListBuilder<T> {
        SortableListBuilder::new(items)
    }

    fn empty_with(original: Vec<T>, fields: Vec<SortField<T>>) -> Self {
        Self {
            items: RwLock::new(Vec::with_capacity(original.len())),
            original,
            fields: RwLock::new(fields),
            sort: RwLock::new(SortState::default()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Replaces the contents with a fresh copy of the original records.
    fn reset_from_original(&self) {
        let batch = self.notifier.begin();
        {
            let mut items = self.items.write();
            items.clear();
            items.extend(self.original.iter().cloned());
        }
        batch.invalidate();
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Returns the signals for this list.
    pub fn signals(&self) -> &ListSignals {
        self.notifier.signals()
    }

    /// Connects a change listener. Shorthand for
    /// `signals().list_changed.connect(..)`.
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&ListChange) + Send + Sync + 'static,
    {
        self.signals().list_changed.connect(listener)
    }

    /// Disconnects a change listener.
    ///
    /// Returns `true` if the listener was connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.signals().list_changed.disconnect(id)
    }

    /// Opens a notification batch.
    ///
    /// Until the returned guard (and any enclosing guard) is dropped, changes
    /// are not announced individually. If anything changed, one `Reset` is
    /// emitted when the outermost guard drops.
    pub fn batch(&self) -> BatchGuard<'_> {
        self.notifier.begin()
    }

    /// Returns `true` while a batch is open.
    pub fn is_batching(&self) -> bool {
        self.notifier.is_batching()
    }

    // -------------------------------------------------------------------------
    // Fields and sorting
    // -------------------------------------------------------------------------

    /// Registers a sortable field, replacing any field with the same name.
    pub fn register_field(&self, field: SortField<T>) {
        let mut fields = self.fields.write();
        match fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }

    /// Returns the registered field with the given name.
    pub fn field(&self, name: &str) -> Option<SortField<T>> {
        self.fields.read().iter().find(|f| f.name() == name).cloned()
    }

    /// Returns the names of all registered fields, in registration order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.read().iter().map(|f| f.name().to_string()).collect()
    }

    /// Sorts the list by the registered field `name`.
    ///
    /// Fails with [`ListError::InvalidArgument`] if no such field is
    /// registered; the list is left untouched in that case.
    pub fn apply_sort(&self, name: &str, direction: SortDirection) -> Result<()> {
        let field = self.field(name).ok_or_else(|| {
            ListError::invalid_argument(format!("no sortable field named '{name}'"))
        })?;
        self.apply_sort_by(field, direction);
        Ok(())
    }

    /// Sorts the list by `field`, which need not be registered.
    ///
    /// Emits exactly one `Reset` once the reorder is complete. If an accessor
    /// panics, the previous sort state is kept and the `Reset` is still
    /// emitted while unwinding.
    pub fn apply_sort_by(&self, field: SortField<T>, direction: SortDirection) {
        let _span = PerfSpan::new("apply_sort");
        let comparator = FieldComparator::new(field.clone(), direction);

        let batch = self.notifier.begin();
        batch.invalidate();
        let count = {
            let mut items = self.items.write();
            comparator.sort(&mut items);
            items.len()
        };
        // Committed only once the reorder finished.
        {
            let mut sort = self.sort.write();
            sort.field = Some(field);
            sort.direction = direction;
        }
        drop(batch);

        tracing::debug!(
            target: targets::MODEL,
            field = comparator.field().name(),
            %direction,
            count,
            "sort applied"
        );
    }

    /// Sorts by the current field in the opposite direction.
    ///
    /// Returns `false` (and does nothing) if the list is not sorted.
    pub fn reverse_sort(&self) -> bool {
        let current = {
            let sort = self.sort.read();
            sort.field.clone().map(|field| (field, sort.direction))
        };
        match current {
            Some((field, direction)) => {
                self.apply_sort_by(field, direction.reversed());
                true
            }
            None => false,
        }
    }

    /// Restores the original record order and clears the sort field.
    ///
    /// Emits exactly one `Reset`, also when the list was not sorted. The
    /// last sort direction is kept and still reported by
    /// [`sort_direction`](Self::sort_direction).
    pub fn remove_sort(&self) {
        let _span = PerfSpan::new("remove_sort");
        let batch = self.notifier.begin();
        self.reset_from_original();
        self.sort.write().field = None;
        batch.invalidate();

        tracing::debug!(target: targets::MODEL, count = self.original.len(), "sort removed");
    }

    /// Returns `true` if a sort field is active.
    pub fn is_sorted(&self) -> bool {
        self.sort.read().field.is_some()
    }

    /// Returns the active sort field, if any.
    pub fn sort_field(&self) -> Option<SortField<T>> {
        self.sort.read().field.clone()
    }

    /// Returns the last applied sort direction.
    ///
    /// Only meaningful while sorted; a new list reports `Ascending`.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort.read().direction
    }

    // -------------------------------------------------------------------------
    // Sequence access
    // -------------------------------------------------------------------------

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list has no records.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a copy of the record at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Reads `field` from the record at `index`.
    pub fn value(&self, index: usize, field: &SortField<T>) -> Option<FieldValue> {
        self.items.read().get(index).map(|item| field.value(item))
    }

    /// Returns a read guard over the records.
    ///
    /// Do not mutate the list while holding the guard.
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }

    /// Returns a copy of the records in current order.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().clone()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Appends a record. Emits `ItemAdded` with the new last row.
    pub fn push(&self, item: T) {
        let row = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        self.notifier.notify(ListChange::ItemAdded(row));
    }

    /// Inserts a record at `index`. Emits `ItemAdded`.
    ///
    /// Fails with [`ListError::IndexOutOfRange`] if `index > len()`.
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        {
            let mut items = self.items.write();
            if index > items.len() {
                return Err(ListError::index_out_of_range(index, items.len()));
            }
            items.insert(index, item);
        }
        self.notifier.notify(ListChange::ItemAdded(index));
        Ok(())
    }

    /// Appends every record from `iter` inside a batch.
    ///
    /// Emits one `Reset` if at least one record was added.
    pub fn extend(&self, iter: impl IntoIterator<Item = T>) {
        let _batch = self.notifier.begin();
        for item in iter {
            self.push(item);
        }
    }

    /// Removes and returns the record at `index`. Emits `ItemRemoved`.
    ///
    /// Returns `None`, without notifying, if `index` is out of range.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.notifier.notify(ListChange::ItemRemoved(index));
        }
        removed
    }

    /// Replaces the record at `index`, returning the previous one. Emits
    /// `ItemChanged`.
    ///
    /// Returns `None`, without notifying, if `index` is out of range.
    pub fn set(&self, index: usize, item: T) -> Option<T> {
        let previous = {
            let mut items = self.items.write();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item)
        };
        self.notifier.notify(ListChange::ItemChanged(index));
        Some(previous)
    }

    /// Provides mutable access to a record via a closure. Emits `ItemChanged`
    /// after modification.
    ///
    /// The closure runs while the list is locked for writing and must not call
    /// back into the list; doing so deadlocks.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut items = self.items.write();
        let item = items.get_mut(index)?;
        let result = f(item);
        drop(items);

        self.notifier.notify(ListChange::ItemChanged(index));
        Some(result)
    }

    /// Removes all records. Emits `Reset`.
    ///
    /// The original records are kept, so [`remove_sort`](Self::remove_sort)
    /// brings them back.
    pub fn clear(&self) {
        self.items.write().clear();
        self.notifier.notify(ListChange::Reset);
    }
}

impl<T> fmt::Debug for SortableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sort = self.sort.read();
        f.debug_struct("SortableList")
            .field("len", &self.items.read().len())
            .field("sort_field", &sort.field.as_ref().map(|field| field.name()))
            .field("sort_direction", &sort.direction)
            .field("signals", self.notifier.signals())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SortableList`].
///
/// Listeners connected here see the single `Reset` emitted by construction.
pub struct SortableListBuilder<T> {
    items: Vec<T>,
    fields: Vec<SortField<T>>,
    listeners: Vec<Listener>,
    initial_sort: Option<(String, SortDirection)>,
}

impl<T: Clone + Send + Sync + 'static> SortableListBuilder<T> {
    /// Creates a new builder with the given records.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            fields: Vec::new(),
            listeners: Vec::new(),
            initial_sort: None,
        }
    }

    /// Registers a sortable field.
    pub fn field(mut self, field: SortField<T>) -> Self {
        self.fields.retain(|f| f.name() != field.name());
        self.fields.push(field);
        self
    }

    /// Connects a change listener before construction.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: Fn(&ListChange) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Sorts by a registered field as part of construction.
    pub fn sorted_by(mut self, name: impl Into<String>, direction: SortDirection) -> Self {
        self.initial_sort = Some((name.into(), direction));
        self
    }

    /// Builds the list.
    ///
    /// Fails with [`ListError::InvalidArgument`] if `sorted_by` names a field
    /// that was not registered.
    pub fn build(self) -> Result<SortableList<T>> {
        let initial_sort = match self.initial_sort {
            Some((name, direction)) => {
                let field = self
                    .fields
                    .iter()
                    .find(|f| f.name() == name)
                    .cloned()
                    .ok_or_else(|| {
                        ListError::invalid_argument(format!("no sortable field named '{name}'"))
                    })?;
                Some((field, direction))
            }
            None => None,
        };

        let list = SortableList::empty_with(self.items, self.fields);
        for listener in self.listeners {
            list.connect(listener);
        }

        {
            let _batch = list.batch();
            list.reset_from_original();
            if let Some((field, direction)) = initial_sort {
                list.apply_sort_by(field, direction);
            }
        }

        tracing::debug!(target: targets::MODEL, count = list.len(), "sortable list built");
        Ok(list)
    }
}

impl<T> fmt::Debug for SortableListBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableListBuilder")
            .field("items", &self.items.len())
            .field("fields", &self.fields)
            .field("listeners", &self.listeners.len())
            .field("initial_sort", &self.initial_sort)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct TestItem {
        name: String,
        value: i32,
    }

    fn item(name: &str, value: i32) -> TestItem {
        TestItem {
            name: name.into(),
            value,
        }
    }

    fn name_field() -> SortField<TestItem> {
        SortField::new("name", |item: &TestItem| FieldValue::from(&item.name)).unwrap()
    }

    fn value_field() -> SortField<TestItem> {
        SortField::new("value", |item: &TestItem| FieldValue::from(item.value)).unwrap()
    }

    fn recorded(list: &SortableList<TestItem>) -> Arc<Mutex<Vec<ListChange>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        list.connect(move |change| recv.lock().push(*change));
        events
    }

    fn names(list: &SortableList<TestItem>) -> Vec<String> {
        list.items().iter().map(|i| i.name.clone()).collect()
    }

    fn test_list() -> SortableList<TestItem> {
        SortableList::builder(vec![item("C", 3), item("A", 1), item("B", 2)])
            .field(name_field())
            .field(value_field())
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_copies_items() {
        let list = SortableList::new(vec![item("First", 1), item("Second", 2)]);
        assert_eq!(list.len(), 2);
        assert!(!list.is_sorted());
        assert_eq!(list.get(1), Some(item("Second", 2)));
        assert_eq!(list.get(2), None);
    }

    #[test]
    fn test_builder_emits_single_reset() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        let list = SortableList::builder(vec![item("B", 2), item("A", 1)])
            .field(name_field())
            .on_change(move |change| recv.lock().push(*change))
            .sorted_by("name", SortDirection::Ascending)
            .build()
            .unwrap();

        assert_eq!(*events.lock(), vec![ListChange::Reset]);
        assert!(list.is_sorted());
        assert_eq!(names(&list), vec!["A", "B"]);
    }

    #[test]
    fn test_builder_rejects_unknown_initial_sort() {
        let err = SortableList::builder(vec![item("A", 1)])
            .sorted_by("missing", SortDirection::Ascending)
            .build()
            .unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument { .. }));
    }

    #[test]
    fn test_apply_sort_and_remove_sort() {
        let list = test_list();
        let events = recorded(&list);

        list.apply_sort("value", SortDirection::Descending).unwrap();
        assert_eq!(names(&list), vec!["C", "B", "A"]);
        assert!(list.is_sorted());
        assert_eq!(list.sort_field().map(|f| f.name().to_string()), Some("value".into()));
        assert_eq!(list.sort_direction(), SortDirection::Descending);

        list.remove_sort();
        assert_eq!(names(&list), vec!["C", "A", "B"]);
        assert!(!list.is_sorted());
        assert!(list.sort_field().is_none());
        assert_eq!(list.sort_direction(), SortDirection::Descending);

        assert_eq!(*events.lock(), vec![ListChange::Reset, ListChange::Reset]);
    }

    #[test]
    fn test_apply_sort_unknown_field_leaves_list_untouched() {
        let list = test_list();
        let events = recorded(&list);

        let err = list.apply_sort("size", SortDirection::Ascending).unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument { .. }));
        assert_eq!(names(&list), vec!["C", "A", "B"]);
        assert!(!list.is_sorted());
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_panicking_accessor_keeps_previous_sort_state() {
        let list = test_list();
        list.apply_sort("name", SortDirection::Ascending).unwrap();
        let events = recorded(&list);

        let exploding =
            SortField::new("exploding", |_: &TestItem| -> FieldValue { panic!("unreadable") })
                .unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            list.apply_sort_by(exploding, SortDirection::Descending);
        }));

        assert!(result.is_err());
        assert_eq!(list.sort_field().map(|f| f.name().to_string()), Some("name".into()));
        assert_eq!(list.sort_direction(), SortDirection::Ascending);
        assert_eq!(list.len(), 3);
        assert!(!list.is_batching());
        assert_eq!(*events.lock(), vec![ListChange::Reset]);
    }

    #[test]
    fn test_reverse_sort() {
        let list = test_list();
        assert!(!list.reverse_sort());

        list.apply_sort("name", SortDirection::Ascending).unwrap();
        assert!(list.reverse_sort());
        assert_eq!(names(&list), vec!["C", "B", "A"]);
        assert_eq!(list.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_register_field_replaces_by_name() {
        let list = test_list();
        assert_eq!(list.field_names(), vec!["name", "value"]);

        let negated =
            SortField::new("value", |item: &TestItem| FieldValue::from(-item.value)).unwrap();
        list.register_field(negated);
        assert_eq!(list.field_names(), vec!["name", "value"]);

        list.apply_sort("value", SortDirection::Ascending).unwrap();
        assert_eq!(names(&list), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_push_and_signals() {
        let list = test_list();
        list.apply_sort("name", SortDirection::Ascending).unwrap();
        let events = recorded(&list);

        list.push(item("0", 0));

        // Appended, not sorted into place.
        assert_eq!(names(&list), vec!["A", "B", "C", "0"]);
        assert!(list.is_sorted());
        assert_eq!(*events.lock(), vec![ListChange::ItemAdded(3)]);
    }

    #[test]
    fn test_insert_and_remove_signals() {
        let list = test_list();
        let events = recorded(&list);

        list.insert(1, item("X", 9)).unwrap();
        assert_eq!(list.remove_at(0), Some(item("C", 3)));
        assert_eq!(list.remove_at(10), None);
        assert_eq!(
            list.insert(10, item("Y", 0)),
            Err(ListError::index_out_of_range(10, 3))
        );

        assert_eq!(names(&list), vec!["X", "A", "B"]);
        assert_eq!(
            *events.lock(),
            vec![ListChange::ItemAdded(1), ListChange::ItemRemoved(0)]
        );
    }

    #[test]
    fn test_set_and_modify() {
        let list = test_list();
        let events = recorded(&list);

        assert_eq!(list.set(0, item("Z", 26)), Some(item("C", 3)));
        assert_eq!(list.modify(1, |i| i.value += 10), Some(()));
        assert_eq!(list.set(5, item("Q", 0)), None);
        assert_eq!(list.modify(5, |i| i.value), None);

        assert_eq!(list.get(1).map(|i| i.value), Some(11));
        assert_eq!(
            *events.lock(),
            vec![ListChange::ItemChanged(0), ListChange::ItemChanged(1)]
        );
    }

    #[test]
    fn test_extend_is_batched() {
        let list = test_list();
        let events = recorded(&list);

        list.extend(vec![item("D", 4), item("E", 5)]);
        list.extend(Vec::new());

        assert_eq!(list.len(), 5);
        assert_eq!(*events.lock(), vec![ListChange::Reset]);
    }

    #[test]
    fn test_caller_batch_folds_sort() {
        let list = test_list();
        let events = recorded(&list);

        {
            let _batch = list.batch();
            list.push(item("D", 4));
            list.apply_sort("value", SortDirection::Ascending).unwrap();
            assert!(list.is_batching());
            assert!(events.lock().is_empty());
        }

        assert_eq!(names(&list), vec!["A", "B", "C", "D"]);
        assert_eq!(*events.lock(), vec![ListChange::Reset]);
    }

    #[test]
    fn test_clear_keeps_original() {
        let list = test_list();
        let events = recorded(&list);

        list.clear();
        assert!(list.is_empty());
        list.remove_sort();
        assert_eq!(names(&list), vec!["C", "A", "B"]);
        assert_eq!(*events.lock(), vec![ListChange::Reset, ListChange::Reset]);
    }

    #[test]
    fn test_listener_can_read_list() {
        let list = Arc::new(test_list());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::downgrade(&list);
        let recv = seen.clone();
        list.connect(move |_| {
            if let Some(list) = reader.upgrade() {
                recv.lock().push(list.len());
            }
        });

        list.apply_sort("name", SortDirection::Ascending).unwrap();
        list.push(item("D", 4));
        assert_eq!(*seen.lock(), vec![3, 4]);
    }
}
