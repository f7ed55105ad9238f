//! Sort fields and comparators.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::error::{ListError, Result};
use super::value::FieldValue;

/// Type alias for a field accessor function.
pub type FieldAccessor<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// A named field of a record type, readable through an accessor closure.
///
/// Cloning is cheap; the accessor is shared.
///
/// # Example
///
/// ```
/// use lessview::model::{FieldValue, SortField};
///
/// struct FileRow {
///     name: String,
///     size: u64,
/// }
///
/// let size = SortField::new("size", |row: &FileRow| FieldValue::from(row.size)).unwrap();
/// let row = FileRow { name: "setup.exe".into(), size: 1024 };
/// assert_eq!(size.name(), "size");
/// assert_eq!(size.value(&row), FieldValue::UInt(1024));
/// ```
pub struct SortField<T> {
    name: Arc<str>,
    accessor: FieldAccessor<T>,
}

impl<T> SortField<T> {
    /// Creates a field descriptor.
    ///
    /// Fails with [`ListError::InvalidArgument`] if `name` is empty or blank.
    pub fn new<F>(name: impl Into<String>, accessor: F) -> Result<Self>
    where
        F: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ListError::invalid_argument("field name must not be empty"));
        }
        Ok(Self {
            name: name.into(),
            accessor: Arc::new(accessor),
        })
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads this field from a record.
    pub fn value(&self, record: &T) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<T> Clone for SortField<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> fmt::Debug for SortField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortField").field("name", &self.name).finish()
    }
}

/// Orders records by one field, honoring a direction.
///
/// `compare(x, y)` is the natural order of the two field values, reversed when
/// the direction is descending. The comparator is immutable once built.
#[derive(Debug, Clone)]
pub struct FieldComparator<T> {
    field: SortField<T>,
    direction: SortDirection,
}

impl<T> FieldComparator<T> {
    /// Creates a comparator for `field` in `direction`.
    pub fn new(field: SortField<T>, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Returns the field being compared.
    pub fn field(&self) -> &SortField<T> {
        &self.field
    }

    /// Returns the comparison direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compares two records.
    pub fn compare(&self, x: &T, y: &T) -> Ordering {
        let ordering = self.field.value(x).cmp(&self.field.value(y));
        self.direction.apply(ordering)
    }

    /// Sorts a slice in place. The sort is stable: records with equal keys
    /// keep their relative order.
    pub fn sort(&self, records: &mut [T]) {
        records.sort_by(|x, y| self.compare(x, y));
    }
}
