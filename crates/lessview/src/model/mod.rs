//! Observable record lists for Lessview.
//!
//! This module provides a list model that views can bind to:
//!
//! - Records can be sorted by any named field, ascending or descending
//! - The original order can always be restored
//! - Every visible change is announced through a signal
//! - Bulk work is coalesced into a single reset notification
//!
//! # Core Types
//!
//! - `SortableList`: The list model itself
//! - `SortField`: A named accessor that reads a sortable value from a record
//! - `FieldValue`: The totally ordered value a field accessor produces
//! - `FieldComparator`: Orders two records by one field and direction
//! - `ListChange`: A single change notification
//! - `BatchGuard`: An open notification batch
//!
//! # Example
//!
//! ```
//! use lessview::model::{FieldValue, SortDirection, SortField, SortableList};
//!
//! let list = SortableList::builder(vec![3u32, 1, 2])
//!     .field(SortField::new("value", |n: &u32| FieldValue::from(*n)).unwrap())
//!     .on_change(|change| println!("list changed: {}", change))
//!     .build()
//!     .unwrap();
//!
//! list.apply_sort("value", SortDirection::Ascending).unwrap();
//! assert_eq!(list.to_vec(), vec![1, 2, 3]);
//!
//! list.remove_sort();
//! assert_eq!(list.to_vec(), vec![3, 1, 2]);
//! ```

mod batch;
mod error;
mod field;
mod signals;
mod sortable_list;
mod value;

pub use batch::BatchGuard;
pub use error::{ListError, Result};
pub use field::{FieldAccessor, FieldComparator, SortDirection, SortField};
pub use signals::{ListChange, ListChangeKind, ListSignals};
pub use sortable_list::{SortableList, SortableListBuilder};
pub use value::FieldValue;
