//! Lessview - observable sortable record lists and file-tree snapshots.
//!
//! This is the main crate. It re-exports the core notification plumbing from
//! `lessview-core` and adds:
//!
//! - [`model`]: a record list that sorts by named fields and announces changes
//! - [`file`]: `(path, size)` snapshots of extracted file trees
//!
//! # Example
//!
//! ```
//! use lessview::model::{FieldValue, SortDirection, SortField, SortableList};
//!
//! #[derive(Clone)]
//! struct Row {
//!     name: String,
//!     size: u64,
//! }
//!
//! let list = SortableList::builder(vec![
//!     Row { name: "setup.exe".into(), size: 120 },
//!     Row { name: "readme.txt".into(), size: 4 },
//! ])
//! .field(SortField::new("size", |r: &Row| FieldValue::from(r.size)).unwrap())
//! .build()
//! .unwrap();
//!
//! list.apply_sort("size", SortDirection::Ascending).unwrap();
//! assert_eq!(list.get(0).unwrap().name, "readme.txt");
//! ```

pub use lessview_core::*;

pub mod file;
pub mod model;
