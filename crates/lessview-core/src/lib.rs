//! Core systems for Lessview.
//!
//! This crate provides the notification plumbing shared by Lessview's models:
//!
//! - [`Signal`]: synchronous change notification to connected closures
//! - [`logging`]: `tracing` target names and performance spans
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use lessview_core::Signal;
//!
//! let reset = Signal::<()>::new();
//! let resets = Arc::new(AtomicUsize::new(0));
//!
//! let counter = resets.clone();
//! reset.connect(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! reset.emit(());
//! assert_eq!(resets.load(Ordering::SeqCst), 1);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
