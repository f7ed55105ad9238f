//! Logging facilities for Lessview.
//!
//! Lessview uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("lessview=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The [`targets`] constants can be used in filter directives to select a
//! single subsystem.

/// Span names used throughout Lessview for tracing.
pub mod span_names {
    /// Performance measurement span.
    pub const PERF: &str = "lessview::perf";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "lessview_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lessview_core::signal";
    /// Observable list model target.
    pub const MODEL: &str = "lessview::model";
    /// File snapshot target.
    pub const FILE: &str = "lessview::file";
}

/// A guard that keeps a performance span entered until dropped.
///
/// Wrap bulk operations (sorting, resets, snapshot I/O) so that a subscriber
/// with timing enabled reports how long they took.
///
/// ```
/// use lessview_core::logging::PerfSpan;
///
/// let _span = PerfSpan::new("apply_sort");
/// // ... work measured until `_span` goes out of scope
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: span_names::PERF, "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}
