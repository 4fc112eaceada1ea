// src/core/mod.rs

// The `core` module holds everything that is not presentation: the data
// model, the API boundary and its HTTP client, and the monitoring logic the
// terminal front end renders from.

/// Data structures exchanged with the backend, such as `Scan`, `Finding`,
/// `ScanStatistics`, `Report` and `Analytics`.
pub mod models;

/// Error types for API calls, blocking view errors, the launch flow and
/// report actions.
pub mod error;

/// The `ScanApi` trait describing the remote read/write boundary.
pub mod api;

/// `reqwest`-based implementation of `ScanApi`.
pub mod client;

/// View aggregation, status-driven polling, report resolution and the
/// dashboard's aggregation.
pub mod monitor;

/// Pure reductions from payloads to chart series and filtered lists.
pub mod analytics;

/// Target normalization, consent gate and scan creation.
pub mod launch;

/// Display metadata (labels, colors) for risk levels and statuses.
pub mod knowledge_base;
