// src/lib.rs

//! Scan monitoring core for the DORK-X reconnaissance backend.
//!
//! The library owns the view state of the scan detail and dashboard screens:
//! it aggregates concurrent reads with partial-failure tolerance, polls while a
//! scan is still running, reduces analytics into chart series and resolves
//! report downloads against on-demand generation.

pub mod config;
pub mod core;
pub mod logging;

pub use crate::core::api::ScanApi;
pub use crate::core::client::ApiClient;
pub use crate::core::monitor::ScanSession;
