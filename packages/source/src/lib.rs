#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Safety feature datasets: where they come from and how their records
//! map onto the canonical schema.
//!
//! Each dataset is described by a [`SourceDefinition`] loaded from an
//! embedded TOML file (see [`registry`]). A [`SourceStore`] fetches the
//! datasets through a per-source [`TtlCache`](safe_route_cache::TtlCache)
//! so that repeated queries reuse the same records until they expire.

pub mod csv_file;
pub mod open_data;
pub mod parsing;
pub mod registry;
pub mod retry;
pub mod source_def;
pub mod store;

pub use source_def::SourceDefinition;
pub use store::{LoadedSources, SourceFailure, SourceStore};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch did not finish in time.
    #[error("Fetching '{source_id}' timed out after {secs}s")]
    Timeout {
        /// Dataset that timed out.
        source_id: String,
        /// Timeout that elapsed, in seconds.
        secs: u64,
    },

    /// The upstream response did not have the expected shape.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}
