//! ArduPilot Log Analyzer Library
//!
//! Turns ArduPilot DataFlash telemetry logs into analyst-ready data:
//! per-message-type time series, flight-mode transitions and single-pass
//! flight metrics (duration, max speed, max altitude, distance traveled,
//! max distance from home).
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of extracted rows and plot series
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON summary export
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aplog_analyzer::{open_log_file, summary_entries, AnalysisConfig};
//! use std::path::Path;
//!
//! let mut session = open_log_file(Path::new("00000042.log"), AnalysisConfig::default()).unwrap();
//! let speed = session.extract("GPS", Some(&["TimeUS".to_string(), "Spd".to_string()])).unwrap();
//! println!("{} GPS rows", speed.len());
//!
//! for event in session.mode_changes().unwrap() {
//!     println!("{}", event.unwrap());
//! }
//!
//! let metrics = session.metrics().unwrap();
//! for entry in summary_entries(&metrics) {
//!     println!("{}: {}", entry.label, entry.value);
//! }
//! ```
//!
//! Synthetic logs for tests or embedding go through [`MemoryCursor`]; any
//! other decoder plugs in by implementing [`RecordCursor`].
//!
//! # Public API
//!
//! ## Sessions and sources
//! - [`AnalysisSession`] - Cursor, configuration and reference time for one log
//! - [`open_log_file`] - Open a text DataFlash log as a session
//! - [`RecordCursor`] - Rewindable record stream (`next_matching`, `restart`)
//!
//! ## Analysis
//! - [`establish_reference_time`] - Fix t0 from the first format record
//! - [`extract_rows`] / [`extract_many`] - Field extraction per message type
//! - [`ModeEvents`] - Lazy flight-mode transition stream
//! - [`accumulate_metrics`] - Single-pass flight metrics
//!
//! ## Export
//! - [`export_rows_to_csv`] - One CSV per message type
//! - [`export_summary`] - Summary table as text
//! - [`export_ascii`] - Every record as a text line

pub mod analysis;
pub mod config;
pub mod conversion;
pub mod error;
pub mod export;
pub mod report;
pub mod source;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use analysis::*;
pub use config::*;
pub use conversion::*;
pub use error::*;
pub use export::*;
pub use report::*;
pub use source::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;
