//! `wm-output` — telemetry writers for the wingman combat AI.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                   |
//! |-----------|---------|-----------------------------------------------------------------|
//! | *(none)*  | CSV     | `agent_telemetry.csv`, `agent_events.csv`, `tick_summaries.csv` |
//! | `sqlite`  | SQLite  | `telemetry.db`                                                  |
//!
//! Both implement [`OutputWriter`] and are driven by [`TelemetryObserver`],
//! which implements `wm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wm_output::{CsvWriter, TelemetryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TelemetryObserver::new(writer, &config);
//! sim.run(&mut world, &mut sink, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TelemetryObserver;
pub use row::{AgentTelemetryRow, EventRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
