//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentTelemetryRow, EventRow, OutputResult, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are kept by the observer and retrieved with
/// [`TelemetryObserver::take_error`][crate::TelemetryObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of agent telemetry rows.
    fn write_telemetry(&mut self, rows: &[AgentTelemetryRow]) -> OutputResult<()>;

    /// Write a batch of events, in the order they were raised.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
