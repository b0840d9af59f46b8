//! `TelemetryObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use wm_agent::AgentTelemetry;
use wm_core::{SimConfig, Tick};
use wm_decision::AgentEvent;
use wm_sim::SimObserver;

use crate::row::{AgentTelemetryRow, EventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent telemetry, the event stream and tick
/// summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TelemetryObserver<W: OutputWriter> {
    writer:           W,
    tick_duration_ms: u64,
    /// Events written since the last tick summary.
    tick_events:      u64,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> TelemetryObserver<W> {
    /// Create an observer backed by `writer`, using `config` for sim-time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_ms: u64::from(config.tick_duration_ms),
            tick_events:      0,
            last_error:       None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "telemetry write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TelemetryObserver<W> {
    fn on_events(&mut self, _tick: Tick, events: &[AgentEvent]) {
        let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
        self.tick_events += rows.len() as u64;
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, tick: Tick, acted: usize) {
        let row = TickSummaryRow {
            tick:        tick.0,
            sim_time_ms: tick.0 * self.tick_duration_ms,
            acted:       acted as u64,
            events:      std::mem::take(&mut self.tick_events),
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentTelemetry]) {
        if agents.is_empty() {
            return;
        }
        let rows: Vec<AgentTelemetryRow> = agents.iter().map(|t| AgentTelemetryRow::new(tick, t)).collect();
        let result = self.writer.write_telemetry(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
