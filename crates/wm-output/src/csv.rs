//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_telemetry.csv`
//! - `agent_events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentTelemetryRow, EventRow, OutputResult, TickSummaryRow};

/// Writes telemetry to three CSV files.
pub struct CsvWriter {
    telemetry: Writer<File>,
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut telemetry = Writer::from_path(dir.join("agent_telemetry.csv"))?;
        telemetry.write_record([
            "tick", "agent_id", "object_id", "mode", "submode", "goal_id", "goal_kind", "target_id",
        ])?;

        let mut events = Writer::from_path(dir.join("agent_events.csv"))?;
        events.write_record(["tick", "agent_id", "object_id", "event", "detail"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "sim_time_ms", "acted", "events"])?;

        tracing::debug!(dir = %dir.display(), "csv output opened");
        Ok(Self { telemetry, events, summaries, finished: false })
    }
}

/// Sentinel ids are written as empty fields.
fn id_field(id: u32) -> String {
    if id == u32::MAX { String::new() } else { id.to_string() }
}

impl OutputWriter for CsvWriter {
    fn write_telemetry(&mut self, rows: &[AgentTelemetryRow]) -> OutputResult<()> {
        for row in rows {
            self.telemetry.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.object_id.to_string(),
                row.mode.to_owned(),
                row.submode.to_owned(),
                id_field(row.goal_id),
                row.goal_kind.to_owned(),
                id_field(row.target_id),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.object_id.to_string(),
                row.event.to_owned(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.acted.to_string(),
            row.events.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.telemetry.flush()?;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
