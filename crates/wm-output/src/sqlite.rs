//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `telemetry.db` file in the configured output directory
//! with three tables: `agent_telemetry`, `agent_events` and `tick_summaries`.
//! Sentinel ids are stored as NULL.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentTelemetryRow, EventRow, OutputResult, TickSummaryRow};

/// Writes telemetry to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

fn nullable(id: u32) -> Option<u32> {
    (id != u32::MAX).then_some(id)
}

impl SqliteWriter {
    /// Open (or create) `telemetry.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("telemetry.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_telemetry (
                 tick      INTEGER NOT NULL,
                 agent_id  INTEGER NOT NULL,
                 object_id INTEGER NOT NULL,
                 mode      TEXT    NOT NULL,
                 submode   TEXT    NOT NULL,
                 goal_id   INTEGER,
                 goal_kind TEXT,
                 target_id INTEGER
             );
             CREATE TABLE IF NOT EXISTS agent_events (
                 seq       INTEGER PRIMARY KEY AUTOINCREMENT,
                 tick      INTEGER NOT NULL,
                 agent_id  INTEGER NOT NULL,
                 object_id INTEGER NOT NULL,
                 event     TEXT    NOT NULL,
                 detail    TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick        INTEGER PRIMARY KEY,
                 sim_time_ms INTEGER NOT NULL,
                 acted       INTEGER NOT NULL,
                 events      INTEGER NOT NULL
             );",
        )?;

        tracing::debug!(dir = %dir.display(), "sqlite output opened");
        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_telemetry(&mut self, rows: &[AgentTelemetryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_telemetry \
                 (tick, agent_id, object_id, mode, submode, goal_id, goal_kind, target_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.agent_id,
                    row.object_id,
                    row.mode,
                    row.submode,
                    nullable(row.goal_id),
                    (!row.goal_kind.is_empty()).then_some(row.goal_kind),
                    nullable(row.target_id),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_events (tick, agent_id, object_id, event, detail) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.agent_id, row.object_id, row.event, row.detail])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, sim_time_ms, acted, events) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.tick, row.sim_time_ms, row.acted, row.events],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
