//! CSV mission-order loader.
//!
//! # CSV format
//!
//! One row per order.  Columns a kind does not use are left empty.
//!
//! ```csv
//! tick,ship,kind,target,bay,path,priority,source,flags
//! 0,1,attack_any,,,,50,mission,
//! 0,2,guard,9,,,40,mission,subordinate_only
//! 200,1,dock,9,0,,90,player,exclusive|must_complete
//! 0,3,waypoints,,,4,30,mission,repeat
//! ```
//!
//! **`kind`** and the columns it reads:
//!
//! | Kind          | Columns          |
//! |---------------|------------------|
//! | `attack`      | `target`         |
//! | `attack_any`  | —                |
//! | `guard`       | `target`         |
//! | `dock`        | `target`, `bay`  |
//! | `waypoints`   | `path` (+ `repeat` flag) |
//! | `follow_path` | `target` (anchor), `path` |
//! | `evade_ship`  | `target`         |
//! | `stay_still`  | —                |
//!
//! **`source`** is `mission`, `dynamic` or `player` (empty = `mission`).
//! **`flags`** is a `|`-separated subset of `exclusive`, `overridable`,
//! `subordinate_only`, `must_complete` and `repeat`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wm_core::{ObjectId, PathId, Tick};

use crate::{Goal, GoalError, GoalFlags, GoalKind, GoalOrder, GoalSchedule, GoalSource};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OrderRecord {
    tick:     u64,
    ship:     u32,
    kind:     String,
    target:   Option<u32>,
    bay:      Option<u8>,
    path:     Option<u16>,
    priority: i32,
    #[serde(default)]
    source:   String,
    #[serde(default)]
    flags:    String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a mission-order schedule from a CSV file.
pub fn load_orders_csv(path: &Path) -> Result<GoalSchedule, GoalError> {
    let file = std::fs::File::open(path)?;
    load_orders_reader(file)
}

/// Like [`load_orders_csv`] but accepts any `Read` source.
pub fn load_orders_reader<R: Read>(reader: R) -> Result<GoalSchedule, GoalError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut schedule = GoalSchedule::new();

    for (line, result) in csv_reader.deserialize::<OrderRecord>().enumerate() {
        let row = result.map_err(|e| GoalError::Parse(e.to_string()))?;
        let order = to_order(&row).map_err(|msg| GoalError::Parse(format!("row {}: {msg}", line + 1)))?;
        schedule.push(Tick(row.tick), order);
    }

    tracing::debug!(orders = schedule.len(), ticks = schedule.tick_count(), "loaded mission orders");
    Ok(schedule)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_order(row: &OrderRecord) -> Result<GoalOrder, String> {
    let (flags, repeat) = parse_flags(&row.flags)?;
    let target = || row.target.map(ObjectId).ok_or_else(|| format!("{} needs a target", row.kind));
    let path = || row.path.map(PathId).ok_or_else(|| format!("{} needs a path", row.kind));

    let kind = match row.kind.trim() {
        "attack"      => GoalKind::Attack { target: target()? },
        "attack_any"  => GoalKind::AttackAny,
        "guard"       => GoalKind::Guard { target: target()? },
        "dock"        => GoalKind::Dock {
            target: target()?,
            bay:    row.bay.ok_or_else(|| "dock needs a bay".to_string())?,
        },
        "waypoints"   => GoalKind::Waypoints { path: path()?, repeat },
        "follow_path" => GoalKind::FollowPath { anchor: target()?, path: path()? },
        "evade_ship"  => GoalKind::EvadeShip { target: target()? },
        "stay_still"  => GoalKind::StayStill,
        other         => return Err(format!("unknown goal kind {other:?}")),
    };

    let goal = Goal::new(kind, row.priority)
        .with_source(parse_source(&row.source)?)
        .with_flags(flags);
    Ok(GoalOrder::new(ObjectId(row.ship), goal))
}

fn parse_source(s: &str) -> Result<GoalSource, String> {
    match s.trim() {
        "" | "mission" => Ok(GoalSource::MissionScript),
        "dynamic"      => Ok(GoalSource::DynamicEvent),
        "player"       => Ok(GoalSource::PlayerOrder),
        other => Err(format!(
            "invalid source {other:?}: expected \"mission\", \"dynamic\" or \"player\""
        )),
    }
}

/// Goal flags plus the waypoint `repeat` toggle.
fn parse_flags(s: &str) -> Result<(GoalFlags, bool), String> {
    let mut flags = GoalFlags::default();
    let mut repeat = false;
    for name in s.split('|').map(str::trim).filter(|n| !n.is_empty()) {
        match name {
            "exclusive"        => flags.exclusive = true,
            "overridable"      => flags.overridable = true,
            "subordinate_only" => flags.subordinate_only = true,
            "must_complete"    => flags.must_complete = true,
            "repeat"           => repeat = true,
            other              => return Err(format!("unknown flag {other:?}")),
        }
    }
    Ok((flags, repeat))
}
