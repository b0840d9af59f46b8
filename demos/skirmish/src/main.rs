//! skirmish — end-to-end demo for the wingman combat AI.
//!
//! Alpha wing (two fighters and a bomber, carrier *Resolute*) meets Beta wing
//! (three fighters escorting the cruiser *Marauder*).  Run configuration,
//! skill profiles and mission orders come from `data/`; telemetry goes to
//! `output/skirmish` (CSV, or `telemetry.db` with `--features sqlite`).
//! Set `RUST_LOG=debug` to watch individual decisions.
//!
//! ```text
//! cargo run -p skirmish --release [-- <data dir>]
//! ```

mod arena;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wm_agent::{AgentSpec, AgentStoreBuilder, AgentTelemetry, Loadout, Mode, WeaponBank};
use wm_core::{ObjectId, ProfileStore, SimConfig, SkillLevel, TeamId, Tick};
use wm_decision::{AgentEvent, AgentEventKind, StandardBrain};
use wm_goal::load_orders_csv;
use wm_output::{OutputWriter, TelemetryObserver};
#[cfg(not(feature = "sqlite"))]
use wm_output::CsvWriter;
#[cfg(feature = "sqlite")]
use wm_output::SqliteWriter;
use wm_sim::{SimBuilder, SimObserver};
use wm_world::IffTable;

use arena::{Actuators, Arena, GUN_RANGE, MISSILE_RANGE};

// ── Order of battle ───────────────────────────────────────────────────────────

const ALPHA: TeamId = TeamId(0);
const BETA:  TeamId = TeamId(1);

/// Beta 3 breaks off for a few seconds halfway through.
const BREAK_OFF_AT:   Tick = Tick(400);
const BREAK_OFF_SECS: f32  = 4.0;

fn fighter() -> Loadout {
    Loadout {
        primary:         vec![WeaponBank::gun(GUN_RANGE, 0.25)],
        secondary:       vec![WeaponBank::seeker(MISSILE_RANGE, 4.0)],
        countermeasures: true,
    }
}

fn bomber() -> Loadout {
    Loadout {
        primary:         vec![WeaponBank::gun(GUN_RANGE, 0.4)],
        secondary:       vec![WeaponBank::seeker(MISSILE_RANGE, 5.0), WeaponBank::torpedo(MISSILE_RANGE, 8.0)],
        countermeasures: false,
    }
}

fn order_of_battle() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new(ObjectId(1), ALPHA, SkillLevel::HARD).with_loadout(fighter()).wing_leader(true),
        AgentSpec::new(ObjectId(2), ALPHA, SkillLevel::MEDIUM).with_loadout(bomber()),
        AgentSpec::new(ObjectId(3), ALPHA, SkillLevel::MEDIUM).with_loadout(fighter()),
        AgentSpec::new(ObjectId(11), BETA, SkillLevel::INSANE).with_loadout(fighter()).wing_leader(true),
        AgentSpec::new(ObjectId(12), BETA, SkillLevel::EASY).with_loadout(fighter()),
        AgentSpec::new(ObjectId(13), BETA, SkillLevel::EASY).with_loadout(fighter()),
    ]
}

// ── Observer wrapper to count events ──────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:          TelemetryObserver<W>,
    by_kind:        BTreeMap<&'static str, usize>,
    telemetry_rows: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: TelemetryObserver<W>) -> Self {
        Self { inner, by_kind: BTreeMap::new(), telemetry_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_events(&mut self, tick: Tick, events: &[AgentEvent]) {
        for e in events {
            *self.by_kind.entry(e.kind.name()).or_default() += 1;
            match &e.kind {
                AgentEventKind::GoalAchieved { .. }
                | AgentEventKind::GoalInvalidated { .. }
                | AgentEventKind::ModeAborted { .. }
                | AgentEventKind::AgentRetired => {
                    tracing::info!(tick = tick.0, ship = %e.object, event = e.kind.name(), detail = %e.kind);
                }
                _ => {}
            }
        }
        self.inner.on_events(tick, events);
    }

    fn on_tick_end(&mut self, tick: Tick, acted: usize) {
        self.inner.on_tick_end(tick, acted);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentTelemetry]) {
        self.telemetry_rows += agents.len();
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("data"));

    // 1. Configuration, profiles and orders.
    let config = SimConfig::load(&data.join("sim.toml")).context("loading sim.toml")?;
    let profiles = ProfileStore::load(&data.join("profiles.toml")).context("loading profiles.toml")?;
    let orders = load_orders_csv(&data.join("orders.csv")).context("loading orders.csv")?;
    let tick_secs = config.tick_duration_ms as f32 / 1_000.0;
    println!("=== skirmish — wingman combat AI ===");
    println!(
        "Ticks: {} × {} ms  |  Seed: {}  |  Orders: {}",
        config.total_ticks,
        config.tick_duration_ms,
        config.seed,
        orders.len()
    );
    println!();

    // 2. Agents.
    let mut builder = AgentStoreBuilder::new(profiles, config.seed).goal_capacity(config.goal_capacity);
    for spec in order_of_battle() {
        builder = builder.spawn(spec);
    }
    let (store, rngs) = builder.build()?;

    // 3. Sim.
    let mut sim = SimBuilder::new(config.clone(), store, rngs, StandardBrain)
        .iff(IffTable::new(2))
        .schedule(orders)
        .build()?;

    // 4. World and output.
    let mut arena = Arena::skirmish(tick_secs, config.seed);
    let mut actuators = Actuators::default();
    let out_dir = Path::new("output/skirmish");
    #[cfg(not(feature = "sqlite"))]
    let writer = CsvWriter::new(out_dir)?;
    #[cfg(feature = "sqlite")]
    let writer = SqliteWriter::new(out_dir)?;
    let mut obs = CountingObserver::new(TelemetryObserver::new(writer, &config));

    // 5. Run, one tick at a time so the arena can integrate in between.
    let t0 = Instant::now();
    let mut kills = Vec::new();
    while sim.now() < config.end_tick() {
        if sim.now() == BREAK_OFF_AT {
            let until = sim.clock.deadline_after(BREAK_OFF_AT, BREAK_OFF_SECS);
            match sim.force_mode(ObjectId(13), Mode::Evade, until) {
                Ok(()) => tracing::info!(ship = "Beta 3", "breaking off"),
                Err(e) => tracing::info!(error = %e, "Beta 3 cannot break off"),
            }
        }

        sim.run_ticks(1, &mut arena, &mut actuators, &mut obs)?;

        for kill in arena.advance(actuators.take()) {
            sim.notify_object_removed(kill.id);
            if kill.ship {
                tracing::info!(tick = kill.tick.0, ship = %kill.name, "destroyed");
                kills.push(kill);
            }
        }
    }
    obs.on_sim_end(sim.now());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  telemetry rows      : {}", obs.telemetry_rows);
    for (kind, n) in &obs.by_kind {
        println!("  {kind:<18}: {n}");
    }
    println!();

    println!("Losses:");
    for kill in &kills {
        println!("  tick {:>5}  {}", kill.tick.0, kill.name);
    }
    println!();

    println!("{:<10} {:<8} {:<12} {:<12} {:<10}", "Ship", "Hull", "Mode", "Goal", "Target");
    println!("{}", "-".repeat(54));
    let telemetry = sim.telemetry();
    for (name, state) in arena.survivors() {
        let t = telemetry.iter().find(|t| t.object == state.id);
        let target = t
            .and_then(|t| t.target)
            .and_then(|id| arena.name(id))
            .unwrap_or("-");
        println!(
            "{:<10} {:<8.2} {:<12} {:<12} {:<10}",
            name,
            state.hull,
            t.map_or("(host)", |t| t.mode.as_str()),
            t.and_then(|t| t.goal_kind).unwrap_or("-"),
            target,
        );
    }

    Ok(())
}
