//! Simulation observer trait for progress reporting and data collection.

use wm_agent::AgentTelemetry;
use wm_core::Tick;
use wm_decision::AgentEvent;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — abort counter
///
/// ```rust,ignore
/// struct Aborts(usize);
///
/// impl SimObserver for Aborts {
///     fn on_events(&mut self, _tick: Tick, events: &[AgentEvent]) {
///         self.0 += events.iter().filter(|e| e.kind.name() == "mode_aborted").count();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the sync point.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per tick with every event raised since the previous call,
    /// in ascending agent order.  Not called when there were none.
    ///
    /// Events raised between ticks (goal rejections, retirements) come
    /// first.
    fn on_events(&mut self, _tick: Tick, _events: &[AgentEvent]) {}

    /// Called at the end of each tick.
    ///
    /// `acted` is the number of agents whose intent reached the sink.
    fn on_tick_end(&mut self, _tick: Tick, _acted: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks)
    /// with the state of every live agent in ascending id order.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentTelemetry]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
