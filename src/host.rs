//! Host-side scheduling
//!
//! The simulation owns no timers. `SessionDriver` turns wall-clock frame time
//! into command injection:
//! - tick loop every `tick_interval_ms`
//! - brick spawner every `brick_spawn_interval_ms`
//! - optional autofire every `fire_interval_ms`
//! - one-shot explosion expiry and bonus reversion timers
//!
//! A new driver holds everything, input included, for `start_delay_ms` while
//! the jet makes its entrance. Time only moves in whole ticks, so all timers
//! fire on tick boundaries.

use crate::config::GameConfig;
use crate::sim::{Direction, GameEvent, GameSimulator, GameState};

/// Deferred collaborator callback
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerAction {
    RemoveExplosion { id: u32 },
    EndBonus { session: u32 },
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due_ms: f64,
    action: TimerAction,
}

pub struct SessionDriver {
    sim: GameSimulator,
    /// Monotonic session clock (ms), advanced one tick at a time
    clock_ms: f64,
    /// Unsimulated frame time
    accumulator: f64,
    /// Entrance time left before the session clock starts
    start_delay_ms: f64,
    spawn_elapsed: f64,
    fire_elapsed: f64,
    autofire: bool,
    timers: Vec<PendingTimer>,
    /// Events not yet handed to the caller
    pending: Vec<GameEvent>,
}

impl SessionDriver {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_simulator(GameSimulator::new(config, seed))
    }

    pub fn with_simulator(sim: GameSimulator) -> Self {
        let start_delay_ms = sim.config().start_delay_ms;
        Self {
            sim,
            clock_ms: 0.0,
            accumulator: 0.0,
            start_delay_ms,
            spawn_elapsed: 0.0,
            fire_elapsed: 0.0,
            autofire: true,
            timers: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        self.sim.state()
    }

    pub fn config(&self) -> &GameConfig {
        self.sim.config()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn set_autofire(&mut self, enabled: bool) {
        self.autofire = enabled;
    }

    pub fn autofire(&self) -> bool {
        self.autofire
    }

    /// False during the entrance delay
    pub fn started(&self) -> bool {
        self.start_delay_ms <= 0.0
    }

    /// Player input: step the jet
    pub fn move_jet(&mut self, direction: Direction) {
        if self.started() {
            self.sim.move_jet(direction);
        }
    }

    /// Player input: fire now (still subject to the rate limiter)
    pub fn fire(&mut self) -> bool {
        if !self.started() {
            return false;
        }
        let fired = self.sim.fire(self.clock_ms);
        self.collect_events();
        fired
    }

    /// Run the simulation forward by `elapsed_ms` of wall time.
    ///
    /// Returns every event emitted since the previous call.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        let config = self.sim.config();
        let tick_ms = config.tick_interval_ms;
        let max_substeps = config.max_substeps;

        if !elapsed_ms.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed_ms);
            return std::mem::take(&mut self.pending);
        }
        let mut frame_ms = elapsed_ms.clamp(0.0, config.max_frame_ms);

        if self.start_delay_ms > 0.0 {
            let spent = frame_ms.min(self.start_delay_ms);
            self.start_delay_ms -= spent;
            frame_ms -= spent;
            if self.started() {
                log::debug!("Entrance over, session clock running");
            }
        }
        self.accumulator += frame_ms;

        let mut substeps = 0;
        while self.accumulator >= tick_ms && substeps < max_substeps {
            self.step(tick_ms);
            self.accumulator -= tick_ms;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == max_substeps {
            self.accumulator = self.accumulator.min(tick_ms);
        }

        std::mem::take(&mut self.pending)
    }

    /// One tick of the session clock
    fn step(&mut self, tick_ms: f64) {
        self.clock_ms += tick_ms;
        self.run_due_timers();

        // Periodic timers stop with the run; one-shot timers keep going
        if !self.sim.state().is_game_over() {
            let config = self.sim.config();
            let spawn_interval = config.brick_spawn_interval_ms;
            let fire_interval = config.fire_interval_ms;

            self.spawn_elapsed += tick_ms;
            while self.spawn_elapsed >= spawn_interval {
                self.spawn_elapsed -= spawn_interval;
                self.sim.spawn_obstacle();
            }

            // Autofire retries each tick until the rate limiter accepts
            if self.autofire {
                self.fire_elapsed += tick_ms;
                if self.fire_elapsed >= fire_interval && self.sim.fire(self.clock_ms) {
                    self.fire_elapsed = 0.0;
                }
            }

            self.sim.advance_time();
        }

        self.collect_events();
    }

    fn run_due_timers(&mut self) {
        let now = self.clock_ms;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due_ms <= now);
        self.timers = waiting;

        for timer in due {
            match timer.action {
                TimerAction::RemoveExplosion { id } => {
                    self.sim.remove_explosion(id);
                }
                TimerAction::EndBonus { session } => {
                    self.sim.end_bonus(session);
                }
            }
        }
    }

    /// Move simulator events to the outbox, scheduling the timers they request
    fn collect_events(&mut self) {
        for event in self.sim.drain_events() {
            match event {
                GameEvent::ExplosionSpawned { id, lifetime_ms } => {
                    self.schedule(lifetime_ms, TimerAction::RemoveExplosion { id });
                }
                GameEvent::BonusActivated {
                    session,
                    duration_ms,
                } => {
                    self.schedule(duration_ms, TimerAction::EndBonus { session });
                }
                _ => {}
            }
            self.pending.push(event);
        }
    }

    fn schedule(&mut self, delay_ms: f64, action: TimerAction) {
        self.timers.push(PendingTimer {
            due_ms: self.clock_ms + delay_ms,
            action,
        });
    }

    /// Cancel every pending timer and clear accumulated time
    pub fn end_session(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("Cancelling {} pending timers", self.timers.len());
        }
        self.timers.clear();
        self.pending.clear();
        self.accumulator = 0.0;
        self.spawn_elapsed = 0.0;
        self.fire_elapsed = 0.0;
    }

    /// Start a fresh session
    pub fn reset(&mut self) {
        self.end_session();
        self.sim.reset();
    }
}
