//! Session owner for the game state
//!
//! `GameSimulator` is the only writer of its `GameState`. Hosts apply commands
//! and read the latest snapshot through `state()` between commands.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{Direction, EntityIds, GameState};
use super::tick;
use crate::config::GameConfig;

/// Commands a host can send to the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Move { direction: Direction },
    Fire { now_ms: f64 },
    SpawnObstacle,
    AdvanceTime,
    Reset,
    RemoveExplosion { id: u32 },
    EndBonus { session: u32 },
}

pub struct GameSimulator {
    config: GameConfig,
    state: GameState,
    ids: EntityIds,
    /// Bumped on every reset; stale bonus reversions carry an old value
    session: u32,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameSimulator {
    /// Start a session. Panics if `config` is invalid.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        config.validate();
        let state = GameState::new(&config);
        Self {
            config,
            state,
            ids: EntityIds::default(),
            session: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Resume from a saved snapshot. Panics if `config` is invalid.
    pub fn from_snapshot(config: GameConfig, state: GameState, seed: u64) -> Self {
        config.validate();
        debug_assert!(
            (config.jet_min_x()..=config.jet_max_x()).contains(&state.jet_x),
            "snapshot jet_x {} out of bounds",
            state.jet_x
        );
        let ids = EntityIds::starting_after(state.max_entity_id());
        Self {
            config,
            state,
            ids,
            session: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Latest snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current session token (see `end_bonus`)
    pub fn session(&self) -> u32 {
        self.session
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn move_jet(&mut self, direction: Direction) -> &GameState {
        tick::move_jet(&mut self.state, &self.config, direction);
        &self.state
    }

    /// Fire at monotonic time `now_ms`. Returns whether a bullet was added.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        tick::fire(
            &mut self.state,
            &self.config,
            &mut self.ids,
            now_ms,
            &mut self.events,
        )
        .is_some()
    }

    /// Spawn a brick using the session RNG
    pub fn spawn_obstacle(&mut self) -> &GameState {
        let kind_roll: f32 = self.rng.random();
        let x_roll: f32 = self.rng.random();
        self.spawn_brick_at(kind_roll, x_roll)
    }

    /// Spawn a brick using a caller-supplied random source
    pub fn spawn_obstacle_with<R: Rng>(&mut self, rng: &mut R) -> &GameState {
        let kind_roll: f32 = rng.random();
        let x_roll: f32 = rng.random();
        self.spawn_brick_at(kind_roll, x_roll)
    }

    /// Spawn a brick from explicit `[0, 1)` rolls for kind and x position
    pub fn spawn_brick_at(&mut self, kind_roll: f32, x_roll: f32) -> &GameState {
        tick::spawn_brick(
            &mut self.state,
            &self.config,
            &mut self.ids,
            kind_roll,
            x_roll,
        );
        &self.state
    }

    pub fn advance_time(&mut self) -> &GameState {
        tick::advance_time(
            &mut self.state,
            &self.config,
            &mut self.ids,
            self.session,
            &mut self.events,
        );
        &self.state
    }

    pub fn remove_explosion(&mut self, id: u32) -> &GameState {
        tick::remove_explosion(&mut self.state, id);
        &self.state
    }

    /// Revert the speed boost started in `session`; ignored if a reset happened
    /// since.
    pub fn end_bonus(&mut self, session: u32) -> &GameState {
        if session == self.session {
            tick::end_bonus(&mut self.state, &self.config, &mut self.events);
        } else {
            log::debug!("Ignoring stale bonus reversion from session {}", session);
        }
        &self.state
    }

    /// Back to session-start defaults
    pub fn reset(&mut self) -> &GameState {
        self.state = GameState::new(&self.config);
        self.session = self.session.wrapping_add(1);
        self.events.clear();
        log::info!("Session {} started", self.session);
        &self.state
    }

    pub fn apply(&mut self, command: Command) -> &GameState {
        match command {
            Command::Move { direction } => self.move_jet(direction),
            Command::Fire { now_ms } => {
                self.fire(now_ms);
                &self.state
            }
            Command::SpawnObstacle => self.spawn_obstacle(),
            Command::AdvanceTime => self.advance_time(),
            Command::Reset => self.reset(),
            Command::RemoveExplosion { id } => self.remove_explosion(id),
            Command::EndBonus { session } => self.end_bonus(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameOverCause;
    use crate::sim::state::{Brick, BrickKind, Bullet, GamePhase};
    use glam::Vec2;
    use proptest::prelude::*;

    fn sim_with(state_fn: impl FnOnce(&mut GameState)) -> GameSimulator {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state_fn(&mut state);
        GameSimulator::from_snapshot(config, state, 1)
    }

    #[test]
    fn test_fire_then_advance() {
        let mut sim = GameSimulator::new(GameConfig::default(), 1);
        assert!(sim.fire(0.0));
        let spawn_y = sim.state().bullets[0].pos.y;
        for _ in 0..5 {
            sim.advance_time();
        }
        let state = sim.state();
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.y, spawn_y + 18.0 * 5.0);
    }

    #[test]
    fn test_regular_brick_destroyed() {
        let mut sim = sim_with(|s| {
            s.bullets.push(Bullet {
                id: 1,
                pos: Vec2::new(500.0, 600.0),
            });
            s.bullets.push(Bullet {
                id: 2,
                pos: Vec2::new(1400.0, 300.0),
            });
        });
        // Fresh brick drawn at the top, then placed on the first bullet
        sim.spawn_brick_at(0.9, 0.0);
        sim.state.bricks[0].pos = Vec2::new(520.0, 640.0);

        sim.advance_time();

        let state = sim.state();
        assert!(state.bricks.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.score, 10);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BrickDestroyed {
                kind: BrickKind::Regular,
                points: 10,
                ..
            }
        )));
    }

    #[test]
    fn test_third_miss_ends_game() {
        let mut sim = sim_with(|s| s.missed_bricks = 2);
        // Left edge, far from the centered jet
        sim.spawn_brick_at(0.9, 0.0);

        let mut ticks = 0;
        while !sim.state().is_game_over() {
            sim.advance_time();
            ticks += 1;
            assert!(ticks < 1000, "brick never left the play area");
        }

        let state = sim.state();
        assert_eq!(state.missed_bricks, 3);
        assert!(state.bricks.is_empty());
        assert!(sim.drain_events().contains(&GameEvent::GameOver {
            score: 0,
            cause: GameOverCause::MissLimit,
        }));
    }

    #[test]
    fn test_bonus_brick_boosts_speed() {
        let mut sim = sim_with(|s| {
            s.bullets.push(Bullet {
                id: 1,
                pos: Vec2::new(500.0, 600.0),
            });
        });
        sim.spawn_brick_at(0.0, 0.0);
        assert_eq!(sim.state().bricks[0].kind, BrickKind::Bonus);
        sim.state.bricks[0].pos = Vec2::new(520.0, 640.0);

        sim.advance_time();

        let state = sim.state();
        assert!(state.bonus_active);
        assert_eq!(state.jet_speed, sim.config().jet_boosted_speed);
        assert_eq!(state.score, 50);
        let session = sim.session();
        assert!(sim.drain_events().contains(&GameEvent::BonusActivated {
            session,
            duration_ms: 5000.0,
        }));

        sim.end_bonus(session);
        assert!(!sim.state().bonus_active);
        assert_eq!(sim.state().jet_speed, sim.config().jet_base_speed);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut sim = sim_with(|s| {
            s.score = 120;
            s.missed_bricks = 3;
            s.phase = GamePhase::GameOver;
            s.bonus_active = true;
            s.jet_speed = 80.0;
            s.jet_x = 50.0;
            s.last_fire_ms = Some(10.0);
            s.bricks.push(Brick {
                id: 3,
                pos: Vec2::new(60.0, 10.0),
                kind: BrickKind::Bonus,
            });
        });

        sim.reset();

        assert_eq!(*sim.state(), GameState::new(sim.config()));
        assert!(!sim.state().is_game_over());
    }

    #[test]
    fn test_stale_bonus_reversion_ignored() {
        let mut sim = sim_with(|s| {
            s.bullets.push(Bullet {
                id: 1,
                pos: Vec2::new(500.0, 600.0),
            });
        });
        let old_session = sim.session();
        sim.reset();
        // New session gets its own bonus
        sim.state.bonus_active = true;
        sim.state.jet_speed = 80.0;

        sim.end_bonus(old_session);
        assert!(sim.state().bonus_active);
        sim.end_bonus(sim.session());
        assert!(!sim.state().bonus_active);
    }

    #[test]
    fn test_ids_survive_reset() {
        let mut sim = GameSimulator::new(GameConfig::default(), 1);
        sim.fire(0.0);
        let first = sim.state().bullets[0].id;
        sim.reset();
        sim.fire(0.0);
        assert!(sim.state().bullets[0].id > first);
    }

    #[test]
    fn test_apply_json_commands() {
        let mut sim = GameSimulator::new(GameConfig::default(), 1);
        let start = sim.state().jet_x;
        let commands: Vec<Command> = serde_json::from_str(
            r#"[
                {"type": "Move", "direction": "Left"},
                {"type": "Fire", "now_ms": 0.0},
                {"type": "SpawnObstacle"},
                {"type": "AdvanceTime"}
            ]"#,
        )
        .unwrap();
        for command in commands {
            sim.apply(command);
        }
        let state = sim.state();
        assert_eq!(state.jet_x, start - 30.0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bricks.len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed spawn identical bricks
        let mut sim1 = GameSimulator::new(GameConfig::default(), 99999);
        let mut sim2 = GameSimulator::new(GameConfig::default(), 99999);

        for _ in 0..20 {
            sim1.spawn_obstacle();
            sim2.spawn_obstacle();
            sim1.advance_time();
            sim2.advance_time();
        }

        assert_eq!(sim1.state(), sim2.state());
    }

    #[test]
    fn test_spawn_with_injected_rng() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut sim = GameSimulator::new(GameConfig::default(), 1);
        for _ in 0..50 {
            sim.spawn_obstacle_with(&mut rng);
        }
        let config = sim.config().clone();
        for brick in &sim.state().bricks {
            assert!(brick.pos.x >= config.padding);
            assert!(brick.pos.x <= config.area_width - config.brick_width - config.padding);
            assert_eq!(brick.pos.y, config.area_height - config.brick_height);
        }
    }

    fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            3 => prop_oneof![Just(Direction::Left), Just(Direction::Right)]
                .prop_map(|direction| Command::Move { direction }),
            2 => (0.0f64..100_000.0).prop_map(|now_ms| Command::Fire { now_ms }),
            2 => Just(Command::SpawnObstacle),
            6 => Just(Command::AdvanceTime),
        ]
    }

    proptest! {
        #[test]
        fn prop_jet_stays_in_bounds(moves in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut sim = GameSimulator::new(GameConfig::default(), 3);
            let (min, max) = (sim.config().jet_min_x(), sim.config().jet_max_x());
            for right in moves {
                let direction = if right { Direction::Right } else { Direction::Left };
                let x = sim.move_jet(direction).jet_x;
                prop_assert!(x >= min && x <= max);
            }
        }

        #[test]
        fn prop_counters_are_monotone(
            seed in any::<u64>(),
            commands in prop::collection::vec(arb_command(), 0..400),
        ) {
            let mut sim = GameSimulator::new(GameConfig::default(), seed);
            for command in commands {
                let before = sim.state().clone();
                let is_tick = command == Command::AdvanceTime;
                let after = sim.apply(command).clone();

                prop_assert!(after.score >= before.score);
                prop_assert!(after.missed_bricks >= before.missed_bricks);
                if before.is_game_over() {
                    prop_assert!(after.is_game_over());
                    prop_assert_eq!(&after, &before);
                }

                let destroyed: u64 = sim
                    .drain_events()
                    .iter()
                    .filter_map(|e| match e {
                        GameEvent::BrickDestroyed { points, .. } => Some(*points),
                        _ => None,
                    })
                    .inspect(|points| assert!(*points == 10 || *points == 50))
                    .sum();
                prop_assert_eq!(after.score - before.score, destroyed);

                if is_tick && !before.is_game_over() {
                    // Surviving bullets moved by exactly one bullet step
                    for bullet in &after.bullets {
                        if let Some(prev) = before.bullets.iter().find(|b| b.id == bullet.id) {
                            prop_assert_eq!(bullet.pos.y, prev.pos.y + 18.0);
                        }
                    }
                    // No surviving brick overlaps a surviving bullet
                    let config = sim.config();
                    for brick in &after.bricks {
                        for bullet in &after.bullets {
                            prop_assert!(!brick.aabb(config).overlaps(&bullet.aabb(config)));
                        }
                    }
                    let over = after.missed_bricks >= config.miss_limit
                        || after
                            .bricks
                            .iter()
                            .any(|b| b.aabb(config).overlaps(&after.jet_aabb(config)));
                    prop_assert_eq!(after.is_game_over(), over);
                }
            }
        }
    }
}
