//! State transitions
//!
//! Every command is a synchronous, total function over `&mut GameState`.
//! Commands other than `remove_explosion` and `end_bonus` are silent no-ops
//! once the game is over.

use glam::Vec2;

use super::events::{GameEvent, GameOverCause};
use super::state::{
    Brick, BrickKind, Bullet, Direction, EntityIds, Explosion, GamePhase, GameState,
};
use crate::config::GameConfig;

/// Step the jet one `jet_speed` in `direction`, clamped to the course
pub fn move_jet(state: &mut GameState, config: &GameConfig, direction: Direction) {
    if state.is_game_over() {
        return;
    }
    let target = state.jet_x + direction.sign() * state.jet_speed;
    state.jet_x = target.clamp(config.jet_min_x(), config.jet_max_x());
}

/// Fire a bullet from the jet's center unless the rate limiter rejects it.
///
/// `now_ms` is a monotonic timestamp supplied by the host. Returns the new
/// bullet's id.
pub fn fire(
    state: &mut GameState,
    config: &GameConfig,
    ids: &mut EntityIds,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }
    if state
        .last_fire_ms
        .is_some_and(|last| now_ms - last < config.fire_interval_ms)
    {
        return None;
    }

    let id = ids.next_id();
    let x = state.jet_x + config.jet_width / 2.0 - config.bullet_width / 2.0;
    state.bullets.push(Bullet {
        id,
        pos: Vec2::new(x, config.jet_height),
    });
    state.last_fire_ms = Some(now_ms);
    events.push(GameEvent::BulletFired { id });
    Some(id)
}

/// Spawn a brick at the top of the play area from two uniform `[0, 1)` rolls
pub fn spawn_brick(
    state: &mut GameState,
    config: &GameConfig,
    ids: &mut EntityIds,
    kind_roll: f32,
    x_roll: f32,
) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }

    let kind = if kind_roll < config.bonus_probability {
        BrickKind::Bonus
    } else {
        BrickKind::Regular
    };
    let x = config.padding + x_roll * config.brick_spawn_span();
    let y = config.area_height - config.brick_height;

    let id = ids.next_id();
    state.bricks.push(Brick {
        id,
        pos: Vec2::new(x, y),
        kind,
    });
    Some(id)
}

/// Advance the simulation by one tick
pub fn advance_time(
    state: &mut GameState,
    config: &GameConfig,
    ids: &mut EntityIds,
    session: u32,
    events: &mut Vec<GameEvent>,
) {
    if state.is_game_over() {
        return;
    }

    // Bullets rise and leave through the top
    for bullet in &mut state.bullets {
        bullet.pos.y += config.bullet_speed;
    }
    state.bullets.retain(|b| b.pos.y < config.area_height);

    // Bricks fall toward the jet
    for brick in &mut state.bricks {
        brick.pos.y -= config.brick_speed;
    }

    // Each brick consumes at most one bullet, the earliest fired that overlaps it
    let mut bullets = std::mem::take(&mut state.bullets);
    let bricks = std::mem::take(&mut state.bricks);
    let mut survivors = Vec::with_capacity(bricks.len());
    let mut bonus_hit = false;

    for brick in bricks {
        let brick_box = brick.aabb(config);
        let hit = bullets
            .iter()
            .position(|b| b.aabb(config).overlaps(&brick_box));

        if let Some(index) = hit {
            bullets.remove(index);

            let points = brick.kind.points(config);
            state.score += points;
            bonus_hit |= brick.kind == BrickKind::Bonus;

            let explosion_id = ids.next_id();
            state.explosions.push(Explosion {
                id: explosion_id,
                pos: brick_box.center(),
            });
            events.push(GameEvent::BrickDestroyed {
                id: brick.id,
                kind: brick.kind,
                points,
            });
            events.push(GameEvent::ExplosionSpawned {
                id: explosion_id,
                lifetime_ms: config.explosion_lifetime_ms,
            });
        } else if brick.has_exited(config) {
            state.missed_bricks += 1;
            log::debug!(
                "Brick {} escaped, missed bricks: {}",
                brick.id,
                state.missed_bricks
            );
            events.push(GameEvent::BrickMissed {
                id: brick.id,
                missed: state.missed_bricks,
            });
        } else {
            survivors.push(brick);
        }
    }

    state.bullets = bullets;
    state.bricks = survivors;

    // Loss check
    let jet_box = state.jet_aabb(config);
    let cause = if state.missed_bricks >= config.miss_limit {
        Some(GameOverCause::MissLimit)
    } else if state
        .bricks
        .iter()
        .any(|b| b.aabb(config).overlaps(&jet_box))
    {
        log::debug!("Brick reached the jet at x={}", state.jet_x);
        Some(GameOverCause::JetHit)
    } else {
        None
    };

    if let Some(cause) = cause {
        state.phase = GamePhase::GameOver;
        log::info!("Game over ({:?}), final score {}", cause, state.score);
        events.push(GameEvent::GameOver {
            score: state.score,
            cause,
        });
    }

    // Bonus is edge-triggered: no stacking, no extension while active
    if bonus_hit && !state.bonus_active {
        state.bonus_active = true;
        state.jet_speed = config.jet_boosted_speed;
        log::debug!("Bonus speed active for {} ms", config.bonus_duration_ms);
        events.push(GameEvent::BonusActivated {
            session,
            duration_ms: config.bonus_duration_ms,
        });
    }
}

/// Drop an expired explosion. Returns whether one was removed.
pub fn remove_explosion(state: &mut GameState, id: u32) -> bool {
    let before = state.explosions.len();
    state.explosions.retain(|e| e.id != id);
    state.explosions.len() != before
}

/// Revert the bonus speed boost. Returns whether a boost was active.
pub fn end_bonus(
    state: &mut GameState,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !state.bonus_active {
        return false;
    }
    state.bonus_active = false;
    state.jet_speed = config.jet_base_speed;
    log::debug!("Bonus speed expired");
    events.push(GameEvent::BonusExpired);
    true
}
