//! Events emitted by the simulation for audio, timers and UI feedback.
//!
//! The simulation never plays sounds or starts timers itself; the host drains
//! these after each command and reacts.

use serde::{Deserialize, Serialize};

use super::state::BrickKind;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Too many bricks got past the jet
    MissLimit,
    /// A brick reached the jet
    JetHit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Shot accepted (audio cue)
    BulletFired { id: u32 },
    /// Brick destroyed by a bullet (audio cue)
    BrickDestroyed { id: u32, kind: BrickKind, points: u64 },
    /// Explosion recorded; the host must call `remove_explosion(id)` after
    /// `lifetime_ms`
    ExplosionSpawned { id: u32, lifetime_ms: f64 },
    /// Brick left the play area untouched
    BrickMissed { id: u32, missed: u32 },
    /// Speed boost started; the host must call `end_bonus(session)` after
    /// `duration_ms`
    BonusActivated { session: u32, duration_ms: f64 },
    /// Speed boost reverted
    BonusExpired,
    /// Run ended
    GameOver { score: u64, cause: GameOverCause },
}
