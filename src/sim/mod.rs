//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per `advance_time`
//! - Seeded or injected RNG only
//! - Timestamps supplied by the caller, never read from a clock
//! - No rendering, audio or timer dependencies

pub mod collision;
pub mod events;
pub mod simulator;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use events::{GameEvent, GameOverCause};
pub use simulator::{Command, GameSimulator};
pub use state::{Brick, BrickKind, Bullet, Direction, EntityIds, Explosion, GamePhase, GameState};
