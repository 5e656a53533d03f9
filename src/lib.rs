//! Jet Blaster - a falling-bricks arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, game state)
//! - `host`: Timer scheduling that drives the simulation at fixed cadences
//! - `config`: Game constants, loadable from JSON
//! - `highscores`: Top-10 leaderboard

pub mod config;
pub mod highscores;
pub mod host;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::GameConfig;
pub use highscores::HighScores;
pub use host::SessionDriver;
pub use sim::GameSimulator;

/// Game configuration constants
pub mod consts {
    /// Play area (pixels, bottom-origin)
    pub const AREA_WIDTH: f32 = 1920.0;
    pub const AREA_HEIGHT: f32 = 1080.0;
    /// Horizontal margin the jet and spawned bricks keep from the edges
    pub const AREA_PADDING: f32 = 50.0;

    /// Jet defaults
    pub const JET_WIDTH: f32 = 290.0;
    pub const JET_HEIGHT: f32 = 150.0;
    pub const JET_BASE_SPEED: f32 = 30.0;
    /// Jet step while the bonus effect is active
    pub const JET_BOOSTED_SPEED: f32 = 80.0;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 200.0;
    pub const BULLET_HEIGHT: f32 = 100.0;
    /// Upward travel per tick
    pub const BULLET_SPEED: f32 = 18.0;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 150.0;
    pub const BRICK_HEIGHT: f32 = 50.0;
    /// Downward travel per tick
    pub const BRICK_SPEED: f32 = 6.0;
    /// Chance a spawned brick is a bonus brick
    pub const BONUS_PROBABILITY: f32 = 0.2;

    /// Scoring
    pub const REGULAR_POINTS: u64 = 10;
    pub const BONUS_POINTS: u64 = 50;
    /// Missed bricks that end the run
    pub const MISS_LIMIT: u32 = 3;

    /// Timing (milliseconds)
    pub const TICK_INTERVAL_MS: f64 = 16.0;
    pub const BRICK_SPAWN_INTERVAL_MS: f64 = 1500.0;
    pub const FIRE_INTERVAL_MS: f64 = 200.0;
    pub const BONUS_DURATION_MS: f64 = 5000.0;
    pub const EXPLOSION_LIFETIME_MS: f64 = 800.0;
    /// Jet entrance before the first tick, spawn or shot
    pub const START_DELAY_MS: f64 = 500.0;

    /// Longest frame the host will simulate (avoids spiral of death)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum ticks per host frame
    pub const MAX_SUBSTEPS: u32 = 8;
}
