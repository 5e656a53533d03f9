//! Game state and core simulation types
//!
//! Coordinates are bottom-origin: y = 0 is the bottom edge of the play area
//! and grows upward. Every entity position is its bottom-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;

/// Macro state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Commands are applied
    #[default]
    Active,
    /// Run ended; only reset (and collaborator callbacks) have an effect
    GameOver,
}

/// Jet move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Convert the -1 / +1 form used by input layers
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// A bullet fired by the jet, travelling upward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
}

impl Bullet {
    pub fn aabb(&self, config: &GameConfig) -> Aabb {
        Aabb::new(self.pos, Vec2::new(config.bullet_width, config.bullet_height))
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Regular,
    /// Worth more points and boosts the jet's speed
    Bonus,
}

impl BrickKind {
    /// Points awarded for destroying a brick of this kind
    pub fn points(self, config: &GameConfig) -> u64 {
        match self {
            BrickKind::Regular => config.regular_points,
            BrickKind::Bonus => config.bonus_points,
        }
    }
}

/// A falling brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub pos: Vec2,
    pub kind: BrickKind,
}

impl Brick {
    pub fn aabb(&self, config: &GameConfig) -> Aabb {
        Aabb::new(self.pos, Vec2::new(config.brick_width, config.brick_height))
    }

    /// True once the brick's top edge has dropped to or below the bottom edge
    pub fn has_exited(&self, config: &GameConfig) -> bool {
        self.pos.y + config.brick_height <= 0.0
    }
}

/// Visual feedback for a destroyed brick; removed by an external timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    /// Center of the destroyed brick
    pub pos: Vec2,
}

/// Entity id allocator. Lives outside `GameState` so ids keep increasing
/// across resets and stale explosion ids never match a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocator whose first id is greater than `max_id`
    pub fn starting_after(max_id: u32) -> Self {
        Self {
            next: max_id.saturating_add(1),
        }
    }

    /// Allocate a new entity ID. Saturates at `u32::MAX`.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Left edge of the jet
    pub jet_x: f32,
    /// Step size per move command
    pub jet_speed: f32,
    /// Active bullets (firing order)
    pub bullets: Vec<Bullet>,
    /// Active bricks (spawn order)
    pub bricks: Vec<Brick>,
    /// Explosions awaiting removal
    pub explosions: Vec<Explosion>,
    pub score: u64,
    pub missed_bricks: u32,
    pub phase: GamePhase,
    /// Speed boost in effect (blocks re-triggering)
    pub bonus_active: bool,
    /// Monotonic timestamp of the last accepted shot
    #[serde(default)]
    pub last_fire_ms: Option<f64>,
}

impl GameState {
    /// Session-start state for the given config
    pub fn new(config: &GameConfig) -> Self {
        Self {
            jet_x: (config.area_width - config.jet_width) / 2.0,
            jet_speed: config.jet_base_speed,
            bullets: Vec::new(),
            bricks: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            missed_bricks: 0,
            phase: GamePhase::Active,
            bonus_active: false,
            last_fire_ms: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Jet bounding box, anchored on the bottom edge of the play area
    pub fn jet_aabb(&self, config: &GameConfig) -> Aabb {
        Aabb::new(
            Vec2::new(self.jet_x, 0.0),
            Vec2::new(config.jet_width, config.jet_height),
        )
    }

    /// Lives left before the miss limit is reached
    pub fn lives_left(&self, config: &GameConfig) -> u32 {
        config.miss_limit.saturating_sub(self.missed_bricks)
    }

    /// Largest entity id present (for restoring the id allocator)
    pub fn max_entity_id(&self) -> u32 {
        let bullets = self.bullets.iter().map(|b| b.id);
        let bricks = self.bricks.iter().map(|b| b.id);
        let explosions = self.explosions.iter().map(|e| e.id);
        bullets.chain(bricks).chain(explosions).max().unwrap_or(0)
    }
}
