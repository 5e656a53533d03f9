//! Game configuration
//!
//! Fixed at session start. Partial JSON overrides are accepted; missing keys
//! keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// All tunable constants of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play area ===
    pub area_width: f32,
    pub area_height: f32,
    pub padding: f32,

    // === Entity sizes ===
    pub jet_width: f32,
    pub jet_height: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub brick_width: f32,
    pub brick_height: f32,

    // === Motion (pixels per command/tick) ===
    pub jet_base_speed: f32,
    pub jet_boosted_speed: f32,
    pub bullet_speed: f32,
    pub brick_speed: f32,

    // === Rules ===
    pub bonus_probability: f32,
    pub regular_points: u64,
    pub bonus_points: u64,
    pub miss_limit: u32,

    // === Timing (ms) ===
    pub tick_interval_ms: f64,
    pub brick_spawn_interval_ms: f64,
    pub fire_interval_ms: f64,
    pub bonus_duration_ms: f64,
    pub explosion_lifetime_ms: f64,
    pub start_delay_ms: f64,
    pub max_frame_ms: f64,
    pub max_substeps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            area_width: AREA_WIDTH,
            area_height: AREA_HEIGHT,
            padding: AREA_PADDING,

            jet_width: JET_WIDTH,
            jet_height: JET_HEIGHT,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,

            jet_base_speed: JET_BASE_SPEED,
            jet_boosted_speed: JET_BOOSTED_SPEED,
            bullet_speed: BULLET_SPEED,
            brick_speed: BRICK_SPEED,

            bonus_probability: BONUS_PROBABILITY,
            regular_points: REGULAR_POINTS,
            bonus_points: BONUS_POINTS,
            miss_limit: MISS_LIMIT,

            tick_interval_ms: TICK_INTERVAL_MS,
            brick_spawn_interval_ms: BRICK_SPAWN_INTERVAL_MS,
            fire_interval_ms: FIRE_INTERVAL_MS,
            bonus_duration_ms: BONUS_DURATION_MS,
            explosion_lifetime_ms: EXPLOSION_LIFETIME_MS,
            start_delay_ms: START_DELAY_MS,
            max_frame_ms: MAX_FRAME_MS,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl GameConfig {
    /// Default config sized to a given play area
    pub fn with_area(width: f32, height: f32) -> Self {
        Self {
            area_width: width,
            area_height: height,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Leftmost allowed jet position
    pub fn jet_min_x(&self) -> f32 {
        self.padding
    }

    /// Rightmost allowed jet position
    pub fn jet_max_x(&self) -> f32 {
        self.area_width - self.jet_width - self.padding
    }

    /// Horizontal range a brick's left edge can spawn in
    pub fn brick_spawn_span(&self) -> f32 {
        self.area_width - self.brick_width - 2.0 * self.padding
    }

    /// Panic on settings that can only come from a programming error.
    pub fn validate(&self) {
        let sizes = [
            ("area_width", self.area_width),
            ("area_height", self.area_height),
            ("jet_width", self.jet_width),
            ("jet_height", self.jet_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
            ("jet_base_speed", self.jet_base_speed),
            ("jet_boosted_speed", self.jet_boosted_speed),
            ("bullet_speed", self.bullet_speed),
            ("brick_speed", self.brick_speed),
        ];
        for (name, value) in sizes {
            assert!(
                value.is_finite() && value > 0.0,
                "{name} must be positive, got {value}"
            );
        }
        assert!(
            self.padding.is_finite() && self.padding >= 0.0,
            "padding must be non-negative, got {}",
            self.padding
        );

        let intervals = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("brick_spawn_interval_ms", self.brick_spawn_interval_ms),
            ("fire_interval_ms", self.fire_interval_ms),
            ("bonus_duration_ms", self.bonus_duration_ms),
            ("explosion_lifetime_ms", self.explosion_lifetime_ms),
            ("max_frame_ms", self.max_frame_ms),
        ];
        for (name, value) in intervals {
            assert!(
                value.is_finite() && value > 0.0,
                "{name} must be positive, got {value}"
            );
        }
        assert!(
            self.start_delay_ms.is_finite() && self.start_delay_ms >= 0.0,
            "start_delay_ms must be non-negative, got {}",
            self.start_delay_ms
        );

        assert!(
            self.jet_max_x() >= self.jet_min_x(),
            "area_width {} too narrow for jet_width {} with padding {}",
            self.area_width,
            self.jet_width,
            self.padding
        );
        assert!(
            self.brick_spawn_span() >= 0.0,
            "area_width {} too narrow for brick_width {} with padding {}",
            self.area_width,
            self.brick_width,
            self.padding
        );
        // A fresh brick must fall at least one step before reaching the jet
        assert!(
            self.area_height >= self.jet_height + self.brick_height + self.brick_speed,
            "area_height {} too short for jet_height {} below a falling brick",
            self.area_height,
            self.jet_height
        );
        assert!(
            (0.0..=1.0).contains(&self.bonus_probability),
            "bonus_probability must be within [0, 1], got {}",
            self.bonus_probability
        );
        assert!(self.miss_limit > 0, "miss_limit must be at least 1");
        assert!(self.max_substeps > 0, "max_substeps must be at least 1");
    }

    /// LocalStorage key (used only in wasm32)
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "jet_blaster_config";

    /// Environment variable naming a JSON override file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "JET_BLASTER_CONFIG";

    /// Load config overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config overrides from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring malformed stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config overrides from the file named by `JET_BLASTER_CONFIG`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default config");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config overrides from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read config {}: {}", path, e);
                Self::default()
            }
        }
    }
}
