//! Browser bridge
//!
//! The page renders and plays sounds; this module owns the session, maps
//! keyboard input to commands and hands snapshots and events back as JSON.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::highscores::HighScores;
use crate::host::SessionDriver;
use crate::sim::{Direction, GameEvent};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Jet Blaster (web) starting...");
}

/// Game instance exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    driver: SessionDriver,
    high_scores: HighScores,
    last_rank: Option<usize>,
}

#[wasm_bindgen]
impl WebGame {
    /// New session sized to the game area element
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u64) -> WebGame {
        let config = GameConfig {
            area_width: width,
            area_height: height,
            ..GameConfig::load()
        };
        WebGame {
            driver: SessionDriver::new(config, seed),
            high_scores: HighScores::load(),
            last_rank: None,
        }
    }

    /// Advance by the frame's elapsed time; returns the emitted events as JSON
    pub fn frame(&mut self, elapsed_ms: f64) -> String {
        let events = self.driver.advance(elapsed_ms);
        self.record_game_over(&events);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }

    /// Keyboard input. Returns true if the key was handled.
    pub fn key_down(&mut self, key: &str) -> bool {
        let game_over = self.driver.state().is_game_over();
        match key {
            "Enter" if game_over => {
                self.reset();
                true
            }
            "ArrowLeft" if !game_over => {
                self.driver.move_jet(Direction::Left);
                true
            }
            "ArrowRight" if !game_over => {
                self.driver.move_jet(Direction::Right);
                true
            }
            " " if !game_over => {
                self.driver.fire();
                true
            }
            _ => false,
        }
    }

    pub fn set_autofire(&mut self, enabled: bool) {
        self.driver.set_autofire(enabled);
    }

    pub fn reset(&mut self) {
        self.last_rank = None;
        self.driver.reset();
    }

    /// Stop all timers (page is navigating away)
    pub fn end_session(&mut self) {
        self.driver.end_session();
    }

    /// Current state as JSON for the renderer
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self.driver.state()).unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            "{}".to_string()
        })
    }

    pub fn score(&self) -> f64 {
        self.driver.state().score as f64
    }

    pub fn lives_left(&self) -> u32 {
        self.driver.state().lives_left(self.driver.config())
    }

    pub fn is_game_over(&self) -> bool {
        self.driver.state().is_game_over()
    }

    pub fn bonus_active(&self) -> bool {
        self.driver.state().bonus_active
    }

    pub fn best_score(&self) -> f64 {
        self.high_scores.top_score().unwrap_or(0) as f64
    }

    /// Leaderboard rank of the last finished run, 0 if it did not place
    pub fn last_rank(&self) -> u32 {
        self.last_rank.map_or(0, |r| r as u32)
    }
}

impl WebGame {
    fn record_game_over(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::GameOver { score, .. } = event {
                self.last_rank = self.high_scores.add_score(*score, js_sys::Date::now());
                if self.last_rank.is_some() {
                    self.high_scores.save();
                }
            }
        }
    }
}
