//! Jet Blaster entry point
//!
//! The browser build exports `web::WebGame` from the library. Natively this
//! runs a headless demo session with a simple autopilot and logs the outcome.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use jet_blaster::sim::{Direction, GameEvent, GameState};
    use jet_blaster::{GameConfig, HighScores, SessionDriver};

    env_logger::init();
    log::info!("Jet Blaster (native) starting...");

    let config = GameConfig::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);
    let mut driver = SessionDriver::new(config, seed);
    let mut high_scores = HighScores::load();

    /// Steer toward the lowest brick
    fn autopilot(state: &GameState, config: &GameConfig) -> Option<Direction> {
        let target = state
            .bricks
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
        let jet_center = state.jet_x + config.jet_width / 2.0;
        let brick_center = target.pos.x + config.brick_width / 2.0;
        let delta = brick_center - jet_center;
        if delta.abs() < state.jet_speed {
            None
        } else if delta < 0.0 {
            Some(Direction::Left)
        } else {
            Some(Direction::Right)
        }
    }

    // One minute of 60 Hz frames
    let frame_ms = 1000.0 / 60.0;
    let mut destroyed = 0u32;
    for _ in 0..60 * 60 {
        if let Some(direction) = autopilot(driver.state(), driver.config()) {
            driver.move_jet(direction);
        }

        for event in driver.advance(frame_ms) {
            match event {
                GameEvent::BrickDestroyed { kind, points, .. } => {
                    destroyed += 1;
                    log::debug!("{:?} brick destroyed (+{})", kind, points);
                }
                GameEvent::BrickMissed { missed, .. } => {
                    log::info!("Brick missed ({} so far)", missed);
                }
                GameEvent::BonusActivated { .. } => log::info!("Bonus speed!"),
                GameEvent::GameOver { score, cause } => {
                    log::info!("Game over: {:?}, score {}", cause, score);
                }
                _ => {}
            }
        }

        if driver.state().is_game_over() {
            break;
        }
    }

    let score = driver.state().score;
    if let Some(rank) = high_scores.add_score(score, 0.0) {
        high_scores.save();
        log::info!("New high score, rank {}", rank);
    }
    driver.end_session();

    println!(
        "Score: {} | Bricks destroyed: {} | Missed: {} | Time: {:.1}s",
        score,
        destroyed,
        driver.state().missed_bricks,
        driver.clock_ms() / 1000.0
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
