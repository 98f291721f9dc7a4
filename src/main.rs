//! Quiz Blaster entry point
//!
//! The browser build is driven from `web.rs`. Natively this runs one headless
//! round with the autopilot and records the score.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use quiz_blaster::persistence::JsonFileStorage;
    use quiz_blaster::sim::{Intent, next_intent};
    use quiz_blaster::{
        Engine, FrameOutcome, GameConfiguration, HighScores, Operation, RoundDuration, platform,
    };

    env_logger::init();
    log::info!("Quiz Blaster (native) starting...");

    let scores_path = std::env::var_os("QUIZ_BLASTER_SCORES")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("quiz_blaster_scores.json"));
    log::info!("Scores file: {}", scores_path.display());

    let seed = platform::session_seed();
    let mut engine = Engine::new(HighScores::new(JsonFileStorage::new(scores_path)), seed);

    let configuration = GameConfiguration::all(Operation::Multiply, RoundDuration::Thirty);
    if let Err(e) = engine.start_game(configuration) {
        log::error!("Could not start demo round: {e}");
        return;
    }

    // Simulated 60 Hz clock so the demo finishes instantly
    let mut now = 0.0;
    while engine.frame(now) == FrameOutcome::Continue {
        match next_intent(engine.state()) {
            Some(Intent::Move(x)) => engine.move_player(x),
            Some(Intent::Shoot) => engine.shoot(),
            None => {}
        }
        now += 1.0 / 60.0;
    }

    match engine.last_result() {
        Some(result) => println!(
            "Demo round over: score {} (best {}{})",
            result.score,
            result.best,
            if result.new_best { ", new best!" } else { "" }
        ),
        None => println!("Demo round ended without a result"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init, this is just to satisfy the compiler
}
