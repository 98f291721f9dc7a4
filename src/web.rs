//! Browser bindings
//!
//! The page owns rendering and input; it calls these methods with player
//! intents and reads back a JSON snapshot of the state each frame.

use wasm_bindgen::prelude::*;

use crate::config::{GameConfiguration, Operation, PracticeMode, RoundDuration};
use crate::engine::{Engine, FrameOutcome};
use crate::highscores::HighScores;
use crate::persistence::LocalStorage;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Quiz Blaster loaded");
}

/// A game session bound to the page
#[wasm_bindgen]
pub struct WasmGame {
    engine: Engine<HighScores<LocalStorage>>,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let seed = crate::platform::session_seed();
        log::info!("Session seed: {}", seed);
        WasmGame {
            engine: Engine::new(HighScores::new(LocalStorage::new()), seed),
        }
    }

    /// Start a round, e.g. `start_game("multiply", "specific", 7, 60)`.
    /// Returns an error string for anything the menu should not have allowed.
    pub fn start_game(
        &mut self,
        operation: &str,
        mode: &str,
        fixed_operand: Option<i32>,
        duration_secs: u32,
    ) -> Result<(), JsValue> {
        let configuration = parse_configuration(operation, mode, fixed_operand, duration_secs)?;
        self.engine
            .start_game(configuration)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn move_player(&mut self, x: f32) {
        self.engine.move_player(x);
    }

    pub fn shoot(&mut self) {
        self.engine.shoot();
    }

    pub fn return_to_menu(&mut self) {
        self.engine.return_to_menu();
    }

    /// Drive one animation frame. Returns false once the loop should stop.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.engine.frame(now_ms / 1000.0) == FrameOutcome::Continue
    }

    /// Reveal timer callback for hosts that schedule it themselves
    pub fn fire_due_timers(&mut self, now_ms: f64) {
        self.engine.fire_due_timers(now_ms / 1000.0);
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(self.engine.state()).unwrap_or_else(|e| {
            log::warn!("State serialization failed: {e}");
            "null".to_string()
        })
    }

    pub fn best_score(&self) -> u32 {
        self.engine.best_score()
    }

    /// `{score, best, new_best}` after a game over, `null` otherwise
    pub fn last_result_json(&self) -> String {
        match self.engine.last_result() {
            Some(r) => serde_json::json!({
                "score": r.score,
                "best": r.best,
                "new_best": r.new_best,
                "reason": format!("{:?}", r.reason),
            })
            .to_string(),
            None => "null".to_string(),
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_configuration(
    operation: &str,
    mode: &str,
    fixed_operand: Option<i32>,
    duration_secs: u32,
) -> Result<GameConfiguration, JsValue> {
    let operation = Operation::from_str(operation)
        .ok_or_else(|| JsValue::from_str(&format!("unknown operation '{operation}'")))?;
    let mode = PracticeMode::from_str(mode)
        .ok_or_else(|| JsValue::from_str(&format!("unknown practice mode '{mode}'")))?;
    let duration = RoundDuration::from_seconds(duration_secs)
        .ok_or_else(|| JsValue::from_str(&format!("unsupported duration {duration_secs}s")))?;
    GameConfiguration::new(operation, mode, fixed_operand, duration)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
