//! Quiz Blaster - an arcade math quiz
//!
//! Core modules:
//! - `sim`: Deterministic game core (problems, transitions, collisions)
//! - `engine`: Per-frame driver and reveal timer around the core
//! - `config`: Round configuration and validation
//! - `highscores`: Best score per configuration
//! - `persistence`: Key-value storage backends
//! - `platform`: Host clock

pub mod config;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfiguration, Operation, PracticeMode, RoundDuration};
pub use engine::{Engine, FrameOutcome, GameResult};
pub use highscores::{HighScores, ScoreStore};

use glam::Vec2;

/// Coordinate space and gameplay constants.
///
/// Positions are reported in `0..PLAY_WIDTH` x `0..PLAY_HEIGHT`, y growing downward.
pub mod consts {
    /// Play area dimensions
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;

    /// Player ship edge length; the ship is anchored near the bottom
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const HALF_PLAYER_WIDTH: f32 = PLAYER_SIZE / 2.0;
    pub const PLAYER_Y: f32 = PLAY_HEIGHT - PLAYER_SIZE;

    /// Answer bubble diameter
    pub const CANDIDATE_SIZE: f32 = 60.0;
    /// Row the answers sit on
    pub const CANDIDATE_Y: f32 = 100.0;
    /// Answers per problem (1 correct + distractors)
    pub const CANDIDATE_COUNT: usize = 4;

    /// Projectile-to-answer center distance that counts as a hit
    pub const HIT_RADIUS: f32 = 40.0;
    /// Pixels per baseline frame, negative is upward
    pub const PROJECTILE_SPEED: f32 = -10.0;

    pub const STARTING_LIVES: u8 = 3;
    pub const POINTS_PER_CORRECT: u32 = 10;
    pub const POINTS_PER_LEVEL: u32 = 50;

    /// Seconds the correct answer stays highlighted after a wrong hit
    pub const REVEAL_DELAY_SECS: f64 = 2.0;
    /// Motion is tuned for 60 Hz; other refresh rates scale by elapsed / baseline
    pub const FRAME_BASELINE_SECS: f32 = 1.0 / 60.0;
    /// Maximum projectile substeps per frame; each covers at most one baseline frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the loop will simulate (tab suspension, debugger pauses)
    pub const MAX_FRAME_SECS: f32 = 0.1;
}

/// Clamp a ship x coordinate so the whole ship stays on screen
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    use consts::*;
    if x.is_nan() {
        return PLAY_WIDTH / 2.0;
    }
    x.clamp(HALF_PLAYER_WIDTH, PLAY_WIDTH - HALF_PLAYER_WIDTH)
}

/// Center of answer slot `index` out of `count`, evenly spaced across the width
#[inline]
pub fn slot_position(index: usize, count: usize) -> Vec2 {
    let spacing = consts::PLAY_WIDTH / (count as f32 + 1.0);
    Vec2::new(spacing * (index as f32 + 1.0), consts::CANDIDATE_Y)
}
