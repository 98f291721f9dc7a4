//! Demo player for attract mode and headless runs
//!
//! Reads a state snapshot and decides what a perfect player would do next.

use super::state::GameState;

/// Ship counts as lined up within this many pixels
pub const ALIGN_TOLERANCE: f32 = 2.0;

/// Input the autopilot wants to send
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Move(f32),
    Shoot,
}

/// Steer under the correct answer, then fire once no shot is in flight
pub fn next_intent(state: &GameState) -> Option<Intent> {
    if !state.is_playing() {
        return None;
    }
    let target = state.correct_candidate()?.pos.x;

    if (state.player_x - target).abs() > ALIGN_TOLERANCE {
        Some(Intent::Move(target))
    } else if state.projectiles.is_empty() {
        Some(Intent::Shoot)
    } else {
        None
    }
}
