//! State transitions
//!
//! `reduce` is a pure function of the previous state and one action. It never
//! reads a clock or touches storage; the engine feeds it ticks and acts on the
//! events it reports.

use super::state::{GameState, GameStatus, level_for_score};
use crate::clamp_player_x;
use crate::config::GameConfiguration;
use crate::consts::*;

/// Discrete inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Begin a round. Invalid configurations are ignored.
    Start(GameConfiguration),
    /// Move the ship toward an x coordinate (clamped)
    Move { target_x: f32 },
    Shoot,
    /// Advance shots by `frames` baseline frames
    TickProjectiles { frames: f32 },
    /// Count down the round clock
    TickTimer { delta_secs: f32 },
    /// Reserved for motion and difficulty scaling; currently changes nothing
    TickGame,
    /// A shot reached this candidate. Ignored once the candidate has been hit.
    ResolveHit { candidate_id: u32 },
    /// Load the next problem once the reveal delay has passed
    AdvanceAfterReveal,
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    TimeUp,
    OutOfLives,
}

/// Side effects a transition asks the caller to carry out
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CorrectHit { answer: i32, score: u32 },
    WrongHit { answer: i32, lives: u8 },
    /// Correct answer is now highlighted; arm the reveal timer
    RevealStarted,
    /// Persist the score for this configuration
    GameOver {
        configuration: GameConfiguration,
        score: u32,
        reason: GameOverReason,
    },
}

/// Result of applying one action
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Transition {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }
}

/// Apply `action` to `state`, returning the next state and any events.
///
/// Every (state, action) pair is defined; combinations that make no sense
/// (shooting from the menu, resolving a candidate that is gone) return the
/// state unchanged.
pub fn reduce(state: &GameState, action: &Action) -> Transition {
    match action {
        Action::Start(configuration) => start(state, configuration),
        Action::Move { target_x } => {
            let mut next = state.clone();
            next.player_x = clamp_player_x(*target_x);
            Transition {
                state: next,
                events: Vec::new(),
            }
        }
        Action::Shoot => {
            if !state.is_playing() {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.spawn_projectile();
            Transition {
                state: next,
                events: Vec::new(),
            }
        }
        Action::TickProjectiles { frames } => tick_projectiles(state, *frames),
        Action::TickTimer { delta_secs } => tick_timer(state, *delta_secs),
        Action::TickGame => Transition::unchanged(state),
        Action::ResolveHit { candidate_id } => resolve_hit(state, *candidate_id),
        Action::AdvanceAfterReveal => {
            if !state.revealing_answer || !state.is_playing() {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.load_next_problem();
            Transition {
                state: next,
                events: Vec::new(),
            }
        }
        Action::ReturnToMenu => Transition {
            state: GameState::menu_from(state),
            events: Vec::new(),
        },
    }
}

fn start(state: &GameState, configuration: &GameConfiguration) -> Transition {
    if configuration.validate().is_err() {
        return Transition::unchanged(state);
    }

    let mut next = GameState::menu_from(state);
    next.status = GameStatus::Playing;
    next.configuration = Some(*configuration);
    next.time_remaining = configuration.duration_seconds();
    next.load_next_problem();

    Transition {
        state: next,
        events: Vec::new(),
    }
}

fn tick_projectiles(state: &GameState, frames: f32) -> Transition {
    if state.projectiles.is_empty() {
        return Transition::unchanged(state);
    }
    let frames = if frames.is_finite() { frames.max(0.0) } else { 0.0 };

    let mut next = state.clone();
    for projectile in &mut next.projectiles {
        projectile.pos.y += projectile.speed * frames;
    }
    next.projectiles.retain(|p| p.pos.y >= 0.0 && p.pos.y <= PLAY_HEIGHT);

    Transition {
        state: next,
        events: Vec::new(),
    }
}

fn tick_timer(state: &GameState, delta_secs: f32) -> Transition {
    // Guarded on the pre-update value so the crossing fires once
    if !state.is_playing() || state.time_remaining <= 0.0 {
        return Transition::unchanged(state);
    }
    let delta = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };

    let mut next = state.clone();
    next.time_remaining = (state.time_remaining - delta).max(0.0);

    let mut events = Vec::new();
    if next.time_remaining <= 0.0 {
        next.time_remaining = 0.0;
        next.status = GameStatus::GameOver;
        if let Some(configuration) = next.configuration {
            events.push(GameEvent::GameOver {
                configuration,
                score: next.score,
                reason: GameOverReason::TimeUp,
            });
        }
    }

    Transition {
        state: next,
        events,
    }
}

fn resolve_hit(state: &GameState, candidate_id: u32) -> Transition {
    if !state.is_playing() {
        return Transition::unchanged(state);
    }
    let Some(index) = state
        .candidates
        .iter()
        .position(|c| c.id == candidate_id && !c.hit)
    else {
        return Transition::unchanged(state);
    };

    let mut next = state.clone();
    let mut events = Vec::new();
    let hit = next.candidates[index].clone();

    if hit.is_correct {
        next.score += POINTS_PER_CORRECT;
        next.level = level_for_score(next.score);
        next.load_next_problem();
        events.push(GameEvent::CorrectHit {
            answer: hit.value,
            score: next.score,
        });
    } else {
        next.lives = next.lives.saturating_sub(1);
        // Marked, not removed: the full set stays on screen for the reveal
        next.candidates[index].hit = true;
        next.projectiles.clear();
        next.revealing_answer = true;
        events.push(GameEvent::WrongHit {
            answer: hit.value,
            lives: next.lives,
        });

        if next.lives == 0 {
            next.status = GameStatus::GameOver;
            if let Some(configuration) = next.configuration {
                events.push(GameEvent::GameOver {
                    configuration,
                    score: next.score,
                    reason: GameOverReason::OutOfLives,
                });
            }
        } else {
            events.push(GameEvent::RevealStarted);
        }
    }

    Transition {
        state: next,
        events,
    }
}
