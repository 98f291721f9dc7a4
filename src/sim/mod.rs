//! Deterministic game core
//!
//! All gameplay rules live here. This module must stay pure:
//! - State changes only through `reduce`
//! - Seeded RNG only
//! - Stable iteration order (firing order for shots, slot order for answers)
//! - No clock, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod problem;
pub mod reduce;
pub mod state;

pub use autopilot::{Intent, next_intent};
pub use collision::{Hit, detect_hits, projectile_hits};
pub use problem::{MathProblem, generate, generate_distractors, shuffled_answers};
pub use reduce::{Action, GameEvent, GameOverReason, Transition, reduce};
pub use state::{Candidate, GameState, GameStatus, Projectile, RngState, level_for_score};
