//! Game state and core simulation types
//!
//! The whole round lives in `GameState`; transitions clone it and return a new value.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::problem::{self, MathProblem};
use crate::config::GameConfiguration;
use crate::consts::*;
use crate::slot_position;

/// Where the player is in the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Choosing a configuration
    Menu,
    /// Round in progress
    Playing,
    /// Round ended (time up or out of lives)
    GameOver,
}

/// An answer bubble the player can shoot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u32,
    pub value: i32,
    pub pos: Vec2,
    pub is_correct: bool,
    /// Already shot this problem (wrong answer, shown dimmed during the reveal)
    #[serde(default)]
    pub hit: bool,
}

/// A shot fired by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Vertical pixels per baseline frame (negative travels up)
    pub speed: f32,
}

/// RNG position for serialization.
///
/// Each draw derives a fresh generator from `(seed, stream)` and bumps the
/// stream, so a state snapshot is enough to replay every later problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the current stream, then advance to the next one
    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    /// Set at start, cleared on return to menu
    pub configuration: Option<GameConfiguration>,
    pub current_problem: Option<MathProblem>,
    /// Answers in slot order (left to right)
    pub candidates: Vec<Candidate>,
    /// Shots in firing order
    pub projectiles: Vec<Projectile>,
    /// Ship center, clamped to keep the ship on screen
    pub player_x: f32,
    pub score: u32,
    pub lives: u8,
    /// Derived from score, cosmetic
    pub level: u32,
    /// Correct answer is highlighted after a wrong hit
    pub revealing_answer: bool,
    /// Seconds left in the round, never negative
    pub time_remaining: f32,
    pub rng_state: RngState,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Menu state for a fresh process
    pub fn new(seed: u64) -> Self {
        Self {
            status: GameStatus::Menu,
            configuration: None,
            current_problem: None,
            candidates: Vec::new(),
            projectiles: Vec::new(),
            player_x: PLAY_WIDTH / 2.0,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            revealing_answer: false,
            time_remaining: 0.0,
            rng_state: RngState::new(seed),
            next_id: 1,
        }
    }

    /// Back to the menu, keeping the RNG and ID counters running
    pub fn menu_from(previous: &GameState) -> Self {
        Self {
            rng_state: previous.rng_state.clone(),
            next_id: previous.next_id,
            ..Self::new(previous.rng_state.seed)
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn correct_candidate(&self) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.is_correct)
    }

    pub fn candidate(&self, id: u32) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Replace the problem and its answers, clearing shots and any reveal.
    /// Does nothing without a configuration.
    pub fn load_next_problem(&mut self) {
        let Some(config) = self.configuration else {
            return;
        };

        let mut rng = self.rng_state.next_rng();
        let problem = problem::generate(config.operation, config.fixed_operand, &mut rng);
        let answers = problem::shuffled_answers(&problem, CANDIDATE_COUNT, &mut rng);

        let count = answers.len();
        let mut candidates = Vec::with_capacity(count);
        for (slot, (value, is_correct)) in answers.into_iter().enumerate() {
            candidates.push(Candidate {
                id: self.next_entity_id(),
                value,
                pos: slot_position(slot, count),
                is_correct,
                hit: false,
            });
        }

        self.current_problem = Some(problem);
        self.candidates = candidates;
        self.projectiles.clear();
        self.revealing_answer = false;
    }

    /// Fire from just above the ship
    pub fn spawn_projectile(&mut self) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos: Vec2::new(self.player_x, PLAYER_Y - PLAYER_SIZE / 2.0),
            speed: PROJECTILE_SPEED,
        });
    }
}

/// Level shown for a score
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Operation, RoundDuration};

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::new(1);
        assert_eq!(state.status, GameStatus::Menu);
        assert!(state.configuration.is_none());
        assert!(state.candidates.is_empty());
        assert_eq!(state.player_x, PLAY_WIDTH / 2.0);
    }

    #[test]
    fn test_load_next_problem_lays_out_answers() {
        let mut state = GameState::new(42);
        state.configuration = Some(GameConfiguration::all(
            Operation::Subtract,
            RoundDuration::Thirty,
        ));
        state.load_next_problem();

        let problem = state.current_problem.expect("problem generated");
        assert_eq!(state.candidates.len(), CANDIDATE_COUNT);
        let correct: Vec<_> = state.candidates.iter().filter(|c| c.is_correct).collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].value, problem.correct_answer);

        // Evenly spaced left to right on one row
        for pair in state.candidates.windows(2) {
            assert!(pair[0].pos.x < pair[1].pos.x);
            assert_eq!(pair[0].pos.y, CANDIDATE_Y);
        }
        let ids: Vec<_> = state.candidates.iter().map(|c| c.id).collect();
        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(ids, unique);
    }

    #[test]
    fn test_rng_streams_replay() {
        let mut a = RngState::new(5);
        let mut b = RngState::new(5);
        let p1 = problem::generate(Operation::Multiply, None, &mut a.next_rng());
        let p2 = problem::generate(Operation::Multiply, None, &mut b.next_rng());
        assert_eq!(p1, p2);
        assert_eq!(a.stream, 1);
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(40), 1);
        assert_eq!(level_for_score(50), 2);
        assert_eq!(level_for_score(130), 3);
    }
}
