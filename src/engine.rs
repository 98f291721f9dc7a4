//! Per-frame driver around the pure game core
//!
//! The host calls `frame(now)` once per display frame while it returns
//! `FrameOutcome::Continue`, and forwards player intents in between. The
//! engine owns the only timers in the game (frame pacing and the reveal
//! delay); both die with it, and the reveal delay is cancelled as soon as the
//! state no longer asks for it.

use crate::config::{ConfigError, GameConfiguration};
use crate::consts::*;
use crate::highscores::ScoreStore;
use crate::sim::{Action, GameEvent, GameOverReason, GameState, Transition, detect_hits, reduce};

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// Summary shown on the game over screen
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub configuration: GameConfiguration,
    pub score: u32,
    /// Best score for the configuration after this round
    pub best: u32,
    pub new_best: bool,
    pub reason: GameOverReason,
}

/// One-shot timer on the engine clock. Clearing the slot cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Delay {
    deadline: f64,
}

impl Delay {
    fn after(now: f64, secs: f64) -> Self {
        Self {
            deadline: now + secs,
        }
    }

    fn is_due(&self, now: f64) -> bool {
        now >= self.deadline
    }
}

/// Game loop state: current snapshot, score store, timers
pub struct Engine<S> {
    state: GameState,
    store: S,
    /// Latest time seen by the engine (seconds)
    clock: f64,
    /// Time of the previous frame in the running loop
    last_frame: Option<f64>,
    reveal: Option<Delay>,
    last_result: Option<GameResult>,
}

impl<S: ScoreStore> Engine<S> {
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            store,
            clock: 0.0,
            last_frame: None,
            reveal: None,
            last_result: None,
        }
    }

    /// Latest committed state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    /// When the pending reveal will load the next problem, if one is armed
    pub fn reveal_deadline(&self) -> Option<f64> {
        self.reveal.map(|d| d.deadline)
    }

    /// Best score for the active configuration (0 from the menu)
    pub fn best_score(&self) -> u32 {
        self.state
            .configuration
            .map(|config| self.store.lookup(&config))
            .unwrap_or(0)
    }

    pub fn best_score_for(&self, configuration: &GameConfiguration) -> u32 {
        self.store.lookup(configuration)
    }

    /// Begin a round. Invalid configurations are refused before reaching the core.
    pub fn start_game(&mut self, configuration: GameConfiguration) -> Result<(), ConfigError> {
        configuration.validate()?;

        self.last_result = None;
        self.last_frame = None;
        self.dispatch(Action::Start(configuration));
        log::info!(
            "Game started: {} {} {:?} {}s (seed {}, best {})",
            configuration.operation,
            configuration.mode.as_str(),
            configuration.fixed_operand,
            configuration.duration.seconds(),
            self.state.rng_state.seed,
            self.best_score()
        );
        Ok(())
    }

    /// Move the ship; ignored unless a round is running
    pub fn move_player(&mut self, target_x: f32) {
        if self.state.is_playing() {
            self.dispatch(Action::Move { target_x });
        }
    }

    pub fn shoot(&mut self) {
        self.dispatch(Action::Shoot);
    }

    pub fn return_to_menu(&mut self) {
        self.last_frame = None;
        self.dispatch(Action::ReturnToMenu);
    }

    /// Run any timer whose deadline has passed
    pub fn fire_due_timers(&mut self, now: f64) {
        self.clock = self.clock.max(now);
        if self.reveal.is_some_and(|d| d.is_due(now)) {
            self.reveal = None;
            log::debug!("Reveal finished at {now:.2}s");
            self.dispatch(Action::AdvanceAfterReveal);
        }
    }

    /// Advance one display frame at time `now` (seconds).
    ///
    /// Order within a frame: reveal timer, round clock, game tick, then for
    /// each substep projectile motion followed by collisions against the
    /// post-motion snapshot. Substeps cover at most one baseline frame each.
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        if !self.state.is_playing() {
            self.last_frame = None;
            return FrameOutcome::Stop;
        }

        let elapsed = match self.last_frame {
            Some(prev) => ((now - prev).max(0.0) as f32).min(MAX_FRAME_SECS),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.fire_due_timers(now);

        self.dispatch(Action::TickTimer {
            delta_secs: elapsed,
        });
        self.dispatch(Action::TickGame);

        // Substep so a shot never skips across a hit circle on slow displays
        let frames = elapsed / FRAME_BASELINE_SECS;
        let substeps = (frames.ceil() as u32).clamp(1, MAX_SUBSTEPS);
        for _ in 0..substeps {
            if !self.state.is_playing() {
                break;
            }
            self.dispatch(Action::TickProjectiles {
                frames: frames / substeps as f32,
            });

            let hits = detect_hits(&self.state.projectiles, &self.state.candidates);
            for hit in hits {
                self.dispatch(Action::ResolveHit {
                    candidate_id: hit.candidate_id,
                });
            }
        }

        if self.state.is_playing() {
            FrameOutcome::Continue
        } else {
            self.last_frame = None;
            FrameOutcome::Stop
        }
    }

    fn dispatch(&mut self, action: Action) {
        let Transition { state, events } = reduce(&self.state, &action);
        self.state = state;
        for event in events {
            self.handle_event(event);
        }
        self.sync_reveal_timer();
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::CorrectHit { answer, score } => {
                log::debug!("Correct answer {answer}, score {score}");
            }
            GameEvent::WrongHit { answer, lives } => {
                log::debug!("Wrong answer {answer}, {lives} lives left");
            }
            GameEvent::RevealStarted => {}
            GameEvent::GameOver {
                configuration,
                score,
                reason,
            } => {
                let previous = self.store.lookup(&configuration);
                let new_best = self.store.record_if_higher(&configuration, score);
                let best = if new_best { score } else { previous };
                log::info!(
                    "Game over ({reason:?}): score {score}, best {best}{}",
                    if new_best { " (new best)" } else { "" }
                );
                self.last_result = Some(GameResult {
                    configuration,
                    score,
                    best,
                    new_best,
                    reason,
                });
            }
        }
    }

    /// Arm the reveal delay when a reveal begins, cancel it when the reveal
    /// ends any other way (correct hit, game over, menu, restart)
    fn sync_reveal_timer(&mut self) {
        let wanted = self.state.revealing_answer && self.state.is_playing();
        match (wanted, self.reveal) {
            (true, None) => {
                let delay = Delay::after(self.clock, REVEAL_DELAY_SECS);
                log::debug!("Reveal armed until {:.2}s", delay.deadline);
                self.reveal = Some(delay);
            }
            (false, Some(_)) => {
                log::debug!("Reveal cancelled");
                self.reveal = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Operation, PracticeMode, RoundDuration};
    use crate::highscores::HighScores;
    use crate::persistence::{KeyValueStore, MemoryStorage, StoreError};
    use crate::sim::{GameStatus, Intent, next_intent};

    const FRAME: f64 = 1.0 / 60.0;

    type TestEngine = Engine<HighScores<MemoryStorage>>;

    struct Harness {
        engine: TestEngine,
        now: f64,
    }

    impl Harness {
        fn new(seed: u64) -> Self {
            Self {
                engine: Engine::new(HighScores::new(MemoryStorage::new()), seed),
                now: 0.0,
            }
        }

        fn start(&mut self, config: GameConfiguration) {
            self.engine.start_game(config).unwrap();
            self.engine.frame(self.now);
        }

        fn step(&mut self) -> FrameOutcome {
            self.now += FRAME;
            self.engine.frame(self.now)
        }

        /// Step until `done` holds; panics after `max` frames
        fn run_until(&mut self, max: usize, done: impl Fn(&GameState) -> bool) {
            for _ in 0..max {
                if done(self.engine.state()) {
                    return;
                }
                self.step();
            }
            assert!(done(self.engine.state()), "condition not reached in {max} frames");
        }

        /// Line up under a candidate and fire
        fn fire_at(&mut self, correct: bool) {
            let x = self
                .engine
                .state()
                .candidates
                .iter()
                .find(|c| c.is_correct == correct && !c.hit)
                .expect("target candidate")
                .pos
                .x;
            self.engine.move_player(x);
            self.engine.shoot();
        }
    }

    fn multiplication() -> GameConfiguration {
        GameConfiguration::all(Operation::Multiply, RoundDuration::Sixty)
    }

    #[test]
    fn test_invalid_configuration_never_starts() {
        let mut engine = Engine::new(HighScores::new(MemoryStorage::new()), 1);
        let bad = GameConfiguration {
            operation: Operation::Divide,
            mode: PracticeMode::Specific,
            fixed_operand: None,
            duration: RoundDuration::Sixty,
        };
        assert_eq!(engine.start_game(bad), Err(ConfigError::MissingFixedOperand));
        assert_eq!(engine.state().status, GameStatus::Menu);
        assert_eq!(engine.frame(0.0), FrameOutcome::Stop);
    }

    #[test]
    fn test_shoot_correct_answer_scores() {
        let mut h = Harness::new(12);
        h.start(multiplication());
        let state = h.engine.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.candidates.len(), 4);
        assert_eq!(state.candidates.iter().filter(|c| c.is_correct).count(), 1);
        let first_ids: Vec<_> = state.candidates.iter().map(|c| c.id).collect();

        h.fire_at(true);
        assert_eq!(h.engine.state().projectiles.len(), 1);
        h.run_until(120, |s| s.score == 10);

        let state = h.engine.state();
        assert!(state.projectiles.is_empty());
        assert_eq!(state.candidates.len(), 4);
        assert!(state.candidates.iter().all(|c| !first_ids.contains(&c.id)));
        assert!(state.current_problem.is_some());
    }

    #[test]
    fn test_missed_shot_leaves_the_screen() {
        let mut h = Harness::new(3);
        h.start(multiplication());
        h.engine.move_player(HALF_PLAYER_WIDTH);
        h.engine.shoot();
        h.run_until(120, |s| s.projectiles.is_empty());
        assert_eq!(h.engine.state().score, 0);
        assert_eq!(h.engine.state().lives, STARTING_LIVES);
    }

    #[test]
    fn test_timer_runs_out() {
        let mut h = Harness::new(4);
        h.start(GameConfiguration::all(Operation::Add, RoundDuration::Thirty));
        // Score once so the round has something to persist
        h.fire_at(true);
        h.run_until(120, |s| s.score == 10);

        let mut outcome = FrameOutcome::Continue;
        for _ in 0..400 {
            h.now += 0.1;
            outcome = h.engine.frame(h.now);
            if outcome == FrameOutcome::Stop {
                break;
            }
        }
        assert_eq!(outcome, FrameOutcome::Stop);

        let state = h.engine.state();
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.time_remaining, 0.0);

        let result = h.engine.last_result().expect("result recorded");
        assert_eq!(result.reason, GameOverReason::TimeUp);
        assert_eq!(result.score, 10);
        assert!(result.new_best);
        assert_eq!(h.engine.best_score(), 10);

        // Loop stays stopped
        h.now += 0.1;
        assert_eq!(h.engine.frame(h.now), FrameOutcome::Stop);
        assert_eq!(h.engine.state().time_remaining, 0.0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut h = Harness::new(4);
        h.start(multiplication());
        h.engine.frame(h.now + 10.0);
        let remaining = h.engine.state().time_remaining;
        assert!((remaining - (60.0 - MAX_FRAME_SECS)).abs() < 1e-4, "{remaining}");
    }

    /// Score from one shot fired 35 px right of the correct answer, stepping at `dt`
    fn off_centre_shot_score(dt: f64) -> u32 {
        let mut h = Harness::new(12);
        h.start(multiplication());
        let x = h.engine.state().correct_candidate().unwrap().pos.x;
        h.engine.move_player(x + 35.0);
        h.engine.shoot();
        // Uneven first frame, then a steady refresh rate
        h.now += 2.5 * FRAME;
        h.engine.frame(h.now);
        while h.now < 2.0 {
            h.now += dt;
            h.engine.frame(h.now);
        }
        h.engine.state().score
    }

    #[test]
    fn test_hits_match_across_refresh_rates() {
        assert_eq!(off_centre_shot_score(FRAME), 10);
        assert_eq!(off_centre_shot_score(0.1), 10);
        assert_eq!(off_centre_shot_score(1.0 / 144.0), 10);
    }

    #[test]
    fn test_wrong_hit_reveals_then_advances() {
        let mut h = Harness::new(21);
        h.start(multiplication());
        h.fire_at(false);
        h.run_until(120, |s| s.lives == 2);

        let hit_time = h.now;
        assert!(h.engine.state().revealing_answer);
        assert_eq!(h.engine.state().candidates.len(), CANDIDATE_COUNT);
        assert_eq!(h.engine.state().candidates.iter().filter(|c| c.hit).count(), 1);
        let deadline = h.engine.reveal_deadline().expect("reveal armed");
        assert!((deadline - (hit_time + REVEAL_DELAY_SECS)).abs() < 1e-9);

        // Still revealing just before the deadline
        while h.now + FRAME < deadline {
            h.step();
            assert!(h.engine.state().revealing_answer);
        }
        h.run_until(5, |s| !s.revealing_answer);
        assert_eq!(h.engine.state().candidates.len(), 4);
        assert_eq!(h.engine.reveal_deadline(), None);
    }

    #[test]
    fn test_menu_cancels_pending_reveal() {
        let mut h = Harness::new(21);
        h.start(multiplication());
        h.fire_at(false);
        h.run_until(120, |s| s.revealing_answer);
        assert!(h.engine.reveal_deadline().is_some());

        h.engine.return_to_menu();
        assert_eq!(h.engine.reveal_deadline(), None);
        assert_eq!(h.engine.state().status, GameStatus::Menu);

        // A new round past the old deadline sees no stale advance
        h.start(multiplication());
        let candidates = h.engine.state().candidates.clone();
        for _ in 0..200 {
            h.step();
        }
        assert_eq!(h.engine.state().candidates, candidates);
        assert!(!h.engine.state().revealing_answer);
    }

    #[test]
    fn test_last_life_ends_game_and_persists() {
        let mut h = Harness::new(8);
        h.start(multiplication());
        h.fire_at(true);
        h.run_until(120, |s| s.score == 10);

        for lives in [2u8, 1] {
            h.fire_at(false);
            h.run_until(120, |s| s.lives == lives);
            h.run_until(200, |s| !s.revealing_answer);
        }

        h.fire_at(false);
        h.run_until(120, |s| s.status == GameStatus::GameOver);

        let state = h.engine.state();
        assert_eq!(state.lives, 0);
        assert!(state.revealing_answer);
        assert_eq!(h.engine.reveal_deadline(), None);

        let result = h.engine.last_result().expect("result recorded");
        assert_eq!(result.reason, GameOverReason::OutOfLives);
        assert!(result.new_best);
        assert_eq!(h.engine.best_score_for(&multiplication()), 10);
        assert_eq!(h.step(), FrameOutcome::Stop);
    }

    #[test]
    fn test_lower_score_keeps_previous_best() {
        let mut backend = MemoryStorage::new();
        backend.set(&multiplication().score_key(), "500").unwrap();
        let mut engine = Engine::new(HighScores::new(backend), 5);
        engine.start_game(multiplication()).unwrap();
        engine.frame(0.0);
        engine.frame(100.0);
        for i in 0..700 {
            engine.frame(100.0 + i as f64 * 0.1);
        }
        let result = engine.last_result().expect("round over");
        assert!(!result.new_best);
        assert_eq!(result.best, 500);
        assert_eq!(engine.best_score(), 500);
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        struct Offline;
        impl KeyValueStore for Offline {
            fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn set(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
        }

        let mut engine = Engine::new(HighScores::new(Offline), 5);
        engine
            .start_game(GameConfiguration::all(Operation::Subtract, RoundDuration::Thirty))
            .unwrap();
        assert_eq!(engine.best_score(), 0);
        let mut now = 0.0;
        while engine.frame(now) == FrameOutcome::Continue {
            now += 0.1;
        }
        let result = engine.last_result().expect("round over");
        assert_eq!(result.reason, GameOverReason::TimeUp);
        assert!(!result.new_best);
    }

    #[test]
    fn test_moves_ignored_outside_play() {
        let mut engine = Engine::new(HighScores::new(MemoryStorage::new()), 1);
        engine.move_player(10.0);
        assert_eq!(engine.state().player_x, PLAY_WIDTH / 2.0);
        engine.shoot();
        assert!(engine.state().projectiles.is_empty());
    }

    #[test]
    fn test_autopilot_clears_problems() {
        let mut h = Harness::new(99);
        h.start(GameConfiguration::all(Operation::Divide, RoundDuration::Thirty));
        for _ in 0..1200 {
            match next_intent(h.engine.state()) {
                Some(Intent::Move(x)) => h.engine.move_player(x),
                Some(Intent::Shoot) => h.engine.shoot(),
                None => {}
            }
            if h.step() == FrameOutcome::Stop {
                break;
            }
        }
        assert!(h.engine.state().score >= 100);
        assert_eq!(h.engine.state().lives, STARTING_LIVES);
    }
}
