//! Best score per game configuration
//!
//! Scores are stored as JSON numbers under `GameConfiguration::score_key`.
//! Storage failures never reach gameplay: reads fall back to 0 and failed
//! writes report "not recorded".

use crate::config::GameConfiguration;
use crate::persistence::{KeyValueStore, StoreError};

/// Durable best-score lookup
pub trait ScoreStore {
    /// Best score for `config`, 0 if none
    fn lookup(&self, config: &GameConfiguration) -> u32;
    /// Store `score` if it beats the current best. Returns true if recorded.
    fn record_if_higher(&mut self, config: &GameConfiguration, score: u32) -> bool;
}

/// Score store over any key-value backend
#[derive(Debug, Clone, Default)]
pub struct HighScores<B> {
    backend: B,
}

impl<B: KeyValueStore> HighScores<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    fn read(&self, key: &str) -> Result<u32, StoreError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(0),
        }
    }
}

impl<B: KeyValueStore> ScoreStore for HighScores<B> {
    fn lookup(&self, config: &GameConfiguration) -> u32 {
        let key = config.score_key();
        match self.read(&key) {
            Ok(best) => best,
            Err(err) => {
                log::warn!("Could not read best score for {key}: {err}");
                0
            }
        }
    }

    fn record_if_higher(&mut self, config: &GameConfiguration, score: u32) -> bool {
        if score == 0 || score <= self.lookup(config) {
            return false;
        }

        let key = config.score_key();
        let write = serde_json::to_string(&score)
            .map_err(StoreError::from)
            .and_then(|json| self.backend.set(&key, &json));
        match write {
            Ok(()) => {
                log::info!("New best score {score} for {key}");
                true
            }
            Err(err) => {
                log::warn!("Could not save best score for {key}: {err}");
                false
            }
        }
    }
}
