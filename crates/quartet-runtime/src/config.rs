#![forbid(unsafe_code)]

//! Game configuration as data.
//!
//! [`GameConfig`] gathers every tunable of a session: the default mistake
//! allowance, hop timing, gesture thresholds, motion tracing, and an
//! optional shuffle seed. It loads from TOML or JSON; missing keys keep
//! their defaults.
//!
//! ```toml
//! mistakes_allowed = 5
//! shuffle_seed = 42
//!
//! [timing]
//! stagger_ms = 50
//!
//! [gesture]
//! long_press_ms = 300
//!
//! [tracer]
//! enabled = true
//! ```
//!
//! # Defaults
//!
//! `GameConfig::default()` reproduces the published constants: 4 mistakes,
//! 70ms stagger, 260ms hops, a 6px drag threshold, a 200ms long press, and
//! tracing off.

use std::path::Path;

use quartet_core::{DEFAULT_MISTAKES_ALLOWED, HopTiming};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gesture::GestureConfig;
use crate::tracer::TracerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Allowance used when the puzzle document does not set one.
    pub mistakes_allowed: u8,
    pub timing: HopTiming,
    pub gesture: GestureConfig,
    pub tracer: TracerConfig,
    /// Seed for deterministic shuffles; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mistakes_allowed: DEFAULT_MISTAKES_ALLOWED,
            timing: HopTiming::default(),
            gesture: GestureConfig::default(),
            tracer: TracerConfig::default(),
            shuffle_seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Every problem with this configuration, empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.mistakes_allowed == 0 {
            problems.push("mistakes_allowed must be >= 1".to_owned());
        }
        problems.extend(self.timing.validate());
        problems.extend(self.gesture.validate());
        if self.tracer.enabled && self.tracer.max_samples == 0 {
            problems.push("tracer.max_samples must be > 0 when tracing is enabled".to_owned());
        }
        problems
    }

    /// Validate, turning problems into an error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: HopTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_tracer(mut self, tracer: TracerConfig) -> Self {
        self.tracer = tracer;
        self
    }

    /// Serialize as a single JSON line, for startup diagnostics.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
