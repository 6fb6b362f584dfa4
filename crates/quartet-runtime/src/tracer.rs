#![forbid(unsafe_code)]

//! Per-word pointer motion tracing.
//!
//! A [`MotionTracer`] receives pointer samples for words being dragged.
//! The default [`NoopTracer`] discards everything; [`RecordingTracer`] keeps
//! samples in memory and can export them as JSONL. Which one a game uses is
//! decided by [`TracerConfig`] or by injecting a tracer directly.
//!
//! Timestamps are logical clock readings, so traces are reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use quartet_core::{Point, WordId};
use serde::{Deserialize, Serialize};

/// Configuration for motion tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Whether samples are recorded.
    pub enabled: bool,
    /// Samples kept before further samples are dropped.
    pub max_samples: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_samples: 4096,
        }
    }
}

impl TracerConfig {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Build the tracer this configuration describes.
    #[must_use]
    pub fn build(&self) -> Box<dyn MotionTracer> {
        if self.enabled {
            Box::new(RecordingTracer::new(self.max_samples))
        } else {
            Box::new(NoopTracer)
        }
    }
}

/// One pointer position observed for a word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Logical time in milliseconds.
    pub at_ms: u64,
    pub x: f32,
    pub y: f32,
}

/// Sink for drag motion samples.
pub trait MotionTracer: fmt::Debug {
    /// Begin tracing `word_id`, discarding its previous samples.
    fn start(&mut self, word_id: &WordId);
    /// Record a sample; ignored unless `word_id` was started since the last clear.
    fn record(&mut self, word_id: &WordId, at: Duration, point: Point);
    fn stop(&mut self, word_id: &WordId);
    fn clear(&mut self);
    /// All samples in recording order, tagged with their word.
    fn samples(&self) -> Vec<(WordId, MotionSample)>;
    fn samples_for(&self, word_id: &WordId) -> Vec<MotionSample>;
    fn is_enabled(&self) -> bool;
}

/// Tracer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl MotionTracer for NoopTracer {
    fn start(&mut self, _word_id: &WordId) {}
    fn record(&mut self, _word_id: &WordId, _at: Duration, _point: Point) {}
    fn stop(&mut self, _word_id: &WordId) {}
    fn clear(&mut self) {}

    fn samples(&self) -> Vec<(WordId, MotionSample)> {
        Vec::new()
    }

    fn samples_for(&self, _word_id: &WordId) -> Vec<MotionSample> {
        Vec::new()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// In-memory tracer.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    max_samples: usize,
    samples: Vec<(WordId, MotionSample)>,
    by_word: BTreeMap<WordId, Vec<MotionSample>>,
    active: BTreeSet<WordId>,
    dropped: u64,
}

#[derive(Serialize)]
struct SampleLine<'a> {
    word_id: &'a WordId,
    #[serde(flatten)]
    sample: &'a MotionSample,
}

impl RecordingTracer {
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        Self {
            max_samples,
            ..Self::default()
        }
    }

    /// Samples refused because the tracer was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[must_use]
    pub fn is_active(&self, word_id: &WordId) -> bool {
        self.active.contains(word_id)
    }

    /// Write every sample as one JSON object per line.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (word_id, sample) in &self.samples {
            let line = serde_json::to_string(&SampleLine { word_id, sample })?;
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }
}

impl MotionTracer for RecordingTracer {
    fn start(&mut self, word_id: &WordId) {
        self.active.insert(word_id.clone());
        self.by_word.insert(word_id.clone(), Vec::new());
    }

    fn record(&mut self, word_id: &WordId, at: Duration, point: Point) {
        let Some(word_samples) = self.by_word.get_mut(word_id) else {
            return;
        };
        if self.samples.len() >= self.max_samples {
            if self.dropped == 0 {
                tracing::warn!(
                    target: "quartet.drag",
                    max = self.max_samples,
                    "motion tracer full, dropping samples"
                );
            }
            self.dropped += 1;
            return;
        }
        let sample = MotionSample {
            at_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
            x: point.x,
            y: point.y,
        };
        word_samples.push(sample);
        self.samples.push((word_id.clone(), sample));
    }

    fn stop(&mut self, word_id: &WordId) {
        self.active.remove(word_id);
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.by_word.clear();
        self.active.clear();
        self.dropped = 0;
    }

    fn samples(&self) -> Vec<(WordId, MotionSample)> {
        self.samples.clone()
    }

    fn samples_for(&self, word_id: &WordId) -> Vec<MotionSample> {
        self.by_word.get(word_id).cloned().unwrap_or_default()
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
