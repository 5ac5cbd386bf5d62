//! Clip candidate models.
//!
//! A `Candidate` is an unscored proposed clip window. Scoring wraps it in
//! a `ScoredCandidate`; selection assigns a sequence id and produces the
//! final `SelectedClip` records handed to downstream collaborators.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which generation strategy produced a clip window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipStrategy {
    /// Window anchored near a detected speech/silence boundary.
    BoundaryAnchored,
    /// Window from the fixed timeline-coverage schedule.
    ZoneStratified,
    /// Window drawn from the seeded random sampler.
    SeededRandom,
    /// Window produced by the deterministic fallback segmenter.
    Fallback,
}

/// An unscored clip window proposal.
///
/// Value type: two candidates with the same `(start, end)` pair are the
/// same candidate regardless of which strategy emitted them first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    /// Window start in seconds.
    pub start_time: f64,
    /// Window end in seconds; always greater than `start_time`.
    pub end_time: f64,
    /// Strategy that proposed this window.
    pub strategy: ClipStrategy,
}

impl Candidate {
    pub fn new(start_time: f64, end_time: f64, strategy: ClipStrategy) -> Self {
        Self {
            start_time,
            end_time,
            strategy,
        }
    }

    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Midpoint of the window in seconds.
    pub fn midpoint(&self) -> f64 {
        (self.start_time + self.end_time) / 2.0
    }

    /// Seconds of overlap with another window (0 when disjoint).
    pub fn overlap_secs(&self, other: &Candidate) -> f64 {
        let lo = self.start_time.max(other.start_time);
        let hi = self.end_time.min(other.end_time);
        (hi - lo).max(0.0)
    }

    /// Dedup key at millisecond resolution.
    pub fn time_key(&self) -> (i64, i64) {
        (
            (self.start_time * 1000.0).round() as i64,
            (self.end_time * 1000.0).round() as i64,
        )
    }
}

/// Per-factor score adjustments, each already bounded by the scoring
/// table. Summed onto the 5.0 base before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreBreakdown {
    /// RMS loudness adjustment.
    pub volume: f64,
    /// Frame-energy variance adjustment.
    pub dynamic_range: f64,
    /// Zero-crossing-rate adjustment.
    pub speech_activity: f64,
    /// Spectral centroid adjustment.
    pub brightness: f64,
    /// Timeline-position adjustment from the clip midpoint.
    pub position: f64,
}

impl ScoreBreakdown {
    /// Total adjustment applied to the base score.
    pub fn total(&self) -> f64 {
        self.volume + self.dynamic_range + self.speech_activity + self.brightness + self.position
    }
}

/// A candidate with its deterministic acoustic score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCandidate {
    /// The scored window.
    pub candidate: Candidate,
    /// Acoustic score on the fixed [1.0, 10.0] scale.
    pub score: f64,
    /// Per-factor adjustments behind the score.
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate, score: f64, breakdown: ScoreBreakdown) -> Self {
        Self {
            candidate,
            score,
            breakdown,
        }
    }
}

/// A clip chosen by the diversity selector (or the fallback segmenter).
///
/// Downstream collaborators attach transcripts, media paths, and an
/// independent virality score to these records; this core only supplies
/// the window, the acoustic score, and the producing strategy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectedClip {
    /// 1-based id in order of selection.
    pub sequence: u32,
    /// Clip start in seconds.
    pub start_time: f64,
    /// Clip end in seconds.
    pub end_time: f64,
    /// Clip length in seconds.
    pub duration: f64,
    /// Acoustic score on the fixed [1.0, 10.0] scale. Callers must not
    /// rescale.
    pub score: f64,
    /// Strategy (or fallback) that produced the window.
    pub strategy: ClipStrategy,
}

impl SelectedClip {
    /// Build from a scored candidate, assigning its selection order.
    pub fn from_scored(sequence: u32, scored: &ScoredCandidate) -> Self {
        Self {
            sequence,
            start_time: scored.candidate.start_time,
            end_time: scored.candidate.end_time,
            duration: scored.candidate.duration(),
            score: scored.score,
            strategy: scored.candidate.strategy,
        }
    }
}
