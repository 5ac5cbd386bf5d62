//! Configuration for the clip-candidate pipeline.
//!
//! Each stage has its own config with documented defaults; the
//! `PipelineConfig` bundle composes them together with the run seed.
//! All randomness in the pipeline (seeded-random candidates, fallback
//! schedule, pool top-up) derives from that one explicit seed.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Analysis window length in seconds (25 ms).
pub const FRAME_WINDOW_SECS: f64 = 0.025;

/// Analysis hop length in seconds (10 ms).
pub const FRAME_HOP_SECS: f64 = 0.010;

/// Configuration for boundary detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Percentile of the frame-energy distribution below which a frame
    /// counts as silent. The source material works well at the 25th
    /// percentile; raising it toward 30 marks more frames silent and
    /// yields more transitions.
    pub silence_percentile: f64,

    /// Boundaries closer than this to track start or end are discarded
    /// (seconds). Clips anchored at the very edges rarely survive the
    /// duration minimums anyway.
    pub edge_margin_secs: f64,

    /// Boundaries closer together than this are merged, keeping the
    /// earliest of each cluster (seconds).
    pub min_boundary_gap_secs: f64,

    /// When fewer boundaries than this survive filtering, synthetic
    /// boundaries are injected at 25/50/75% of the duration.
    pub min_boundary_count: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            silence_percentile: 25.0,
            edge_margin_secs: 5.0,
            min_boundary_gap_secs: 1.0,
            min_boundary_count: 3,
        }
    }
}

impl BoundaryConfig {
    /// Builder-style setter for the silence percentile.
    pub fn with_silence_percentile(mut self, percentile: f64) -> Self {
        self.silence_percentile = percentile.clamp(0.0, 100.0);
        self
    }

    /// Builder-style setter for the edge margin.
    pub fn with_edge_margin_secs(mut self, secs: f64) -> Self {
        self.edge_margin_secs = secs.max(0.0);
        self
    }
}

/// Configuration for candidate generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Symmetric start offsets applied around each boundary anchor
    /// (seconds).
    pub anchor_offsets_secs: Vec<f64>,

    /// Target clip lengths tried per anchored start (seconds).
    pub target_durations_secs: Vec<f64>,

    /// Windows shorter than this are rejected by every strategy
    /// (seconds).
    pub min_candidate_secs: f64,

    /// Hard cap on the deduplicated candidate pool.
    pub max_candidates: usize,

    /// Start positions of the fixed coverage windows, as fractions of
    /// the track duration. Grouped by band: early (0-20%), early-mid
    /// (20-25%), middle (25-75%, sampled more densely), late (75-100%).
    pub zone_start_fractions: Vec<f64>,

    /// Length of each coverage window (seconds).
    pub zone_window_secs: f64,

    /// Number of seeded-random draws attempted.
    pub random_draws: usize,

    /// Duration range for seeded-random draws (seconds).
    pub random_duration_secs: (f64, f64),

    /// Seeded-random draws may not extend past `duration` minus this
    /// margin (seconds).
    pub random_end_margin_secs: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            anchor_offsets_secs: vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0],
            target_durations_secs: vec![12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0],
            min_candidate_secs: 11.0,
            max_candidates: 50,
            zone_start_fractions: vec![
                // early band (0-20%)
                0.02, 0.10,
                // early-mid band (20-25%)
                0.22,
                // middle band (25-75%), sampled more densely
                0.28, 0.35, 0.42, 0.50, 0.58, 0.65, 0.70,
                // late band (75-100%)
                0.78, 0.85, 0.90,
            ],
            zone_window_secs: 15.0,
            random_draws: 15,
            random_duration_secs: (12.0, 18.0),
            random_end_margin_secs: 2.0,
        }
    }
}

impl GeneratorConfig {
    /// Builder-style setter for the pool cap.
    pub fn with_max_candidates(mut self, cap: usize) -> Self {
        self.max_candidates = cap;
        self
    }

    /// Builder-style setter for the number of random draws.
    pub fn with_random_draws(mut self, draws: usize) -> Self {
        self.random_draws = draws;
        self
    }
}

/// Configuration for acoustic scoring thresholds.
///
/// Adjustments are fixed by the scoring table; the thresholds deciding
/// which side of each rule a candidate falls on live here. Defaults
/// assume samples normalized to [-1.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// RMS above this earns the loudness bonus.
    pub rms_high: f64,

    /// RMS below this takes the quietness penalty.
    pub rms_low: f64,

    /// Frame-power variance above this earns the dynamic-range bonus.
    pub variance_high: f64,

    /// Frame-power variance below this takes the flatness penalty.
    pub variance_low: f64,

    /// Zero-crossing-rate band typical of speech.
    pub zcr_speech_band: (f64, f64),

    /// Zero-crossing rate below this reads as near-silence.
    pub zcr_silence_max: f64,

    /// Spectral centroid above this earns the brightness bonus (Hz).
    pub centroid_high_hz: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            rms_high: 0.1,
            rms_low: 0.01,
            variance_high: 5.0e-4,
            variance_low: 1.0e-6,
            zcr_speech_band: (0.01, 0.1),
            zcr_silence_max: 0.005,
            centroid_high_hz: 2000.0,
        }
    }
}

/// Configuration for diversity-constrained selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Maximum clips accepted per timeline zone during the zone pass.
    pub per_zone_cap: usize,

    /// Selected clips may overlap by at most this many seconds.
    pub max_overlap_secs: f64,

    /// Below this count after the zone pass, the global fill pass runs.
    pub min_total_clips: usize,

    /// Hard cap on selected clips.
    pub max_total_clips: usize,

    /// Fill-pass candidates whose start or end lands within this many
    /// seconds of an accepted clip's start or end are near-duplicates.
    pub duplicate_margin_secs: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            per_zone_cap: 2,
            max_overlap_secs: 3.0,
            min_total_clips: 5,
            max_total_clips: 8,
            duplicate_margin_secs: 1.0,
        }
    }
}

impl SelectorConfig {
    /// Builder-style setter for the overlap cap.
    pub fn with_max_overlap_secs(mut self, secs: f64) -> Self {
        self.max_overlap_secs = secs.max(0.0);
        self
    }

    /// Builder-style setter for the clip count bounds.
    pub fn with_clip_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_total_clips = min;
        self.max_total_clips = max.max(min);
        self
    }
}

/// Configuration for the fallback segmenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Target clip length (seconds).
    pub target_clip_secs: f64,

    /// Scheduled clips shorter than this are discarded (seconds).
    pub min_clip_secs: f64,

    /// Below this count after the schedule pass, sequential windows are
    /// backfilled from time zero.
    pub min_clips: usize,

    /// Hard cap on fallback clips.
    pub max_clips: usize,

    /// Windows overlapping an already-kept window by more than this are
    /// dropped (seconds). Adjacent schedule slots can draw starts close
    /// enough for two target-length windows to collide.
    pub max_overlap_secs: f64,

    /// Fractional position ranges the schedule draws one start from
    /// each, spreading coverage across the track.
    pub schedule_fractions: Vec<(f64, f64)>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            target_clip_secs: 15.0,
            min_clip_secs: 10.0,
            min_clips: 3,
            max_clips: 8,
            max_overlap_secs: 3.0,
            schedule_fractions: vec![
                (0.05, 0.10),
                (0.15, 0.20),
                (0.25, 0.35),
                (0.40, 0.45),
                (0.45, 0.55),
                (0.65, 0.75),
                (0.80, 0.85),
                (0.90, 0.95),
            ],
        }
    }
}

/// Configuration for volume spike diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpikeConfig {
    /// Frame energies above this percentile count as spikes.
    pub spike_percentile: f64,

    /// Minimum spacing between reported spikes (seconds).
    pub min_spacing_secs: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            spike_percentile: 85.0,
            min_spacing_secs: 0.5,
        }
    }
}

/// The full configuration bundle for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed for the seeded-random strategy and the fallback schedule.
    /// Two runs over the same track with the same seed produce
    /// bit-identical output.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub boundary: BoundaryConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub scorer: ScorerConfig,

    #[serde(default)]
    pub selector: SelectorConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub spikes: SpikeConfig,
}

impl PipelineConfig {
    /// Create a config with the given seed and all defaults.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Check the bundle for values the stages cannot work with.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(0.0..=100.0).contains(&self.boundary.silence_percentile) {
            return Err(AnalysisError::invalid_config(format!(
                "silence_percentile must be in [0, 100], got {}",
                self.boundary.silence_percentile
            )));
        }
        if self.generator.max_candidates == 0 {
            return Err(AnalysisError::invalid_config(
                "max_candidates must be at least 1",
            ));
        }
        let (lo, hi) = self.generator.random_duration_secs;
        if lo > hi || lo <= 0.0 {
            return Err(AnalysisError::invalid_config(format!(
                "random_duration_secs range ({lo}, {hi}) is invalid"
            )));
        }
        if self.selector.max_total_clips < self.selector.min_total_clips {
            return Err(AnalysisError::invalid_config(
                "max_total_clips is below min_total_clips",
            ));
        }
        if self.fallback.target_clip_secs <= 0.0 {
            return Err(AnalysisError::invalid_config(
                "target_clip_secs must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_percentile_clamping() {
        let config = BoundaryConfig::default().with_silence_percentile(130.0);
        assert!((config.silence_percentile - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_clip_bounds_rejected() {
        let mut config = PipelineConfig::default();
        config.selector.min_total_clips = 9;
        config.selector.max_total_clips = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_random_range_rejected() {
        let mut config = PipelineConfig::default();
        config.generator.random_duration_secs = (18.0, 12.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_equal_random_range_accepted() {
        // A collapsed range means a constant draw, still well-defined
        let mut config = PipelineConfig::default();
        config.generator.random_duration_secs = (12.0, 12.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = PipelineConfig::with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 7);
        assert_eq!(back.generator.max_candidates, 50);
    }
}
