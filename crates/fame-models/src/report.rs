//! Pipeline output report.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::candidate::SelectedClip;

/// Whole-track acoustic summary, computed once per run for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackFeatures {
    /// Track duration in seconds.
    pub duration: f64,
    /// Root-mean-square amplitude over the whole track.
    pub rms: f64,
    /// Mean per-frame energy.
    pub mean_energy: f64,
    /// Largest absolute sample amplitude.
    pub peak_amplitude: f64,
    /// Fraction of adjacent sample pairs with opposite sign.
    pub zero_crossing_rate: f64,
    /// Magnitude-weighted mean frequency in Hz.
    pub spectral_centroid_hz: f64,
}

/// Final output of the clip-candidate pipeline.
///
/// Wraps the ordered selected clips together with the run metadata a
/// caller needs to reproduce or explain the result: the seed, how many
/// boundaries were found, whether the fallback path ran, and the
/// whole-track diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectionReport {
    /// Selected clips in selection order (sequence ids are 1-based).
    pub clips: Vec<SelectedClip>,
    /// Track duration in seconds.
    pub duration: f64,
    /// Seed used for the seeded-random strategy and fallback schedule.
    pub seed: u64,
    /// Number of boundaries the detector produced (synthetic included).
    pub boundary_count: usize,
    /// True when the fallback segmenter produced the clips.
    pub used_fallback: bool,
    /// Whole-track feature summary, when computable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_features: Option<TrackFeatures>,
    /// Times of frame-energy spikes above the spike percentile, for
    /// diagnostics only; spikes do not influence selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_spike_times: Vec<f64>,
    /// When the report was produced.
    pub created_at: DateTime<Utc>,
}

impl SelectionReport {
    /// Create a report stamped with the current time.
    pub fn new(clips: Vec<SelectedClip>, duration: f64, seed: u64) -> Self {
        Self {
            clips,
            duration,
            seed,
            boundary_count: 0,
            used_fallback: false,
            track_features: None,
            volume_spike_times: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the report carries any clips at all.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, ClipStrategy, ScoreBreakdown, ScoredCandidate};

    #[test]
    fn test_report_roundtrips_through_json() {
        let cand = Candidate::new(10.0, 25.0, ClipStrategy::BoundaryAnchored);
        let scored = ScoredCandidate::new(cand, 6.5, ScoreBreakdown::default());
        let mut report = SelectionReport::new(
            vec![SelectedClip::from_scored(1, &scored)],
            120.0,
            42,
        );
        report.boundary_count = 7;

        let json = serde_json::to_string(&report).unwrap();
        let back: SelectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.clips.len(), 1);
        assert_eq!(back.seed, 42);
        assert_eq!(back.boundary_count, 7);
        assert!(!back.used_fallback);
    }
}
