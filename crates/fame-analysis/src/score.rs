//! Deterministic acoustic scoring.
//!
//! Each candidate starts from a 5.0 base and receives independent,
//! additive, bounded adjustments from the scoring table: loudness,
//! dynamic range, speech activity, spectral brightness, and timeline
//! position. The final score is clamped to [1.0, 10.0]. Scoring is a
//! pure function of the candidate and the track subrange it covers;
//! a degenerate subrange scores the neutral 5.0.

use fame_models::{AudioTrack, Candidate, ScoreBreakdown, ScoredCandidate};

use crate::config::{ScorerConfig, FRAME_WINDOW_SECS};
use crate::features::{
    frame_energies, mean, rms, spectral_centroid, variance, zero_crossing_rate,
};

/// Base score before adjustments, and the neutral score for degenerate
/// subranges.
const BASE_SCORE: f64 = 5.0;

/// Score one candidate against the track it was cut from.
pub fn score_candidate(
    track: &AudioTrack,
    candidate: Candidate,
    config: &ScorerConfig,
) -> ScoredCandidate {
    let samples = track.sample_range(candidate.start_time, candidate.end_time);
    if samples.is_empty() {
        return ScoredCandidate::new(candidate, BASE_SCORE, ScoreBreakdown::default());
    }

    let loudness = rms(samples);
    let energies = frame_energies(samples, track.sample_rate());
    // Normalize per-frame energy to mean power so the variance
    // thresholds are independent of sample rate
    let frame_len = (FRAME_WINDOW_SECS * track.sample_rate() as f64).max(1.0);
    let powers: Vec<f64> = energies.iter().map(|e| e / frame_len).collect();
    let power_variance = variance(&powers);
    let zcr = zero_crossing_rate(samples);
    let centroid = spectral_centroid(samples, track.sample_rate());
    let mean_power = mean(&powers);

    let finite = loudness.is_finite()
        && power_variance.is_finite()
        && zcr.is_finite()
        && centroid.is_finite()
        && mean_power.is_finite();
    if !finite {
        return ScoredCandidate::new(candidate, BASE_SCORE, ScoreBreakdown::default());
    }

    let breakdown = ScoreBreakdown {
        volume: volume_adjustment(loudness, config),
        dynamic_range: dynamic_range_adjustment(power_variance, config),
        speech_activity: speech_adjustment(zcr, config),
        brightness: brightness_adjustment(centroid, config),
        position: position_adjustment(candidate.midpoint(), track.duration()),
    };

    let score = (BASE_SCORE + breakdown.total()).clamp(1.0, 10.0);
    ScoredCandidate::new(candidate, score, breakdown)
}

/// RMS loudness: +1.0 above the high threshold, -1.0 below the low one.
fn volume_adjustment(loudness: f64, config: &ScorerConfig) -> f64 {
    if loudness > config.rms_high {
        1.0
    } else if loudness < config.rms_low {
        -1.0
    } else {
        0.0
    }
}

/// Frame-power variance: +1.0 above the high threshold, -0.5 below the
/// low one.
fn dynamic_range_adjustment(power_variance: f64, config: &ScorerConfig) -> f64 {
    if power_variance > config.variance_high {
        1.0
    } else if power_variance < config.variance_low {
        -0.5
    } else {
        0.0
    }
}

/// Zero-crossing rate: +1.0 inside the speech band, -1.0 near silence.
fn speech_adjustment(zcr: f64, config: &ScorerConfig) -> f64 {
    let (lo, hi) = config.zcr_speech_band;
    if zcr >= lo && zcr <= hi {
        1.0
    } else if zcr < config.zcr_silence_max {
        -1.0
    } else {
        0.0
    }
}

/// Spectral centroid: +0.5 above the brightness threshold.
fn brightness_adjustment(centroid: f64, config: &ScorerConfig) -> f64 {
    if centroid > config.centroid_high_hz {
        0.5
    } else {
        0.0
    }
}

/// Timeline position of the clip midpoint: intros and outros are
/// penalized, the middle of the track gets a bonus.
fn position_adjustment(midpoint: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    let fraction = midpoint / duration;
    if fraction < 0.10 {
        -2.0
    } else if fraction < 0.30 {
        -1.0
    } else if fraction <= 0.70 {
        1.0
    } else if fraction > 0.90 {
        -0.5
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fame_models::ClipStrategy;

    const SR: u32 = 8000;

    fn tone_track(duration_secs: f64, freq: f64, amplitude: f32) -> AudioTrack {
        let n = (duration_secs * SR as f64) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f64 / SR as f64;
                amplitude * (2.0 * std::f64::consts::PI * freq * t).sin() as f32
            })
            .collect();
        AudioTrack::new(samples, SR).unwrap()
    }

    fn candidate(start: f64, end: f64) -> Candidate {
        Candidate::new(start, end, ClipStrategy::BoundaryAnchored)
    }

    #[test]
    fn test_score_is_clamped_to_scale() {
        let track = tone_track(100.0, 440.0, 0.5);
        let scored = score_candidate(&track, candidate(40.0, 55.0), &ScorerConfig::default());
        assert!(scored.score >= 1.0 && scored.score <= 10.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let track = tone_track(100.0, 440.0, 0.3);
        let config = ScorerConfig::default();
        let cand = candidate(30.0, 45.0);
        let first = score_candidate(&track, cand, &config);
        let second = score_candidate(&track, cand, &config);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert_eq!(first.breakdown, second.breakdown);
    }

    #[test]
    fn test_empty_subrange_scores_neutral() {
        let track = tone_track(30.0, 440.0, 0.3);
        // Window entirely past the end of the track
        let scored = score_candidate(&track, candidate(40.0, 55.0), &ScorerConfig::default());
        assert!((scored.score - 5.0).abs() < 1e-9);
        assert_eq!(scored.breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn test_louder_subrange_never_lowers_volume_adjustment() {
        let config = ScorerConfig::default();
        let quiet = tone_track(100.0, 440.0, 0.005);
        let medium = tone_track(100.0, 440.0, 0.05);
        let loud = tone_track(100.0, 440.0, 0.5);

        let cand = candidate(40.0, 55.0);
        let quiet_adj = score_candidate(&quiet, cand, &config).breakdown.volume;
        let medium_adj = score_candidate(&medium, cand, &config).breakdown.volume;
        let loud_adj = score_candidate(&loud, cand, &config).breakdown.volume;

        assert!(quiet_adj <= medium_adj);
        assert!(medium_adj <= loud_adj);
        assert_eq!(quiet_adj, -1.0);
        assert_eq!(loud_adj, 1.0);
    }

    #[test]
    fn test_positional_bias_favors_track_middle() {
        // Identical acoustic content at 5% and 50% midpoints
        let track = tone_track(300.0, 440.0, 0.3);
        let config = ScorerConfig::default();

        let early = score_candidate(&track, candidate(7.5, 22.5), &config);
        let middle = score_candidate(&track, candidate(142.5, 157.5), &config);

        assert!(
            middle.score > early.score,
            "middle {} should beat early {}",
            middle.score,
            early.score
        );
        assert_eq!(early.breakdown.position, -2.0);
        assert_eq!(middle.breakdown.position, 1.0);
    }

    #[test]
    fn test_position_adjustment_bands() {
        assert_eq!(position_adjustment(5.0, 100.0), -2.0);
        assert_eq!(position_adjustment(20.0, 100.0), -1.0);
        assert_eq!(position_adjustment(50.0, 100.0), 1.0);
        assert_eq!(position_adjustment(80.0, 100.0), 0.0);
        assert_eq!(position_adjustment(95.0, 100.0), -0.5);
    }

    #[test]
    fn test_speech_band_zcr_rewarded() {
        let config = ScorerConfig::default();
        assert_eq!(speech_adjustment(0.05, &config), 1.0);
        assert_eq!(speech_adjustment(0.001, &config), -1.0);
        assert_eq!(speech_adjustment(0.3, &config), 0.0);
    }

    #[test]
    fn test_flat_signal_takes_flatness_penalty() {
        // A pure tone has near-constant frame power
        let track = tone_track(100.0, 440.0, 0.3);
        let scored = score_candidate(&track, candidate(40.0, 55.0), &ScorerConfig::default());
        assert!(scored.breakdown.dynamic_range <= 0.0);
    }

    #[test]
    fn test_bright_signal_gets_brightness_bonus() {
        let config = ScorerConfig::default();
        let bright = tone_track(100.0, 3000.0, 0.3);
        let dull = tone_track(100.0, 200.0, 0.3);

        let cand = candidate(40.0, 55.0);
        assert_eq!(score_candidate(&bright, cand, &config).breakdown.brightness, 0.5);
        assert_eq!(score_candidate(&dull, cand, &config).breakdown.brightness, 0.0);
    }
}
