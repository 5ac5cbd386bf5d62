//! Speech/silence boundary detection.
//!
//! Slides the fixed 25ms/10ms analysis frame over the track, classifies
//! frames as silent against a percentile of the energy distribution, and
//! records a boundary at every classification flip. Too few survivors
//! after edge and gap filtering get topped up with synthetic boundaries
//! at fixed fractions of the duration, so downstream generation always
//! has anchors to work from.

use tracing::debug;

use fame_models::{AudioTrack, Boundary, BoundaryKind};

use crate::config::{BoundaryConfig, FRAME_HOP_SECS};
use crate::features::{frame_energies, percentile};

/// Fractions of the duration where synthetic boundaries are injected.
const SYNTHETIC_FRACTIONS: [f64; 3] = [0.25, 0.50, 0.75];

/// Detect boundaries for a track. Deterministic: the same track and
/// config always produce the same ascending list.
pub fn detect_boundaries(track: &AudioTrack, config: &BoundaryConfig) -> Vec<Boundary> {
    let duration = track.duration();
    let energies = frame_energies(track.samples(), track.sample_rate());

    let mut boundaries = transitions(&energies, config.silence_percentile);

    // Drop anything hugging the track edges
    let margin = config.edge_margin_secs;
    boundaries.retain(|b| b.time >= margin && b.time <= duration - margin);

    // Merge clusters, keeping the earliest of each
    boundaries = merge_close(boundaries, config.min_boundary_gap_secs);

    if boundaries.len() < config.min_boundary_count {
        let before = boundaries.len();
        for fraction in SYNTHETIC_FRACTIONS {
            let time = fraction * duration;
            if time >= margin && time <= duration - margin {
                boundaries.push(Boundary::new(time, BoundaryKind::Synthetic));
            }
        }
        debug!(
            natural = before,
            injected = boundaries.len() - before,
            "Too few natural boundaries, injected synthetic anchors"
        );
        boundaries.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    debug!(
        count = boundaries.len(),
        duration = format!("{duration:.1}s"),
        "Boundary detection complete"
    );
    boundaries
}

/// Record a boundary at every silent/non-silent flip in the energy
/// sequence. A frame is silent when its energy is strictly below the
/// configured percentile of the whole sequence.
fn transitions(energies: &[f64], silence_percentile: f64) -> Vec<Boundary> {
    if energies.len() < 2 {
        return Vec::new();
    }
    let threshold = percentile(energies, silence_percentile);

    let mut boundaries = Vec::new();
    let mut prev_silent = energies[0] < threshold;
    for (i, &energy) in energies.iter().enumerate().skip(1) {
        let silent = energy < threshold;
        if silent != prev_silent {
            let kind = if silent {
                BoundaryKind::SpeechToSilence
            } else {
                BoundaryKind::SilenceToSpeech
            };
            boundaries.push(Boundary::new(i as f64 * FRAME_HOP_SECS, kind));
            prev_silent = silent;
        }
    }
    boundaries
}

/// Collapse runs of boundaries closer than `min_gap_secs`, keeping the
/// earliest of each cluster. Input must be ascending.
fn merge_close(boundaries: Vec<Boundary>, min_gap_secs: f64) -> Vec<Boundary> {
    let mut merged: Vec<Boundary> = Vec::with_capacity(boundaries.len());
    for boundary in boundaries {
        match merged.last() {
            Some(last) if boundary.time - last.time < min_gap_secs => {}
            _ => merged.push(boundary),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 8000;

    /// Track with speech-like noise everywhere except silent dips at the
    /// given times (seconds), each `dip_secs` long.
    fn track_with_dips(duration_secs: f64, dips: &[f64], dip_secs: f64) -> AudioTrack {
        let n = (duration_secs * SR as f64) as usize;
        let mut samples: Vec<f32> = (0..n)
            .map(|i| {
                // Deterministic pseudo-noise, alternating sign
                let phase = (i as f64 * 0.37).sin() * (i as f64 * 0.011).cos();
                (0.3 * phase) as f32
            })
            .collect();
        for &dip in dips {
            let from = (dip * SR as f64) as usize;
            let to = ((dip + dip_secs) * SR as f64) as usize;
            for s in samples[from..to.min(n)].iter_mut() {
                *s = 0.0;
            }
        }
        AudioTrack::new(samples, SR).unwrap()
    }

    #[test]
    fn test_detects_silence_dips() {
        let track = track_with_dips(60.0, &[20.0, 40.0], 1.5);
        let boundaries = detect_boundaries(&track, &BoundaryConfig::default());

        let natural: Vec<_> = boundaries.iter().filter(|b| !b.is_synthetic()).collect();
        assert!(
            natural.len() >= 4,
            "expected a pair of transitions per dip, got {natural:?}"
        );
        // One transition near each dip edge
        assert!(natural.iter().any(|b| (b.time - 20.0).abs() < 1.0));
        assert!(natural.iter().any(|b| (b.time - 40.0).abs() < 1.0));
    }

    #[test]
    fn test_boundaries_are_ascending_and_gapped() {
        let track = track_with_dips(120.0, &[15.0, 30.0, 50.0, 80.0, 100.0], 1.5);
        let config = BoundaryConfig::default();
        let boundaries = detect_boundaries(&track, &config);
        for pair in boundaries.windows(2) {
            assert!(pair[0].time < pair[1].time);
            assert!(pair[1].time - pair[0].time >= config.min_boundary_gap_secs);
        }
    }

    #[test]
    fn test_all_silence_yields_exactly_three_synthetic() {
        let track = AudioTrack::new(vec![0.0; 60 * SR as usize], SR).unwrap();
        let boundaries = detect_boundaries(&track, &BoundaryConfig::default());
        assert_eq!(boundaries.len(), 3);
        assert!(boundaries.iter().all(|b| b.is_synthetic()));
        assert!((boundaries[0].time - 15.0).abs() < 1e-6);
        assert!((boundaries[1].time - 30.0).abs() < 1e-6);
        assert!((boundaries[2].time - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_margin_discards_near_edge_transitions() {
        // Dips at 2s and 30s; only the 30s one is outside the margin
        let track = track_with_dips(60.0, &[2.0, 30.0], 1.5);
        let config = BoundaryConfig::default();
        let boundaries = detect_boundaries(&track, &config);
        assert!(boundaries
            .iter()
            .all(|b| b.time >= config.edge_margin_secs
                && b.time <= track.duration() - config.edge_margin_secs));
    }

    #[test]
    fn test_short_track_degrades_to_empty() {
        // 8s track: every transition and every synthetic position is
        // inside the 5s edge margin
        let track = track_with_dips(8.0, &[4.0], 0.5);
        let boundaries = detect_boundaries(&track, &BoundaryConfig::default());
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let track = track_with_dips(90.0, &[25.0, 55.0], 1.5);
        let config = BoundaryConfig::default();
        let first = detect_boundaries(&track, &config);
        let second = detect_boundaries(&track, &config);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.time.to_bits(), b.time.to_bits());
            assert_eq!(a.kind, b.kind);
        }
    }
}
