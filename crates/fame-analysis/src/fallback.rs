//! Deterministic fallback segmentation.
//!
//! Last resort when the candidate pipeline fails or starves: emit
//! evenly spread fixed-length clips from a seeded schedule of
//! fractional positions, backfilling with sequential windows from time
//! zero when the schedule comes up short. Never returns an empty list
//! for a positive-duration track.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use fame_models::{Candidate, ClipStrategy, ScoreBreakdown, ScoredCandidate, SelectedClip};

use crate::config::FallbackConfig;

/// Fallback clips carry the neutral mid-scale score; no acoustic
/// analysis backs them.
const FALLBACK_SCORE: f64 = 5.0;

/// Produce the fallback clip list for a track of the given duration.
///
/// Deterministic for a given duration, config, and seed.
pub fn fallback_clips(duration: f64, config: &FallbackConfig, seed: u64) -> Vec<SelectedClip> {
    if duration <= 0.0 {
        return Vec::new();
    }

    // Short track: one clip covering everything, even below the
    // per-clip minimum
    if duration <= config.target_clip_secs {
        debug!(duration, "Track fits a single fallback clip");
        return vec![clip(1, 0.0, duration)];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut windows: Vec<(f64, f64)> = Vec::new();

    // One start drawn per scheduled fractional range. Adjacent ranges
    // can draw starts close together, so each kept window must also
    // clear the overlap cap against the windows before it.
    for &(lo, hi) in config.schedule_fractions.iter().take(config.max_clips) {
        let fraction = lo + rng.random::<f64>() * (hi - lo);
        let start = fraction * duration;
        let end = (start + config.target_clip_secs).min(duration);
        if end - start >= config.min_clip_secs
            && !overlaps_beyond_cap(&windows, start, end, config.max_overlap_secs)
        {
            windows.push((start, end));
        }
    }

    // Starved schedule: backfill with sequential 15s windows from zero,
    // still skipping anything that collides with a kept window
    if windows.len() < config.min_clips {
        let mut start = 0.0;
        loop {
            if windows.len() >= config.min_clips || windows.len() >= config.max_clips {
                break;
            }
            let end = (start + config.target_clip_secs).min(duration);
            if end - start < config.min_clip_secs {
                break;
            }
            if !overlaps_beyond_cap(&windows, start, end, config.max_overlap_secs) {
                windows.push((start, end));
            }
            start = end;
        }
        windows.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    debug!(clips = windows.len(), duration, "Fallback segmentation complete");

    windows
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| clip(i as u32 + 1, start, end))
        .collect()
}

fn overlaps_beyond_cap(windows: &[(f64, f64)], start: f64, end: f64, cap: f64) -> bool {
    windows.iter().any(|&(s, e)| end.min(e) - start.max(s) > cap)
}

fn clip(sequence: u32, start: f64, end: f64) -> SelectedClip {
    let scored = ScoredCandidate::new(
        Candidate::new(start, end, ClipStrategy::Fallback),
        FALLBACK_SCORE,
        ScoreBreakdown::default(),
    );
    SelectedClip::from_scored(sequence, &scored)
}
