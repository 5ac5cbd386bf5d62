//! Diversity-constrained clip selection.
//!
//! The timeline is split into 5 equal zones. A first pass walks the
//! zones in ascending order and greedily accepts the best-scoring
//! candidates per zone, bounded by the per-zone cap and the overlap
//! limit. If that pass comes up short of the minimum clip count, a
//! second pass scans the globally score-sorted list, skipping
//! near-duplicates and overlap violators, until the hard cap or the
//! pool is exhausted. Ties break by earlier start time.

use tracing::debug;

use fame_models::{ScoredCandidate, SelectedClip};

use crate::config::SelectorConfig;

/// Number of equal-width timeline zones.
const ZONE_COUNT: usize = 5;

/// Select the final ordered clip list from the scored pool.
///
/// Output order is selection order; sequence ids are 1-based.
pub fn select_clips(
    scored: &[ScoredCandidate],
    duration: f64,
    config: &SelectorConfig,
) -> Vec<SelectedClip> {
    if scored.is_empty() || duration <= 0.0 {
        return Vec::new();
    }

    let mut accepted: Vec<ScoredCandidate> = Vec::new();

    // Zone pass: per-zone greedy accept, best score first
    for zone in 0..ZONE_COUNT {
        let mut zone_candidates: Vec<&ScoredCandidate> = scored
            .iter()
            .filter(|s| zone_of(s.candidate.midpoint(), duration) == zone)
            .collect();
        zone_candidates.sort_by(|a, b| score_then_start(a, b));

        let mut taken = 0;
        for candidate in zone_candidates {
            if accepted.len() >= config.max_total_clips || taken >= config.per_zone_cap {
                break;
            }
            if violates_overlap(candidate, &accepted, config.max_overlap_secs) {
                continue;
            }
            accepted.push(*candidate);
            taken += 1;
        }
    }

    let zone_pass_count = accepted.len();

    // Fill pass: only when the zone pass starved
    if accepted.len() < config.min_total_clips {
        let mut global: Vec<&ScoredCandidate> = scored.iter().collect();
        global.sort_by(|a, b| score_then_start(a, b));

        for candidate in global {
            if accepted.len() >= config.max_total_clips {
                break;
            }
            if is_near_duplicate(candidate, &accepted, config.duplicate_margin_secs) {
                continue;
            }
            if violates_overlap(candidate, &accepted, config.max_overlap_secs) {
                continue;
            }
            accepted.push(*candidate);
        }
    }

    debug!(
        zone_pass = zone_pass_count,
        total = accepted.len(),
        pool = scored.len(),
        "Diversity selection complete"
    );

    accepted
        .iter()
        .enumerate()
        .map(|(i, s)| SelectedClip::from_scored(i as u32 + 1, s))
        .collect()
}

/// Zone index of a time, clamped into the last zone at the track end.
fn zone_of(time: f64, duration: f64) -> usize {
    let zone = (time / duration * ZONE_COUNT as f64) as usize;
    zone.min(ZONE_COUNT - 1)
}

/// Score descending, then earlier start.
fn score_then_start(a: &ScoredCandidate, b: &ScoredCandidate) -> std::cmp::Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.candidate.start_time.total_cmp(&b.candidate.start_time))
}

fn violates_overlap(
    candidate: &ScoredCandidate,
    accepted: &[ScoredCandidate],
    max_overlap_secs: f64,
) -> bool {
    accepted
        .iter()
        .any(|a| candidate.candidate.overlap_secs(&a.candidate) > max_overlap_secs)
}

/// A candidate whose start or end lands within the margin of an
/// accepted clip's start or end repeats that clip in all but name.
fn is_near_duplicate(
    candidate: &ScoredCandidate,
    accepted: &[ScoredCandidate],
    margin_secs: f64,
) -> bool {
    accepted.iter().any(|a| {
        (candidate.candidate.start_time - a.candidate.start_time).abs() < margin_secs
            || (candidate.candidate.end_time - a.candidate.end_time).abs() < margin_secs
    })
}
