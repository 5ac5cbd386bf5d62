//! Multi-strategy candidate generation.
//!
//! Three independent strategies propose clip windows:
//! - boundary-anchored: offsets and target lengths around each detected
//!   boundary plus the virtual anchors at track start and end
//! - zone-stratified: a fixed schedule of coverage windows, independent
//!   of signal content, so candidates exist even when boundaries cluster
//! - seeded-random: draws from a banded start distribution with an
//!   explicitly passed seed
//!
//! The union is deduplicated on exact `(start, end)` pairs and reduced
//! to the pool cap by uniform-stride subsampling, topped up from the
//! seeded RNG rather than silently truncated.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use fame_models::{Boundary, Candidate, ClipStrategy};

use crate::config::GeneratorConfig;

/// Generate the deduplicated, size-capped candidate pool, sorted by
/// start time. Deterministic for a given boundary list, duration, and
/// seed.
pub fn generate_candidates(
    boundaries: &[Boundary],
    duration: f64,
    config: &GeneratorConfig,
    seed: u64,
) -> Vec<Candidate> {
    if duration <= config.min_candidate_secs {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let mut pool: Vec<Candidate> = Vec::new();
    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut push_unique = |pool: &mut Vec<Candidate>, candidate: Candidate| {
        if seen.insert(candidate.time_key()) {
            pool.push(candidate);
        }
    };

    let anchored = boundary_anchored(boundaries, duration, config);
    let stratified = zone_stratified(duration, config);
    let random = seeded_random(duration, config, &mut rng);

    debug!(
        anchored = anchored.len(),
        stratified = stratified.len(),
        random = random.len(),
        "Candidate strategies complete"
    );

    for candidate in anchored.into_iter().chain(stratified).chain(random) {
        push_unique(&mut pool, candidate);
    }

    pool.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then(a.end_time.total_cmp(&b.end_time))
    });

    if pool.len() > config.max_candidates {
        pool = reduce_to_cap(pool, config.max_candidates, &mut rng);
    }

    debug!(pool = pool.len(), "Candidate pool ready");
    pool
}

/// Windows anchored at each boundary (plus the virtual anchors at 0 and
/// `duration`) across the configured offset and target-length sets.
fn boundary_anchored(
    boundaries: &[Boundary],
    duration: f64,
    config: &GeneratorConfig,
) -> Vec<Candidate> {
    let mut anchors: Vec<f64> = vec![0.0, duration];
    anchors.extend(boundaries.iter().map(|b| b.time));

    let mut candidates = Vec::new();
    for &anchor in &anchors {
        for &offset in &config.anchor_offsets_secs {
            let start = (anchor + offset).clamp(0.0, duration);
            for &target in &config.target_durations_secs {
                let end = (start + target).min(duration);
                if end - start >= config.min_candidate_secs {
                    candidates.push(Candidate::new(start, end, ClipStrategy::BoundaryAnchored));
                }
            }
        }
    }
    candidates
}

/// The fixed coverage schedule: one window per configured start
/// fraction, regardless of where boundaries landed.
fn zone_stratified(duration: f64, config: &GeneratorConfig) -> Vec<Candidate> {
    config
        .zone_start_fractions
        .iter()
        .filter_map(|&fraction| {
            let start = fraction * duration;
            let end = (start + config.zone_window_secs).min(duration);
            if end - start >= config.min_candidate_secs {
                Some(Candidate::new(start, end, ClipStrategy::ZoneStratified))
            } else {
                None
            }
        })
        .collect()
}

/// Seeded draws with a banded start distribution: 30% early third, 50%
/// middle third, 20% late third. Draws that would run past the end
/// margin are rejected, not retried.
fn seeded_random(duration: f64, config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Candidate> {
    let third = duration / 3.0;
    let (dur_lo, dur_hi) = config.random_duration_secs;

    let mut candidates = Vec::new();
    for _ in 0..config.random_draws {
        let band = rng.random::<f64>();
        let band_start = if band < 0.3 {
            0.0
        } else if band < 0.8 {
            third
        } else {
            2.0 * third
        };
        let start = band_start + rng.random::<f64>() * third;
        let clip_secs = rng.random_range(dur_lo..=dur_hi);

        if clip_secs < config.min_candidate_secs {
            continue;
        }
        if start + clip_secs > duration - config.random_end_margin_secs {
            continue;
        }
        candidates.push(Candidate::new(
            start,
            start + clip_secs,
            ClipStrategy::SeededRandom,
        ));
    }
    candidates
}

/// Reduce an oversized start-sorted pool to the cap: uniform-stride
/// subsample, then top up any shortfall with seeded draws over the
/// remaining indices.
fn reduce_to_cap(pool: Vec<Candidate>, cap: usize, rng: &mut StdRng) -> Vec<Candidate> {
    let stride = pool.len().div_ceil(cap);
    let mut picked: Vec<bool> = vec![false; pool.len()];
    for index in (0..pool.len()).step_by(stride) {
        picked[index] = true;
    }
    let mut count = picked.iter().filter(|&&p| p).count();

    // Stride rounding can leave the subsample short of the cap
    while count < cap {
        let index = rng.random_range(0..pool.len());
        if !picked[index] {
            picked[index] = true;
            count += 1;
        }
    }

    pool.into_iter()
        .zip(picked)
        .filter_map(|(candidate, keep)| keep.then_some(candidate))
        .collect()
}
