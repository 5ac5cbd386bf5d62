//! Pure signal statistics shared by the analysis stages.
//!
//! Every function here is deterministic and total: degenerate input
//! (empty slices, zero energy, non-finite math) yields a neutral value
//! instead of an error, so callers never have to branch on failure.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use fame_models::{AudioTrack, TrackFeatures};

use crate::config::{SpikeConfig, FRAME_HOP_SECS, FRAME_WINDOW_SECS};

/// Per-frame energy (sum of squared amplitudes) over a sliding window.
///
/// Frames shorter than the window at the tail are dropped.
pub fn frame_energies(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let window = (FRAME_WINDOW_SECS * sample_rate as f64) as usize;
    let hop = (FRAME_HOP_SECS * sample_rate as f64) as usize;
    if window == 0 || hop == 0 || samples.len() < window {
        return Vec::new();
    }

    let mut energies = Vec::with_capacity((samples.len() - window) / hop + 1);
    let mut start = 0;
    while start + window <= samples.len() {
        let energy: f64 = samples[start..start + window]
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        energies.push(energy);
        start += hop;
    }
    energies
}

/// Value at the given percentile of `values` (nearest-rank on the
/// sorted sequence). Returns 0.0 for an empty input.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    sorted[rank.round() as usize]
}

/// Root-mean-square amplitude. 0.0 for an empty slice.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Mean of a sequence. 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance of a sequence. 0.0 for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Fraction of adjacent sample pairs with opposite sign.
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / (samples.len() - 1) as f64
}

/// Magnitude-weighted mean frequency of the slice, in Hz.
///
/// Computes a forward DFT of the whole slice and averages bin
/// frequencies up to Nyquist, weighted by magnitude. Returns 0.0 when
/// the slice is empty or carries no spectral energy.
pub fn spectral_centroid(samples: &[f32], sample_rate: u32) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let n = samples.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    fft.process(&mut buffer);

    let bin_hz = sample_rate as f64 / n as f64;
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (k, value) in buffer.iter().take(n / 2 + 1).enumerate() {
        let magnitude = value.norm();
        weighted += magnitude * (k as f64 * bin_hz);
        total += magnitude;
    }

    if total <= f64::EPSILON {
        return 0.0;
    }
    let centroid = weighted / total;
    if centroid.is_finite() {
        centroid
    } else {
        0.0
    }
}

/// Whole-track acoustic summary for the selection report.
pub fn track_features(track: &AudioTrack) -> Option<TrackFeatures> {
    if track.is_empty() {
        return None;
    }
    let samples = track.samples();
    let energies = frame_energies(samples, track.sample_rate());
    let peak = samples
        .iter()
        .map(|s| s.abs() as f64)
        .fold(0.0_f64, f64::max);

    Some(TrackFeatures {
        duration: track.duration(),
        rms: rms(samples),
        mean_energy: mean(&energies),
        peak_amplitude: peak,
        zero_crossing_rate: zero_crossing_rate(samples),
        spectral_centroid_hz: spectral_centroid(samples, track.sample_rate()),
    })
}

/// Times of frame-energy peaks above the spike percentile, spaced at
/// least `min_spacing_secs` apart. Diagnostic only.
pub fn detect_volume_spikes(track: &AudioTrack, config: &SpikeConfig) -> Vec<f64> {
    let energies = frame_energies(track.samples(), track.sample_rate());
    if energies.len() < 3 {
        return Vec::new();
    }
    let threshold = percentile(&energies, config.spike_percentile);
    if threshold <= 0.0 {
        // Flat or silent track: every frame ties the threshold.
        return Vec::new();
    }

    let mut spikes = Vec::new();
    let mut last_spike = f64::NEG_INFINITY;
    for i in 1..energies.len() - 1 {
        let is_peak = energies[i] > energies[i - 1] && energies[i] >= energies[i + 1];
        if !is_peak || energies[i] < threshold {
            continue;
        }
        let time = i as f64 * FRAME_HOP_SECS;
        if time - last_spike >= config.min_spacing_secs {
            spikes.push(time);
            last_spike = time;
        }
    }
    spikes
}
