//! Decoded audio track model.

use thiserror::Error;

/// Errors from audio track construction.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Sample rate must be positive")]
    ZeroSampleRate,
}

/// A decoded mono audio track.
///
/// Samples are produced by an external decoder (FFmpeg upstream of this
/// core) and are immutable once constructed. Every analysis stage borrows
/// the track read-only; nothing in this core mutates it.
#[derive(Clone)]
pub struct AudioTrack {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioTrack {
    /// Create a track from decoded mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, TrackError> {
        if sample_rate == 0 {
            return Err(TrackError::ZeroSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The raw amplitude samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Track duration in seconds, derived from sample count.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Whether the track has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the samples between two times, clamped to the track.
    ///
    /// Returns an empty slice when the window collapses after clamping.
    pub fn sample_range(&self, start_secs: f64, end_secs: f64) -> &[f32] {
        let len = self.samples.len();
        let to_index = |t: f64| -> usize {
            if t <= 0.0 {
                0
            } else {
                ((t * self.sample_rate as f64) as usize).min(len)
            }
        };
        let start = to_index(start_secs);
        let end = to_index(end_secs);
        if start >= end {
            &[]
        } else {
            &self.samples[start..end]
        }
    }
}

impl std::fmt::Debug for AudioTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioTrack")
            .field("samples", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .field("duration", &self.duration())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_derived_from_samples() {
        let track = AudioTrack::new(vec![0.0; 44100], 22050).unwrap();
        assert!((track.duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(AudioTrack::new(vec![0.0; 10], 0).is_err());
    }

    #[test]
    fn test_sample_range_clamps() {
        let track = AudioTrack::new(vec![0.5; 1000], 100).unwrap();
        // 10s track; request past the end
        assert_eq!(track.sample_range(5.0, 20.0).len(), 500);
        // negative start clamps to zero
        assert_eq!(track.sample_range(-1.0, 1.0).len(), 100);
        // inverted window collapses
        assert!(track.sample_range(4.0, 2.0).is_empty());
    }
}
