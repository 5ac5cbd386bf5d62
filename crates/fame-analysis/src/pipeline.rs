//! Pipeline orchestration.
//!
//! Runs the stages in dependency order and inspects each stage's result
//! instead of letting failures propagate: a stage error or empty output
//! degrades the run, and the fallback segmenter guarantees that every
//! non-empty, positive-duration track still yields at least one clip.

use tracing::{debug, info, warn};

use fame_models::{AudioTrack, SelectionReport};

use crate::boundary::detect_boundaries;
use crate::config::PipelineConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::fallback::fallback_clips;
use crate::features::{detect_volume_spikes, track_features};
use crate::generate::generate_candidates;
use crate::score::score_candidate;
use crate::select::select_clips;

/// Run the full clip-candidate pipeline over one track.
///
/// Never fails for a non-empty, positive-duration track: every internal
/// failure mode degrades to the fallback segmenter. An empty or
/// zero-duration track yields an empty report.
pub fn run_pipeline(track: &AudioTrack, config: &PipelineConfig) -> SelectionReport {
    let duration = track.duration();

    if let Err(error) = validate_input(track, config) {
        warn!(%error, "Pipeline input rejected, returning empty report");
        return SelectionReport::new(Vec::new(), duration.max(0.0), config.seed);
    }

    info!(
        duration = format!("{duration:.1}s"),
        sample_rate = track.sample_rate(),
        seed = config.seed,
        "Starting clip-candidate pipeline"
    );

    let boundaries = detect_boundaries(track, &config.boundary);
    let boundary_count = boundaries.len();

    let candidates = generate_candidates(&boundaries, duration, &config.generator, config.seed);

    let selected = if candidates.is_empty() {
        debug!("Candidate pool is empty, skipping straight to fallback");
        Vec::new()
    } else {
        let scored: Vec<_> = candidates
            .iter()
            .map(|&candidate| score_candidate(track, candidate, &config.scorer))
            .collect();
        select_clips(&scored, duration, &config.selector)
    };

    let (clips, used_fallback) = if selected.is_empty() {
        warn!("Selection produced no clips, invoking fallback segmenter");
        (fallback_clips(duration, &config.fallback, config.seed), true)
    } else {
        (selected, false)
    };

    let features = track_features(track);
    let spikes = detect_volume_spikes(track, &config.spikes);

    info!(
        clips = clips.len(),
        boundaries = boundary_count,
        used_fallback,
        spikes = spikes.len(),
        "Pipeline complete"
    );

    let mut report = SelectionReport::new(clips, duration, config.seed);
    report.boundary_count = boundary_count;
    report.used_fallback = used_fallback;
    report.track_features = features;
    report.volume_spike_times = spikes;
    report
}

fn validate_input(track: &AudioTrack, config: &PipelineConfig) -> AnalysisResult<()> {
    config.validate()?;
    if track.is_empty() {
        return Err(AnalysisError::EmptyTrack);
    }
    let duration = track.duration();
    if duration <= 0.0 {
        return Err(AnalysisError::NonPositiveDuration(duration));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fame_models::ClipStrategy;

    #[test]
    fn test_empty_track_yields_empty_report() {
        let track = AudioTrack::new(Vec::new(), 22050).unwrap();
        let report = run_pipeline(&track, &PipelineConfig::default());
        assert!(report.is_empty());
        assert!(!report.used_fallback);
    }

    #[test]
    fn test_invalid_config_degrades_to_empty_report() {
        let track = AudioTrack::new(vec![0.1; 22050], 22050).unwrap();
        let mut config = PipelineConfig::default();
        config.generator.max_candidates = 0;
        let report = run_pipeline(&track, &config);
        assert!(report.is_empty());
    }

    #[test]
    fn test_short_silent_track_falls_back_to_single_clip() {
        // 8s of silence: no boundaries survive, no candidate clears the
        // 11s minimum, so the fallback emits one whole-track clip
        let track = AudioTrack::new(vec![0.0; 8 * 8000], 8000).unwrap();
        let report = run_pipeline(&track, &PipelineConfig::default());

        assert!(report.used_fallback);
        assert_eq!(report.clips.len(), 1);
        assert_eq!(report.clips[0].start_time, 0.0);
        assert!((report.clips[0].end_time - 8.0).abs() < 1e-6);
        assert_eq!(report.clips[0].strategy, ClipStrategy::Fallback);
    }
}
