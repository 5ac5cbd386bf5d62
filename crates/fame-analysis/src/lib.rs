#![deny(unreachable_patterns)]
//! Audio-driven clip candidate generation and diversity selection.
//!
//! This crate turns a decoded audio track into a small set of short,
//! non-overlapping, time-diverse clip windows ranked by acoustic
//! appeal:
//! - Boundary detection over sliding-frame energy
//! - Three-strategy candidate generation (boundary-anchored,
//!   zone-stratified, seeded-random)
//! - Deterministic acoustic scoring on the [1, 10] scale
//! - Diversity-constrained selection across 5 timeline zones
//! - A deterministic fallback segmenter that guarantees output
//!
//! The whole pipeline is single-threaded, performs no I/O, and is
//! bit-reproducible for a given track and seed. Decoding, export,
//! transcription, and persistence live outside this crate.

pub mod boundary;
pub mod config;
pub mod error;
pub mod fallback;
pub mod features;
pub mod generate;
pub mod pipeline;
pub mod score;
pub mod select;

pub use boundary::detect_boundaries;
pub use config::{
    BoundaryConfig, FallbackConfig, GeneratorConfig, PipelineConfig, ScorerConfig, SelectorConfig,
    SpikeConfig,
};
pub use error::{AnalysisError, AnalysisResult};
pub use fallback::fallback_clips;
pub use generate::generate_candidates;
pub use pipeline::run_pipeline;
pub use score::score_candidate;
pub use select::select_clips;
