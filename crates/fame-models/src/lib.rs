//! Shared data models for the fame clip-candidate core.
//!
//! This crate provides Serde-serializable types for:
//! - Decoded audio tracks and their derived feature summaries
//! - Speech/silence boundaries
//! - Clip candidates, scored candidates, and selected clips
//! - The selection report returned by the analysis pipeline

pub mod boundary;
pub mod candidate;
pub mod report;
pub mod track;

// Re-export common types
pub use boundary::{Boundary, BoundaryKind};
pub use candidate::{Candidate, ClipStrategy, ScoreBreakdown, ScoredCandidate, SelectedClip};
pub use report::{SelectionReport, TrackFeatures};
pub use track::{AudioTrack, TrackError};
