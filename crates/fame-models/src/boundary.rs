//! Speech/silence boundary models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What kind of transition a boundary marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Speech energy dropped below the silence threshold.
    SpeechToSilence,
    /// Energy rose back above the silence threshold.
    SilenceToSpeech,
    /// Injected at a fixed fraction of the track when too few natural
    /// boundaries survived filtering.
    Synthetic,
}

/// A detected or injected transition time, in seconds from track start.
///
/// Boundaries are ephemeral: detection produces a fresh ascending list
/// per run and nothing persists them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Boundary {
    /// Transition time in seconds.
    pub time: f64,
    /// Transition direction, or `Synthetic` for injected boundaries.
    pub kind: BoundaryKind,
}

impl Boundary {
    pub fn new(time: f64, kind: BoundaryKind) -> Self {
        Self { time, kind }
    }

    /// Whether this boundary was injected rather than detected.
    pub fn is_synthetic(&self) -> bool {
        self.kind == BoundaryKind::Synthetic
    }
}
