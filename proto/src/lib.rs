//! Decision-maker protocol for the Pong core
//!
//! Defines what a paddle controller sees each frame, what it may answer,
//! and the envelope used to persist a trained controller.
//! Uses postcard for efficient binary serialization

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

// ============================================================================
// Actions
// ============================================================================

/// Discrete paddle command: 0 = idle, 1 = up, 2 = down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Up,
    Down,
}

/// An action index outside `0..Action::COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid action index {index}, expected 0..{}", Action::COUNT)]
pub struct InvalidAction {
    pub index: usize,
}

impl Action {
    /// Number of discrete actions a decision-maker chooses between
    pub const COUNT: usize = 3;

    pub const ALL: [Action; Action::COUNT] = [Action::Idle, Action::Up, Action::Down];

    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Up => 1,
            Action::Down => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, InvalidAction> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidAction { index })
    }

    /// Pick the action with the highest score.
    ///
    /// Ties go to the lowest index. NaN scores never win. An output vector
    /// wider than `COUNT` whose maximum lies past the end is rejected.
    pub fn from_scores(scores: &[f32]) -> Result<Self, InvalidAction> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in scores.iter().enumerate() {
            if s.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((i, s)),
            }
        }
        Self::from_index(best.map(|(i, _)| i).unwrap_or(0))
    }
}

impl TryFrom<usize> for Action {
    type Error = InvalidAction;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

// ============================================================================
// Observations
// ============================================================================

/// What a decision-maker sees about its own paddle and the ball
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    /// Top edge of the observer's paddle
    pub paddle_y: f32,
    pub ball_y: f32,
    /// Horizontal distance between the paddle's x and the ball's x
    pub distance_x: f32,
}

impl Observation {
    pub fn new(paddle_y: f32, ball_y: f32, distance_x: f32) -> Self {
        Self {
            paddle_y,
            ball_y,
            distance_x: distance_x.abs(),
        }
    }

    /// Input vector in the order `(paddle_y, ball_y, distance_x)`
    pub fn as_inputs(&self) -> [f32; 3] {
        [self.paddle_y, self.ball_y, self.distance_x]
    }
}

// ============================================================================
// Persisted artifact
// ============================================================================

/// Leading bytes of every encoded artifact
pub const ARTIFACT_MAGIC: [u8; 4] = *b"PNGA";

/// Current envelope layout
pub const ARTIFACT_VERSION: u16 = 1;

/// Opaque container for a trained decision-maker.
///
/// `kind` names the payload format; the payload bytes are owned by whoever
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub version: u16,
    pub kind: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("not an artifact (bad magic)")]
    BadMagic,
    #[error("artifact encoding failed: {0}")]
    Postcard(#[from] postcard::Error),
}

impl Artifact {
    pub fn new(kind: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            kind: kind.into(),
            payload,
        }
    }

    /// Serialize artifact to bytes, magic first
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let body = to_allocvec(self)?;
        let mut bytes = Vec::with_capacity(ARTIFACT_MAGIC.len() + body.len());
        bytes.extend_from_slice(&ARTIFACT_MAGIC);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Deserialize artifact from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let body = bytes
            .strip_prefix(&ARTIFACT_MAGIC[..])
            .ok_or(CodecError::BadMagic)?;
        Ok(from_bytes(body)?)
    }
}
