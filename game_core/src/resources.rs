use proto::Action;
use serde::{Deserialize, Serialize};

use crate::Side;

/// Random number generator
///
/// The only source of randomness in the simulation (serve angles and
/// directions). Seed it to make a match reproducible.
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_entropy())
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Counters derived once per frame and handed to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub frame: u64,
    pub left_hits: u32,
    pub right_hits: u32,
    pub left_points: u32,
    pub right_points: u32,
}

impl MatchSnapshot {
    pub fn hits(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_hits,
            Side::Right => self.right_hits,
        }
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_points,
            Side::Right => self.right_points,
        }
    }
}

/// Running hit and point totals for one match
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    left_hits: u32,
    right_hits: u32,
    left_points: u32,
    right_points: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self, side: Side) {
        match side {
            Side::Left => self.left_hits += 1,
            Side::Right => self.right_hits += 1,
        }
    }

    pub fn record_point(&mut self, side: Side) {
        match side {
            Side::Left => self.left_points += 1,
            Side::Right => self.right_points += 1,
        }
    }

    pub fn snapshot(&self, frame: u64) -> MatchSnapshot {
        MatchSnapshot {
            frame,
            left_hits: self.left_hits,
            right_hits: self.right_hits,
            left_points: self.left_points,
            right_points: self.right_points,
        }
    }
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    pub paddle_hit: Option<Side>,
    pub wall_hit: bool,
    pub scored: Option<Side>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paddle_hit = None;
        self.wall_hit = false;
        self.scored = None;
    }
}

/// Commands consumed by one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: Action,
    pub right: Action,
    /// End the match once this frame has been simulated
    pub quit: bool,
}

impl FrameInput {
    pub fn new(left: Action, right: Action) -> Self {
        Self {
            left,
            right,
            quit: false,
        }
    }

    pub fn action(&self, side: Side) -> Action {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}
