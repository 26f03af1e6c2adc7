use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MatchSnapshot, Side};

/// Raw paddle scores at the end of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left: u32,
    pub right: u32,
}

impl Scoreboard {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Why a match stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Reached the score limit
    Winner(Side),
    /// Any point ends a training episode
    PointScored(Side),
    /// This side's hit counter tripped the cap
    HitCap(Side),
    /// Caller asked to stop
    Quit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Winner(side) => write!(f, "{side:?} won"),
            EndReason::PointScored(side) => write!(f, "{side:?} scored"),
            EndReason::HitCap(side) => write!(f, "{side:?} reached the hit cap"),
            EndReason::Quit => write!(f, "quit"),
        }
    }
}

/// When a match ends, checked once after every frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationPolicy {
    Never,
    /// Either raw score reaches `n`
    ScoreLimit(u32),
    FirstPoint,
    /// Either hit counter reaches `n`
    HitCap(u32),
    /// Training episode: any point, or right-side hits strictly above the cap
    Episode { hit_cap: u32 },
    /// First member that fires wins
    Any(Vec<TerminationPolicy>),
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        TerminationPolicy::ScoreLimit(crate::Params::WIN_SCORE)
    }
}

impl TerminationPolicy {
    pub fn check(&self, scores: &Scoreboard, snapshot: &MatchSnapshot) -> Option<EndReason> {
        // Right is checked first throughout
        const ORDER: [Side; 2] = [Side::Right, Side::Left];
        match self {
            TerminationPolicy::Never => None,
            TerminationPolicy::ScoreLimit(n) => ORDER
                .into_iter()
                .find(|&side| scores.get(side) >= *n)
                .map(EndReason::Winner),
            TerminationPolicy::FirstPoint => first_point(snapshot, ORDER),
            TerminationPolicy::HitCap(n) => ORDER
                .into_iter()
                .find(|&side| snapshot.hits(side) >= *n)
                .map(EndReason::HitCap),
            TerminationPolicy::Episode { hit_cap } => first_point(snapshot, ORDER).or_else(|| {
                (snapshot.right_hits > *hit_cap).then_some(EndReason::HitCap(Side::Right))
            }),
            TerminationPolicy::Any(policies) => {
                policies.iter().find_map(|p| p.check(scores, snapshot))
            }
        }
    }
}

fn first_point(snapshot: &MatchSnapshot, order: [Side; 2]) -> Option<EndReason> {
    order
        .into_iter()
        .find(|&side| snapshot.points(side) >= 1)
        .map(EndReason::PointScored)
}
