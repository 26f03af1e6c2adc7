//! Round-robin fitness evaluation
//!
//! Every unordered pair of candidates plays one training episode. The first
//! candidate of the pair drives the right paddle and earns its right-side
//! hits; the second drives the left paddle and earns its left-side hits.

use game_core::{
    Config, ConfigError, DecisionMaker, GameRng, MatchError, MatchLoop, MatchOptions,
    TerminationPolicy,
};
use log::debug;

/// A decision-maker under evaluation and its accumulated fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<D> {
    pub id: usize,
    pub brain: D,
    pub fitness: u32,
}

impl<D> Candidate<D> {
    pub fn new(id: usize, brain: D) -> Self {
        Self {
            id,
            brain,
            fitness: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    pub config: Config,
    /// Episode ends once right-side hits exceed this
    pub hit_cap: u32,
    /// Pairing seeds are derived from this, so a pass is reproducible
    pub seed: u64,
    /// Frame budget per episode; `None` plays until the episode ends
    pub max_frames: Option<u64>,
}

impl EvaluationSettings {
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            hit_cap: config.episode_hit_cap,
            config,
            seed,
            max_frames: None,
        }
    }

    /// Seed for the `index`-th pairing of a pass
    pub fn pairing_seed(&self, index: u64) -> u64 {
        self.seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub pairings: usize,
    pub frames: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("episode failed: {0}")]
    Match(#[from] MatchError),
}

/// Reset every fitness to zero, then play each pairing once in order
pub fn evaluate_population<D: DecisionMaker>(
    candidates: &mut [Candidate<D>],
    settings: &EvaluationSettings,
) -> Result<EvaluationSummary, EvaluationError> {
    settings.config.validate()?;
    for candidate in candidates.iter_mut() {
        candidate.fitness = 0;
    }

    let mut summary = EvaluationSummary::default();
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (head, tail) = candidates.split_at_mut(j);
            let right = &mut head[i];
            let left = &mut tail[0];

            let options = MatchOptions {
                termination: TerminationPolicy::Episode {
                    hit_cap: settings.hit_cap,
                },
                tracking: None,
            };
            let rng = GameRng::new(settings.pairing_seed(summary.pairings as u64));
            let mut episode = MatchLoop::new(settings.config.clone(), rng, options)?;

            let mut frames = 0u64;
            let mut stop = || {
                frames += 1;
                settings.max_frames.is_some_and(|max| frames >= max)
            };
            let outcome = episode.run_until_end(&mut left.brain, &mut right.brain, &mut stop)?;

            right.fitness += outcome.snapshot.right_hits;
            left.fitness += outcome.snapshot.left_hits;
            summary.pairings += 1;
            summary.frames += outcome.snapshot.frame;
            debug!(
                "Pairing {} vs {}: {} after {} frames, hits {}/{}",
                right.id,
                left.id,
                outcome.reason,
                outcome.snapshot.frame,
                outcome.snapshot.right_hits,
                outcome.snapshot.left_hits
            );
        }
    }
    Ok(summary)
}
