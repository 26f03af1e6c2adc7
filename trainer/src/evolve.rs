//! Minimal generational optimizer over [`PolicyNet`]s

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{evaluate_population, Candidate, EvaluationError, EvaluationSettings, PolicyNet};

#[derive(Debug, Clone)]
pub struct EvolutionSettings {
    pub population: usize,
    pub generations: u32,
    /// Top candidates carried over unchanged each generation
    pub elites: usize,
    pub mutation_rate: f64,
    pub mutation_power: f32,
    pub hidden: Option<usize>,
    /// Stop early once the best fitness reaches this
    pub fitness_threshold: Option<u32>,
    pub evaluation: EvaluationSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("population must hold at least 2 candidates, got {0}")]
    PopulationTooSmall(usize),
    #[error("elite count {elites} must be between 1 and the population size {population}")]
    BadElites { elites: usize, population: usize },
    #[error("mutation rate {rate} and power {power} must be finite")]
    BadMutation { rate: f64, power: f32 },
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Per-generation fitness summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    pub generation: u32,
    pub best_id: usize,
    pub best_fitness: u32,
    pub mean_fitness: f32,
    pub frames: u64,
}

pub struct Population {
    settings: EvolutionSettings,
    candidates: Vec<Candidate<PolicyNet>>,
    rng: StdRng,
    generation: u32,
    next_id: usize,
    champion: Option<Candidate<PolicyNet>>,
}

impl Population {
    pub fn new(settings: EvolutionSettings, seed: u64) -> Result<Self, EvolveError> {
        if settings.population < 2 {
            return Err(EvolveError::PopulationTooSmall(settings.population));
        }
        if settings.elites == 0 || settings.elites > settings.population {
            return Err(EvolveError::BadElites {
                elites: settings.elites,
                population: settings.population,
            });
        }
        if !settings.mutation_rate.is_finite() || !settings.mutation_power.is_finite() {
            return Err(EvolveError::BadMutation {
                rate: settings.mutation_rate,
                power: settings.mutation_power,
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let candidates = (0..settings.population)
            .map(|id| Candidate::new(id, PolicyNet::random(&mut rng, settings.hidden)))
            .collect();
        Ok(Self {
            next_id: settings.population,
            settings,
            candidates,
            rng,
            generation: 0,
            champion: None,
        })
    }

    pub fn candidates(&self) -> &[Candidate<PolicyNet>] {
        &self.candidates
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best candidate seen in any evaluated generation
    pub fn champion(&self) -> Option<&Candidate<PolicyNet>> {
        self.champion.as_ref()
    }

    /// Evaluate the current generation and rank it, best first
    pub fn evaluate(&mut self) -> Result<GenerationReport, EvolveError> {
        let mut settings = self.settings.evaluation.clone();
        settings.seed = settings.seed.wrapping_add(u64::from(self.generation));
        let summary = evaluate_population(&mut self.candidates, &settings)?;

        // Stable sort keeps older ids ahead on ties
        self.candidates.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        let total: u64 = self.candidates.iter().map(|c| u64::from(c.fitness)).sum();
        let best = &self.candidates[0];
        let report = GenerationReport {
            generation: self.generation,
            best_id: best.id,
            best_fitness: best.fitness,
            mean_fitness: total as f32 / self.candidates.len() as f32,
            frames: summary.frames,
        };

        if self
            .champion
            .as_ref()
            .map_or(true, |c| best.fitness > c.fitness)
        {
            self.champion = Some(best.clone());
        }
        info!(
            "Generation {}: best #{} fitness {}, mean {:.2}, {} frames over {} pairings",
            report.generation,
            report.best_id,
            report.best_fitness,
            report.mean_fitness,
            summary.frames,
            summary.pairings
        );
        Ok(report)
    }

    /// Keep the elites and refill with mutated copies of them
    pub fn breed(&mut self) {
        let elites = self.settings.elites.min(self.candidates.len());
        self.candidates.truncate(elites);
        while self.candidates.len() < self.settings.population {
            let parent = self.rng.gen_range(0..elites);
            let mut net = self.candidates[parent].brain.clone();
            net.mutate(
                &mut self.rng,
                self.settings.mutation_rate,
                self.settings.mutation_power,
            );
            debug!("Candidate #{} mutated from #{}", self.next_id, self.candidates[parent].id);
            self.candidates.push(Candidate::new(self.next_id, net));
            self.next_id += 1;
        }
        self.generation += 1;
    }

    /// Run until the generation budget is spent or the threshold is met
    pub fn run(&mut self) -> Result<Candidate<PolicyNet>, EvolveError> {
        for _ in 0..self.settings.generations.max(1) {
            let report = self.evaluate()?;
            if self
                .settings
                .fitness_threshold
                .is_some_and(|threshold| report.best_fitness >= threshold)
            {
                info!(
                    "Fitness threshold reached in generation {}",
                    report.generation
                );
                break;
            }
            self.breed();
        }
        // At least one generation was evaluated, so a champion exists
        Ok(self
            .champion
            .clone()
            .unwrap_or_else(|| self.candidates[0].clone()))
    }
}
