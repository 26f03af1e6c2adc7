use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_core::{
    Config, DecisionMaker, GameRng, Idle, MatchLoop, MatchOptions, MatchOutcome, Params, Side,
    Tracker,
};
use log::info;
use trainer::{load_best, save_best, EvaluationSettings, EvolutionSettings, Population};

#[derive(Parser, Debug)]
#[command(name = "pong-trainer")]
#[command(about = "Train, replay and watch Pong decision-makers")]
struct Cli {
    /// JSON file overriding the default game configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a policy network and save the best one
    Train {
        #[arg(long, default_value_t = 50)]
        generations: u32,
        #[arg(long, default_value_t = 20)]
        population: usize,
        /// Hidden layer width; omit for a direct 3-to-3 network
        #[arg(long)]
        hidden: Option<usize>,
        /// Right-side hits that end a training episode (default from config)
        #[arg(long)]
        hit_cap: Option<u32>,
        #[arg(long, default_value_t = 4)]
        elites: usize,
        #[arg(long, default_value_t = 0.2)]
        mutation_rate: f64,
        #[arg(long, default_value_t = 0.5)]
        mutation_power: f32,
        /// Stop once the best fitness reaches this
        #[arg(long)]
        fitness_threshold: Option<u32>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "best.pong")]
        artifact: PathBuf,
    },
    /// Trained policy (left) against the scripted tracker (right)
    Demo {
        #[arg(long, default_value = "best.pong")]
        artifact: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_frames: Option<u64>,
        /// Pace frames at the display rate
        #[arg(long)]
        realtime: bool,
    },
    /// Scripted tracker against scripted tracker, first to the score limit
    Watch {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_frames: Option<u64>,
        #[arg(long)]
        realtime: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn rng(seed: Option<u64>) -> GameRng {
    seed.map_or_else(GameRng::from_entropy, GameRng::new)
}

/// Play one match, delivering the frame budget as the quit signal
fn play(
    game: &mut MatchLoop,
    left: &mut dyn DecisionMaker,
    right: &mut dyn DecisionMaker,
    max_frames: Option<u64>,
    realtime: bool,
) -> Result<MatchOutcome> {
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(Params::FRAME_RATE));
    let mut frames = 0u64;
    let mut next_frame = Instant::now();
    let mut stop = || {
        if realtime {
            next_frame += frame_time;
            if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
        frames += 1;
        max_frames.is_some_and(|max| frames >= max)
    };
    let outcome = game
        .run_until_end(left, right, &mut stop)
        .context("match failed")?;
    Ok(outcome)
}

fn report(outcome: &MatchOutcome) {
    info!(
        "{} after {} frames: {}-{} (hits {}/{})",
        outcome.reason,
        outcome.snapshot.frame,
        outcome.scores.left,
        outcome.scores.right,
        outcome.snapshot.left_hits,
        outcome.snapshot.right_hits
    );
    println!(
        "{}",
        serde_json::json!({
            "reason": outcome.reason,
            "left_score": outcome.scores.left,
            "right_score": outcome.scores.right,
            "snapshot": outcome.snapshot,
        })
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Train {
            generations,
            population,
            hidden,
            hit_cap,
            elites,
            mutation_rate,
            mutation_power,
            fitness_threshold,
            seed,
            artifact,
        } => {
            let mut evaluation = EvaluationSettings::new(config, seed);
            if let Some(cap) = hit_cap {
                evaluation.hit_cap = cap;
            }
            let settings = EvolutionSettings {
                population,
                generations,
                elites,
                mutation_rate,
                mutation_power,
                hidden,
                fitness_threshold,
                evaluation,
            };
            info!(
                "Training {} candidates for up to {} generations",
                population, generations
            );
            let mut pool = Population::new(settings, seed).context("invalid training settings")?;
            let best = pool.run().context("training failed")?;
            info!("Best candidate #{} with fitness {}", best.id, best.fitness);
            save_best(&artifact, &best.brain)
                .with_context(|| format!("failed to save {}", artifact.display()))?;
        }
        Commands::Demo {
            artifact,
            seed,
            max_frames,
            realtime,
        } => {
            let mut policy = load_best(&artifact)?;
            let mut tracker = Tracker::new(&config);
            let options = MatchOptions::match_play(&config);
            let mut game = MatchLoop::new(config, rng(seed), options)?;
            let outcome = play(&mut game, &mut policy, &mut tracker, max_frames, realtime)?;
            report(&outcome);
        }
        Commands::Watch {
            seed,
            max_frames,
            realtime,
        } => {
            let mut right = Tracker::new(&config);
            let options = MatchOptions::match_play(&config).with_tracking(Side::Left);
            let mut game = MatchLoop::new(config, rng(seed), options)?;
            let outcome = play(&mut game, &mut Idle, &mut right, max_frames, realtime)?;
            report(&outcome);
        }
    }
    Ok(())
}
