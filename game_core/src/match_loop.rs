//! Frame-stepped match state machine
//!
//! A [`MatchLoop`] owns the field, the hecs world (two paddles and one ball)
//! and the only RNG. Each [`MatchLoop::step`] simulates exactly one frame,
//! derives hit and point counters from what changed, and consults the
//! termination policy.

use glam::Vec2;
use hecs::{Entity, World};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    create_ball, create_paddle, observe, resolve_decision, Ball, Config, ConfigError,
    DecisionMaker, EndReason, Events, Field, FrameInput, GameRng, MatchSnapshot, Observation,
    Paddle, Scoreboard, Side, Tally, TerminationPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Idle,
    Running,
    Ended(EndReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("match already initialized")]
    AlreadyInitialized,
    #[error("match has not been initialized")]
    NotInitialized,
    #[error("match is not running")]
    NotRunning,
}

/// How a match ends and whether a paddle plays itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub termination: TerminationPolicy,
    /// This paddle follows the ball every frame on top of its action
    pub tracking: Option<Side>,
}

impl MatchOptions {
    /// First to `win_score`
    pub fn match_play(config: &Config) -> Self {
        Self {
            termination: TerminationPolicy::ScoreLimit(config.win_score),
            tracking: None,
        }
    }

    /// One training episode
    pub fn episode(config: &Config) -> Self {
        Self {
            termination: TerminationPolicy::Episode {
                hit_cap: config.episode_hit_cap,
            },
            tracking: None,
        }
    }

    pub fn with_tracking(mut self, side: Side) -> Self {
        self.tracking = Some(side);
        self
    }
}

/// Everything a presentation layer draws for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub left_y: f32,
    pub right_y: f32,
    pub ball_pos: Vec2,
    pub left_score: u32,
    pub right_score: u32,
    pub snapshot: MatchSnapshot,
}

/// Final state of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub reason: EndReason,
    pub scores: Scoreboard,
    pub snapshot: MatchSnapshot,
}

#[derive(Debug, Clone, Copy)]
struct Handles {
    left: Entity,
    right: Entity,
    ball: Entity,
}

impl Handles {
    fn paddle(&self, side: Side) -> Entity {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

pub struct MatchLoop {
    config: Config,
    field: Field,
    world: World,
    handles: Option<Handles>,
    rng: GameRng,
    tally: Tally,
    events: Events,
    options: MatchOptions,
    phase: MatchPhase,
    frame: u64,
}

impl MatchLoop {
    pub fn new(config: Config, rng: GameRng, options: MatchOptions) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            field: Field::new(&config),
            config,
            world: World::new(),
            handles: None,
            rng,
            tally: Tally::new(),
            events: Events::new(),
            options,
            phase: MatchPhase::Idle,
            frame: 0,
        })
    }

    /// Spawn paddles and the served ball, then start running
    pub fn initialize(&mut self) -> Result<(), MatchError> {
        if self.phase != MatchPhase::Idle {
            return Err(MatchError::AlreadyInitialized);
        }
        let left = create_paddle(&mut self.world, Side::Left, &self.config);
        let right = create_paddle(&mut self.world, Side::Right, &self.config);
        let ball = Ball::new(&self.config, &mut self.rng.0);
        debug!("Serving at {:?} with velocity {:?}", ball.pos, ball.vel);
        let ball = create_ball(&mut self.world, ball);
        self.handles = Some(Handles { left, right, ball });
        self.phase = MatchPhase::Running;
        Ok(())
    }

    /// Simulate one frame
    pub fn step(&mut self, input: &FrameInput) -> Result<MatchSnapshot, MatchError> {
        if self.phase != MatchPhase::Running {
            return Err(MatchError::NotRunning);
        }
        let vx_before = self.ball().map_or(0.0, |b| b.vel.x);
        let scores_before = self.scores();

        crate::step(
            &mut self.world,
            &self.field,
            input,
            self.options.tracking,
            &mut self.events,
            &mut self.rng,
        );
        self.frame += 1;

        // A respawn draws a fresh serve, so a scoring frame is never a hit
        if self.events.scored.is_none() {
            let vx_after = self.ball().map_or(0.0, |b| b.vel.x);
            if vx_before > 0.0 && vx_after < 0.0 {
                self.tally.record_hit(Side::Right);
            } else if vx_before < 0.0 && vx_after > 0.0 {
                self.tally.record_hit(Side::Left);
            }
        }

        let scores = self.scores();
        if scores.left > scores_before.left {
            self.tally.record_point(Side::Left);
        } else if scores.right > scores_before.right {
            self.tally.record_point(Side::Right);
        }

        let snapshot = self.tally.snapshot(self.frame);
        let reason = self
            .options
            .termination
            .check(&scores, &snapshot)
            .or(input.quit.then_some(EndReason::Quit));
        if let Some(reason) = reason {
            info!(
                "Match ended after {} frames: {reason} ({}-{}, hits {}/{})",
                self.frame, scores.left, scores.right, snapshot.left_hits, snapshot.right_hits
            );
            self.phase = MatchPhase::Ended(reason);
        }
        Ok(snapshot)
    }

    /// Ask both decision-makers for an action and simulate one frame
    pub fn play_frame(
        &mut self,
        left: &mut dyn DecisionMaker,
        right: &mut dyn DecisionMaker,
        quit: bool,
    ) -> Result<MatchSnapshot, MatchError> {
        let left_obs = self.observe(Side::Left).ok_or(MatchError::NotInitialized)?;
        let right_obs = self.observe(Side::Right).ok_or(MatchError::NotInitialized)?;
        let input = FrameInput {
            left: resolve_decision(left, &left_obs),
            right: resolve_decision(right, &right_obs),
            quit,
        };
        self.step(&input)
    }

    /// Play until the termination policy fires or `stop` returns true.
    ///
    /// An idle match is initialized first. `stop` is polled once per frame
    /// and delivered as that frame's quit signal.
    pub fn run_until_end(
        &mut self,
        left: &mut dyn DecisionMaker,
        right: &mut dyn DecisionMaker,
        stop: &mut dyn FnMut() -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        if self.phase == MatchPhase::Idle {
            self.initialize()?;
        }
        loop {
            if let MatchPhase::Ended(reason) = self.phase {
                return Ok(MatchOutcome {
                    reason,
                    scores: self.scores(),
                    snapshot: self.snapshot(),
                });
            }
            let quit = stop();
            self.play_frame(left, right, quit)?;
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Events raised by the most recent frame
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.tally.snapshot(self.frame)
    }

    pub fn paddle(&self, side: Side) -> Option<Paddle> {
        let entity = self.handles?.paddle(side);
        self.world.get::<&Paddle>(entity).ok().map(|p| *p)
    }

    pub fn ball(&self) -> Option<Ball> {
        let entity = self.handles?.ball;
        self.world.get::<&Ball>(entity).ok().map(|b| *b)
    }

    pub fn scores(&self) -> Scoreboard {
        Scoreboard {
            left: self.paddle(Side::Left).map_or(0, |p| p.score()),
            right: self.paddle(Side::Right).map_or(0, |p| p.score()),
        }
    }

    pub fn observe(&self, side: Side) -> Option<Observation> {
        Some(observe(&self.paddle(side)?, &self.ball()?))
    }

    pub fn view(&self) -> Option<FrameView> {
        let left = self.paddle(Side::Left)?;
        let right = self.paddle(Side::Right)?;
        let ball = self.ball()?;
        Some(FrameView {
            left_y: left.y(),
            right_y: right.y(),
            ball_pos: ball.pos,
            left_score: left.score(),
            right_score: right.score(),
            snapshot: self.snapshot(),
        })
    }

    /// Override the ball's position and velocity (scripted serves)
    pub fn set_ball(&mut self, pos: Vec2, vel: Vec2) -> Result<(), MatchError> {
        let entity = self.handles.ok_or(MatchError::NotInitialized)?.ball;
        let mut ball = self
            .world
            .get::<&mut Ball>(entity)
            .map_err(|_| MatchError::NotInitialized)?;
        ball.pos = pos;
        ball.vel = vel;
        Ok(())
    }

    /// Move a paddle's top edge to `y`, clamped into the field
    pub fn place_paddle(&mut self, side: Side, y: f32) -> Result<(), MatchError> {
        let entity = self.handles.ok_or(MatchError::NotInitialized)?.paddle(side);
        let mut paddle = self
            .world
            .get::<&mut Paddle>(entity)
            .map_err(|_| MatchError::NotInitialized)?;
        paddle.place(y);
        Ok(())
    }
}
