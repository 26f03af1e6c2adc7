//! Observation/action bridge between the simulation and paddle controllers

use log::warn;
use proto::{Action, InvalidAction, Observation};

use crate::{Ball, Config, Paddle};

/// Anything that can steer a paddle from an observation
pub trait DecisionMaker {
    fn decide(&mut self, obs: &Observation) -> Result<Action, InvalidAction>;

    fn name(&self) -> &str;
}

impl<T: DecisionMaker + ?Sized> DecisionMaker for Box<T> {
    fn decide(&mut self, obs: &Observation) -> Result<Action, InvalidAction> {
        (**self).decide(obs)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// What `paddle` sees of `ball` this frame
pub fn observe(paddle: &Paddle, ball: &Ball) -> Observation {
    Observation::new(paddle.y(), ball.pos.y, paddle.x - ball.pos.x)
}

/// Ask `maker` for an action; a bad answer idles the paddle for this frame only
pub fn resolve_decision(maker: &mut dyn DecisionMaker, obs: &Observation) -> Action {
    match maker.decide(obs) {
        Ok(action) => action,
        Err(err) => {
            warn!("{} produced {err}; idling this frame", maker.name());
            Action::Idle
        }
    }
}

/// Scripted opponent: keeps the paddle center level with the ball
#[derive(Debug, Clone, Copy)]
pub struct Tracker {
    half_height: f32,
}

impl Tracker {
    pub fn new(config: &Config) -> Self {
        Self {
            half_height: config.paddle_height / 2.0,
        }
    }
}

impl DecisionMaker for Tracker {
    fn decide(&mut self, obs: &Observation) -> Result<Action, InvalidAction> {
        let center = obs.paddle_y + self.half_height;
        Ok(if center < obs.ball_y {
            Action::Down
        } else if center > obs.ball_y {
            Action::Up
        } else {
            Action::Idle
        })
    }

    fn name(&self) -> &str {
        "tracker"
    }
}

/// Never moves
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl DecisionMaker for Idle {
    fn decide(&mut self, _obs: &Observation) -> Result<Action, InvalidAction> {
        Ok(Action::Idle)
    }

    fn name(&self) -> &str {
        "idle"
    }
}

/// Held-key state fed in by whatever polls the keyboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HumanKeys {
    pub up: bool,
    pub down: bool,
}

impl HumanKeys {
    /// Up wins when both keys are held
    pub fn action(&self) -> Action {
        if self.up {
            Action::Up
        } else if self.down {
            Action::Down
        } else {
            Action::Idle
        }
    }
}

impl DecisionMaker for HumanKeys {
    fn decide(&mut self, _obs: &Observation) -> Result<Action, InvalidAction> {
        Ok(self.action())
    }

    fn name(&self) -> &str {
        "keyboard"
    }
}
