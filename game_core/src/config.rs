use crate::{Params, Side};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration
///
/// Immutable for the lifetime of a match; handed to the field, paddle and
/// ball constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field_width: f32,
    pub field_height: f32,
    pub wall_padding: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_step: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub ball_speed_max: f32,
    pub win_score: u32,
    pub episode_hit_cap: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: Params::FIELD_WIDTH,
            field_height: Params::FIELD_HEIGHT,
            wall_padding: Params::WALL_PADDING,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_step: Params::PADDLE_STEP,
            ball_radius: Params::BALL_RADIUS,
            ball_speed: Params::BALL_SPEED,
            ball_speed_max: Params::BALL_SPEED_MAX,
            win_score: Params::WIN_SCORE,
            episode_hit_cap: Params::EPISODE_HIT_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("paddle height {paddle} does not fit in field height {field}")]
    PaddleTooTall { paddle: f32, field: f32 },
    #[error("ball speed {speed} exceeds max speed {max}")]
    SpeedAboveMax { speed: f32, max: f32 },
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the geometry describes a playable field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_step", self.paddle_step),
            ("ball_speed", self.ball_speed),
            ("ball_speed_max", self.ball_speed_max),
        ];
        for (name, value) in positive {
            // Written as a negation so NaN is rejected too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("wall_padding", self.wall_padding),
            ("ball_radius", self.ball_radius),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if self.paddle_height > self.field_height {
            return Err(ConfigError::PaddleTooTall {
                paddle: self.paddle_height,
                field: self.field_height,
            });
        }
        if self.ball_speed > self.ball_speed_max {
            return Err(ConfigError::SpeedAboveMax {
                speed: self.ball_speed,
                max: self.ball_speed_max,
            });
        }
        Ok(())
    }

    /// Get X position for paddle based on side
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => 0.0,
            Side::Right => self.field_width - self.paddle_width,
        }
    }

    /// Lowest legal paddle top edge
    pub fn max_paddle_y(&self) -> f32 {
        self.field_height - self.paddle_height
    }

    /// Paddle top edge when vertically centered
    pub fn centered_paddle_y(&self) -> f32 {
        self.field_height / 2.0 - self.paddle_height / 2.0
    }

    /// Ball spawn point, the middle of the field
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.field_width / 2.0, self.field_height / 2.0)
    }
}
