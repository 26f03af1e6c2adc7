use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use proto::Action;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Config;

/// Which end of the field a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Paddle component - represents a player's paddle
///
/// `y` is the top edge and always stays within `[0, field_height - height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    y: f32,
    step: f32,
    max_y: f32,
    home_y: f32,
    score: u32,
}

impl Paddle {
    pub fn new(side: Side, config: &Config) -> Self {
        let home_y = config.centered_paddle_y();
        Self {
            side,
            x: config.paddle_x(side),
            width: config.paddle_width,
            height: config.paddle_height,
            y: home_y,
            step: config.paddle_step,
            max_y: config.max_paddle_y(),
            home_y,
            score: 0,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn move_up(&mut self) {
        let next = self.y - self.step;
        if next >= 0.0 {
            self.y = next;
        }
    }

    pub fn move_down(&mut self) {
        let next = self.y + self.step;
        if next <= self.max_y {
            self.y = next;
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Idle => {}
            Action::Up => self.move_up(),
            Action::Down => self.move_down(),
        }
    }

    /// Chase `target_y` with the paddle center, one full step per call
    pub fn track(&mut self, target_y: f32) {
        let center = self.center_y();
        if center < target_y {
            self.move_down();
        } else if center > target_y {
            self.move_up();
        }
    }

    pub fn score_point(&mut self) {
        self.score += 1;
    }

    pub fn recenter(&mut self) {
        self.y = self.home_y;
    }

    /// Put the paddle at `y`, clamped into the field
    pub fn place(&mut self, y: f32) {
        self.y = y.clamp(0.0, self.max_y);
    }

    /// Whether `y` lies on the paddle face, edges included
    pub fn spans(&self, y: f32) -> bool {
        self.y <= y && y <= self.y + self.height
    }
}

/// Draw a serve velocity.
///
/// The angle is uniform in [-45°, 45°]; the horizontal direction is a coin
/// flip. The vertical factor is drawn from {-0.5, 0.5}, so the initial
/// vertical speed is at most half of what the angle alone gives.
pub fn serve_velocity<R: Rng + ?Sized>(speed: f32, rng: &mut R) -> Vec2 {
    let angle: f32 = rng.gen_range(-FRAC_PI_4..=FRAC_PI_4);
    let horizontal = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let vertical = if rng.gen_bool(0.5) { 0.5 } else { -0.5 };
    Vec2::new(
        speed * angle.cos() * horizontal,
        speed * angle.sin() * vertical,
    )
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    base_speed: f32,
    max_speed: f32,
    spawn: Vec2,
}

impl Ball {
    /// Centered ball with a freshly drawn serve
    pub fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let mut ball = Self::with_velocity(config, config.ball_spawn(), Vec2::ZERO);
        ball.reset(rng);
        ball
    }

    /// Ball at a chosen position and velocity (scripted serves, replays)
    pub fn with_velocity(config: &Config, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            speed: config.ball_speed,
            radius: config.ball_radius,
            base_speed: config.ball_speed,
            max_speed: config.ball_speed_max,
            spawn: config.ball_spawn(),
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Reset ball to center with random direction and base speed
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pos = self.spawn;
        self.speed = self.base_speed;
        self.vel = serve_velocity(self.speed, rng);
    }

    /// One Euler step, no substepping
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Leading edge of the ball measured against `paddle`'s striking plane
    fn leading_edge(&self, paddle: &Paddle, wall_padding: f32) -> f32 {
        match paddle.side {
            Side::Right => self.pos.x + wall_padding + self.radius,
            Side::Left => self.pos.x - wall_padding - self.radius,
        }
    }

    pub fn touches(&self, paddle: &Paddle, wall_padding: f32) -> bool {
        let edge = self.leading_edge(paddle, wall_padding);
        paddle.x <= edge && edge <= paddle.x + paddle.width && paddle.spans(self.pos.y)
    }

    /// Vertical speed after striking `paddle` at the ball's current height.
    ///
    /// Linear in the offset from the paddle center: 0 at the center,
    /// `-max_speed` at the top edge, `+max_speed` at the bottom edge.
    pub fn rebound_vy(&self, paddle: &Paddle) -> f32 {
        let offset = paddle.center_y() - self.pos.y;
        let reduction = (paddle.height / 2.0) / self.max_speed;
        -(offset / reduction)
    }

    /// Bounce off the first paddle in `paddles` the ball touches.
    ///
    /// At most one paddle is hit per call; callers pass the right paddle
    /// first.
    pub fn collide_paddles(&mut self, paddles: &[Paddle], wall_padding: f32) -> Option<Side> {
        let paddle = paddles.iter().find(|p| self.touches(p, wall_padding))?;
        self.vel.x = -self.vel.x;
        self.vel.y = self.rebound_vy(paddle);
        Some(paddle.side)
    }

    /// Reflect off the top or bottom edge; position is left as is
    pub fn bounce_walls(&mut self, field_height: f32) -> bool {
        if self.pos.y <= 0.0 || self.pos.y >= field_height {
            self.vel.y = -self.vel.y;
            true
        } else {
            false
        }
    }

    /// Side that earns the point if the ball has left the field
    pub fn scorer(&self, field_width: f32) -> Option<Side> {
        if self.pos.x < 0.0 {
            Some(Side::Right)
        } else if self.pos.x > field_width {
            Some(Side::Left)
        } else {
            None
        }
    }
}

/// Movement intent for paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub action: Action,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paddle(side: Side) -> Paddle {
        Paddle::new(side, &Config::new())
    }

    #[test]
    fn test_paddle_starts_centered() {
        let p = paddle(Side::Left);
        assert_eq!(p.y(), 210.0);
        assert_eq!(p.center_y(), 240.0);
        assert_eq!(p.score(), 0);
        assert_eq!(paddle(Side::Right).x, 630.0);
    }

    #[test]
    fn test_move_up_stops_at_top() {
        let mut p = paddle(Side::Left);
        for _ in 0..200 {
            p.move_up();
        }
        assert_eq!(p.y(), 0.0);
        p.move_up();
        assert_eq!(p.y(), 0.0, "Moving past the top is a no-op");
    }

    #[test]
    fn test_move_down_stops_at_bottom() {
        let mut p = paddle(Side::Right);
        for _ in 0..200 {
            p.move_down();
        }
        assert_eq!(p.y(), 420.0);
        p.move_down();
        assert_eq!(p.y(), 420.0, "Moving past the bottom is a no-op");
    }

    #[test]
    fn test_move_up_is_noop_when_step_would_overshoot() {
        let mut p = paddle(Side::Left);
        p.place(2.0);
        p.move_up();
        assert_eq!(p.y(), 2.0);
    }

    #[test]
    fn test_place_clamps() {
        let mut p = paddle(Side::Left);
        p.place(-50.0);
        assert_eq!(p.y(), 0.0);
        p.place(1000.0);
        assert_eq!(p.y(), 420.0);
    }

    #[test]
    fn test_track_moves_toward_target() {
        let mut p = paddle(Side::Left);
        p.track(300.0);
        assert_eq!(p.y(), 213.0, "Center above target moves down");
        p.track(100.0);
        assert_eq!(p.y(), 210.0, "Center below target moves up");
        p.track(240.0);
        assert_eq!(p.y(), 210.0, "Centered paddle stays idle");
    }

    #[test]
    fn test_score_point_and_recenter() {
        let mut p = paddle(Side::Right);
        p.score_point();
        p.score_point();
        assert_eq!(p.score(), 2);
        p.place(0.0);
        p.recenter();
        assert_eq!(p.y(), 210.0);
    }

    #[test]
    fn test_serve_velocity_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let speed = 5.0;
        for _ in 0..500 {
            let vel = serve_velocity(speed, &mut rng);
            // cos(angle) >= cos(45°) so the horizontal speed never collapses
            assert!(vel.x.abs() >= speed * FRAC_PI_4.cos() - 1e-4);
            assert!(vel.x.abs() <= speed + 1e-4);
            // Vertical factor is ±0.5, so at most half of speed * sin(45°)
            assert!(vel.y.abs() <= 0.5 * speed * FRAC_PI_4.sin() + 1e-4);
        }
    }

    #[test]
    fn test_serve_velocity_is_seed_deterministic() {
        let a = serve_velocity(5.0, &mut StdRng::seed_from_u64(42));
        let b = serve_velocity(5.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rebound_law() {
        let config = Config::new();
        let right = paddle(Side::Right);

        let mut ball = Ball::with_velocity(&config, Vec2::new(605.0, right.center_y()), Vec2::ZERO);
        assert_eq!(ball.rebound_vy(&right), 0.0, "Center hit is flat");

        ball.pos.y = right.y();
        assert_eq!(ball.rebound_vy(&right), -config.ball_speed_max, "Top edge goes up");

        ball.pos.y = right.y() + right.height;
        assert_eq!(ball.rebound_vy(&right), config.ball_speed_max, "Bottom edge goes down");
    }

    #[test]
    fn test_touches_right_paddle_slab() {
        let config = Config::new();
        let right = paddle(Side::Right);
        // Leading edge x + 20 + 5 must land in [630, 640]
        for (x, expected) in [(604.0, false), (605.0, true), (615.0, true), (616.0, false)] {
            let ball = Ball::with_velocity(&config, Vec2::new(x, 240.0), Vec2::ZERO);
            assert_eq!(ball.touches(&right, config.wall_padding), expected, "x = {x}");
        }
        let above = Ball::with_velocity(&config, Vec2::new(610.0, 209.0), Vec2::ZERO);
        assert!(!above.touches(&right, config.wall_padding));
    }

    #[test]
    fn test_touches_left_paddle_slab() {
        let config = Config::new();
        let left = paddle(Side::Left);
        // Leading edge x - 20 - 5 must land in [0, 10]
        for (x, expected) in [(24.0, false), (25.0, true), (35.0, true), (36.0, false)] {
            let ball = Ball::with_velocity(&config, Vec2::new(x, 240.0), Vec2::ZERO);
            assert_eq!(ball.touches(&left, config.wall_padding), expected, "x = {x}");
        }
    }

    #[test]
    fn test_collide_paddles_checks_first_match_only() {
        let config = Config::new();
        let paddles = [paddle(Side::Right), paddle(Side::Left)];
        let mut ball = Ball::with_velocity(&config, Vec2::new(610.0, 225.0), Vec2::new(4.0, 1.0));
        assert_eq!(
            ball.collide_paddles(&paddles, config.wall_padding),
            Some(Side::Right)
        );
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(ball.vel.y, -2.5);

        let mut miss = Ball::with_velocity(&config, Vec2::new(320.0, 240.0), Vec2::new(4.0, 1.0));
        assert_eq!(miss.collide_paddles(&paddles, config.wall_padding), None);
        assert_eq!(miss.vel, Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_bounce_walls_without_clamp() {
        let config = Config::new();
        let mut ball = Ball::with_velocity(&config, Vec2::new(320.0, -2.0), Vec2::new(3.0, -4.0));
        assert!(ball.bounce_walls(config.field_height));
        assert_eq!(ball.vel, Vec2::new(3.0, 4.0));
        assert_eq!(ball.pos.y, -2.0, "Position is not clamped");

        let mut inside = Ball::with_velocity(&config, Vec2::new(320.0, 100.0), Vec2::new(3.0, -4.0));
        assert!(!inside.bounce_walls(config.field_height));
        assert_eq!(inside.vel, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_scorer() {
        let config = Config::new();
        let mut ball = Ball::with_velocity(&config, Vec2::new(-0.5, 240.0), Vec2::ZERO);
        assert_eq!(ball.scorer(config.field_width), Some(Side::Right));
        ball.pos.x = 640.5;
        assert_eq!(ball.scorer(config.field_width), Some(Side::Left));
        ball.pos.x = 640.0;
        assert_eq!(ball.scorer(config.field_width), None);
    }

    #[test]
    fn test_ball_reset_restores_spawn_and_speed() {
        let config = Config::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ball = Ball::with_velocity(&config, Vec2::new(-3.0, 17.0), Vec2::new(-5.0, 2.0));
        ball.speed = 9.0;
        ball.reset(&mut rng);
        assert_eq!(ball.pos, Vec2::new(320.0, 240.0));
        assert_eq!(ball.speed, config.ball_speed);
        assert!(ball.vel.x != 0.0);
    }
}
