use crate::{Ball, Events, Field, Paddle, Side};
use hecs::World;
use log::debug;

/// Check ball collisions with paddles, then walls
pub fn check_collisions(world: &mut World, field: &Field, events: &mut Events) {
    // Collect paddle data first without holding borrows; right paddle leads
    let mut paddles: Vec<Paddle> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, paddle)| *paddle)
        .collect();
    paddles.sort_by_key(|p| match p.side {
        Side::Right => 0,
        Side::Left => 1,
    });

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if let Some(side) = ball.collide_paddles(&paddles, field.wall_padding) {
            debug!(
                "{side:?} paddle returned the ball at y={:.1}, vy={:.2}",
                ball.pos.y, ball.vel.y
            );
            events.paddle_hit = Some(side);
        }

        if ball.bounce_walls(field.height) {
            events.wall_hit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Config};
    use glam::Vec2;

    fn setup_world() -> (hecs::World, Config, Field, Events) {
        let mut world = hecs::World::new();
        let config = Config::new();
        let field = Field::new(&config);
        let events = Events::new();
        create_paddle(&mut world, Side::Left, &config);
        create_paddle(&mut world, Side::Right, &config);
        (world, config, field, events)
    }

    fn ball_state(world: &hecs::World) -> Ball {
        let mut query = world.query::<&Ball>();
        let (_e, ball) = query.iter().next().expect("ball should exist");
        *ball
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, config, field, mut events) = setup_world();
        let ball_vel = Vec2::new(4.0, -3.0);
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(320.0, -1.0), ball_vel),
        );

        check_collisions(&mut world, &field, &mut events);

        let ball = ball_state(&world);
        assert!(ball.vel.y > 0.0, "Ball should bounce down after hitting top wall");
        assert_eq!(ball.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert_eq!(ball.pos.y, -1.0, "Ball stays past the wall for this frame");
        assert!(events.wall_hit, "Should trigger wall_hit event");
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, config, field, mut events) = setup_world();
        let ball_vel = Vec2::new(-4.0, 3.0);
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(320.0, field.height), ball_vel),
        );

        check_collisions(&mut world, &field, &mut events);

        let ball = ball_state(&world);
        assert!(ball.vel.y < 0.0, "Ball should bounce up after hitting bottom wall");
        assert_eq!(ball.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert!(events.wall_hit);
        assert_eq!(events.paddle_hit, None);
    }

    #[test]
    fn test_ball_collides_with_right_paddle() {
        let (mut world, config, field, mut events) = setup_world();
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(610.0, 240.0), Vec2::new(5.0, 1.0)),
        );

        check_collisions(&mut world, &field, &mut events);

        let ball = ball_state(&world);
        assert!(ball.vel.x < 0.0, "Ball should bounce left after hitting right paddle");
        assert!(ball.vel.y.abs() < 1e-6, "Center hit should flatten the ball");
        assert_eq!(events.paddle_hit, Some(Side::Right));
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (mut world, config, field, mut events) = setup_world();
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(30.0, 265.0), Vec2::new(-5.0, 0.0)),
        );

        check_collisions(&mut world, &field, &mut events);

        let ball = ball_state(&world);
        assert!(ball.vel.x > 0.0, "Ball should bounce right after hitting left paddle");
        // 25 below center on a half height of 30 at max speed 5
        assert!((ball.vel.y - 25.0 / 6.0).abs() < 1e-5);
        assert_eq!(events.paddle_hit, Some(Side::Left));
    }

    #[test]
    fn test_ball_trajectory_affected_by_hit_position() {
        let (mut world, config, field, mut events) = setup_world();
        // Top edge of the right paddle
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(610.0, 210.0), Vec2::new(5.0, 0.0)),
        );

        check_collisions(&mut world, &field, &mut events);
        let ball = ball_state(&world);
        assert_eq!(ball.vel.y, -config.ball_speed_max, "Top edge deflects upward");

        world.clear();
        events.clear();
        create_paddle(&mut world, Side::Right, &config);
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(610.0, 270.0), Vec2::new(5.0, 0.0)),
        );

        check_collisions(&mut world, &field, &mut events);
        let ball = ball_state(&world);
        assert_eq!(ball.vel.y, config.ball_speed_max, "Bottom edge deflects downward");
    }

    #[test]
    fn test_no_collision_when_ball_misses_paddle_face() {
        let (mut world, config, field, mut events) = setup_world();
        let vel = Vec2::new(5.0, 2.0);
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(610.0, 300.0), vel),
        );

        check_collisions(&mut world, &field, &mut events);

        assert_eq!(ball_state(&world).vel, vel);
        assert_eq!(events, Events::default());
    }

    #[test]
    fn test_paddle_hit_and_wall_hit_in_same_frame() {
        let mut world = hecs::World::new();
        let config = Config::new();
        let field = Field::new(&config);
        let mut events = Events::new();
        let right = create_paddle(&mut world, Side::Right, &config);
        world.get::<&mut Paddle>(right).unwrap().place(0.0);
        create_ball(
            &mut world,
            Ball::with_velocity(&config, Vec2::new(610.0, 0.0), Vec2::new(5.0, -2.0)),
        );

        check_collisions(&mut world, &field, &mut events);

        let ball = ball_state(&world);
        assert_eq!(ball.vel.x, -5.0);
        // Rebound sets vy = -5, then the wall flips it
        assert_eq!(ball.vel.y, 5.0);
        assert_eq!(events.paddle_hit, Some(Side::Right));
        assert!(events.wall_hit);
    }

    #[test]
    fn test_no_collision_when_no_ball() {
        let (mut world, _config, field, mut events) = setup_world();

        // Should not panic or error
        check_collisions(&mut world, &field, &mut events);

        assert_eq!(events.paddle_hit, None);
        assert!(!events.wall_hit);
    }
}
