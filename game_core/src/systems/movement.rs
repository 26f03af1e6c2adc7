use crate::{Ball, Paddle, PaddleIntent, Side};
use hecs::World;

/// Apply paddle movement based on intents
pub fn move_paddles(world: &mut World) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        paddle.apply(intent.action);
    }
}

/// Let the paddle on `side` chase the ball's height
pub fn track_ball(world: &mut World, side: Side) {
    let ball_y = {
        let mut ball_query = world.query::<&Ball>();
        ball_query.iter().next().map(|(_e, ball)| ball.pos.y)
    };
    let Some(ball_y) = ball_y else {
        return;
    };

    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            paddle.track(ball_y);
        }
    }
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.integrate();
    }
}
