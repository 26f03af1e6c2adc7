use crate::{Ball, Events, Field, GameRng, Paddle};
use hecs::World;
use log::debug;

/// Check if ball left the field; award the point and re-serve
pub fn check_scoring(world: &mut World, field: &Field, events: &mut Events, rng: &mut GameRng) {
    let mut scorer = None;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if let Some(side) = ball.scorer(field.width) {
            ball.reset(&mut rng.0);
            scorer = Some(side);
        }
    }
    let Some(side) = scorer else {
        return;
    };

    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            paddle.score_point();
            debug!("{side:?} scores, now at {}", paddle.score());
        }
        paddle.recenter();
    }
    events.scored = Some(side);
}
