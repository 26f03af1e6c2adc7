pub mod bridge;
pub mod components;
pub mod config;
pub mod map;
pub mod match_loop;
pub mod params;
pub mod resources;
pub mod systems;
pub mod termination;

pub use bridge::*;
pub use components::*;
pub use config::*;
pub use map::*;
pub use match_loop::*;
pub use params::*;
pub use resources::*;
pub use termination::*;

pub use proto::{Action, InvalidAction, Observation};

use hecs::World;
use systems::*;

/// Run one deterministic Pong frame
///
/// `tracking` names a paddle that follows the ball on its own after the
/// frame's actions have been applied.
pub fn step(
    world: &mut World,
    field: &Field,
    input: &FrameInput,
    tracking: Option<Side>,
    events: &mut Events,
    rng: &mut GameRng,
) {
    // Clear events at start of frame
    events.clear();

    // 1. Ingest inputs (apply to paddle intents)
    ingest_inputs(world, input);

    // 2. Move paddles based on intents
    move_paddles(world);

    // 3. Scripted paddle follows the ball
    if let Some(side) = tracking {
        track_ball(world, side);
    }

    // 4. Move ball
    move_ball(world);

    // 5. Check collisions (ball vs paddles, walls)
    check_collisions(world, field, events);

    // 6. Check scoring (ball left the field)
    check_scoring(world, field, events, rng);
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, config: &Config) -> hecs::Entity {
    world.spawn((Paddle::new(side, config), PaddleIntent::new()))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, ball: Ball) -> hecs::Entity {
    world.spawn((ball,))
}
