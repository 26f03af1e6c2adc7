use hecs::World;

use crate::components::*;
use crate::resources::*;

/// Turn this frame's commands into paddle intents
pub fn ingest_inputs(world: &mut World, input: &FrameInput) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
        intent.action = input.action(paddle.side);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_paddle, Config};
    use proto::Action;

    #[test]
    fn test_inputs_reach_matching_paddle() {
        let mut world = World::new();
        let config = Config::new();
        let left = create_paddle(&mut world, Side::Left, &config);
        let right = create_paddle(&mut world, Side::Right, &config);

        ingest_inputs(&mut world, &FrameInput::new(Action::Down, Action::Up));

        assert_eq!(
            world.get::<&PaddleIntent>(left).unwrap().action,
            Action::Down
        );
        assert_eq!(
            world.get::<&PaddleIntent>(right).unwrap().action,
            Action::Up
        );
    }

    #[test]
    fn test_idle_input_clears_previous_intent() {
        let mut world = World::new();
        let config = Config::new();
        let left = create_paddle(&mut world, Side::Left, &config);

        ingest_inputs(&mut world, &FrameInput::new(Action::Up, Action::Idle));
        ingest_inputs(&mut world, &FrameInput::default());

        assert_eq!(
            world.get::<&PaddleIntent>(left).unwrap().action,
            Action::Idle
        );
    }
}
