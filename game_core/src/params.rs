/// Game tuning parameters for Pong
///
/// Distances are in field units (pixels of a 640x480 screen), speeds in
/// units per frame. The simulation advances one frame per step.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Field
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;
    pub const WALL_PADDING: f32 = 20.0; // Edge to paddle striking plane

    // Paddle
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 60.0;
    pub const PADDLE_STEP: f32 = 3.0; // units per frame

    // Ball
    pub const BALL_RADIUS: f32 = 5.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_SPEED_MAX: f32 = 5.0; // Caps rebound vertical speed

    // Match
    pub const WIN_SCORE: u32 = 10; // First to 10 ends a regular match
    pub const EPISODE_HIT_CAP: u32 = 50; // Training episode ends past this many right-side hits

    // Frame pacing
    pub const FRAME_RATE: u32 = 60;
}
