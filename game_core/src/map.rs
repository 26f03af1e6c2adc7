use glam::Vec2;

use crate::Config;

/// Playing field definition
///
/// Fixed for a match. The wall padding is the gap between each side edge
/// and that side's paddle striking plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub wall_padding: f32,
}

impl Field {
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.field_width,
            height: config.field_height,
            wall_padding: config.wall_padding,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}
