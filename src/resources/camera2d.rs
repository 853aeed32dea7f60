//! Shared 2D camera resource.
//!
//! Holds the top-left corner of the visible region in world pixels. The
//! camera follow system slides it to keep the player inside the dead zone;
//! the projection system subtracts it from every drawn position.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera2D {
    pub x: f32,
    pub y: f32,
}

impl Camera2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
