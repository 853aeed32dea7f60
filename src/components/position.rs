//! World-space position of an entity.
//!
//! The coordinate is the top-left corner of the entity's box, in pixels, with
//! `y` growing downwards like the level grid rows.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
