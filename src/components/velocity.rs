use bevy_ecs::prelude::Component;

/// Displacement applied per simulation step, in pixels.
///
/// Written by the input and physics systems, integrated into
/// [`Position`](super::position::Position) by the collision system so it can
/// be corrected before it is committed.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}
