//! Gravity integration.
//!
//! Only velocity is accumulated here. Position is integrated by the collision
//! system so it can correct the move before committing it.
use bevy_ecs::prelude::*;

use crate::components::physics::Physics;
use crate::components::position::Position;
use crate::components::velocity::Velocity;
use crate::resources::engineconfig::EngineConfig;

/// Add the configured gravity to the vertical velocity of every entity that
/// is affected by it.
pub fn physics_system(
    mut query: Query<(&mut Velocity, &Physics), With<Position>>,
    config: Res<EngineConfig>,
) {
    for (mut velocity, physics) in query.iter_mut() {
        if physics.affected_by_gravity {
            velocity.y += config.gravity;
        }
    }
}
