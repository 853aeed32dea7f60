//! Input-intent mapping system.
//!
//! Reads the raw key snapshot in [`InputState`] and records what the player
//! wants to do this step. Horizontal velocity and facing are written directly;
//! jumps and actions are only requested, the
//! [`game_logic_system`](crate::systems::gamelogic::game_logic_system) decides
//! whether they happen.
use bevy_ecs::prelude::*;

use crate::components::player::Player;
use crate::components::render::{Direction, Render};
use crate::components::velocity::Velocity;
use crate::resources::input::{InputAction, InputState};

/// Map held keys to velocity, facing and intent flags on every player.
///
/// Left wins when both directions are held. Never touches position, grounded
/// state or active action flags.
pub fn input_system(
    input: Res<InputState>,
    mut query: Query<(&mut Player, &mut Velocity, &mut Render)>,
) {
    let left = input.is_active(InputAction::Left);
    let right = input.is_active(InputAction::Right);

    for (mut player, mut velocity, mut render) in query.iter_mut() {
        if left {
            velocity.x = -player.move_speed;
            render.direction = Direction::Left;
        } else if right {
            velocity.x = player.move_speed;
            render.direction = Direction::Right;
        } else {
            velocity.x = 0.0;
        }

        player.wants_to_jump = input.is_active(InputAction::Jump);
        player.attack.wants = input.is_active(InputAction::Attack);
        player.climb.wants = input.is_active(InputAction::Climb);
        player.push.wants = input.is_active(InputAction::Push);
        player.throw.wants = input.is_active(InputAction::Throw);
        player.hurt.wants = input.is_active(InputAction::Hurt);
    }
}
