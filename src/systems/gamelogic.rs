//! Player state machine.
//!
//! Runs after collision, so `is_grounded` is already authoritative for this
//! step. Order inside a step: landing reset, jump arbitration, action
//! countdowns, then animation selection.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::player::{Action, Player};
use crate::components::render::{AnimationState, Render};
use crate::components::velocity::Velocity;
use crate::resources::worldtime::WorldTime;

/// Pick the animation for the current player state.
///
/// Strict priority: hurt, jump, attack, climb, push, throw, run, idle. A
/// player counts as jumping while `is_jumping` is set or while airborne with
/// a non-zero vertical speed.
pub fn derive_animation(player: &Player, velocity: &Velocity) -> AnimationState {
    if player.is_hurt() {
        AnimationState::Hurt
    } else if player.is_jumping || (!player.is_grounded && velocity.y != 0.0) {
        AnimationState::Jump
    } else if player.is_attacking() {
        AnimationState::Attack
    } else if player.is_climbing() {
        AnimationState::Climb
    } else if player.is_pushing() {
        AnimationState::Push
    } else if player.is_throwing() {
        AnimationState::Throw
    } else if velocity.x != 0.0 {
        AnimationState::Run
    } else {
        AnimationState::Idle
    }
}

/// Apply landing, jumps and action timers, then update the animation state.
pub fn game_logic_system(
    mut query: Query<(&mut Player, &mut Velocity, &mut Render)>,
    time: Res<WorldTime>,
) {
    for (mut player, mut velocity, mut render) in query.iter_mut() {
        if player.is_grounded {
            player.jumps = 0;
            player.is_jumping = false;
        }

        if player.wants_to_jump {
            if player.can_jump() {
                velocity.y = -player.jump_strength;
                player.jumps += 1;
                player.is_jumping = true;
                player.is_grounded = false;
                debug!("jump {} honored", player.jumps);
            }
            player.wants_to_jump = false;
        }

        for action in Action::ALL {
            player.action_mut(action).tick(time.delta);
        }

        let state = derive_animation(&player, &velocity);
        if render.animation_state == state {
            render.frame = render.frame.wrapping_add(1);
        } else {
            render.set_animation(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> Player {
        Player {
            is_grounded: true,
            ..Player::default()
        }
    }

    #[test]
    fn test_idle_and_run() {
        let p = grounded();
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Idle);
        assert_eq!(
            derive_animation(&p, &Velocity::new(-5.0, 0.0)),
            AnimationState::Run
        );
    }

    #[test]
    fn test_airborne_counts_as_jump() {
        let p = Player::default();
        assert_eq!(
            derive_animation(&p, &Velocity::new(0.0, 3.0)),
            AnimationState::Jump
        );
        // resting mid-air with no vertical speed is not a jump
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Idle);
    }

    #[test]
    fn test_hurt_beats_everything() {
        let mut p = grounded();
        p.is_jumping = true;
        p.attack.active = true;
        p.hurt.active = true;
        assert_eq!(
            derive_animation(&p, &Velocity::new(5.0, -3.0)),
            AnimationState::Hurt
        );
    }

    #[test]
    fn test_action_priority() {
        let mut p = grounded();
        p.throw.active = true;
        assert_eq!(derive_animation(&p, &Velocity::new(5.0, 0.0)), AnimationState::Throw);
        p.push.active = true;
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Push);
        p.climb.active = true;
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Climb);
        p.attack.active = true;
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Attack);
        p.is_jumping = true;
        assert_eq!(derive_animation(&p, &Velocity::zero()), AnimationState::Jump);
    }

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(game_logic_system);
        schedule.run(world);
    }

    #[test]
    fn test_jump_budget() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 1.0 / 60.0,
            ..Default::default()
        });
        let mut p = grounded();
        p.wants_to_jump = true;
        let e = world
            .spawn((p, Velocity::zero(), Render::new("player", 32.0, 32.0)))
            .id();

        run_once(&mut world);
        {
            let p = world.get::<Player>(e).unwrap();
            assert_eq!(p.jumps, 1);
            assert!(p.is_jumping);
            assert!(!p.is_grounded);
            assert!(!p.wants_to_jump);
            assert_eq!(world.get::<Velocity>(e).unwrap().y, -10.0);
            assert_eq!(
                world.get::<Render>(e).unwrap().animation_state,
                AnimationState::Jump
            );
        }

        // second jump in the air
        world.get_mut::<Velocity>(e).unwrap().y = 2.0;
        world.get_mut::<Player>(e).unwrap().wants_to_jump = true;
        run_once(&mut world);
        assert_eq!(world.get::<Player>(e).unwrap().jumps, 2);
        assert_eq!(world.get::<Velocity>(e).unwrap().y, -10.0);

        // third is refused, intent still cleared
        world.get_mut::<Velocity>(e).unwrap().y = 2.0;
        world.get_mut::<Player>(e).unwrap().wants_to_jump = true;
        run_once(&mut world);
        let p = world.get::<Player>(e).unwrap();
        assert_eq!(p.jumps, 2);
        assert!(!p.wants_to_jump);
        assert_eq!(world.get::<Velocity>(e).unwrap().y, 2.0);
    }

    #[test]
    fn test_landing_resets_budget() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let mut p = grounded();
        p.jumps = 2;
        p.is_jumping = true;
        let e = world
            .spawn((p, Velocity::zero(), Render::new("player", 32.0, 32.0)))
            .id();
        run_once(&mut world);
        let p = world.get::<Player>(e).unwrap();
        assert_eq!(p.jumps, 0);
        assert!(!p.is_jumping);
        assert_eq!(
            world.get::<Render>(e).unwrap().animation_state,
            AnimationState::Idle
        );
    }

    #[test]
    fn test_action_runs_for_its_duration() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.25,
            ..Default::default()
        });
        let mut p = grounded().with_duration(Action::Attack, 0.5);
        p.attack.wants = true;
        let e = world
            .spawn((p, Velocity::zero(), Render::new("player", 32.0, 32.0)))
            .id();

        run_once(&mut world);
        world.get_mut::<Player>(e).unwrap().attack.wants = false;
        assert!(world.get::<Player>(e).unwrap().is_attacking());
        assert_eq!(
            world.get::<Render>(e).unwrap().animation_state,
            AnimationState::Attack
        );

        run_once(&mut world);
        assert!(world.get::<Player>(e).unwrap().is_attacking());
        run_once(&mut world);
        assert!(!world.get::<Player>(e).unwrap().is_attacking());
        assert_eq!(
            world.get::<Render>(e).unwrap().animation_state,
            AnimationState::Idle
        );
    }
}
