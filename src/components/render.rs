//! Presentation-facing visual state.
//!
//! [`Render`] carries what the presentation shell needs to draw an entity:
//! sprite key, frame, the current [`AnimationState`], box size and facing
//! [`Direction`]. For moving bodies the box size is also the collision box.
//!
//! The animation state is derived every step by the game logic system; the
//! shell maps it to whatever sprite sheet rows it uses.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Animation chosen for an entity this step.
///
/// The variants are listed from the lowest to the highest priority the game
/// logic uses when several actions overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Throw,
    Push,
    Climb,
    Attack,
    Jump,
    Hurt,
}

impl AnimationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Run => "run",
            AnimationState::Throw => "throw",
            AnimationState::Push => "push",
            AnimationState::Climb => "climb",
            AnimationState::Attack => "attack",
            AnimationState::Jump => "jump",
            AnimationState::Hurt => "hurt",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Render {
    /// Sprite key understood by the presentation shell. Empty for tiles.
    pub sprite: String,
    /// Frame index inside the current animation.
    pub frame: u32,
    pub animation_state: AnimationState,
    /// Box width in pixels.
    pub width: f32,
    /// Box height in pixels.
    pub height: f32,
    pub direction: Direction,
}

impl Render {
    pub fn new(sprite: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            sprite: sprite.into(),
            frame: 0,
            animation_state: AnimationState::Idle,
            width,
            height,
            direction: Direction::Right,
        }
    }

    /// Render record for a static tile: no sprite, tile-sized box.
    pub fn tile(tile_size: f32) -> Self {
        Self::new("", tile_size, tile_size)
    }

    /// Switch animation, restarting the frame counter when it changes.
    pub fn set_animation(&mut self, state: AnimationState) {
        if self.animation_state != state {
            self.animation_state = state;
            self.frame = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_new_defaults() {
        let r = Render::new("player", 32.0, 48.0);
        assert_eq!(r.sprite, "player");
        assert_eq!(r.frame, 0);
        assert_eq!(r.animation_state, AnimationState::Idle);
        assert_eq!(r.direction, Direction::Right);
        assert_eq!(r.width, 32.0);
        assert_eq!(r.height, 48.0);
    }

    #[test]
    fn test_set_animation_resets_frame_only_on_change() {
        let mut r = Render::new("player", 32.0, 32.0);
        r.frame = 3;
        r.set_animation(AnimationState::Idle);
        assert_eq!(r.frame, 3);
        r.set_animation(AnimationState::Run);
        assert_eq!(r.frame, 0);
        assert_eq!(r.animation_state, AnimationState::Run);
    }

    #[test]
    fn test_animation_state_serializes_lowercase() {
        let json = serde_json::to_string(&AnimationState::Attack).unwrap();
        assert_eq!(json, "\"attack\"");
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }
}
