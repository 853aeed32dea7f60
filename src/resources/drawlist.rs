//! Draw records handed to the presentation shell.
//!
//! The [`DrawList`] resource is rebuilt by the projection system at the end of
//! every step. Positions are already camera-relative.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::components::level::Tile;
use crate::components::render::{AnimationState, Direction};

/// One camera-adjusted entity to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Stable entity id (`Entity::to_bits`).
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub direction: Direction,
    pub animation_state: AnimationState,
    /// Tile the entity was spawned from, `None` for the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<Tile>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DrawList {
    pub records: Vec<DrawRecord>,
}
