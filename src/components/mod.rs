//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulation. Components are plain data; systems in
//! [`crate::systems`] give them behavior.
//!
//! Submodules overview:
//! - [`collision`] – axis-aligned collision box, tagged with its tile for statics
//! - [`level`] – tile codes, the rectangular level grid and its text format
//! - [`physics`] – opt-in to gravity integration
//! - [`player`] – movement tuning, jump budget and action countdowns
//! - [`position`] – world-space top-left corner of an entity
//! - [`render`] – presentation state: sprite, animation, size, facing
//! - [`velocity`] – per-step displacement

pub mod collision;
pub mod level;
pub mod physics;
pub mod player;
pub mod position;
pub mod render;
pub mod velocity;
