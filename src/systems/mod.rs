//! Engine systems.
//!
//! This module groups all ECS systems that advance the simulation and project
//! it for drawing. They run chained, in this order, once per step.
//!
//! Submodules overview
//! - [`time`] – advance simulation time and delta
//! - [`input`] – translate held keys into velocity, facing and intent flags
//! - [`physics`] – accumulate gravity into vertical velocity
//! - [`collision`] – integrate and resolve moving bodies against the tile grid
//! - [`gamelogic`] – landing, jump budget, action timers, animation choice
//! - [`render`] – camera follow and camera-relative draw records

pub mod collision;
pub mod gamelogic;
pub mod input;
pub mod physics;
pub mod render;
pub mod time;
