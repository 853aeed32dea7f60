//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: input state, timing, the camera,
//! configuration and the projected draw list.
//!
//! Overview
//! - `camera2d` – camera top-left used for world/screen transforms
//! - `drawlist` – camera-adjusted draw records for the presentation shell
//! - `engineconfig` – tunables, timestep, action durations and key bindings
//! - `input` – raw key snapshot and the bindings that map keys to actions
//! - `worldtime` – simulation time and delta
pub mod camera2d;
pub mod drawlist;
pub mod engineconfig;
pub mod input;
pub mod worldtime;
