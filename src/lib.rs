//! gridrunner library.
//!
//! Headless core of a 2D tile platformer: ECS components, resources and
//! systems, plus the [`engine::Engine`] facade a presentation shell drives
//! once per frame.

pub mod components;
pub mod engine;
pub mod resources;
pub mod systems;
