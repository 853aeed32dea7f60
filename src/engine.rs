//! Engine facade driven by the presentation shell.
//!
//! [`Engine`] owns the ECS [`World`], the player and level entities, and two
//! schedules:
//!
//! - `update`: input, physics, collision, game logic, camera follow and
//!   render projection, chained in that order.
//! - `projection`: camera follow and render projection only. It runs after a
//!   level load so [`Engine::render`] never returns a stale list.
//!
//! A frame is `set_keys_pressed`, then `update` (or `advance`), then
//! `render`. Level loads take `&mut self`, so they can never interleave with a
//! step: platforms are despawned, the grid replaced, new platforms spawned and
//! the player placed before the call returns.

use std::path::Path;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use log::{debug, info, trace, warn};

use crate::components::collision::Collision;
use crate::components::level::{DEFAULT_COLS, DEFAULT_ROWS, Level, LevelGrid};
use crate::components::physics::Physics;
use crate::components::player::{Action, Player};
use crate::components::position::Position;
use crate::components::render::{AnimationState, Render};
use crate::components::velocity::Velocity;
use crate::resources::camera2d::Camera2D;
use crate::resources::drawlist::{DrawList, DrawRecord};
use crate::resources::engineconfig::EngineConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::collision_system;
use crate::systems::gamelogic::game_logic_system;
use crate::systems::input::input_system;
use crate::systems::physics::physics_system;
use crate::systems::render::{camera_follow_system, centered_camera, render_projection_system};
use crate::systems::time::update_world_time;

/// Where the player was placed by a level load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSource {
    /// Feet on the bottom edge of the start cell.
    Start,
    /// On top of the highest solid or one-way tile.
    Support,
    /// Bottom-center of the grid.
    Fallback,
}

/// Compute the player's top-left corner for a freshly loaded grid.
///
/// A support tile only qualifies when the player's full height fits above it
/// without overlapping solid cells. The result is clamped into the level.
pub fn spawn_position(
    grid: &LevelGrid,
    tile_size: f32,
    width: f32,
    height: f32,
) -> (Position, SpawnSource) {
    let level_w = grid.col_count() as f32 * tile_size;
    let level_h = grid.row_count() as f32 * tile_size;
    let clamp = |x: f32, y: f32| {
        Position::new(
            x.min(level_w - width).max(0.0),
            y.min(level_h - height).max(0.0),
        )
    };
    let centered = |col: usize| col as f32 * tile_size + tile_size / 2.0 - width / 2.0;

    if let Some((row, col)) = grid.start_cell() {
        let y = (row + 1) as f32 * tile_size - height;
        return (clamp(centered(col), y), SpawnSource::Start);
    }
    let clearance = (height / tile_size).ceil().max(0.0) as usize;
    if let Some((row, col)) = grid.highest_support(clearance) {
        let y = row as f32 * tile_size - height;
        return (clamp(centered(col), y), SpawnSource::Support);
    }
    let x = level_w / 2.0 - width / 2.0;
    let y = level_h - height;
    (clamp(x, y), SpawnSource::Fallback)
}

fn build_player(config: &EngineConfig) -> Player {
    let mut player = Player::new(config.jump_strength, config.move_speed);
    for action in Action::ALL {
        player.action_mut(action).duration = config.action_durations.get(action);
    }
    player
}

pub struct Engine {
    world: World,
    update_schedule: Schedule,
    projection_schedule: Schedule,
    player: Entity,
    level: Entity,
    /// Unsimulated time carried between `advance` calls.
    accumulator: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Build the world, spawn the player, and install a blank default grid.
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(InputState::new(config.key_bindings.clone()));
        world.insert_resource(WorldTime::default());
        world.insert_resource(Camera2D::default());
        world.insert_resource(DrawList::default());

        let player = world
            .spawn((
                Position::default(),
                Velocity::zero(),
                Physics::new(true),
                Render::new("player", config.player_width, config.player_height),
                Collision::body(config.player_width, config.player_height),
                build_player(&config),
            ))
            .id();
        let level = world
            .spawn(Level::new(
                LevelGrid::blank(DEFAULT_ROWS, DEFAULT_COLS),
                config.tile_size,
            ))
            .id();
        world.insert_resource(config);

        let mut update_schedule = Schedule::default();
        update_schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        update_schedule.add_systems(
            (
                input_system,
                physics_system,
                collision_system,
                game_logic_system,
                camera_follow_system,
                render_projection_system,
            )
                .chain(),
        );

        let mut projection_schedule = Schedule::default();
        projection_schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        projection_schedule.add_systems((camera_follow_system, render_projection_system).chain());

        let mut engine = Self {
            world,
            update_schedule,
            projection_schedule,
            player,
            level,
            accumulator: 0.0,
        };
        engine.install(LevelGrid::blank(DEFAULT_ROWS, DEFAULT_COLS));
        debug!("Engine ready, player {:?}", player);
        engine
    }

    // --------------- Level loading ---------------

    /// Parse and install level text. Empty text installs the default blank
    /// grid.
    pub fn load_level(&mut self, text: &str) {
        self.load_grid(LevelGrid::parse(text));
    }

    /// Install an already-built grid.
    pub fn load_grid(&mut self, grid: LevelGrid) {
        if grid.is_empty() {
            warn!(
                "Level is empty, using a blank {}x{} grid",
                DEFAULT_ROWS, DEFAULT_COLS
            );
            self.install(LevelGrid::blank(DEFAULT_ROWS, DEFAULT_COLS));
        } else {
            self.install(grid);
        }
    }

    /// Read and install a level file. A read error installs the default blank
    /// grid.
    pub fn load_level_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match LevelGrid::load_from_file(path) {
            Ok(grid) => {
                info!("Loading level {:?}", path);
                self.load_grid(grid);
            }
            Err(e) => {
                warn!("Failed to read level {:?}: {}, using a blank grid", path, e);
                self.install(LevelGrid::blank(DEFAULT_ROWS, DEFAULT_COLS));
            }
        }
    }

    /// Current grid as level text.
    pub fn export_level(&self) -> String {
        self.grid()
            .map(LevelGrid::to_level_text)
            .unwrap_or_default()
    }

    fn install(&mut self, grid: LevelGrid) {
        let (tile_size, width, height, viewport) = {
            let config = self.world.resource::<EngineConfig>();
            (
                config.tile_size,
                config.player_width,
                config.player_height,
                config.viewport(),
            )
        };

        let mut platforms = self
            .world
            .query_filtered::<Entity, (With<Collision>, Without<Player>)>();
        let stale: Vec<Entity> = platforms.iter(&self.world).collect();
        for entity in &stale {
            self.world.despawn(*entity);
        }

        let mut spawned = 0usize;
        for (row, col, tile) in grid.cells() {
            if !tile.is_spawnable() {
                continue;
            }
            self.world.spawn((
                Position::new(col as f32 * tile_size, row as f32 * tile_size),
                Collision::tile(tile, tile_size),
                Render::tile(tile_size),
            ));
            spawned += 1;
        }

        let (position, source) = spawn_position(&grid, tile_size, width, height);
        debug!(
            "Player placed at ({}, {}) from {:?}",
            position.x, position.y, source
        );
        let level_size = (
            grid.col_count() as f32 * tile_size,
            grid.row_count() as f32 * tile_size,
        );
        info!(
            "Loaded level {}x{}: {} platforms replaced by {}",
            grid.row_count(),
            grid.col_count(),
            stale.len(),
            spawned
        );

        match self.world.get_mut::<Level>(self.level) {
            Some(mut level) => {
                level.grid = grid;
                level.tile_size = tile_size;
            }
            None => {
                self.level = self.world.spawn(Level::new(grid, tile_size)).id();
            }
        }

        if let Some(mut pos) = self.world.get_mut::<Position>(self.player) {
            *pos = position;
        }
        if let Some(mut velocity) = self.world.get_mut::<Velocity>(self.player) {
            *velocity = Velocity::zero();
        }
        if let Some(mut player) = self.world.get_mut::<Player>(self.player) {
            player.reset_motion();
        }
        if let Some(mut render) = self.world.get_mut::<Render>(self.player) {
            render.set_animation(AnimationState::Idle);
        }

        *self.world.resource_mut::<Camera2D>() =
            centered_camera(&position, (width, height), viewport, level_size);
        self.accumulator = 0.0;
        self.projection_schedule.run(&mut self.world);
    }

    // --------------- Frame loop ---------------

    /// Replace the held-key snapshot read by the next step.
    pub fn set_keys_pressed<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.world.resource_mut::<InputState>().set_pressed(keys);
    }

    /// Run exactly one simulation step. `dt` (seconds) drives action timers.
    pub fn update(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update_schedule.run(&mut self.world);
        trace!(
            "step {} done",
            self.world.resource::<WorldTime>().frame_count
        );
    }

    /// Run as many fixed steps as `elapsed` seconds allow and return how many
    /// ran. At most `max_steps` run per call; time beyond that is dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let (step, max_steps) = {
            let config = self.world.resource::<EngineConfig>();
            (config.fixed_step, config.max_steps.max(1))
        };
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut steps = 0;
        while self.accumulator >= step && steps < max_steps {
            self.update(step);
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            debug!(
                "Dropping {:.3}s of simulation after {} steps",
                self.accumulator, steps
            );
            self.accumulator = 0.0;
        }
        steps
    }

    /// Camera-adjusted draw records from the last step or load.
    pub fn render(&self) -> Vec<DrawRecord> {
        self.world.resource::<DrawList>().records.clone()
    }

    // --------------- Tunables ---------------

    pub fn set_gravity(&mut self, gravity: f32) {
        self.world.resource_mut::<EngineConfig>().gravity = gravity;
    }

    pub fn set_jump_strength(&mut self, jump_strength: f32) {
        self.world.resource_mut::<EngineConfig>().jump_strength = jump_strength;
        if let Some(mut player) = self.world.get_mut::<Player>(self.player) {
            player.jump_strength = jump_strength;
        }
    }

    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.world.resource_mut::<EngineConfig>().move_speed = move_speed;
        if let Some(mut player) = self.world.get_mut::<Player>(self.player) {
            player.move_speed = move_speed;
        }
    }

    /// Resize the player's box. Takes effect on the next step.
    pub fn set_player_size(&mut self, width: f32, height: f32) {
        {
            let mut config = self.world.resource_mut::<EngineConfig>();
            config.player_width = width;
            config.player_height = height;
        }
        if let Some(mut render) = self.world.get_mut::<Render>(self.player) {
            render.width = width;
            render.height = height;
        }
        if let Some(mut collision) = self.world.get_mut::<Collision>(self.player) {
            collision.width = width;
            collision.height = height;
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.world
            .resource_mut::<EngineConfig>()
            .set_viewport(width, height);
    }

    pub fn gravity(&self) -> f32 {
        self.config().gravity
    }

    pub fn jump_strength(&self) -> f32 {
        self.player().map_or(self.config().jump_strength, |p| p.jump_strength)
    }

    pub fn move_speed(&self) -> f32 {
        self.player().map_or(self.config().move_speed, |p| p.move_speed)
    }

    pub fn player_size(&self) -> (f32, f32) {
        self.player_render()
            .map_or((self.config().player_width, self.config().player_height), |r| {
                (r.width, r.height)
            })
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.config().viewport()
    }

    // --------------- Read access ---------------

    pub fn config(&self) -> &EngineConfig {
        self.world.resource::<EngineConfig>()
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.get::<Player>(self.player)
    }

    pub fn player_position(&self) -> Option<Position> {
        self.world.get::<Position>(self.player).copied()
    }

    pub fn player_velocity(&self) -> Option<Velocity> {
        self.world.get::<Velocity>(self.player).copied()
    }

    pub fn player_render(&self) -> Option<&Render> {
        self.world.get::<Render>(self.player)
    }

    pub fn level(&self) -> Option<&Level> {
        self.world.get::<Level>(self.level)
    }

    pub fn grid(&self) -> Option<&LevelGrid> {
        self.level().map(|l| &l.grid)
    }

    pub fn camera(&self) -> Camera2D {
        *self.world.resource::<Camera2D>()
    }

    pub fn time(&self) -> WorldTime {
        *self.world.resource::<WorldTime>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for debug tooling; edits show up on the next step.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
