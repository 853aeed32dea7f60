//! Engine configuration resource.
//!
//! Holds the tunables the simulation reads every step (gravity, tile size,
//! player box and speeds, viewport) plus the timestep, action durations and
//! key bindings. Every option has a default, so an engine can be built from
//! [`EngineConfig::default`] alone. Values can be overridden from an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity = 0.5
//! fixed_step = 0.016666668
//! max_steps = 5
//!
//! [level]
//! tile_size = 32
//!
//! [player]
//! width = 32
//! height = 32
//! jump_strength = 10
//! move_speed = 5
//!
//! [viewport]
//! width = 960
//! height = 640
//!
//! [actions]
//! attack = 0.4
//! hurt = 0.4
//!
//! [keys]
//! jump = ArrowUp
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::player::{Action, DEFAULT_ACTION_DURATION};
use crate::resources::input::{InputAction, KeyBindings};

/// Default safe values for startup
const DEFAULT_GRAVITY: f32 = 0.5;
const DEFAULT_TILE_SIZE: f32 = 32.0;
const DEFAULT_PLAYER_WIDTH: f32 = 32.0;
const DEFAULT_PLAYER_HEIGHT: f32 = 32.0;
const DEFAULT_JUMP_STRENGTH: f32 = 10.0;
const DEFAULT_MOVE_SPEED: f32 = 5.0;
const DEFAULT_VIEWPORT_WIDTH: f32 = 960.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 640.0;
const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
const DEFAULT_MAX_STEPS: u32 = 5;
const DEFAULT_CONFIG_PATH: &str = "./gridrunner.ini";

/// Duration in seconds of each timed action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionDurations {
    pub attack: f32,
    pub climb: f32,
    pub push: f32,
    pub throw: f32,
    pub hurt: f32,
}

impl Default for ActionDurations {
    fn default() -> Self {
        Self {
            attack: DEFAULT_ACTION_DURATION,
            climb: DEFAULT_ACTION_DURATION,
            push: DEFAULT_ACTION_DURATION,
            throw: DEFAULT_ACTION_DURATION,
            hurt: DEFAULT_ACTION_DURATION,
        }
    }
}

impl ActionDurations {
    pub fn get(&self, action: Action) -> f32 {
        match action {
            Action::Attack => self.attack,
            Action::Climb => self.climb,
            Action::Push => self.push,
            Action::Throw => self.throw,
            Action::Hurt => self.hurt,
        }
    }

    pub fn set(&mut self, action: Action, seconds: f32) {
        match action {
            Action::Attack => self.attack = seconds,
            Action::Climb => self.climb = seconds,
            Action::Push => self.push = seconds,
            Action::Throw => self.throw = seconds,
            Action::Hurt => self.hurt = seconds,
        }
    }
}

fn action_config_key(action: Action) -> &'static str {
    match action {
        Action::Attack => "attack",
        Action::Climb => "climb",
        Action::Push => "push",
        Action::Throw => "throw",
        Action::Hurt => "hurt",
    }
}

/// Engine configuration resource.
///
/// Inserted into the world by [`Engine`](crate::engine::Engine). Systems read
/// `gravity` and the viewport from it each step, so live edits take effect on
/// the next update.
#[derive(Resource, Debug, Clone)]
pub struct EngineConfig {
    /// Added to vertical velocity every step, in pixels per step squared.
    pub gravity: f32,
    /// Size of one level cell in pixels.
    pub tile_size: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub jump_strength: f32,
    pub move_speed: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Seconds simulated by one step when driven through `Engine::advance`.
    pub fixed_step: f32,
    /// Upper bound on steps run by a single `Engine::advance` call.
    pub max_steps: u32,
    pub action_durations: ActionDurations,
    pub key_bindings: KeyBindings,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            tile_size: DEFAULT_TILE_SIZE,
            player_width: DEFAULT_PLAYER_WIDTH,
            player_height: DEFAULT_PLAYER_HEIGHT,
            jump_strength: DEFAULT_JUMP_STRENGTH,
            move_speed: DEFAULT_MOVE_SPEED,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            fixed_step: DEFAULT_FIXED_STEP,
            max_steps: DEFAULT_MAX_STEPS,
            action_durations: ActionDurations::default(),
            key_bindings: KeyBindings::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: gravity={}, tile={}, player {}x{}, jump={}, speed={}, viewport {}x{}",
            self.gravity,
            self.tile_size,
            self.player_width,
            self.player_height,
            self.jump_strength,
            self.move_speed,
            self.viewport_width,
            self.viewport_height
        );

        Ok(())
    }

    /// Apply configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            config.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };

        // [physics] section
        if let Some(gravity) = float("physics", "gravity") {
            self.gravity = gravity;
        }
        if let Some(step) = float("physics", "fixed_step") {
            if step > 0.0 {
                self.fixed_step = step;
            }
        }
        if let Some(steps) = config.getuint("physics", "max_steps").ok().flatten() {
            self.max_steps = steps as u32;
        }

        // [level] section
        if let Some(size) = float("level", "tile_size") {
            if size > 0.0 {
                self.tile_size = size;
            }
        }

        // [player] section
        if let Some(width) = float("player", "width") {
            self.player_width = width;
        }
        if let Some(height) = float("player", "height") {
            self.player_height = height;
        }
        if let Some(jump) = float("player", "jump_strength") {
            self.jump_strength = jump;
        }
        if let Some(speed) = float("player", "move_speed") {
            self.move_speed = speed;
        }

        // [viewport] section
        if let Some(width) = float("viewport", "width") {
            self.viewport_width = width;
        }
        if let Some(height) = float("viewport", "height") {
            self.viewport_height = height;
        }

        // [actions] section
        for action in Action::ALL {
            if let Some(seconds) = float("actions", action_config_key(action)) {
                self.action_durations.set(action, seconds);
            }
        }

        // [keys] section
        for action in InputAction::ALL {
            if let Some(key) = config.get("keys", action.config_key()) {
                self.key_bindings.bind(action, key);
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [physics] section
        config.set("physics", "gravity", Some(self.gravity.to_string()));
        config.set("physics", "fixed_step", Some(self.fixed_step.to_string()));
        config.set("physics", "max_steps", Some(self.max_steps.to_string()));

        // [level] section
        config.set("level", "tile_size", Some(self.tile_size.to_string()));

        // [player] section
        config.set("player", "width", Some(self.player_width.to_string()));
        config.set("player", "height", Some(self.player_height.to_string()));
        config.set(
            "player",
            "jump_strength",
            Some(self.jump_strength.to_string()),
        );
        config.set("player", "move_speed", Some(self.move_speed.to_string()));

        // [viewport] section
        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        // [actions] section
        for action in Action::ALL {
            config.set(
                "actions",
                action_config_key(action),
                Some(self.action_durations.get(action).to_string()),
            );
        }

        // [keys] section
        for action in InputAction::ALL {
            config.set(
                "keys",
                action.config_key(),
                Some(self.key_bindings.key_for(action).to_string()),
            );
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Set the viewport size.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Get the viewport size.
    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }
}
