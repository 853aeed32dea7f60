//! Per-frame keyboard input resource.
//!
//! The presentation shell reports the set of keys currently held, by name
//! (`"ArrowLeft"`, `"Space"`, `"z"`, ...). [`InputState`] keeps that snapshot
//! together with the [`KeyBindings`] that map key names to gameplay actions.
//! Defaults use the arrow keys for movement, space to jump, and `z c x v h`
//! for attack, climb, push, throw and hurt.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

/// Gameplay actions that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Left,
    Right,
    Jump,
    Attack,
    Climb,
    Push,
    Throw,
    Hurt,
}

impl InputAction {
    pub const ALL: [InputAction; 8] = [
        InputAction::Left,
        InputAction::Right,
        InputAction::Jump,
        InputAction::Attack,
        InputAction::Climb,
        InputAction::Push,
        InputAction::Throw,
        InputAction::Hurt,
    ];

    /// Name used for this action in the `[keys]` config section.
    pub fn config_key(&self) -> &'static str {
        match self {
            InputAction::Left => "left",
            InputAction::Right => "right",
            InputAction::Jump => "jump",
            InputAction::Attack => "attack",
            InputAction::Climb => "climb",
            InputAction::Push => "push",
            InputAction::Throw => "throw",
            InputAction::Hurt => "hurt",
        }
    }
}

/// Key name bound to each action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub attack: String,
    pub climb: String,
    pub push: String,
    pub throw: String,
    pub hurt: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
            jump: "Space".to_string(),
            attack: "z".to_string(),
            climb: "c".to_string(),
            push: "x".to_string(),
            throw: "v".to_string(),
            hurt: "h".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: InputAction) -> &str {
        match action {
            InputAction::Left => &self.left,
            InputAction::Right => &self.right,
            InputAction::Jump => &self.jump,
            InputAction::Attack => &self.attack,
            InputAction::Climb => &self.climb,
            InputAction::Push => &self.push,
            InputAction::Throw => &self.throw,
            InputAction::Hurt => &self.hurt,
        }
    }

    pub fn bind(&mut self, action: InputAction, key: impl Into<String>) {
        let key = key.into();
        match action {
            InputAction::Left => self.left = key,
            InputAction::Right => self.right = key,
            InputAction::Jump => self.jump = key,
            InputAction::Attack => self.attack = key,
            InputAction::Climb => self.climb = key,
            InputAction::Push => self.push = key,
            InputAction::Throw => self.throw = key,
            InputAction::Hurt => self.hurt = key,
        }
    }
}

/// Resource capturing the raw key snapshot consulted by the input system.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    /// Names of the keys held right now.
    pub pressed: FxHashSet<String>,
    pub bindings: KeyBindings,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            pressed: FxHashSet::default(),
            bindings,
        }
    }

    /// Replace the whole snapshot.
    pub fn set_pressed<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pressed = keys.into_iter().map(Into::into).collect();
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    /// Whether the key bound to `action` is held.
    pub fn is_active(&self, action: InputAction) -> bool {
        self.is_key_down(self.bindings.key_for(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputstate_default_all_inactive() {
        let input = InputState::default();
        for action in InputAction::ALL {
            assert!(!input.is_active(action));
        }
    }

    #[test]
    fn test_default_key_bindings() {
        let b = KeyBindings::default();
        assert_eq!(b.key_for(InputAction::Left), "ArrowLeft");
        assert_eq!(b.key_for(InputAction::Right), "ArrowRight");
        assert_eq!(b.key_for(InputAction::Jump), "Space");
        assert_eq!(b.key_for(InputAction::Attack), "z");
        assert_eq!(b.key_for(InputAction::Climb), "c");
        assert_eq!(b.key_for(InputAction::Push), "x");
        assert_eq!(b.key_for(InputAction::Throw), "v");
        assert_eq!(b.key_for(InputAction::Hurt), "h");
    }

    #[test]
    fn test_set_pressed_replaces_snapshot() {
        let mut input = InputState::default();
        input.set_pressed(["ArrowLeft", "z"]);
        assert!(input.is_active(InputAction::Left));
        assert!(input.is_active(InputAction::Attack));
        input.set_pressed(["Space"]);
        assert!(!input.is_active(InputAction::Left));
        assert!(input.is_active(InputAction::Jump));
    }

    #[test]
    fn test_rebinding() {
        let mut input = InputState::default();
        input.bindings.bind(InputAction::Jump, "ArrowUp");
        input.set_pressed(["Space"]);
        assert!(!input.is_active(InputAction::Jump));
        input.set_pressed(["ArrowUp"]);
        assert!(input.is_active(InputAction::Jump));
    }
}
