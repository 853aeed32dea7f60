//! Player state: movement tuning, grounding, jump budget and action timers.
//!
//! Input writes intent (`wants_to_jump`, [`ActionTimer::wants`]); the game
//! logic system arbitrates it. Every action runs on a countdown measured in
//! the same unit as the step delta (seconds), so overlapping key changes can
//! never leave a pending callback behind.

use bevy_ecs::prelude::Component;

/// Maximum number of jumps before the player has to land again.
pub const MAX_JUMPS: u8 = 2;

/// Default duration of every timed action, in seconds.
pub const DEFAULT_ACTION_DURATION: f32 = 0.4;

/// The five timed actions a player can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Attack,
    Climb,
    Push,
    Throw,
    Hurt,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Attack,
        Action::Climb,
        Action::Push,
        Action::Throw,
        Action::Hurt,
    ];
}

/// Intent flag, active flag and countdown for one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionTimer {
    /// Set by input (or by damage for `Hurt`) while the action is requested.
    pub wants: bool,
    pub active: bool,
    /// Seconds left before the action ends.
    pub remaining: f32,
    /// Seconds an action lasts once started.
    pub duration: f32,
}

impl ActionTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            wants: false,
            active: false,
            remaining: 0.0,
            duration,
        }
    }

    /// Request the action and raise its flag right away.
    ///
    /// The countdown itself is loaded by [`tick`](Self::tick).
    pub fn request(&mut self) {
        self.wants = true;
        self.active = true;
    }

    /// Advance the countdown by `dt`, then start the action if it is wanted
    /// and not already running.
    pub fn tick(&mut self, dt: f32) {
        if self.active {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.active = false;
            }
        }
        if self.wants && self.remaining <= 0.0 {
            self.active = true;
            self.remaining = self.duration;
        }
    }

    /// Drop any running or requested action.
    pub fn reset(&mut self) {
        self.wants = false;
        self.active = false;
        self.remaining = 0.0;
    }
}

impl Default for ActionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_DURATION)
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Player {
    /// Upward speed applied when a jump is honored, in pixels per step.
    pub jump_strength: f32,
    /// Horizontal speed while a direction key is held, in pixels per step.
    pub move_speed: f32,
    pub is_grounded: bool,
    pub is_jumping: bool,
    /// Jumps spent since the last landing, `0..=MAX_JUMPS`.
    pub jumps: u8,
    pub wants_to_jump: bool,
    pub attack: ActionTimer,
    pub climb: ActionTimer,
    pub push: ActionTimer,
    pub throw: ActionTimer,
    pub hurt: ActionTimer,
}

impl Player {
    pub fn new(jump_strength: f32, move_speed: f32) -> Self {
        Self {
            jump_strength,
            move_speed,
            is_grounded: false,
            is_jumping: false,
            jumps: 0,
            wants_to_jump: false,
            attack: ActionTimer::default(),
            climb: ActionTimer::default(),
            push: ActionTimer::default(),
            throw: ActionTimer::default(),
            hurt: ActionTimer::default(),
        }
    }

    /// Builder: set one action's duration.
    pub fn with_duration(mut self, action: Action, seconds: f32) -> Self {
        self.action_mut(action).duration = seconds;
        self
    }

    pub fn action_mut(&mut self, action: Action) -> &mut ActionTimer {
        match action {
            Action::Attack => &mut self.attack,
            Action::Climb => &mut self.climb,
            Action::Push => &mut self.push,
            Action::Throw => &mut self.throw,
            Action::Hurt => &mut self.hurt,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.active
    }
    pub fn is_climbing(&self) -> bool {
        self.climb.active
    }
    pub fn is_pushing(&self) -> bool {
        self.push.active
    }
    pub fn is_throwing(&self) -> bool {
        self.throw.active
    }
    pub fn is_hurt(&self) -> bool {
        self.hurt.active
    }

    /// Whether another jump may be started right now.
    pub fn can_jump(&self) -> bool {
        self.is_grounded || self.jumps < MAX_JUMPS
    }

    /// Clear kinematic flags and running actions after the player is
    /// teleported (level load).
    pub fn reset_motion(&mut self) {
        self.is_grounded = false;
        self.is_jumping = false;
        self.jumps = 0;
        self.wants_to_jump = false;
        for action in Action::ALL {
            self.action_mut(action).reset();
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(10.0, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    #[test]
    fn test_timer_idle_without_intent() {
        let mut t = ActionTimer::new(0.4);
        t.tick(DT);
        assert!(!t.active);
        assert_eq!(t.remaining, 0.0);
    }

    #[test]
    fn test_timer_starts_with_full_duration() {
        let mut t = ActionTimer::new(0.4);
        t.wants = true;
        t.tick(DT);
        assert!(t.active);
        assert_eq!(t.remaining, 0.4);
    }

    #[test]
    fn test_timer_runs_out_after_release() {
        let mut t = ActionTimer::new(0.4);
        t.wants = true;
        t.tick(DT);
        t.wants = false;
        t.tick(DT);
        t.tick(DT);
        assert!(t.active);
        t.tick(DT);
        t.tick(DT);
        t.tick(DT);
        assert!(!t.active);
    }

    #[test]
    fn test_timer_does_not_restart_while_running() {
        let mut t = ActionTimer::new(0.4);
        t.wants = true;
        t.tick(DT);
        t.tick(DT);
        assert!((t.remaining - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_request_raises_flag_before_tick() {
        let mut t = ActionTimer::new(0.4);
        t.request();
        assert!(t.active);
        t.tick(DT);
        assert!(t.active);
        assert_eq!(t.remaining, 0.4);
    }

    #[test]
    fn test_player_with_duration() {
        let p = Player::new(10.0, 5.0).with_duration(Action::Hurt, 1.5);
        assert_eq!(p.hurt.duration, 1.5);
        assert_eq!(p.attack.duration, DEFAULT_ACTION_DURATION);
    }

    #[test]
    fn test_can_jump_budget() {
        let mut p = Player::default();
        assert!(p.can_jump());
        p.jumps = 1;
        assert!(p.can_jump());
        p.jumps = MAX_JUMPS;
        assert!(!p.can_jump());
        p.is_grounded = true;
        assert!(p.can_jump());
    }

    #[test]
    fn test_action_accessors_match_fields() {
        let mut p = Player::default();
        for action in Action::ALL {
            p.action_mut(action).active = true;
        }
        assert!(p.is_attacking());
        assert!(p.is_climbing());
        assert!(p.is_pushing());
        assert!(p.is_throwing());
        assert!(p.is_hurt());
    }

    #[test]
    fn test_reset_motion_clears_jumps_and_actions() {
        let mut p = Player::default().with_duration(Action::Hurt, 1.0);
        p.is_jumping = true;
        p.jumps = 2;
        p.hurt.request();
        p.hurt.tick(0.1);
        p.attack.wants = true;
        p.reset_motion();
        assert_eq!(p.jumps, 0);
        assert!(!p.is_jumping);
        assert!(!p.is_hurt());
        assert!(!p.attack.wants);
        assert_eq!(p.hurt.remaining, 0.0);
        // durations survive the reset
        assert_eq!(p.hurt.duration, 1.0);
    }
}
