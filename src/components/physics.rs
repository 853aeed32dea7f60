use bevy_ecs::prelude::Component;

/// Marks an entity as taking part in gravity integration.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub affected_by_gravity: bool,
}

impl Physics {
    pub fn new(affected_by_gravity: bool) -> Self {
        Self {
            affected_by_gravity,
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(true)
    }
}
