use bevy_ecs::prelude::Component;

use crate::components::level::Tile;

/// Axis-aligned collision box.
///
/// Static tiles carry the [`Tile`] they were spawned from; moving bodies have
/// `tile: None` and take their box size from
/// [`Render`](super::render::Render).
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Collision {
    pub is_collidable: bool,
    pub width: f32,
    pub height: f32,
    pub tile: Option<Tile>,
}

impl Collision {
    /// Collider for a moving body.
    pub fn body(width: f32, height: f32) -> Self {
        Self {
            is_collidable: true,
            width,
            height,
            tile: None,
        }
    }

    /// Collider for a static tile. Only blocking tiles are collidable.
    pub fn tile(tile: Tile, tile_size: f32) -> Self {
        Self {
            is_collidable: tile.is_solid() || tile.is_one_way(),
            width: tile_size,
            height: tile_size,
            tile: Some(tile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_collider_flags() {
        assert!(Collision::tile(Tile::Ground, 32.0).is_collidable);
        assert!(Collision::tile(Tile::OneWay, 32.0).is_collidable);
        assert!(!Collision::tile(Tile::Lava, 32.0).is_collidable);
        assert_eq!(Collision::tile(Tile::Water, 16.0).width, 16.0);
    }

    #[test]
    fn test_body_collider_has_no_tile() {
        let c = Collision::body(20.0, 40.0);
        assert!(c.is_collidable);
        assert_eq!((c.width, c.height), (20.0, 40.0));
        assert_eq!(c.tile, None);
    }
}
