//! Camera follow and render projection.
//!
//! Nothing here draws. [`camera_follow_system`] keeps the [`Camera2D`]
//! resource on the player; [`render_projection_system`] turns every visible
//! entity into a camera-relative [`DrawRecord`] for the presentation shell.

use bevy_ecs::prelude::*;

use crate::components::collision::Collision;
use crate::components::level::Level;
use crate::components::player::Player;
use crate::components::position::Position;
use crate::components::render::Render;
use crate::resources::camera2d::Camera2D;
use crate::resources::drawlist::{DrawList, DrawRecord};
use crate::resources::engineconfig::EngineConfig;

/// Move the camera along one axis so `[lo, hi)` stays inside the dead zone,
/// then keep the view inside `[0, level)`.
///
/// The dead zone starts a quarter of the view in from each edge. The camera
/// only moves by the distance the box has left it.
pub fn follow_axis(camera: f32, lo: f32, hi: f32, view: f32, level: f32) -> f32 {
    let margin = view / 4.0;
    let mut cam = camera;
    if lo < cam + margin {
        cam = lo - margin;
    } else if hi > cam + view - margin {
        cam = hi - (view - margin);
    }
    clamp_axis(cam, view, level)
}

/// Keep one camera axis inside the level; a level smaller than the view pins
/// it at 0.
pub fn clamp_axis(camera: f32, view: f32, level: f32) -> f32 {
    camera.min(level - view).max(0.0)
}

/// Camera centered on a box, clamped to the level.
pub fn centered_camera(
    position: &Position,
    size: (f32, f32),
    view: (f32, f32),
    level: (f32, f32),
) -> Camera2D {
    Camera2D::new(
        clamp_axis(position.x + size.0 / 2.0 - view.0 / 2.0, view.0, level.0),
        clamp_axis(position.y + size.1 / 2.0 - view.1 / 2.0, view.1, level.1),
    )
}

/// Slide the camera to keep the player in the dead zone.
pub fn camera_follow_system(
    players: Query<(&Position, &Render), With<Player>>,
    levels: Query<&Level>,
    config: Res<EngineConfig>,
    mut camera: ResMut<Camera2D>,
) {
    let Ok((position, render)) = players.single() else {
        return;
    };
    let Ok(level) = levels.single() else {
        return;
    };
    let (view_w, view_h) = config.viewport();

    let x = follow_axis(
        camera.x,
        position.x,
        position.x + render.width,
        view_w,
        level.width_px(),
    );
    let y = follow_axis(
        camera.y,
        position.y,
        position.y + render.height,
        view_h,
        level.height_px(),
    );
    camera.x = x;
    camera.y = y;
}

/// Rebuild the draw list from every entity with a position and a render
/// record. Tiles come first, the player last.
pub fn render_projection_system(
    query: Query<(Entity, &Position, &Render, Option<&Collision>)>,
    camera: Res<Camera2D>,
    mut draw_list: ResMut<DrawList>,
) {
    let mut records: Vec<DrawRecord> = query
        .iter()
        .map(|(entity, position, render, collision)| DrawRecord {
            id: entity.to_bits(),
            x: position.x - camera.x,
            y: position.y - camera.y,
            width: render.width,
            height: render.height,
            direction: render.direction,
            animation_state: render.animation_state,
            tile: collision.and_then(|c| c.tile),
        })
        .collect();
    records.sort_by_key(|r| (r.tile.is_none(), r.id));
    draw_list.records = records;
}
