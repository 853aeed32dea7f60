//! Tile collision resolution.
//!
//! Moving bodies (entities with a [`Velocity`]) are resolved against the
//! [`Level`] grid; static tiles are only targets. Resolution is two-phase:
//! [`resolve`] computes the corrected state from a snapshot of the body, then
//! [`collision_system`] commits it, so no entity is written while another is
//! being read.
//!
//! # Order of a step
//!
//! 1. Horizontal sweep using the previous vertical extent.
//! 2. Vertical sweep using the corrected x. Solid tiles stop bodies from
//!    above and below; one-way tiles only stop bodies falling onto them.
//! 3. Damaging tiles overlapping the final box revert the move and hurt.
//! 4. Clamp to the level bounds.
//! 5. Re-check what is under the feet; this decides `is_grounded`.
//!
//! Sweeps cover every cell between the old and the new position, so fast
//! bodies cannot skip a row or column in one step.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::collision::Collision;
use crate::components::level::{Level, Tile};
use crate::components::player::Player;
use crate::components::position::Position;
use crate::components::render::Render;
use crate::components::velocity::Velocity;

/// How far (pixels) the feet may sink into a solid tile and still count as
/// standing on it.
pub const GROUND_TOLERANCE: f32 = 5.0;

const EPSILON: f32 = 1e-3;

/// Snapshot of a moving body before this step's move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
}

/// Corrected state of a body after this step's move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Authoritative grounded flag from the final re-check.
    pub grounded: bool,
    /// The vertical sweep snapped the body onto a tile top.
    pub landed: bool,
    /// The vertical sweep stopped the body under a solid tile.
    pub bumped_head: bool,
    /// The body touched a damaging tile and was reverted.
    pub hurt: bool,
}

fn tile_at(level: &Level, row: usize, col: usize) -> Tile {
    level.grid.get(row, col).unwrap_or_default()
}

/// Resolve one body against the level grid.
pub fn resolve(body: Body, level: &Level) -> Resolution {
    let ts = level.tile_size;
    let (w, h) = (body.width, body.height);
    let mut out = Resolution {
        x: body.x + body.vx,
        y: body.y,
        vx: body.vx,
        vy: body.vy,
        ..Default::default()
    };

    // Horizontal pass, previous vertical extent
    if body.vx != 0.0 {
        let cols = level.col_span(body.x.min(out.x), body.x.max(out.x) + w);
        for row in level.row_span(body.y, body.y + h) {
            for col in cols.clone() {
                if !tile_at(level, row, col).is_solid() {
                    continue;
                }
                let (left, _) = level.cell_origin(row, col);
                let right = left + ts;
                if body.x + w <= left + EPSILON && out.x + w > left {
                    out.x = left - w;
                    out.vx = 0.0;
                } else if body.x >= right - EPSILON && out.x < right {
                    out.x = right;
                    out.vx = 0.0;
                }
            }
        }
    }

    // Vertical pass, corrected horizontal extent
    out.y = body.y + body.vy;
    let old_top = body.y;
    let old_bottom = body.y + h;
    let cols = level.col_span(out.x, out.x + w);
    for row in level.row_span(old_top.min(out.y), old_top.max(out.y) + h) {
        let (_, top) = level.cell_origin(row, 0);
        let bottom = top + ts;
        for col in cols.clone() {
            let tile = tile_at(level, row, col);
            let stops_fall = tile.is_solid() || (tile.is_one_way() && body.vy >= 0.0);
            if stops_fall && old_bottom <= top + EPSILON && out.y + h >= top {
                out.y = top - h;
                out.vy = 0.0;
                out.landed = true;
            } else if tile.is_solid() && old_top >= bottom - EPSILON && out.y <= bottom {
                out.y = bottom;
                out.vy = 0.0;
                out.bumped_head = true;
            }
        }
    }

    // Damaging tiles revert the whole move
    let cols = level.col_span(out.x, out.x + w);
    let burned = level
        .row_span(out.y, out.y + h)
        .any(|row| cols.clone().any(|col| tile_at(level, row, col).is_damaging()));
    if burned {
        out.x = body.x;
        out.y = body.y;
        out.vy = 0.0;
        out.landed = false;
        out.hurt = true;
    }

    // World bounds
    let (level_w, level_h) = (level.width_px(), level.height_px());
    if out.x < 0.0 {
        out.x = 0.0;
        out.vx = 0.0;
    } else if out.x + w > level_w {
        out.x = (level_w - w).max(0.0);
        out.vx = 0.0;
    }
    if out.y + h >= level_h {
        out.y = level_h - h;
        out.vy = 0.0;
    }
    if out.y < 0.0 {
        out.y = 0.0;
        out.vy = 0.0;
    }

    out.grounded = is_supported(level, out.x, out.y, w, h, out.vy);
    out
}

/// Whether a box rests on the level floor or on a tile under its feet.
fn is_supported(level: &Level, x: f32, y: f32, w: f32, h: f32, vy: f32) -> bool {
    let bottom = y + h;
    if bottom >= level.height_px() - EPSILON {
        return true;
    }
    let cols = level.col_span(x, x + w);
    for row in level.row_span(bottom - GROUND_TOLERANCE - EPSILON, bottom + EPSILON) {
        let (_, top) = level.cell_origin(row, 0);
        if top > bottom + EPSILON || bottom > top + GROUND_TOLERANCE {
            continue;
        }
        for col in cols.clone() {
            let tile = tile_at(level, row, col);
            if tile.is_solid() {
                return true;
            }
            // one-way tiles only hold a body resting exactly on top
            if tile.is_one_way() && vy >= 0.0 && bottom <= top + EPSILON {
                return true;
            }
        }
    }
    false
}

/// Integrate and resolve every moving body against the level.
///
/// Box size comes from [`Render`] when present, else from [`Collision`].
/// Writes position, velocity, and for players the grounded flag and damage.
pub fn collision_system(
    mut bodies: Query<(
        Entity,
        &mut Position,
        &mut Velocity,
        &Collision,
        Option<&Render>,
        Option<&mut Player>,
    )>,
    levels: Query<&Level>,
) {
    let Ok(level) = levels.single() else {
        return;
    };

    for (entity, mut position, mut velocity, collision, render, player) in bodies.iter_mut() {
        if !collision.is_collidable {
            continue;
        }
        let (width, height) = render.map_or((collision.width, collision.height), |r| {
            (r.width, r.height)
        });
        let body = Body {
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            width,
            height,
        };

        let res = resolve(body, level);

        position.x = res.x;
        position.y = res.y;
        velocity.x = res.vx;
        velocity.y = res.vy;

        if res.landed {
            trace!("{:?} landed at ({}, {})", entity, res.x, res.y);
        }
        if res.hurt {
            debug!("{:?} touched a damaging tile, move reverted", entity);
        }

        if let Some(mut player) = player {
            player.is_grounded = res.grounded;
            if res.hurt {
                player.hurt.request();
            }
        }
    }
}
