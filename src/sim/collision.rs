//! Collision tests for lane-space geometry
//!
//! Player bullets use a cheap box test against enemy hit-boxes. Enemy bullets
//! move far enough per frame to skip over the small player hit-circle, so they
//! are swept: the segment from last frame's position to this frame's is tested
//! against the circle.

use glam::Vec2;

/// Check whether the segment `a -> b` passes within `radius` of `center`
///
/// A degenerate segment (a == b) falls back to a point-in-circle test.
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let seg = b - a;
    let len_sq = seg.length_squared();

    let closest = if len_sq < 1e-12 {
        a
    } else {
        let t = ((center - a).dot(seg) / len_sq).clamp(0.0, 1.0);
        a + seg * t
    };

    closest.distance_squared(center) <= radius * radius
}

/// Box test between a bullet and an enemy hit-box
///
/// The enemy is `half_width` wide on each side; vertically the bullet must be
/// within `eps_y` of the enemy's center line.
#[inline]
pub fn bullet_overlaps_enemy(
    bullet_pos: Vec2,
    bullet_radius: f32,
    enemy_pos: Vec2,
    half_width: f32,
    eps_y: f32,
) -> bool {
    (bullet_pos.x - enemy_pos.x).abs() < half_width + bullet_radius
        && (bullet_pos.y - enemy_pos.y).abs() < eps_y
}

/// Rectangular pickup tolerance around the player
#[inline]
pub fn within_pickup_range(item_pos: Vec2, player_pos: Vec2, dx: f32, dy: f32) -> bool {
    (item_pos.x - player_pos.x).abs() < dx && (item_pos.y - player_pos.y).abs() < dy
}

/// Whether a point lies inside the lane area expanded by the given margins
#[inline]
pub fn in_bounds(pos: Vec2, min: Vec2, max: Vec2) -> bool {
    pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
}
