//! Point-in-polygon containment

use glam::Vec2;

/// Even-odd ray casting test.
///
/// Casts a horizontal ray from `point` towards +x and counts edge crossings.
/// Works for any simple polygon, convex or not. Points exactly on an edge may
/// land either way.
///
/// Horizontal edges never straddle the ray, so the intersection division
/// never sees a zero denominator.
pub fn is_inside(point: Vec2, polygon: &[Vec2]) -> bool {
    let Some(&last) = polygon.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    for &curr in polygon {
        if (curr.y > point.y) != (prev.y > point.y) {
            let cross_x = (prev.x - curr.x) * (point.y - curr.y) / (prev.y - curr.y) + curr.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        prev = curr;
    }
    inside
}
