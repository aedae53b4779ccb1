//! Polygon helpers for panel outlines and holes.
//!
//! Polygons are closed implicitly: the first point is never repeated at
//! the end.

use boxkit_core::{Point2, EPSILON};

/// Append a point unless it coincides with the last one.
pub fn push_unique(path: &mut Vec<Point2>, point: Point2) {
    if let Some(last) = path.last() {
        if last.approx_eq(&point) {
            return;
        }
    }
    path.push(point);
}

/// Shoelace area; negative for clockwise polygons in a y-up frame.
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn is_clockwise(points: &[Point2]) -> bool {
    signed_area(points) < 0.0
}

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Distance from `p` to segment `ab`.
pub fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 < EPSILON * EPSILON {
        return p.distance(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(&Point2::new(a.x + t * dx, a.y + t * dy))
}

pub fn on_boundary(p: Point2, polygon: &[Point2]) -> bool {
    edges(polygon).any(|(a, b)| distance_to_segment(p, a, b) < EPSILON)
}

/// Even-odd point-in-polygon test. Points on the boundary count as
/// outside.
pub fn contains_point(polygon: &[Point2], p: Point2) -> bool {
    if polygon.len() < 3 || on_boundary(p, polygon) {
        return false;
    }
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(p: Point2, a: Point2, b: Point2) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether segments `ab` and `cd` share any point, touching included.
pub fn segments_intersect(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    let straddles = |x: f64, y: f64| (x > EPSILON && y < -EPSILON) || (x < -EPSILON && y > EPSILON);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(a, c, d))
        || (d2.abs() <= EPSILON && on_segment(b, c, d))
        || (d3.abs() <= EPSILON && on_segment(c, a, b))
        || (d4.abs() <= EPSILON && on_segment(d, a, b))
}

pub fn edges(polygon: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// True if any two non-adjacent edges touch or cross, or the polygon
/// doubles back on itself.
pub fn has_self_intersection(polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return true;
    }
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[(i + 1) % n]);
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let (c, d) = (polygon[j], polygon[(j + 1) % n]);
            if adjacent {
                // Adjacent edges only share their joint vertex unless they
                // fold back over each other.
                let (shared, far_self, far_other) = if j == i + 1 { (b, a, d) } else { (a, b, c) };
                let folds = cross(shared, far_self, far_other).abs() <= EPSILON
                    && (far_self.x - shared.x) * (far_other.x - shared.x)
                        + (far_self.y - shared.y) * (far_other.y - shared.y)
                        > 0.0;
                if folds {
                    return true;
                }
                continue;
            }
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Every vertex of `inner` lies strictly inside `outer` and no edges touch.
pub fn strictly_inside(inner: &[Point2], outer: &[Point2]) -> bool {
    if !inner.iter().all(|&p| contains_point(outer, p)) {
        return false;
    }
    !edges(inner).any(|(a, b)| edges(outer).any(|(c, d)| segments_intersect(a, b, c, d)))
}

/// Whether two polygons share any area or boundary point.
pub fn overlaps(a: &[Point2], b: &[Point2]) -> bool {
    edges(a).any(|(p, q)| edges(b).any(|(r, s)| segments_intersect(p, q, r, s)))
        || a.iter().any(|&p| contains_point(b, p))
        || b.iter().any(|&p| contains_point(a, p))
}

/// Drop duplicate and collinear vertices, including across the closing
/// edge.
pub fn simplify(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        push_unique(&mut out, p);
    }
    while out.len() > 1 && out[0].approx_eq(&out[out.len() - 1]) {
        out.pop();
    }

    let mut changed = true;
    while changed && out.len() > 3 {
        changed = false;
        let n = out.len();
        for i in 0..n {
            let prev = out[(i + n - 1) % n];
            let next = out[(i + 1) % n];
            let cur = out[i];
            let collinear = cross(prev, cur, next).abs() <= EPSILON;
            let forward = (cur.x - prev.x) * (next.x - cur.x) + (cur.y - prev.y) * (next.y - cur.y)
                >= 0.0;
            if collinear && forward {
                out.remove(i);
                changed = true;
                break;
            }
        }
    }
    out
}

/// Axis-aligned bounds as `(min, max)`.
pub fn bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}
