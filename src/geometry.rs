//! Planar geometry kernel
//!
//! Stateless helpers shared by every generation stage: polygon area and
//! centroid, half-plane tests, Sutherland–Hodgman clipping, uniform sampling
//! inside convex polygons and bisection clamping into a region.
//!
//! Polygons are plain vertex lists without a repeated closing vertex.

use glam::DVec2;

use crate::config::CLAMP_ITERATIONS;
use crate::random::SeededRandom;

/// Tolerance used for half-plane membership tests
pub const INSIDE_EPSILON: f64 = 1e-9;

/// Areas below this are treated as degenerate
pub const AREA_EPSILON: f64 = 1e-12;

/// The half-plane `a·x + b·y <= c`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HalfPlane {
    /// Half-plane `normal · p <= offset`
    pub fn new(normal: DVec2, offset: f64) -> Self {
        Self {
            a: normal.x,
            b: normal.y,
            c: offset,
        }
    }

    /// The closed opposite side `normal · p >= offset`
    pub fn complement(self) -> Self {
        Self {
            a: -self.a,
            b: -self.b,
            c: -self.c,
        }
    }

    /// Points closer to `site` than to `other`
    pub fn bisector(site: DVec2, other: DVec2) -> Self {
        let normal = other - site;
        Self::new(normal, (other.length_squared() - site.length_squared()) * 0.5)
    }

    #[inline]
    pub fn normal(&self) -> DVec2 {
        DVec2::new(self.a, self.b)
    }

    /// Signed violation: `<= 0` inside, `> 0` outside
    #[inline]
    pub fn eval(&self, point: DVec2) -> f64 {
        self.a * point.x + self.b * point.y - self.c
    }

    /// Euclidean distance from `point` to the boundary line, positive inside
    pub fn clearance(&self, point: DVec2) -> f64 {
        let len = self.normal().length();
        if len <= 0.0 {
            return f64::INFINITY;
        }
        -self.eval(point) / len
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// The board square `[0, size] × [0, size]`
    pub fn square(size: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::splat(size))
    }

    /// Counter-clockwise corner list
    pub fn polygon(&self) -> Vec<DVec2> {
        vec![
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// The four edge half-planes bounding the rectangle
    pub fn half_planes(&self) -> [HalfPlane; 4] {
        [
            HalfPlane::new(DVec2::new(-1.0, 0.0), -self.min.x),
            HalfPlane::new(DVec2::new(1.0, 0.0), self.max.x),
            HalfPlane::new(DVec2::new(0.0, -1.0), -self.min.y),
            HalfPlane::new(DVec2::new(0.0, 1.0), self.max.y),
        ]
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Signed shoelace area (positive for counter-clockwise order)
pub fn signed_area(polygon: &[DVec2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        twice += p.perp_dot(q);
    }
    twice * 0.5
}

/// Unsigned polygon area
pub fn polygon_area(polygon: &[DVec2]) -> f64 {
    signed_area(polygon).abs()
}

/// Area-weighted polygon centroid
///
/// Near-zero-area polygons fall back to their middle vertex. Returns `None`
/// only for an empty vertex list.
pub fn polygon_centroid(polygon: &[DVec2]) -> Option<DVec2> {
    let middle = *polygon.get(polygon.len() / 2)?;
    let area = signed_area(polygon);
    if area.abs() < AREA_EPSILON {
        return Some(middle);
    }
    let mut sum = DVec2::ZERO;
    for (i, &p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        sum += (p + q) * p.perp_dot(q);
    }
    let centroid = sum / (6.0 * area);
    if centroid.is_finite() {
        Some(centroid)
    } else {
        Some(middle)
    }
}

/// Half-plane membership with tolerance
#[inline]
pub fn is_inside(point: DVec2, plane: &HalfPlane, epsilon: f64) -> bool {
    plane.eval(point) <= epsilon
}

/// Membership in the intersection of several half-planes
pub fn is_inside_all(point: DVec2, planes: &[HalfPlane], epsilon: f64) -> bool {
    planes.iter().all(|plane| is_inside(point, plane, epsilon))
}

/// Point where segment `p → q` crosses the boundary line of `plane`
pub fn intersect_segment(p: DVec2, q: DVec2, plane: &HalfPlane) -> DVec2 {
    let fp = plane.eval(p);
    let fq = plane.eval(q);
    let denom = fp - fq;
    if denom.abs() < f64::EPSILON {
        return p;
    }
    p + (q - p) * (fp / denom)
}

/// Sutherland–Hodgman clipping against a sequence of half-planes
///
/// Returns `None` as soon as fewer than three vertices survive a step.
/// Vertices already inside every plane keep their order and starting point.
pub fn clip_polygon(polygon: &[DVec2], planes: &[HalfPlane]) -> Option<Vec<DVec2>> {
    let mut current = dedup_vertices(polygon);
    if current.len() < 3 {
        return None;
    }

    for plane in planes {
        let mut next = Vec::with_capacity(current.len() + 1);
        for (i, &p) in current.iter().enumerate() {
            let q = current[(i + 1) % current.len()];
            let p_in = is_inside(p, plane, INSIDE_EPSILON);
            let q_in = is_inside(q, plane, INSIDE_EPSILON);
            if p_in {
                next.push(p);
                if !q_in {
                    next.push(intersect_segment(p, q, plane));
                }
            } else if q_in {
                next.push(intersect_segment(p, q, plane));
            }
        }
        current = dedup_vertices(&next);
        if current.len() < 3 {
            return None;
        }
    }

    Some(current)
}

/// Drop consecutive duplicate vertices, including a repeated closing vertex
pub fn dedup_vertices(polygon: &[DVec2]) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(polygon.len());
    for &p in polygon {
        if out.last().map_or(true, |last| !same_point(*last, p)) {
            out.push(p);
        }
    }
    while out.len() > 1 && same_point(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

#[inline]
fn same_point(a: DVec2, b: DVec2) -> bool {
    a.distance_squared(b) <= INSIDE_EPSILON * INSIDE_EPSILON
}

/// Area-weighted triangle fan rooted at the first vertex of a convex polygon
///
/// Regions build one fan up front and sample from it many times.
#[derive(Debug, Clone)]
pub struct TriangleFan {
    triangles: Vec<[DVec2; 3]>,
    cumulative: Vec<f64>,
    fallback: DVec2,
}

impl TriangleFan {
    pub fn new(polygon: &[DVec2]) -> Self {
        let fallback = polygon_centroid(polygon).unwrap_or(DVec2::ZERO);
        let mut triangles = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0;
        if let Some(&root) = polygon.first() {
            for pair in polygon[1..].windows(2) {
                let tri = [root, pair[0], pair[1]];
                let area = polygon_area(&tri);
                if area <= AREA_EPSILON {
                    continue;
                }
                total += area;
                triangles.push(tri);
                cumulative.push(total);
            }
        }
        Self {
            triangles,
            cumulative,
            fallback,
        }
    }

    /// Total fan area
    pub fn area(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Uniform sample; consumes three draws whenever the fan has area
    pub fn sample(&self, rng: &mut SeededRandom) -> DVec2 {
        let total = self.area();
        if total <= 0.0 {
            return self.fallback;
        }
        let pick = rng.next_f64() * total;
        let idx = self
            .cumulative
            .partition_point(|&c| c < pick)
            .min(self.triangles.len() - 1);
        let [a, b, c] = self.triangles[idx];

        let mut u = rng.next_f64();
        let mut v = rng.next_f64();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        a + (b - a) * u + (c - a) * v
    }
}

/// Uniform sample inside a convex polygon
pub fn sample_uniform_in_convex_polygon(polygon: &[DVec2], rng: &mut SeededRandom) -> DVec2 {
    TriangleFan::new(polygon).sample(rng)
}

/// Force `point` inside the half-planes by bisecting toward an interior anchor
///
/// Runs exactly [`CLAMP_ITERATIONS`] steps when the point is outside, and
/// returns the last midpoint found inside (or the anchor itself).
pub fn clamp_to_region(point: DVec2, anchor: DVec2, planes: &[HalfPlane]) -> DVec2 {
    if is_inside_all(point, planes, INSIDE_EPSILON) {
        return point;
    }
    let mut inside = anchor;
    let mut outside = point;
    for _ in 0..CLAMP_ITERATIONS {
        let mid = (inside + outside) * 0.5;
        if is_inside_all(mid, planes, INSIDE_EPSILON) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    inside
}

/// Smallest clearance from `point` to any of the boundary lines
pub fn min_clearance(point: DVec2, planes: &[HalfPlane]) -> f64 {
    planes
        .iter()
        .map(|plane| plane.clearance(point))
        .fold(f64::INFINITY, f64::min)
}

/// True if two polygons are equal up to rotation of the starting vertex
pub fn same_cycle(a: &[DVec2], b: &[DVec2], tolerance: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    (0..b.len()).any(|offset| {
        a.iter()
            .enumerate()
            .all(|(i, p)| p.distance(b[(i + offset) % b.len()]) <= tolerance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<DVec2> {
        Rect::square(1.0).polygon()
    }

    #[test]
    fn test_area_and_centroid() {
        let square = Rect::square(2.0).polygon();
        assert!((polygon_area(&square) - 4.0).abs() < 1e-12);
        let c = polygon_centroid(&square).unwrap();
        assert!(c.distance(DVec2::new(1.0, 1.0)) < 1e-12);

        let clockwise: Vec<DVec2> = square.iter().rev().copied().collect();
        assert!(signed_area(&clockwise) < 0.0);
        assert!(polygon_centroid(&clockwise).unwrap().distance(DVec2::ONE) < 1e-12);
    }

    #[test]
    fn test_degenerate_centroid_uses_middle_vertex() {
        let line = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        ];
        assert_eq!(polygon_centroid(&line), Some(DVec2::new(1.0, 1.0)));
        assert_eq!(polygon_centroid(&[]), None);
    }

    #[test]
    fn test_half_plane_membership() {
        let plane = HalfPlane::new(DVec2::new(1.0, 0.0), 0.5);
        assert!(is_inside(DVec2::new(0.2, 9.0), &plane, INSIDE_EPSILON));
        assert!(is_inside(DVec2::new(0.5, 0.0), &plane, INSIDE_EPSILON));
        assert!(!is_inside(DVec2::new(0.6, 0.0), &plane, INSIDE_EPSILON));
        assert!(is_inside(DVec2::new(0.6, 0.0), &plane.complement(), INSIDE_EPSILON));
        assert!((plane.clearance(DVec2::new(0.2, 0.0)) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_bisector() {
        let plane = HalfPlane::bisector(DVec2::ZERO, DVec2::new(2.0, 0.0));
        assert!(is_inside(DVec2::new(0.9, 5.0), &plane, 0.0));
        assert!(!is_inside(DVec2::new(1.1, 5.0), &plane, 0.0));
    }

    #[test]
    fn test_segment_intersection() {
        let plane = HalfPlane::new(DVec2::new(1.0, 0.0), 0.25);
        let hit = intersect_segment(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), &plane);
        assert!(hit.distance(DVec2::new(0.25, 0.25)) < 1e-12);
    }

    #[test]
    fn test_clip_square_in_half() {
        let plane = HalfPlane::new(DVec2::new(1.0, 0.0), 0.5);
        let clipped = clip_polygon(&unit_square(), &[plane]).unwrap();
        assert_eq!(clipped.len(), 4);
        assert!((polygon_area(&clipped) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clip_to_nothing() {
        let plane = HalfPlane::new(DVec2::new(1.0, 0.0), -1.0);
        assert!(clip_polygon(&unit_square(), &[plane]).is_none());
    }

    #[test]
    fn test_clip_interior_polygon_is_unchanged() {
        let region = Rect::square(10.0).half_planes();
        let inner = vec![
            DVec2::new(2.0, 2.0),
            DVec2::new(5.0, 1.0),
            DVec2::new(7.0, 6.0),
            DVec2::new(3.0, 8.0),
        ];
        let clipped = clip_polygon(&inner, &region).unwrap();
        assert!(same_cycle(&clipped, &inner, 1e-12));
    }

    #[test]
    fn test_dedup_removes_closing_vertex() {
        let mut closed = unit_square();
        closed.push(closed[0]);
        closed.insert(1, closed[0]);
        assert_eq!(dedup_vertices(&closed), unit_square());
    }

    #[test]
    fn test_fan_sampling_stays_inside() {
        let triangle = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(0.0, 3.0),
        ];
        let hexagon: Vec<DVec2> = (0..6)
            .map(|i| DVec2::from_angle(i as f64 * std::f64::consts::TAU / 6.0) * 2.0)
            .collect();
        let mut rng = SeededRandom::from_seed_str("fan");
        for polygon in [&triangle, &hexagon] {
            let fan = TriangleFan::new(polygon);
            assert!((fan.area() - polygon_area(polygon)).abs() < 1e-9);
            let planes = convex_planes(polygon);
            for _ in 0..500 {
                let p = fan.sample(&mut rng);
                assert!(is_inside_all(p, &planes, 1e-9));
            }
        }
    }

    #[test]
    fn test_fan_sampling_is_area_weighted() {
        // Rectangle split by the fan into two equal-area triangles.
        let rect = Rect::new(DVec2::ZERO, DVec2::new(4.0, 1.0)).polygon();
        let fan = TriangleFan::new(&rect);
        let mut rng = SeededRandom::from_seed_str("weights");
        let left = (0..4000)
            .filter(|_| fan.sample(&mut rng).x < 2.0)
            .count();
        assert!((1700..2300).contains(&left), "left half got {}", left);
    }

    #[test]
    fn test_sample_degenerate_polygon() {
        let mut rng = SeededRandom::from_seed_str("flat");
        let flat = vec![DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        let p = sample_uniform_in_convex_polygon(&flat, &mut rng);
        assert_eq!(p, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_clamp_to_region() {
        let planes = Rect::square(1.0).half_planes();
        let anchor = DVec2::splat(0.5);

        let inside = DVec2::new(0.3, 0.7);
        assert_eq!(clamp_to_region(inside, anchor, &planes), inside);

        let clamped = clamp_to_region(DVec2::new(3.0, 0.5), anchor, &planes);
        assert!(is_inside_all(clamped, &planes, INSIDE_EPSILON));
        assert!((clamped.x - 1.0).abs() < 1e-6);
        assert!((clamped.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_clearance() {
        let planes = Rect::square(10.0).half_planes();
        assert!((min_clearance(DVec2::new(2.0, 7.0), &planes) - 2.0).abs() < 1e-12);
        assert!(min_clearance(DVec2::new(-1.0, 5.0), &planes) < 0.0);
    }

    #[test]
    fn test_same_cycle() {
        let square = unit_square();
        let mut rotated = square.clone();
        rotated.rotate_left(2);
        assert!(same_cycle(&square, &rotated, 1e-12));
        let reversed: Vec<DVec2> = square.iter().rev().copied().collect();
        assert!(!same_cycle(&square, &reversed, 1e-12));
    }

    fn convex_planes(polygon: &[DVec2]) -> Vec<HalfPlane> {
        // Counter-clockwise edges: interior is to the left.
        (0..polygon.len())
            .map(|i| {
                let p = polygon[i];
                let q = polygon[(i + 1) % polygon.len()];
                let normal = DVec2::new(q.y - p.y, p.x - q.x);
                HalfPlane::new(normal, normal.dot(p))
            })
            .collect()
    }
}
