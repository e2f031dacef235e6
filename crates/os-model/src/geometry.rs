//! Planar polygon geometry on nalgebra points.
//!
//! Vertices are listed counterclockwise seen from outside, so the Newell
//! normal points outward.

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use os_core::GEOMETRY_TOL;

pub type Point3d = Point3<f64>;
pub type Vector3d = Vector3<f64>;
pub type Transformation = Isometry3<f64>;

/// Newell's method: twice the area, along the polygon normal.
pub fn newell_vector(points: &[Point3d]) -> Vector3d {
    let mut n = Vector3d::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// Unit outward normal; `None` for fewer than three points or a degenerate polygon.
pub fn outward_normal(points: &[Point3d]) -> Option<Vector3d> {
    if points.len() < 3 {
        return None;
    }
    newell_vector(points).try_normalize(GEOMETRY_TOL * GEOMETRY_TOL)
}

pub fn area(points: &[Point3d]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    newell_vector(points).norm() / 2.0
}

/// Area-weighted centroid of a planar polygon (triangle fan from the first vertex).
pub fn centroid(points: &[Point3d]) -> Option<Point3d> {
    let normal = outward_normal(points)?;
    let origin = points[0];
    let mut weighted = Vector3d::zeros();
    let mut total = 0.0;
    for pair in points[1..].windows(2) {
        let (b, c) = (pair[0], pair[1]);
        let tri = (b - origin).cross(&(c - origin)).dot(&normal) / 2.0;
        weighted += (origin.coords + b.coords + c.coords) / 3.0 * tri;
        total += tri;
    }
    if total.abs() < f64::EPSILON {
        return None;
    }
    Some(Point3d::from(weighted / total))
}

/// Angle between the normal and straight up, radians in `[0, PI]`.
pub fn tilt(normal: &Vector3d) -> f64 {
    normal.z.clamp(-1.0, 1.0).acos()
}

/// Clockwise angle from north (+y) of the normal's horizontal part, radians in `[0, 2 PI)`.
pub fn azimuth(normal: &Vector3d) -> f64 {
    let a = normal.x.atan2(normal.y);
    if a < 0.0 { a + std::f64::consts::TAU } else { a }
}

/// All points within `tol` of the plane through the first point.
pub fn is_planar(points: &[Point3d], tol: f64) -> bool {
    let Some(normal) = outward_normal(points) else {
        return false;
    };
    let origin = points[0];
    points
        .iter()
        .all(|p| (p - origin).dot(&normal).abs() <= tol)
}

/// Same vertices in reverse winding, starting from the same point.
pub fn reverse_vertices(points: &[Point3d]) -> Vec<Point3d> {
    let mut out: Vec<Point3d> = points.iter().rev().copied().collect();
    out.rotate_right(1);
    out
}

/// Two polygons cover the same outline with opposite windings, within `tol`.
pub fn circular_equal_reversed(a: &[Point3d], b: &[Point3d], tol: f64) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let reversed = reverse_vertices(b);
    (0..a.len()).any(|shift| {
        a.iter()
            .enumerate()
            .all(|(i, p)| (p - reversed[(i + shift) % a.len()]).norm() <= tol)
    })
}

/// Local-to-parent transformation: rotate clockwise about z by `north_deg`, then translate.
pub fn space_transformation(origin: Vector3d, north_deg: f64) -> Transformation {
    let rotation = Rotation3::from_axis_angle(&Vector3d::z_axis(), -north_deg.to_radians());
    Isometry3::from_parts(
        Translation3::from(origin),
        UnitQuaternion::from_rotation_matrix(&rotation),
    )
}

pub fn transform_all(t: &Transformation, points: &[Point3d]) -> Vec<Point3d> {
    points.iter().map(|p| t.transform_point(p)).collect()
}
