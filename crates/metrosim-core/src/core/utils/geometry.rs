use nalgebra::{Point3, Rotation3, Vector3};

/// Maps a coordinate difference onto its shortest periodic image along one axis.
#[inline]
pub fn minimum_image_component(delta: f64, length: f64) -> f64 {
    delta - length * (delta / length).round()
}

/// Returns the minimum-image separation vector from `a` to `b` in an orthorhombic box.
#[inline]
pub fn minimum_image_delta(a: &Point3<f64>, b: &Point3<f64>, dimensions: &[f64; 3]) -> Vector3<f64> {
    let d = b - a;
    Vector3::new(
        minimum_image_component(d.x, dimensions[0]),
        minimum_image_component(d.y, dimensions[1]),
        minimum_image_component(d.z, dimensions[2]),
    )
}

/// Returns the minimum-image distance between `a` and `b`.
#[inline]
pub fn minimum_image_distance(a: &Point3<f64>, b: &Point3<f64>, dimensions: &[f64; 3]) -> f64 {
    minimum_image_delta(a, b, dimensions).norm()
}

/// Returns the shift that moves `point` into `[0, L)` along every axis.
pub fn wrap_shift(point: &Point3<f64>, dimensions: &[f64; 3]) -> Vector3<f64> {
    let shift = |x: f64, l: f64| -l * (x / l).floor();
    Vector3::new(
        shift(point.x, dimensions[0]),
        shift(point.y, dimensions[1]),
        shift(point.z, dimensions[2]),
    )
}

/// Builds a rotation from per-axis angles given in degrees (applied x, then y, then z).
pub fn rotation_from_degrees(x: f64, y: f64, z: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(x.to_radians(), y.to_radians(), z.to_radians())
}
