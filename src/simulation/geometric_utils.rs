//! Heading and ray geometry in world coordinates (y grows downwards).

use geo::Point;

/// Unit direction vector for a heading in degrees.
#[inline]
pub fn heading_vector(heading_deg: f32) -> (f32, f32) {
    let rad = heading_deg.to_radians();
    (rad.cos(), rad.sin())
}

/// Point reached by travelling `length` units from `origin` along `heading_deg`.
#[inline]
pub fn ray_point(origin: Point<f32>, heading_deg: f32, length: f32) -> Point<f32> {
    let (dx, dy) = heading_vector(heading_deg);
    Point::new(origin.x() + dx * length, origin.y() + dy * length)
}

/// Pixel containing a world point. Truncates toward zero.
#[inline]
pub fn to_pixel(p: Point<f32>) -> (i32, i32) {
    (p.x() as i32, p.y() as i32)
}
