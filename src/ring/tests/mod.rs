mod test_connector_basic;
mod test_layout_basic;
mod test_section_normals;

use crate::geom::Point3;

pub(super) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Point on the tube's centre line nearest to `p` (the ring plane, same angle).
pub(super) fn centre_line_point(p: Point3, radius: f64) -> Point3 {
    let angle = p.y.atan2(p.x);
    Point3::on_circle(radius, angle, 0.0)
}
