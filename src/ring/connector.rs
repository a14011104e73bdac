use serde::Serialize;

use crate::geom::{Curve3, Point3, QuadraticBezier3, Transform, Vec3, curve_length, tessellate_curve_uniform};

use super::{Rgb, SegmentPlacement};

/// End point distance from the anchor, in connector lengths.
pub const END_REACH: f64 = 1.5;
/// Outward distance of the control point, in connector lengths.
pub const CONTROL_REACH: f64 = 0.8;
/// Height of the control point above the anchor, in connector lengths.
pub const CONTROL_LIFT: f64 = 0.5;
/// Gap between the connector end and the label.
pub const LABEL_OFFSET: f64 = 0.15;
pub const LABEL_FONT_SIZE: f64 = 0.15;

/// Polyline resolution used for [`Connector::length`].
const LENGTH_STEPS: usize = 64;

/// Capsule drawn at the connector end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Local Z is the outward radial direction, local Y is world up.
    pub transform: Transform,
    pub radius: f64,
    pub length: f64,
}

impl Marker {
    pub const RADIUS: f64 = 0.06;
    pub const LENGTH: f64 = 0.3;
}

/// Curve from a segment's anchor out to its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub index: usize,
    pub start: Point3,
    pub control: Point3,
    pub end: Point3,
    pub marker: Marker,
    pub label_text: String,
    pub label_position: Point3,
    pub label_font_size: f64,
    pub color: Rgb,
}

impl Connector {
    #[must_use]
    pub fn curve(&self) -> QuadraticBezier3 {
        QuadraticBezier3::new(self.start, self.control, self.end)
    }

    /// `steps + 1` points along the curve, start and end included.
    #[must_use]
    pub fn sample(&self, steps: usize) -> Vec<Point3> {
        tessellate_curve_uniform(&self.curve(), steps)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        curve_length(&self.curve(), LENGTH_STEPS)
    }

    /// Unit tangent where the curve meets the marker.
    #[must_use]
    pub fn end_tangent(&self) -> Option<Vec3> {
        self.curve().tangent_at(1.0)
    }
}

/// Control polygon of a connector leaving `anchor` along `angle`.
#[must_use]
pub fn connector_curve(anchor: Point3, angle: f64, length: f64) -> QuadraticBezier3 {
    let outward = Vec3::radial(angle);
    let end = anchor + outward * (length * END_REACH);
    let control = anchor + outward * (length * CONTROL_REACH) + Vec3::Z * (length * CONTROL_LIFT);
    QuadraticBezier3::new(anchor, control, end)
}

/// Connector, marker and label for one placement.
#[must_use]
pub fn build_connector(placement: &SegmentPlacement, length: f64) -> Connector {
    let outward = placement.outward();
    let curve = connector_curve(placement.anchor_point, placement.center_angle, length);
    let end = curve.p2;

    // Right-handed frame: tangent, up, outward.
    let x_axis = Vec3::Z.cross(outward);
    let marker = Marker {
        transform: Transform::from_axes(end, x_axis, Vec3::Z, outward),
        radius: Marker::RADIUS,
        length: Marker::LENGTH,
    };

    Connector {
        index: placement.index,
        start: curve.p0,
        control: curve.p1,
        end,
        marker,
        label_text: placement.label_text(),
        label_position: end + outward * LABEL_OFFSET,
        label_font_size: LABEL_FONT_SIZE,
        color: placement.color,
    }
}

/// Serializable view of a connector for label and overlay layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorExport {
    pub start: [f64; 3],
    pub control: [f64; 3],
    pub end: [f64; 3],
    pub points: Vec<[f64; 3]>,
    /// Column-major 4x4, ready for a GPU uniform.
    pub marker_matrix: [f64; 16],
    pub marker_radius: f64,
    pub marker_length: f64,
    pub label: String,
    pub label_position: [f64; 3],
    pub label_font_size: f64,
}

impl ConnectorExport {
    #[must_use]
    pub fn from_connector(connector: &Connector, steps: usize) -> Self {
        Self {
            start: connector.start.to_array(),
            control: connector.control.to_array(),
            end: connector.end.to_array(),
            points: connector.sample(steps).into_iter().map(Point3::to_array).collect(),
            marker_matrix: connector.marker.transform.to_cols_array(),
            marker_radius: connector.marker.radius,
            marker_length: connector.marker.length,
            label: connector.label_text.clone(),
            label_position: connector.label_position.to_array(),
            label_font_size: connector.label_font_size,
        }
    }
}
