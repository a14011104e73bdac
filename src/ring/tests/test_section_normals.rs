use std::f64::consts::{FRAC_PI_2, PI};

use super::centre_line_point;
use crate::geom::{Mesh, Point3, Vec3};
use crate::ring::{PROFILE_EDGES, SectionParams, mesh_ring_section, mesh_square_section};

fn params(start_angle: f64, arc_length: f64) -> SectionParams {
    SectionParams {
        radius: 0.75,
        radial_thickness: 0.6,
        height: 0.2,
        angular_segments: 12,
        start_angle,
        arc_length,
        edge_segments: 3,
    }
}

fn assert_faces_point_away_from_centre_line(mesh: &Mesh, radius: f64) {
    for [a, b, c] in mesh.triangles() {
        let [pa, pb, pc] = [a, b, c].map(|i| mesh.position(i as usize).unwrap());
        let face_normal = (pb - pa).cross(pc - pa);
        let centroid = Point3::new(
            (pa.x + pb.x + pc.x) / 3.0,
            (pa.y + pb.y + pc.y) / 3.0,
            (pa.z + pb.z + pc.z) / 3.0,
        );
        let away = centroid - centre_line_point(centroid, radius);
        assert!(
            face_normal.dot(away) > 0.0,
            "triangle [{a}, {b}, {c}] faces into the tube"
        );
    }
}

#[test]
fn triangle_winding_faces_outward() {
    for (start, arc) in [(0.0, FRAC_PI_2), (2.0, PI), (5.5, 0.4)] {
        let (mesh, _) = mesh_ring_section(&params(start, arc));
        assert_faces_point_away_from_centre_line(&mesh, 0.75);
    }
}

#[test]
fn square_winding_faces_outward() {
    let square = SectionParams {
        height: 0.6,
        ..params(1.0, PI)
    };
    let (mesh, _) = mesh_square_section(&square);
    assert_faces_point_away_from_centre_line(&mesh, 0.75);
}

#[test]
fn vertex_normals_are_unit_and_point_out_of_the_tube() {
    for (mesh, _) in [
        mesh_ring_section(&params(0.2, 2.0)),
        mesh_square_section(&SectionParams {
            height: 0.6,
            ..params(0.2, 2.0)
        }),
    ] {
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i).unwrap();
            let n = mesh.normal(i).unwrap();
            assert!((n.length() - 1.0).abs() < 1e-9);
            assert!(n.dot(p - centre_line_point(p, 0.75)) > 0.0, "vertex {i}");
        }
    }
}

#[test]
fn top_face_normals_point_straight_up() {
    let p = params(0.0, PI);
    let (mesh, _) = mesh_ring_section(&p);
    let edge_points = p.edge_segments + 1;

    for step in 0..=p.angular_segments {
        for j in 0..edge_points {
            let n = mesh.normal(step * PROFILE_EDGES * edge_points + j).unwrap();
            assert!((n - Vec3::Z).length() < 1e-12, "step {step} point {j}: {n:?}");
        }
    }
}

#[test]
fn outer_wall_normals_follow_the_radial_direction() {
    let p = params(0.0, PI);
    let (mesh, _) = mesh_ring_section(&p);
    let edge_points = p.edge_segments + 1;
    let step_angle = p.arc_length / p.angular_segments as f64;

    for step in 0..=p.angular_segments {
        // Interior wall points only: the corners belong to the same wall but
        // share no triangle with the top or bottom.
        for j in 1..p.edge_segments {
            let index = step * PROFILE_EDGES * edge_points + edge_points + j;
            let n = mesh.normal(index).unwrap();
            let radial = Vec3::radial(p.start_angle + step as f64 * step_angle);
            // End steps only see one side, so their normal leans by half a step.
            assert!(n.dot(radial) > (step_angle / 2.0).cos() - 1e-9);
        }
    }
}
