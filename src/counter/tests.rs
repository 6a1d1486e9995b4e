use crate::counter::{FaceTracingCounter, StrokeTriangleCounter, TriangleCounter};
use crate::segment::Segment;

const COORD_TOL: f64 = 1e-6;
const ANGLE_TOL: f64 = 1e-6;

fn seg(id: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(x1, y1, x2, y2, id)
}

fn count(segments: &[Segment]) -> usize {
    FaceTracingCounter
        .count_triangles(segments, COORD_TOL, ANGLE_TOL)
        .unwrap()
        .len()
}

#[test]
fn single_triangle_is_counted_once() {
    let segments = [
        seg("ab", 0.0, 0.0, 10.0, 0.0),
        seg("bc", 10.0, 0.0, 5.0, 8.66),
        seg("ca", 5.0, 8.66, 0.0, 0.0),
    ];
    assert_eq!(count(&segments), 1);
}

#[test]
fn median_splits_triangle_into_three() {
    let segments = [
        seg("ab", 0.0, 0.0, 10.0, 0.0),
        seg("bc", 10.0, 0.0, 5.0, 8.66),
        seg("ca", 5.0, 8.66, 0.0, 0.0),
        seg("median", 5.0, 8.66, 5.0, 0.0),
    ];
    // The two halves plus the simplified outer triangle.
    assert_eq!(count(&segments), 3);
}

#[test]
fn fan_of_three_triangles() {
    let segments = [
        seg("oa", 0.0, 0.0, 1.0, 0.0),
        seg("ab", 1.0, 0.0, 0.0, 1.0),
        seg("bo", 0.0, 1.0, 0.0, 0.0),
        seg("bc", 0.0, 1.0, -1.0, 0.0),
        seg("co", -1.0, 0.0, 0.0, 0.0),
        seg("cd", -1.0, 0.0, 0.0, -1.0),
        seg("do", 0.0, -1.0, 0.0, 0.0),
    ];
    assert_eq!(count(&segments), 3);
}

#[test]
fn grid_has_no_triangles() {
    let segments = [
        seg("h1", 0.0, 0.0, 2.0, 0.0),
        seg("h2", 0.0, 1.0, 2.0, 1.0),
        seg("v1", 0.0, 0.0, 0.0, 1.0),
        seg("v2", 1.0, 0.0, 1.0, 1.0),
        seg("v3", 2.0, 0.0, 2.0, 1.0),
    ];
    assert_eq!(count(&segments), 0);
}

#[test]
fn crossing_diagonals_bound_no_face() {
    let segments = [
        seg("d1", 0.0, 0.0, 1.0, 1.0),
        seg("d2", 0.0, 1.0, 1.0, 0.0),
    ];
    assert_eq!(count(&segments), 0);
}

#[test]
fn attachment_point_on_base_keeps_three() {
    let segments = [
        seg("ab", 0.0, 0.0, 10.0, 0.0),
        seg("bc", 10.0, 0.0, 5.0, 8.66),
        seg("ca", 5.0, 8.66, 0.0, 0.0),
        seg("cd", 5.0, 8.66, 5.0, 0.0),
    ];
    assert_eq!(count(&segments), 3);
}

#[test]
fn inner_triangle_with_spokes_counts_five() {
    // Corner regions touch the outline at two vertices and are excluded;
    // the three mid regions, the inner triangle, and the outline survive.
    let segments = [
        seg("ab", 0.0, 6.0, -6.0, 0.0),
        seg("bc", -6.0, 0.0, 6.0, 0.0),
        seg("ca", 6.0, 0.0, 0.0, 6.0),
        seg("ad", 0.0, 6.0, -2.0, 2.0),
        seg("ae", 0.0, 6.0, 2.0, 2.0),
        seg("bd", -6.0, 0.0, -2.0, 2.0),
        seg("bf", -6.0, 0.0, 0.0, 1.0),
        seg("ce", 6.0, 0.0, 2.0, 2.0),
        seg("cf", 6.0, 0.0, 0.0, 1.0),
        seg("de", -2.0, 2.0, 2.0, 2.0),
        seg("ef", 2.0, 2.0, 0.0, 1.0),
        seg("fd", 0.0, 1.0, -2.0, 2.0),
    ];
    assert_eq!(count(&segments), 5);
}

#[test]
fn triangles_of_edgeless_graph_is_empty() {
    let counter = FaceTracingCounter;
    let graph = counter.build_planar_graph(&[], COORD_TOL).unwrap();
    assert!(counter.triangles(&graph).is_empty());
}

#[test]
fn no_triangle_repeats_under_permutation() {
    let segments = [
        seg("ab", 0.0, 0.0, 10.0, 0.0),
        seg("bc", 10.0, 0.0, 5.0, 8.66),
        seg("ca", 5.0, 8.66, 0.0, 0.0),
        seg("median", 5.0, 8.66, 5.0, 0.0),
    ];
    let triangles = FaceTracingCounter
        .count_triangles(&segments, COORD_TOL, ANGLE_TOL)
        .unwrap();
    let mut canonical: Vec<[usize; 3]> = triangles
        .iter()
        .map(|t| {
            let mut sorted = *t;
            sorted.sort();
            sorted
        })
        .collect();
    canonical.sort();
    canonical.dedup();
    assert_eq!(canonical.len(), triangles.len());
}

#[test]
fn stroke_counter_reads_subdivided_base_as_one_triangle() {
    let mut segments: Vec<Segment> = (0..10)
        .map(|i| {
            seg(
                &format!("base{i}"),
                i as f64,
                0.0,
                (i + 1) as f64,
                0.0,
            )
        })
        .collect();
    segments.push(seg("left", 0.0, 0.0, 5.0, 8.0));
    segments.push(seg("right", 10.0, 0.0, 5.0, 8.0));
    let triangles = StrokeTriangleCounter
        .count_triangles(&segments, COORD_TOL, ANGLE_TOL)
        .unwrap();
    assert_eq!(triangles.len(), 1);
}

#[test]
fn stroke_counter_median_counts_three() {
    let segments = [
        seg("ab", 0.0, 0.0, 10.0, 0.0),
        seg("bc", 10.0, 0.0, 5.0, 8.66),
        seg("ca", 5.0, 8.66, 0.0, 0.0),
        seg("median", 5.0, 8.66, 5.0, 0.0),
    ];
    let triangles = StrokeTriangleCounter
        .count_triangles(&segments, COORD_TOL, ANGLE_TOL)
        .unwrap();
    assert_eq!(triangles.len(), 3);
}

#[test]
fn stroke_counter_junction_blocks_sight_lines() {
    // Around the fan's center no pair of opposite rim vertices is connected:
    // the spokes meet at a junction, so A-O-C never reads as one side.
    let segments = [
        seg("oa", 0.0, 0.0, 1.0, 0.0),
        seg("ab", 1.0, 0.0, 0.0, 1.0),
        seg("bo", 0.0, 1.0, 0.0, 0.0),
        seg("bc", 0.0, 1.0, -1.0, 0.0),
        seg("co", -1.0, 0.0, 0.0, 0.0),
        seg("cd", -1.0, 0.0, 0.0, -1.0),
        seg("do", 0.0, -1.0, 0.0, 0.0),
    ];
    let triangles = StrokeTriangleCounter
        .count_triangles(&segments, COORD_TOL, ANGLE_TOL)
        .unwrap();
    assert_eq!(triangles.len(), 3);
}
