use std::collections::{BTreeSet, HashSet};

use crate::counter::{triangle_key, Triangle, TriangleCounter};
use crate::error::Result;
use crate::graph::{self, Graph, VertexId};
use crate::segment::Segment;

/// Counts triangles the way a viewer reads the drawing: three corners form a
/// triangle when each pair lies on a common straight input stroke, whether
/// or not the arrangement subdivided the sides.
///
/// Connectivity is the shared-stroke relation from the segment vertex paths,
/// widened by a direction-constrained walk that follows collinear chains but
/// refuses to pass through junction vertices. Contraction is the identity
/// for this counter; it needs the uncontracted paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrokeTriangleCounter;

impl TriangleCounter for StrokeTriangleCounter {
    fn build_planar_graph(&self, segments: &[Segment], coord_tol: f64) -> Result<Graph> {
        graph::build(segments, coord_tol)
    }

    fn contract_straight_vertices(&self, graph: &Graph, _angle_tol: f64) -> Graph {
        graph.clone()
    }

    fn triangles(&self, graph: &Graph) -> Vec<Triangle> {
        let n = graph.vertices().len();
        if n < 3 {
            return Vec::new();
        }
        let share = shared_stroke_map(graph);
        let tol = graph.coordinate_tolerance();
        let mut seen: HashSet<u64> = HashSet::new();
        let mut triangles = Vec::new();
        for a in 0..n - 2 {
            for b in (a + 1)..(n - 1) {
                if !connected(graph, &share, a, b) {
                    continue;
                }
                for c in (b + 1)..n {
                    if !connected(graph, &share, a, c) || !connected(graph, &share, b, c) {
                        continue;
                    }
                    if triangle_area(graph, a, b, c) <= tol {
                        continue;
                    }
                    if seen.insert(triangle_key(a, b, c)) {
                        triangles.push([a, b, c]);
                    }
                }
            }
        }
        triangles
    }
}

/// All pairs of vertices lying on the same input stroke.
fn shared_stroke_map(graph: &Graph) -> Vec<BTreeSet<VertexId>> {
    let mut share: Vec<BTreeSet<VertexId>> = vec![BTreeSet::new(); graph.vertices().len()];
    for path in graph.segment_vertex_paths() {
        for i in 0..path.len() {
            for j in (i + 1)..path.len() {
                share[path[i]].insert(path[j]);
                share[path[j]].insert(path[i]);
            }
        }
    }
    share
}

/// Whether `v` is reachable from `u` along strokes collinear with the
/// `u`->`v` direction. Junction vertices (stroke degree > 2) block the walk:
/// a chain of separate strokes through a crossing does not read as one side.
fn connected(graph: &Graph, share: &[BTreeSet<VertexId>], u: VertexId, v: VertexId) -> bool {
    if u == v {
        return true;
    }
    if share[u].contains(&v) {
        return true;
    }
    let start = graph.vertices()[u];
    let target = graph.vertices()[v];
    let tx = target.x - start.x;
    let ty = target.y - start.y;
    let tol = graph.coordinate_tolerance().max(1e-9);
    let mut queue = vec![u];
    let mut visited: HashSet<VertexId> = HashSet::new();
    visited.insert(u);
    let mut index = 0;
    while index < queue.len() {
        let curr = queue[index];
        index += 1;
        let junction = curr != u && share[curr].len() > 2;
        let cv = graph.vertices()[curr];
        for &next in &share[curr] {
            if !visited.insert(next) {
                continue;
            }
            if junction {
                continue;
            }
            let nv = graph.vertices()[next];
            let sx = nv.x - cv.x;
            let sy = nv.y - cv.y;
            let cross = tx * sy - ty * sx;
            if cross.abs() > tol * (tx.abs() + ty.abs() + sx.abs() + sy.abs() + 1.0) {
                continue;
            }
            if next == v {
                return true;
            }
            queue.push(next);
        }
    }
    false
}

fn triangle_area(graph: &Graph, a: VertexId, b: VertexId, c: VertexId) -> f64 {
    let (va, vb, vc) = (
        graph.vertices()[a],
        graph.vertices()[b],
        graph.vertices()[c],
    );
    let value = va.x * (vb.y - vc.y) + vb.x * (vc.y - va.y) + vc.x * (va.y - vb.y);
    value.abs() * 0.5
}
