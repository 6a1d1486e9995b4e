use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use smallvec::SmallVec;

use crate::counter::{triangle_key, Triangle, TriangleCounter};
use crate::error::Result;
use crate::graph::{self, Graph, VertexId};
use crate::segment::Segment;

/// Counts triangles by tracing the faces of the arrangement.
///
/// Every edge becomes two directed half-edges; faces are walked with the
/// standard next-face-edge rule (at each vertex, take the neighbor
/// immediately before the incoming direction in angular order). Degree-3
/// positive faces are triangle candidates; the negative face of greatest
/// absolute area is the unbounded outer face. A secondary pass over
/// segment-derived adjacency recovers triangles whose sides were subdivided
/// by unrelated crossings.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceTracingCounter;

#[derive(Clone, Copy, Debug)]
struct Neighbor {
    vertex: VertexId,
    angle: f64,
}

type Fan = SmallVec<[Neighbor; 8]>;

impl TriangleCounter for FaceTracingCounter {
    fn build_planar_graph(&self, segments: &[Segment], coord_tol: f64) -> Result<Graph> {
        graph::build(segments, coord_tol)
    }

    fn contract_straight_vertices(&self, graph: &Graph, angle_tol: f64) -> Graph {
        graph::contract_straight_vertices(graph, angle_tol)
    }

    fn triangles(&self, graph: &Graph) -> Vec<Triangle> {
        if graph.edges().is_empty() {
            return Vec::new();
        }
        let fans = sorted_neighbor_fans(graph);
        let mut visited: HashMap<(VertexId, VertexId), bool> =
            HashMap::with_capacity(graph.edges().len() * 2);
        for edge in graph.edges() {
            visited.insert((edge.u(), edge.v()), false);
            visited.insert((edge.v(), edge.u()), false);
        }

        let tol = graph.coordinate_tolerance();
        let mut interior: Vec<Vec<VertexId>> = Vec::new();
        let mut outer: Option<Vec<VertexId>> = None;
        let mut outer_area_abs = -1.0f64;
        for u in 0..fans.len() {
            for i in 0..fans[u].len() {
                let v = fans[u][i].vertex;
                if visited.get(&(u, v)).copied() != Some(false) {
                    continue;
                }
                let face = trace_face(&fans, &mut visited, u, v);
                if face.len() < 3 {
                    continue;
                }
                let area = signed_area(&face, graph);
                if area.abs() <= tol {
                    continue;
                }
                if area > 0.0 {
                    if face.len() == 3 {
                        interior.push(face);
                    }
                } else if area.abs() > outer_area_abs {
                    outer_area_abs = area.abs();
                    outer = Some(face);
                }
            }
        }

        let mut boundary_edges: HashSet<(VertexId, VertexId)> = HashSet::new();
        let mut boundary_vertices: HashSet<VertexId> = HashSet::new();
        let mut outer_triangle: Option<Triangle> = None;
        if let Some(cycle) = &outer {
            boundary_vertices.extend(cycle.iter().copied());
            for i in 0..cycle.len() {
                let a = cycle[i];
                let b = cycle[(i + 1) % cycle.len()];
                boundary_edges.insert((a, b));
                boundary_edges.insert((b, a));
            }
            outer_triangle = simplify_outer_triangle(cycle, graph, tol);
            if let Some(tri) = outer_triangle {
                boundary_vertices.extend(tri);
            }
        }

        let mut results: Vec<Triangle> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();
        for face in &interior {
            let on_boundary = face
                .iter()
                .filter(|v| boundary_vertices.contains(*v))
                .count();
            // A candidate touching the outer boundary at exactly two corners
            // is a sliver against the outline, not a bounded sub-triangle.
            if on_boundary >= 2 && on_boundary < face.len() {
                continue;
            }
            let tri = [face[0], face[1], face[2]];
            if seen.insert(triangle_key(tri[0], tri[1], tri[2])) {
                results.push(tri);
            }
        }
        if let Some(tri) = outer_triangle {
            if seen.insert(triangle_key(tri[0], tri[1], tri[2])) {
                results.push(tri);
            }
        }

        let face_traced = results.len();
        let adjacency = segment_adjacency(graph);
        for u in 0..adjacency.len() {
            for &v in &adjacency[u] {
                if v <= u {
                    continue;
                }
                for &w in &adjacency[v] {
                    if w <= v || !adjacency[u].contains(&w) {
                        continue;
                    }
                    let key = triangle_key(u, v, w);
                    if seen.contains(&key) {
                        continue;
                    }
                    if !is_non_degenerate(graph, u, v, w, tol) {
                        continue;
                    }
                    let on_outline = [
                        boundary_edges.contains(&(u, v)),
                        boundary_edges.contains(&(v, w)),
                        boundary_edges.contains(&(w, u)),
                    ];
                    let count = on_outline.iter().filter(|b| **b).count();
                    // One or two sides on the outline means the triple only
                    // partially overlaps the outer boundary.
                    if count > 0 && count < 3 {
                        continue;
                    }
                    results.push([u, v, w]);
                    seen.insert(key);
                }
            }
        }

        debug!(
            "face tracing found {} triangles, segment recovery added {}",
            face_traced,
            results.len() - face_traced
        );
        results
    }
}

/// Per vertex, the neighbors sorted by the polar angle of the edge direction.
/// Exactly coincident directions are an input precondition; the sort is
/// deterministic but their relative order is unspecified.
fn sorted_neighbor_fans(graph: &Graph) -> Vec<Fan> {
    let mut fans: Vec<Fan> = vec![SmallVec::new(); graph.vertices().len()];
    for edge in graph.edges() {
        let a = graph.vertices()[edge.u()];
        let b = graph.vertices()[edge.v()];
        fans[edge.u()].push(Neighbor {
            vertex: edge.v(),
            angle: (b.y - a.y).atan2(b.x - a.x),
        });
        fans[edge.v()].push(Neighbor {
            vertex: edge.u(),
            angle: (a.y - b.y).atan2(a.x - b.x),
        });
    }
    for fan in &mut fans {
        fan.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    }
    fans
}

fn trace_face(
    fans: &[Fan],
    visited: &mut HashMap<(VertexId, VertexId), bool>,
    start_u: VertexId,
    start_v: VertexId,
) -> Vec<VertexId> {
    let mut face = Vec::new();
    let (mut u, mut v) = (start_u, start_v);
    loop {
        match visited.get_mut(&(u, v)) {
            Some(state) if !*state => *state = true,
            _ => break,
        }
        face.push(u);
        let Some(next) = next_around(fans, u, v) else {
            break;
        };
        u = v;
        v = next;
        if u == start_u && v == start_v {
            break;
        }
    }
    face
}

/// The next face edge out of `to`: the neighbor immediately before the
/// direction back to `from` in angular order.
fn next_around(fans: &[Fan], from: VertexId, to: VertexId) -> Option<VertexId> {
    let fan = &fans[to];
    let idx = fan.iter().position(|n| n.vertex == from)?;
    let prev = (idx + fan.len() - 1) % fan.len();
    Some(fan[prev].vertex)
}

/// Shoelace formula over the face cycle, in half-edge order as traced.
fn signed_area(face: &[VertexId], graph: &Graph) -> f64 {
    let mut sum = 0.0;
    for i in 0..face.len() {
        let a = graph.vertices()[face[i]];
        let b = graph.vertices()[face[(i + 1) % face.len()]];
        sum += a.x * b.y - a.y * b.x;
    }
    0.5 * sum
}

/// Iteratively removes outer-cycle vertices collinear with their neighbors;
/// when exactly 3 remain, the whole outline is itself a triangle obscured by
/// extra boundary vertices.
fn simplify_outer_triangle(cycle: &[VertexId], graph: &Graph, tol: f64) -> Option<Triangle> {
    if cycle.len() < 3 {
        return None;
    }
    let mut vs: Vec<VertexId> = cycle.to_vec();
    let mut changed = true;
    while vs.len() > 3 && changed {
        changed = false;
        for i in 0..vs.len() {
            let prev = vs[(i + vs.len() - 1) % vs.len()];
            let curr = vs[i];
            let next = vs[(i + 1) % vs.len()];
            if collinear(graph, prev, curr, next, tol) {
                vs.remove(i);
                changed = true;
                break;
            }
        }
    }
    (vs.len() == 3).then(|| [vs[0], vs[1], vs[2]])
}

fn collinear(graph: &Graph, a: VertexId, b: VertexId, c: VertexId, tol: f64) -> bool {
    let (a, b, c) = (
        graph.vertices()[a],
        graph.vertices()[b],
        graph.vertices()[c],
    );
    let area2 = ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
    area2 <= tol
}

fn is_non_degenerate(graph: &Graph, u: VertexId, v: VertexId, w: VertexId, tol: f64) -> bool {
    let (a, b, c) = (
        graph.vertices()[u],
        graph.vertices()[v],
        graph.vertices()[w],
    );
    let area2 = (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)).abs();
    area2 > tol
}

/// Pairs of vertices directly connected by an original input segment: the
/// segment's endpoint pair plus every pair lying on the same vertex path.
fn segment_adjacency(graph: &Graph) -> Vec<BTreeSet<VertexId>> {
    let mut adjacency: Vec<BTreeSet<VertexId>> = vec![BTreeSet::new(); graph.vertices().len()];
    for edge in graph.segment_edges() {
        adjacency[edge.u()].insert(edge.v());
        adjacency[edge.v()].insert(edge.u());
    }
    for path in graph.segment_vertex_paths() {
        for i in 0..path.len() {
            for j in (i + 1)..path.len() {
                adjacency[path[i]].insert(path[j]);
                adjacency[path[j]].insert(path[i]);
            }
        }
    }
    adjacency
}
