use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;

use crate::graph::planar_graph::{Edge, Graph, Vertex, VertexId};

/// Collapses degree-2 vertices whose two incident edges are collinear within
/// `angle_tol`, iterating to a fixed point (collapsing a chain exposes new
/// degree-2 vertices). Surviving vertices are renumbered densely in original
/// relative order; edges and segment edges are remapped.
///
/// Segment vertex paths are not preserved: collinear-based triangle recovery
/// must run against the pre-contraction graph's paths.
pub fn contract_straight_vertices(graph: &Graph, angle_tol: f64) -> Graph {
    let n = graph.vertices().len();
    if n == 0 || graph.edges().is_empty() {
        return graph.clone();
    }

    let mut adjacency: Vec<BTreeSet<VertexId>> = vec![BTreeSet::new(); n];
    for edge in graph.edges() {
        adjacency[edge.u()].insert(edge.v());
        adjacency[edge.v()].insert(edge.u());
    }

    let coord_tol = graph.coordinate_tolerance();
    let mut removed = vec![false; n];
    let mut changed = true;
    while changed {
        changed = false;
        for v in 0..n {
            if removed[v] || adjacency[v].len() != 2 {
                continue;
            }
            let mut pair = adjacency[v].iter().copied();
            let (Some(a), Some(c)) = (pair.next(), pair.next()) else {
                continue;
            };
            if removed[a] || removed[c] {
                continue;
            }
            let (va, vv, vc) = (
                graph.vertices()[a],
                graph.vertices()[v],
                graph.vertices()[c],
            );
            if !is_collinear(&va, &vv, &vc, angle_tol, coord_tol) {
                continue;
            }
            adjacency[a].remove(&v);
            adjacency[c].remove(&v);
            adjacency[a].insert(c);
            adjacency[c].insert(a);
            adjacency[v].clear();
            removed[v] = true;
            changed = true;
        }
    }

    let mut remap = vec![usize::MAX; n];
    let mut vertices = Vec::new();
    for (i, &gone) in removed.iter().enumerate() {
        if gone {
            continue;
        }
        let original = graph.vertices()[i];
        let id = vertices.len();
        vertices.push(Vertex {
            id,
            x: original.x,
            y: original.y,
        });
        remap[i] = id;
    }

    let mut edges = Vec::new();
    let mut multiplicity = HashMap::new();
    for u in 0..n {
        if removed[u] {
            continue;
        }
        for &v in &adjacency[u] {
            if removed[v] {
                continue;
            }
            let (nu, nv) = (remap[u], remap[v]);
            if nu >= nv {
                continue;
            }
            let edge = Edge::new(nu, nv);
            edges.push(edge);
            multiplicity.insert(edge, 1);
        }
    }

    let mut seen: HashSet<Edge> = HashSet::new();
    let mut segment_edges = Vec::new();
    for edge in graph.segment_edges() {
        let (nu, nv) = (remap[edge.u()], remap[edge.v()]);
        if nu == usize::MAX || nv == usize::MAX || nu == nv {
            continue;
        }
        let edge = Edge::new(nu, nv);
        if seen.insert(edge) {
            segment_edges.push(edge);
        }
    }

    debug!(
        "contracted {} straight vertices ({} -> {})",
        n - vertices.len(),
        n,
        vertices.len()
    );

    Graph::new(
        vertices,
        edges,
        multiplicity,
        coord_tol,
        segment_edges,
        Vec::new(),
    )
}

/// `a`-`v`-`c` counts as straight when both arms are longer than the
/// coordinate tolerance, the angle at `v` is within `angle_tol` of a straight
/// angle, and the perpendicular deviation is within tolerance of the combined
/// arm length.
fn is_collinear(a: &Vertex, v: &Vertex, c: &Vertex, angle_tol: f64, coord_tol: f64) -> bool {
    let ax = a.x - v.x;
    let ay = a.y - v.y;
    let cx = c.x - v.x;
    let cy = c.y - v.y;
    let norm_a = ax.hypot(ay);
    let norm_c = cx.hypot(cy);
    if norm_a <= coord_tol || norm_c <= coord_tol {
        return false;
    }
    let cos = ((ax * cx + ay * cy) / (norm_a * norm_c)).clamp(-1.0, 1.0);
    let angle = cos.acos();
    if (std::f64::consts::PI - angle).abs() > angle_tol {
        return false;
    }
    (ax * cy - ay * cx).abs() <= coord_tol * (norm_a + norm_c)
}
