use std::collections::HashMap;

use geo_types::{Coord, Line};
use log::debug;
use smallvec::SmallVec;

use crate::error::{Result, TriCountError};
use crate::graph::noding::node_lines;
use crate::graph::planar_graph::{Edge, Graph, Vertex, VertexId};
use crate::segment::Segment;

/// Used when the caller passes a non-positive coordinate tolerance.
const FALLBACK_TOL: f64 = 1e-9;

/// Merges noded coordinates into vertices. Two coordinates map to the same
/// vertex iff they fall in the same tolerance-sized quantization bucket AND
/// their Euclidean distance is within tolerance; the bucket is only a
/// pre-filter, the distance check is the accepted predicate.
struct VertexPool {
    tol: f64,
    scale: f64,
    buckets: HashMap<(i64, i64), SmallVec<[VertexId; 4]>>,
    vertices: Vec<Vertex>,
}

impl VertexPool {
    fn new(tol: f64) -> Self {
        Self {
            tol,
            scale: 1.0 / tol,
            buckets: HashMap::new(),
            vertices: Vec::new(),
        }
    }

    fn resolve(&mut self, c: Coord<f64>) -> VertexId {
        let key = (
            (c.x * self.scale).round() as i64,
            (c.y * self.scale).round() as i64,
        );
        let ids = self.buckets.entry(key).or_default();
        for &id in ids.iter() {
            let existing = &self.vertices[id];
            if (existing.x - c.x).hypot(existing.y - c.y) <= self.tol {
                return id;
            }
        }
        let id = self.vertices.len();
        self.vertices.push(Vertex { id, x: c.x, y: c.y });
        ids.push(id);
        id
    }
}

/// Nodes the segments into a planar arrangement.
///
/// Fails only when `coord_tol` is non-finite; a non-positive tolerance falls
/// back to a small positive default. Degenerate geometry is normalized, not
/// rejected: zero-length segments are discarded up front and zero-length
/// noded sub-edges are dropped during the walk.
pub fn build(segments: &[Segment], coord_tol: f64) -> Result<Graph> {
    if !coord_tol.is_finite() {
        return Err(TriCountError::InvalidInput(format!(
            "coordinate tolerance must be finite, got {coord_tol}"
        )));
    }
    let tol = if coord_tol > 0.0 { coord_tol } else { FALLBACK_TOL };

    let survivors: Vec<&Segment> = segments.iter().filter(|s| s.length() > tol).collect();
    if survivors.is_empty() {
        return Ok(Graph::new(
            Vec::new(),
            Vec::new(),
            HashMap::new(),
            tol,
            Vec::new(),
            Vec::new(),
        ));
    }

    let lines: Vec<Line<f64>> = survivors.iter().map(|s| s.line()).collect();
    let chains = node_lines(&lines, tol);

    let mut pool = VertexPool::new(tol);
    let mut edges: Vec<Edge> = Vec::new();
    let mut multiplicity: HashMap<Edge, u32> = HashMap::new();
    let mut segment_edges: Vec<Edge> = Vec::new();
    let mut paths: Vec<Vec<VertexId>> = Vec::with_capacity(survivors.len());

    for (segment, chain) in survivors.iter().copied().zip(&chains) {
        // (projection parameter, vertex) pairs; minimum parameter wins when a
        // vertex is touched more than once along the same segment.
        let mut touched: Vec<(f64, VertexId)> = Vec::new();
        for pair in chain.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if (a.x - b.x).hypot(a.y - b.y) <= tol {
                continue;
            }
            let va = pool.resolve(a);
            let vb = pool.resolve(b);
            if va == vb {
                continue;
            }
            let edge = Edge::new(va, vb);
            let count = multiplicity.entry(edge).or_insert(0);
            if *count == 0 {
                edges.push(edge);
            }
            *count += 1;
            record_touch(&mut touched, segment, &pool.vertices, va);
            record_touch(&mut touched, segment, &pool.vertices, vb);
        }

        let va = pool.resolve(segment.start());
        let vb = pool.resolve(segment.end());
        if va != vb {
            segment_edges.push(Edge::new(va, vb));
            record_touch(&mut touched, segment, &pool.vertices, va);
            record_touch(&mut touched, segment, &pool.vertices, vb);
        }

        touched.sort_by(|a, b| a.0.total_cmp(&b.0));
        paths.push(touched.into_iter().map(|(_, v)| v).collect());
    }

    debug!(
        "noded {} segments into {} vertices / {} edges (tol {:e})",
        survivors.len(),
        pool.vertices.len(),
        edges.len(),
        tol
    );

    Ok(Graph::new(
        pool.vertices,
        edges,
        multiplicity,
        tol,
        segment_edges,
        paths,
    ))
}

fn record_touch(
    touched: &mut Vec<(f64, VertexId)>,
    segment: &Segment,
    vertices: &[Vertex],
    id: VertexId,
) {
    let vertex = &vertices[id];
    let t = projection_param(segment, vertex.x, vertex.y);
    for entry in touched.iter_mut() {
        if entry.1 == id {
            entry.0 = entry.0.min(t);
            return;
        }
    }
    touched.push((t, id));
}

/// Parameter of the projection of `(x, y)` onto the segment, clamped to
/// `[0, 1]` (0 = start, 1 = end).
fn projection_param(segment: &Segment, x: f64, y: f64) -> f64 {
    let dx = segment.x2 - segment.x1;
    let dy = segment.y2 - segment.y1;
    let len2 = dx * dx + dy * dy;
    if len2 <= 0.0 {
        return 0.0;
    }
    let t = ((x - segment.x1) * dx + (y - segment.y1) * dy) / len2;
    t.clamp(0.0, 1.0)
}
