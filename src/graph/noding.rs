use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo_types::{Coord, Line};
use rstar::{RTree, RTreeObject, AABB};

#[derive(Clone, Copy, Debug)]
struct IndexedLine {
    line: Line<f64>,
    index: usize,
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let p1 = self.line.start;
        let p2 = self.line.end;
        AABB::from_corners(
            [p1.x.min(p2.x), p1.y.min(p2.y)],
            [p1.x.max(p2.x), p1.y.max(p2.y)],
        )
    }
}

/// Splits every line at every intersection or overlap point it participates
/// in. Returns one point chain per input line, ordered from `start` to `end`;
/// chains always begin and end with the original endpoints.
///
/// T-junctions split the crossed line, and collinear overlaps split both
/// lines at the overlap endpoints, so shared points become shared chain
/// points. Splitting straight segments never creates new crossings, so a
/// single pass over the candidate pairs is complete.
pub(crate) fn node_lines(lines: &[Line<f64>], tol: f64) -> Vec<Vec<Coord<f64>>> {
    let indexed: Vec<IndexedLine> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| IndexedLine { line: *line, index })
        .collect();
    let tree = RTree::bulk_load(indexed);

    let mut splits: Vec<Vec<Coord<f64>>> = vec![Vec::new(); lines.len()];
    for (cand1, cand2) in tree.intersection_candidates_with_other_tree(&tree) {
        if cand1.index >= cand2.index {
            continue;
        }
        let Some(hit) = line_intersection(cand1.line, cand2.line) else {
            continue;
        };
        match hit {
            LineIntersection::SinglePoint {
                intersection: pt, ..
            } => {
                push_internal(&mut splits[cand1.index], cand1.line, pt, tol);
                push_internal(&mut splits[cand2.index], cand2.line, pt, tol);
            }
            LineIntersection::Collinear {
                intersection: overlap,
            } => {
                for pt in [overlap.start, overlap.end] {
                    push_internal(&mut splits[cand1.index], cand1.line, pt, tol);
                    push_internal(&mut splits[cand2.index], cand2.line, pt, tol);
                }
            }
        }
    }

    lines
        .iter()
        .zip(splits)
        .map(|(line, mut points)| {
            let start = line.start;
            points.sort_by(|a, b| dist2(start, *a).total_cmp(&dist2(start, *b)));
            points.dedup_by(|a, b| (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol);
            let mut chain = Vec::with_capacity(points.len() + 2);
            chain.push(start);
            chain.extend(points);
            chain.push(line.end);
            chain
        })
        .collect()
}

/// A split point is only recorded when it lies strictly inside the line;
/// intersections at an endpoint need no split there.
fn push_internal(splits: &mut Vec<Coord<f64>>, line: Line<f64>, pt: Coord<f64>, tol: f64) {
    let tol2 = tol * tol;
    if dist2(line.start, pt) > tol2 && dist2(line.end, pt) > tol2 {
        splits.push(pt);
    }
}

fn dist2(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
