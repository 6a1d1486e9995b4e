use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriCountError};
use crate::segment::Segment;

pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// A loaded project: the coordinate tolerance and the surviving segments,
/// already deduplicated and stripped of zero-length entries.
#[derive(Clone, Debug)]
pub struct ProjectDefinition {
    pub tolerance: f64,
    pub segments: Vec<Segment>,
}

#[derive(Serialize, Deserialize, Default)]
struct ProjectDto {
    #[serde(default)]
    tolerance: f64,
    #[serde(default)]
    segments: Vec<SegmentDto>,
}

#[derive(Serialize, Deserialize, Default)]
struct SegmentDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    x1: f64,
    #[serde(default)]
    y1: f64,
    #[serde(default)]
    x2: f64,
    #[serde(default)]
    y2: f64,
}

/// Reads a project document. Non-positive tolerance falls back to
/// [`DEFAULT_TOLERANCE`]; segments with a missing or blank id get a synthetic
/// `"s" + counter` id; duplicates (order-independent endpoint match within
/// tolerance) and zero-length segments are dropped. A non-finite coordinate
/// is fatal.
pub fn load(path: &Path) -> Result<ProjectDefinition> {
    let file = File::open(path)?;
    let dto: ProjectDto = serde_json::from_reader(BufReader::new(file))?;
    let tolerance = if dto.tolerance > 0.0 {
        dto.tolerance
    } else {
        DEFAULT_TOLERANCE
    };
    let mut segments = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut counter = 0usize;
    for entry in dto.segments {
        let x1 = require_finite(entry.x1, "x1")?;
        let y1 = require_finite(entry.y1, "y1")?;
        let x2 = require_finite(entry.x2, "x2")?;
        let y2 = require_finite(entry.y2, "y2")?;
        if (x2 - x1).hypot(y2 - y1) <= tolerance {
            continue;
        }
        if !seen.insert(segment_key(x1, y1, x2, y2, tolerance)) {
            continue;
        }
        let id = match entry.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                counter += 1;
                format!("s{counter}")
            }
        };
        segments.push(Segment::new(x1, y1, x2, y2, id));
    }
    Ok(ProjectDefinition {
        tolerance,
        segments,
    })
}

/// Writes the inverse document: one object per segment plus the tolerance.
pub fn save(path: &Path, tolerance: f64, segments: &[Segment]) -> Result<()> {
    let dto = ProjectDto {
        tolerance,
        segments: segments
            .iter()
            .map(|s| SegmentDto {
                id: Some(s.id.clone()),
                x1: s.x1,
                y1: s.y1,
                x2: s.x2,
                y2: s.y2,
            })
            .collect(),
    };
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dto)?;
    writer.flush()?;
    Ok(())
}

fn require_finite(value: f64, label: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TriCountError::InvalidInput(format!(
            "{label} must be finite"
        )))
    }
}

/// Order-independent key for a segment's quantized endpoint pair.
fn segment_key(x1: f64, y1: f64, x2: f64, y2: f64, tol: f64) -> u64 {
    let a = coordinate_key(x1, y1, tol);
    let b = coordinate_key(x2, y2, tol);
    let lo = a.min(b);
    let hi = a.max(b);
    lo ^ hi.wrapping_mul(1_000_000_007)
}

fn coordinate_key(x: f64, y: f64, tol: f64) -> u64 {
    let scale = if tol > 0.0 { 1.0 / tol } else { 1e9 };
    let qx = (x * scale).round() as i64;
    let qy = (y * scale).round() as i64;
    ((qx as u64) << 32) ^ (qy as u64 & 0xffff_ffff)
}
