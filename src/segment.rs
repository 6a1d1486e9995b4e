use geo_types::{Coord, Line};

/// An input line segment: two endpoints plus a stable caller-supplied id.
///
/// Uniqueness of `id` is the caller's responsibility. Segments whose length
/// is within the coordinate tolerance are discarded before noding.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub id: String,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, id: impl Into<String>) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            id: id.into(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    pub fn start(&self) -> Coord<f64> {
        Coord {
            x: self.x1,
            y: self.y1,
        }
    }

    pub fn end(&self) -> Coord<f64> {
        Coord {
            x: self.x2,
            y: self.y2,
        }
    }

    pub fn line(&self) -> Line<f64> {
        Line::new(self.start(), self.end())
    }
}
