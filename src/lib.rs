pub mod counter;
pub mod error;
pub mod graph;
pub mod project;
pub mod segment;

pub use counter::{FaceTracingCounter, StrokeTriangleCounter, Triangle, TriangleCounter};
pub use error::{Result, TriCountError};
pub use graph::Graph;
pub use segment::Segment;
