pub mod builder;
pub mod contract;
mod noding;
pub mod planar_graph;


pub use builder::build;
pub use contract::contract_straight_vertices;
pub use planar_graph::{Edge, Graph, Vertex, VertexId};
