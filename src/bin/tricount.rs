use std::path::PathBuf;

use clap::Parser;
use geo_tricount::{project, FaceTracingCounter, Graph, Triangle, TriangleCounter};

#[derive(Parser, Debug)]
#[command(version, about = "Counts the triangles formed by a set of 2D line segments")]
struct Args {
    /// Input project file (JSON)
    input: PathBuf,

    /// Collinearity tolerance for straight-vertex contraction
    #[arg(default_value_t = 1e-6)]
    angle_tol: f64,
}

fn main() -> geo_tricount::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let project = project::load(&args.input)?;
    let counter = FaceTracingCounter;
    let planar = counter.build_planar_graph(&project.segments, project.tolerance)?;
    let contracted = counter.contract_straight_vertices(&planar, args.angle_tol);
    let triangles = counter.triangles(&contracted);

    println!("Segments: {}", project.segments.len());
    println!("Vertices: {}", contracted.vertices().len());
    println!("Edges: {}", contracted.edges().len());
    println!("Triangles: {}", triangles.len());
    println!();
    print_vertices(&contracted);
    print_edges(&contracted);
    print_triangles(&contracted, &triangles);
    Ok(())
}

fn print_vertices(graph: &Graph) {
    println!("Vertices:");
    for vertex in graph.vertices() {
        println!(
            "  {} (id={}): ({:.6}, {:.6})",
            name_for(vertex.id),
            vertex.id,
            vertex.x,
            vertex.y
        );
    }
    println!();
}

fn print_edges(graph: &Graph) {
    println!("Edges:");
    let mut edges: Vec<_> = graph.edges().to_vec();
    edges.sort_by_key(|e| {
        let mut names = [name_for(e.u()), name_for(e.v())];
        names.sort();
        names.join("")
    });
    for edge in edges {
        println!(
            "  {}-{} (ids={}-{})",
            name_for(edge.u()),
            name_for(edge.v()),
            edge.u(),
            edge.v()
        );
    }
    println!();
}

fn print_triangles(graph: &Graph, triangles: &[Triangle]) {
    println!("Triangles:");
    let mut ordered: Vec<_> = triangles.to_vec();
    ordered.sort_by_key(|t| {
        let mut names = [name_for(t[0]), name_for(t[1]), name_for(t[2])];
        names.sort();
        names.join("")
    });
    for triangle in ordered {
        let name: String = triangle.iter().map(|&id| name_for(id)).collect();
        println!(
            "  {} (ids={},{},{}) area={:.6}",
            name,
            triangle[0],
            triangle[1],
            triangle[2],
            triangle_area(graph, &triangle)
        );
    }
}

fn triangle_area(graph: &Graph, triangle: &Triangle) -> f64 {
    let a = graph.vertices()[triangle[0]];
    let b = graph.vertices()[triangle[1]];
    let c = graph.vertices()[triangle[2]];
    let area2 = (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)).abs();
    0.5 * area2
}

/// Base-26 alphabetic vertex names: 0 -> A, 25 -> Z, 26 -> AA, ...
fn name_for(id: usize) -> String {
    let mut bytes = Vec::new();
    let mut value = id as i64;
    while value >= 0 {
        bytes.push(b'A' + (value % 26) as u8);
        value = value / 26 - 1;
    }
    bytes.reverse();
    String::from_utf8(bytes).unwrap_or_default()
}
