//! Rendering
//!
//! Shapes are tessellated into flat-colored triangles on the CPU, then drawn
//! by a single WebGPU pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::VertexBatch;
pub use vertex::Vertex;
