pub mod solid;
pub mod surface;
pub mod vertex_buffer;

pub use solid::Solid;
pub use surface::{Shell, Surface};
pub use vertex_buffer::VertexBuffer;
