//! CPU-side state awaiting the next render dispatch.
//!
//! The host writes vertex streams, draw parameters and transform matrices at
//! any time; the render dispatcher reads them when a render event fires.

mod frame;
mod matrix;
mod point;
mod stream;

pub use frame::FrameStaging;
pub use matrix::{mat4_from_rows, Mat4, IDENTITY};
pub use point::PointXYZW;
pub use stream::VertexStream;
