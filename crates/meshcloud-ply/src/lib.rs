//! Reader for **PLY** point clouds.
//!
//! Only the vertex element is decoded. Each vertex yields one position
//! `[x, y, z, 1]` and one RGBA color, both as four `f32`s so they can be handed
//! to the renderer's vertex streams unchanged.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`header`] | `Header`, `Element`, `Property`, `ScalarType`, `Format` |
//! | [`error`] | `PlyError` |
//! | [`reader`] | `PointCloud`, `read_ply`, `load_path` |
//!
//! # Quick start
//!
//! ```rust
//! use meshcloud_ply::read_ply;
//!
//! let mut bytes = b"ply\nformat binary_little_endian 1.0\n\
//!     element vertex 1\nproperty float x\nproperty float y\nproperty float z\n\
//!     end_header\n".to_vec();
//! for v in [1.0f32, 2.0, 3.0] {
//!     bytes.extend_from_slice(&v.to_le_bytes());
//! }
//!
//! let cloud = read_ply(&bytes[..]).unwrap();
//! assert_eq!(cloud.positions, [[0.0, 0.0, 0.0, 1.0]]);
//! ```

pub mod error;
pub mod header;
pub mod reader;

pub use error::PlyError;
pub use header::Header;
pub use reader::{load_path, read_ply, PointCloud};
