//! Meshcloud engine crate.
//!
//! This crate owns everything a native engine plugin needs to draw point
//! clouds with mesh shaders, independent of the plugin's C ABI:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`backend`] | `GraphicsBackend` contract, factory, OpenGL mesh-shader backend |
//! | [`device`] | Graphics API ids, device events, the device event router |
//! | [`staging`] | Vertex records, vertex streams, matrices, frame staging state |
//! | [`render`] | Render event ids and the render dispatcher |
//! | [`core`] | `PluginContext` tying the pieces together, debug channel |
//! | [`config`] | Runtime configuration |
//! | [`logging`] | Logger initialization |
//!
//! Data flows host → staging setters → render event → dispatcher → backend.
//! Nothing in this crate spawns threads or blocks; every entry point is meant
//! to be called serially from the host's render thread.

pub mod backend;
pub mod config;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod staging;
