//! Viewer data structures: models, materials and textures.
//!
//! - `model` contains the model kinds, mesh/material definitions and the
//!   draw trait that encodes a model into a render pass
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod model;
pub mod texture;
