//! vitrine
//!
//! A small, cross-platform 3D model viewer built on wgpu. The viewer loads a
//! handful of demo models (a ground plane, a low-poly house, a stack of
//! pancakes, a retro TV), renders the selected one with a single forward
//! pipeline and lets the user orbit the camera around it. The crate keeps the
//! runtime surface minimal so it can run natively or in the browser.
//!
//! High-level modules
//! - `math`: transform and projection matrix builders, fixed to wgpu clip space
//! - `common`: shader-visible data layout shared between CPU and WGSL
//! - `camera`: orbit camera and perspective projection state
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: viewer data models (meshes, materials, textures)
//! - `resources`: helpers to load models/textures and create GPU resources
//! - `pipelines`: definition of the forward model pipeline
//! - `view`: the model view, the application driver and the `run` entry point
//!

pub mod camera;
pub mod common;
pub mod context;
pub mod data_structures;
pub mod math;
pub mod pipelines;
pub mod resources;
pub mod view;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
