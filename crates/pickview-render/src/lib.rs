//! Rendering backend for pickview.
//!
//! This crate provides the wgpu-based rendering engine:
//! - Device/surface setup and the visible point pass
//! - The offscreen pick surface and single-pixel readback
//! - Point cloud GPU buffers (positions, visible colors, picking colors)
//! - Camera and view management

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod engine;
pub mod error;
pub mod point_cloud_render;

pub use camera::Camera;
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use point_cloud_render::{build_pick_colors, pack_rgb, PointCloudRenderData, PointUniforms};
