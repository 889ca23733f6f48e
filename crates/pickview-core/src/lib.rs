//! Core picking logic for pickview.
//!
//! This crate holds everything about GPU color-ID picking that does not
//! touch the GPU itself:
//! - [`pick`]: the index-to-color codec and its inverse
//! - [`store`]: the point store with generation-tagged atomic replacement
//! - [`hover`]: the hover state machine and visible color buffer
//! - [`frame`]: the per-frame picking driver (cursor mapping, drag
//!   suppression, readback orchestration)
//!
//! The rendering backend supplies a readback closure; nothing here depends
//! on wgpu, which keeps every invariant unit-testable.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod frame;
pub mod hover;
pub mod pick;
pub mod store;

pub use error::{PickError, Result};
pub use frame::{cursor_to_pixel, FrameInput, PickingDriver};
pub use hover::{HoverController, VisibleColors};
pub use pick::{decode_pixel, encode_index, ensure_addressable, MAX_POINT_COUNT};
pub use store::PointStore;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
