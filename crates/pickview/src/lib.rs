//! pickview: an interactive point cloud viewer with GPU hover picking.
//!
//! The viewer renders a random point cloud as screen-space discs and tracks
//! which point is under the cursor through an offscreen color-ID pick pass.
//! The hovered point lights up yellow; pressing Space replaces the whole
//! cloud with a fresh random sequence.
//!
//! # Quick Start
//!
//! ```no_run
//! fn main() {
//!     pickview::show();
//! }
//! ```
//!
//! Controls:
//!
//! - Left drag: orbit the camera (hover picking pauses during the drag)
//! - Scroll: zoom
//! - Space: regenerate the point cloud
//! - Escape: quit

mod app;
mod orbit;
mod points;

pub use app::App;
pub use points::generate_random_points;

// Re-export the types a caller needs alongside the viewer
pub use pickview_core::{PickError, PointStore, Result, Vec3};

/// Shows the viewer window.
///
/// This function blocks until the window is closed.
pub fn show() {
    let _ = env_logger::try_init();
    app::run_app();
}
