//! Application window and event loop management.

mod input;
mod picking;
mod render;

pub(super) use std::sync::Arc;

pub(super) use pollster::FutureExt;
pub(super) use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub(super) use pickview_core::{FrameInput, PickingDriver, PointStore, Vec2, VisibleColors};
pub(super) use pickview_render::{PointCloudRenderData, RenderEngine};

pub(super) use crate::orbit::OrbitController;

/// Visible point color.
pub(super) const BASE_COLOR: [f32; 3] = [0.5, 0.0, 0.5];
/// Hovered point color.
pub(super) const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
/// Scene background.
pub(super) const BACKGROUND: [f64; 3] = [0.05, 0.05, 0.08];
/// Point diameter in pixels.
pub(super) const POINT_SIZE: f32 = 10.0;
/// Accumulated motion in pixels before a press counts as a drag.
pub(super) const DRAG_THRESHOLD: f64 = 5.0;

/// The viewer application state.
pub struct App {
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    pub(super) close_requested: bool,
    // Point data and picking state
    pub(super) store: PointStore,
    pub(super) colors: VisibleColors,
    pub(super) driver: PickingDriver,
    pub(super) cloud: Option<PointCloudRenderData>,
    // Mouse state for camera control and picking
    // These track the PHYSICAL button state, updated on every press/release
    pub(super) cursor: Option<Vec2>,
    pub(super) mouse_pos: (f64, f64),
    pub(super) left_mouse_down: bool,
    // Accumulated distance since mouse press
    pub(super) drag_distance: f64,
    pub(super) orbit: OrbitController,
}

impl App {
    /// Creates the application with an initial random point cloud.
    #[must_use]
    pub fn new() -> Self {
        let mut store = PointStore::new();
        let points = crate::points::generate_random_points(&mut rand::thread_rng());
        if let Err(err) = store.replace(points) {
            log::warn!("initial point cloud rejected: {err}");
        }

        let colors = VisibleColors::new(store.len(), BASE_COLOR, HIGHLIGHT_COLOR);
        let driver = PickingDriver::new(store.generation());

        Self {
            window: None,
            engine: None,
            close_requested: false,
            store,
            colors,
            driver,
            cloud: None,
            cursor: None,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
            drag_distance: 0.0,
            orbit: OrbitController::new(),
        }
    }

    /// Replaces the point cloud with a fresh random sequence.
    pub fn regenerate_points(&mut self) {
        let points = crate::points::generate_random_points(&mut rand::thread_rng());
        if let Err(err) = self.store.replace(points) {
            log::warn!("point cloud replacement rejected: {err}");
        }
    }

    /// Returns the index of the point currently under the cursor, if any.
    #[must_use]
    pub fn hovered_point(&self) -> Option<u32> {
        self.driver.hovered()
    }

    /// Returns the number of points in the current cloud.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.store.len()
    }

    /// Returns the current data generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// Whether a camera drag gesture is active.
    ///
    /// A press only becomes a drag once the cursor has moved past the
    /// threshold, so a steady click does not blank the hover highlight.
    pub(super) fn is_dragging(&self) -> bool {
        self.left_mouse_down && self.drag_distance > DRAG_THRESHOLD
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the viewer application.
pub fn run_app() {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = App::new();

    event_loop.run_app(&mut app).expect("event loop error");
}
