//! Orbit control with inertial damping and idle auto-rotation.

use pickview_render::Camera;

/// Turntable orbit controller driven by mouse drags.
///
/// Drag deltas move the camera immediately and leave a residual angular
/// velocity, so releasing mid-motion lets the camera coast to a stop. Once
/// at rest the camera slowly auto-rotates around the target. Neither
/// coasting nor auto-rotation is a drag gesture; hover picking resumes as
/// soon as the button is released.
#[derive(Debug)]
pub struct OrbitController {
    velocity: (f32, f32),
    rotate_speed: f32,
    damping: f32,
    auto_rotate: bool,
    auto_rotate_speed: f32,
}

impl OrbitController {
    const STOP_THRESHOLD: f32 = 1e-4;

    /// Radians per frame for auto_rotate_speed 1.0, assuming 60 fps.
    const AUTO_ROTATE_STEP: f32 = std::f32::consts::TAU / 3600.0;

    #[must_use]
    pub fn new() -> Self {
        Self {
            velocity: (0.0, 0.0),
            rotate_speed: 0.01,
            damping: 0.88,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
        }
    }

    /// Applies a drag delta in pixels.
    pub fn rotate(&mut self, camera: &mut Camera, delta_x: f32, delta_y: f32) {
        let dx = delta_x * self.rotate_speed;
        let dy = delta_y * self.rotate_speed;
        camera.orbit(dx, dy);
        self.velocity = (dx, dy);
    }

    /// Advances the coasting or auto-rotation motion by one frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let (dx, dy) = self.velocity;
        if dx.abs() < Self::STOP_THRESHOLD && dy.abs() < Self::STOP_THRESHOLD {
            self.velocity = (0.0, 0.0);
            if self.auto_rotate {
                camera.orbit(Self::AUTO_ROTATE_STEP * self.auto_rotate_speed, 0.0);
            }
            return;
        }
        camera.orbit(dx, dy);
        self.velocity = (dx * self.damping, dy * self.damping);
    }

    /// Stops any residual motion.
    pub fn halt(&mut self) {
        self.velocity = (0.0, 0.0);
    }

    /// Returns whether the camera is still coasting.
    #[must_use]
    pub fn is_coasting(&self) -> bool {
        self.velocity.0.abs() >= Self::STOP_THRESHOLD
            || self.velocity.1.abs() >= Self::STOP_THRESHOLD
    }

    /// Enables or disables idle auto-rotation.
    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}
