//! Per-frame picking orchestration.
//!
//! The driver owns the ordering rules of the picking step: suppression
//! while the camera is being dragged, forced hover reset on data generation
//! changes, and the cursor to pixel mapping. The actual pick render and
//! pixel readback are supplied as a closure so the whole sequence is
//! testable without a GPU, and so a suppressed frame provably performs
//! neither the render nor the read.

use glam::Vec2;

use crate::hover::{HoverController, VisibleColors};
use crate::pick::decode_pixel;

/// Everything the picking step needs from the outside world, captured once
/// per frame instead of through per-frame closures over loop state.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Normalized cursor position in `[-1, 1]^2`, y up. `None` until the
    /// first pointer move.
    pub cursor: Option<Vec2>,
    /// Current viewport size in pixels.
    pub viewport: (u32, u32),
    /// Whether a camera drag gesture is active this frame.
    pub dragging: bool,
    /// The point store's current data generation.
    pub generation: u64,
}

/// Maps a normalized cursor position to pick-buffer pixel coordinates.
///
/// `x = (mx*0.5 + 0.5) * width`, `y = (my*0.5 + 0.5) * height`, with y
/// counted from the bottom of the target. Returns `None` when the result
/// falls outside the target, which can happen transiently during a resize
/// or before the first pointer move; such frames are "no hit" and the
/// readback must not be attempted.
#[must_use]
pub fn cursor_to_pixel(cursor: Vec2, width: u32, height: u32) -> Option<(u32, u32)> {
    #[allow(clippy::cast_precision_loss)]
    let x = (cursor.x * 0.5 + 0.5) * width as f32;
    #[allow(clippy::cast_precision_loss)]
    let y = (cursor.y * 0.5 + 0.5) * height as f32;
    if x < 0.0 || y < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x, y) = (x as u32, y as u32);
    if x >= width || y >= height {
        return None;
    }
    Some((x, y))
}

/// Drives the per-frame pick, decode, and hover sequence.
pub struct PickingDriver {
    hover: HoverController,
}

impl PickingDriver {
    /// Creates a driver whose hover state is tagged with `generation`.
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            hover: HoverController::new(generation),
        }
    }

    /// Returns the currently hovered point index, if any.
    ///
    /// Read-only snapshot for the UI layer; only [`PickingDriver::step`]
    /// mutates hover state.
    #[must_use]
    pub fn hovered(&self) -> Option<u32> {
        self.hover.current()
    }

    /// Runs one frame of the picking sequence.
    ///
    /// `read_pixel` performs the pick-pass render plus the single-pixel
    /// readback and returns the raw RGBA bytes; it is invoked at most once,
    /// and never while `input.dragging` is set. A generation change forces
    /// the hover state to Idle (no restore write; the caller has already
    /// rebuilt `colors` for the new sequence) before the frame is evaluated
    /// normally. The first frame after a drag ends evaluates against the
    /// cursor position retained during the drag.
    pub fn step<F>(
        &mut self,
        input: &FrameInput,
        point_count: usize,
        colors: &mut VisibleColors,
        read_pixel: F,
    ) -> Option<u32>
    where
        F: FnOnce(u32, u32) -> Option<[u8; 4]>,
    {
        if input.generation != self.hover.generation() {
            self.hover.reset(input.generation);
        }

        if input.dragging {
            return self.hover.current();
        }

        let picked = input
            .cursor
            .and_then(|c| cursor_to_pixel(c, input.viewport.0, input.viewport.1))
            .and_then(|(x, y)| read_pixel(x, y))
            .and_then(|pixel| decode_pixel(pixel, point_count));

        self.hover.apply(picked, colors);
        self.hover.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pick::encode_index;

    const BASE: [f32; 3] = [0.5, 0.0, 0.5];
    const HIGHLIGHT: [f32; 3] = [1.0, 1.0, 0.0];

    fn input(generation: u64) -> FrameInput {
        FrameInput {
            cursor: Some(Vec2::ZERO),
            viewport: (800, 600),
            dragging: false,
            generation,
        }
    }

    fn pixel_for(index: u32) -> [u8; 4] {
        let [r, g, b] = encode_index(index).unwrap();
        [r, g, b, 255]
    }

    #[test]
    fn test_cursor_to_pixel_mapping() {
        assert_eq!(cursor_to_pixel(Vec2::new(0.0, 0.0), 800, 600), Some((400, 300)));
        assert_eq!(cursor_to_pixel(Vec2::new(-1.0, -1.0), 800, 600), Some((0, 0)));
        // +1 on either axis lands exactly on the excluded upper edge
        assert_eq!(cursor_to_pixel(Vec2::new(1.0, 0.0), 800, 600), None);
        assert_eq!(cursor_to_pixel(Vec2::new(0.0, 1.0), 800, 600), None);
        assert_eq!(cursor_to_pixel(Vec2::new(-1.5, 0.0), 800, 600), None);
        assert_eq!(cursor_to_pixel(Vec2::new(0.0, 0.0), 0, 0), None);
    }

    #[test]
    fn test_pixel_coordinates_follow_current_viewport() {
        // The same cursor position must map through whatever dimensions the
        // frame reports: x=896 is only reachable once the viewport says
        // 1024x768, so a stale 800x600 target can never be asked for it.
        let cursor = Vec2::new(0.75, -0.5);
        assert_eq!(cursor_to_pixel(cursor, 800, 600), Some((700, 150)));
        assert_eq!(cursor_to_pixel(cursor, 1024, 768), Some((896, 192)));
    }

    #[test]
    fn test_step_decodes_and_hovers() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        colors.take_dirty();

        let hovered = driver.step(&input(1), 10, &mut colors, |_, _| Some(pixel_for(3)));
        assert_eq!(hovered, Some(3));
        assert_eq!(driver.hovered(), Some(3));
        assert!(colors.take_dirty());
    }

    #[test]
    fn test_dragging_skips_render_and_readback() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        driver.step(&input(1), 10, &mut colors, |_, _| Some(pixel_for(5)));
        colors.take_dirty();

        let mut reads = 0;
        for _ in 0..8 {
            let mut frame = input(1);
            frame.dragging = true;
            let hovered = driver.step(&frame, 10, &mut colors, |_, _| {
                reads += 1;
                None
            });
            assert_eq!(hovered, Some(5), "hover must not change while dragging");
        }
        assert_eq!(reads, 0, "no readback may occur while dragging");
        assert!(!colors.take_dirty());
    }

    #[test]
    fn test_first_frame_after_drag_uses_retained_cursor() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        driver.step(&input(1), 10, &mut colors, |_, _| Some(pixel_for(2)));

        let mut frame = input(1);
        frame.dragging = true;
        frame.cursor = Some(Vec2::new(0.5, 0.5)); // moved during the drag
        driver.step(&frame, 10, &mut colors, |_, _| unreachable!());

        // Drag released: same cursor, evaluated immediately.
        frame.dragging = false;
        let mut read_at = None;
        let hovered = driver.step(&frame, 10, &mut colors, |x, y| {
            read_at = Some((x, y));
            Some(pixel_for(7))
        });
        assert_eq!(read_at, Some((600, 450)));
        assert_eq!(hovered, Some(7));
    }

    #[test]
    fn test_generation_change_forces_idle() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        driver.step(&input(1), 10, &mut colors, |_, _| Some(pixel_for(9)));
        assert_eq!(driver.hovered(), Some(9));

        // New generation, background under the cursor: state is Idle even
        // though no transition out of Hovering(9) was ever observed.
        colors.rebuild(4);
        colors.take_dirty();
        let hovered = driver.step(&input(2), 4, &mut colors, |_, _| None);
        assert_eq!(hovered, None);
        assert!(!colors.take_dirty(), "reset performs no restore write");
    }

    #[test]
    fn test_generation_change_while_dragging_still_resets() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        driver.step(&input(1), 10, &mut colors, |_, _| Some(pixel_for(1)));

        let mut frame = input(2);
        frame.dragging = true;
        let hovered = driver.step(&frame, 10, &mut colors, |_, _| unreachable!());
        assert_eq!(hovered, None, "stale index must not survive a new generation");
    }

    #[test]
    fn test_no_cursor_means_no_read_and_no_hit() {
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        let mut frame = input(1);
        frame.cursor = None;

        let mut reads = 0;
        let hovered = driver.step(&frame, 10, &mut colors, |_, _| {
            reads += 1;
            None
        });
        assert_eq!(hovered, None);
        assert_eq!(reads, 0);
    }

    #[test]
    fn test_hover_sequence_dirty_marks() {
        // hover 3 -> hover 7 -> hover None: exactly three uploads, and only
        // indices 3 and 7 are ever touched.
        let mut driver = PickingDriver::new(1);
        let mut colors = VisibleColors::new(10, BASE, HIGHLIGHT);
        colors.take_dirty();

        let frames: [Option<u32>; 3] = [Some(3), Some(7), None];
        let mut dirty_marks = 0;
        for picked in frames {
            driver.step(&input(1), 10, &mut colors, |_, _| picked.map(pixel_for));
            if colors.take_dirty() {
                dirty_marks += 1;
            }
        }
        assert_eq!(dirty_marks, 3);

        for i in 0..10 {
            let c = &colors.data()[i * 3..i * 3 + 3];
            assert_eq!(c, BASE.as_slice(), "index {i} should be back at base");
        }
    }
}
