//! Hover state machine and visible color buffer.
//!
//! The hover controller owns the only path that writes highlight colors, so
//! the at-most-one-highlight invariant holds by construction: the previous
//! index is restored to the base color before (or instead of) a new index
//! being highlighted.

/// CPU-side mirror of the visible scene's per-point color buffer.
///
/// Layout is `3 * point_count` floats, RGB per point. The renderer uploads
/// the whole buffer whenever [`VisibleColors::take_dirty`] reports a change;
/// the dirty flag is set only when content actually changed, never
/// unconditionally.
#[derive(Debug)]
pub struct VisibleColors {
    data: Vec<f32>,
    base: [f32; 3],
    highlight: [f32; 3],
    dirty: bool,
}

impl VisibleColors {
    /// Creates a buffer with every point at the base color.
    ///
    /// The fresh buffer is marked dirty so it gets its initial upload.
    #[must_use]
    pub fn new(point_count: usize, base: [f32; 3], highlight: [f32; 3]) -> Self {
        let mut colors = Self {
            data: Vec::new(),
            base,
            highlight,
            dirty: false,
        };
        colors.rebuild(point_count);
        colors
    }

    /// Resets the buffer to `point_count` base-colored points.
    ///
    /// Called on data generation changes; any previous highlight is gone
    /// because the indices it referred to are gone.
    pub fn rebuild(&mut self, point_count: usize) {
        self.data.clear();
        self.data.reserve(point_count * 3);
        for _ in 0..point_count {
            self.data.extend_from_slice(&self.base);
        }
        self.dirty = true;
    }

    /// Writes the highlight color at `index`.
    pub fn set_highlight(&mut self, index: u32) {
        self.write(index, self.highlight);
    }

    /// Restores the base color at `index`.
    pub fn clear_highlight(&mut self, index: u32) {
        self.write(index, self.base);
    }

    fn write(&mut self, index: u32, rgb: [f32; 3]) {
        let offset = index as usize * 3;
        if let Some(slot) = self.data.get_mut(offset..offset + 3) {
            if *slot != rgb {
                slot.copy_from_slice(&rgb);
                self.dirty = true;
            }
        }
    }

    /// Returns the raw RGB data.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the number of points covered by the buffer.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.data.len() / 3
    }

    /// Reports and clears the needs-upload flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Counts how many points currently hold the highlight color.
    #[must_use]
    pub fn highlight_count(&self) -> usize {
        self.data
            .chunks_exact(3)
            .filter(|c| **c == self.highlight)
            .count()
    }
}

/// Two-state hover machine: Idle (`current == None`) or Hovering(i).
///
/// State is tagged with the data generation it refers to; a generation
/// change forces Idle without any restore write, since the old indices are
/// meaningless against the new sequence.
#[derive(Debug)]
pub struct HoverController {
    current: Option<u32>,
    previous: Option<u32>,
    generation: u64,
}

impl HoverController {
    /// Creates an Idle controller tagged with `generation`.
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            current: None,
            previous: None,
            generation,
        }
    }

    /// Returns the currently hovered index, if any.
    #[must_use]
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    /// Returns the previously hovered index, if any.
    #[must_use]
    pub fn previous(&self) -> Option<u32> {
        self.previous
    }

    /// Returns the generation this state refers to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forces Idle with no restore write and re-tags the generation.
    pub fn reset(&mut self, generation: u64) {
        self.current = None;
        self.previous = None;
        self.generation = generation;
    }

    /// Applies one decoded pick result.
    ///
    /// A self-transition is a no-op with no buffer write. Otherwise the old
    /// index (if any) is restored to base and the new index (if any) is
    /// highlighted.
    pub fn apply(&mut self, picked: Option<u32>, colors: &mut VisibleColors) {
        if picked == self.current {
            return;
        }
        if let Some(old) = self.current {
            colors.clear_highlight(old);
        }
        if let Some(new) = picked {
            colors.set_highlight(new);
        }
        self.previous = self.current;
        self.current = picked;
        log::debug!("hover -> {:?}", self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [f32; 3] = [0.5, 0.0, 0.5];
    const HIGHLIGHT: [f32; 3] = [1.0, 1.0, 0.0];

    fn setup(n: usize) -> (HoverController, VisibleColors) {
        let mut colors = VisibleColors::new(n, BASE, HIGHLIGHT);
        assert!(colors.take_dirty(), "fresh buffer needs its first upload");
        (HoverController::new(1), colors)
    }

    fn color_at(colors: &VisibleColors, index: usize) -> [f32; 3] {
        let c = &colors.data()[index * 3..index * 3 + 3];
        [c[0], c[1], c[2]]
    }

    #[test]
    fn test_idle_to_hovering() {
        let (mut hover, mut colors) = setup(10);
        hover.apply(Some(4), &mut colors);
        assert_eq!(hover.current(), Some(4));
        assert_eq!(hover.previous(), None);
        assert_eq!(color_at(&colors, 4), HIGHLIGHT);
        assert!(colors.take_dirty());
    }

    #[test]
    fn test_hovering_to_hovering_restores_old_index() {
        let (mut hover, mut colors) = setup(10);
        hover.apply(Some(2), &mut colors);
        hover.apply(Some(7), &mut colors);
        assert_eq!(hover.current(), Some(7));
        assert_eq!(hover.previous(), Some(2));
        assert_eq!(color_at(&colors, 2), BASE);
        assert_eq!(color_at(&colors, 7), HIGHLIGHT);
    }

    #[test]
    fn test_hovering_to_idle() {
        let (mut hover, mut colors) = setup(10);
        hover.apply(Some(3), &mut colors);
        colors.take_dirty();
        hover.apply(None, &mut colors);
        assert_eq!(hover.current(), None);
        assert_eq!(hover.previous(), Some(3));
        assert_eq!(color_at(&colors, 3), BASE);
        assert!(colors.take_dirty());
    }

    #[test]
    fn test_self_transition_is_a_noop() {
        let (mut hover, mut colors) = setup(10);
        hover.apply(Some(5), &mut colors);
        colors.take_dirty();
        hover.apply(Some(5), &mut colors);
        assert!(!colors.take_dirty(), "self-transition must not mark dirty");

        hover.apply(None, &mut colors);
        colors.take_dirty();
        hover.apply(None, &mut colors);
        assert!(!colors.take_dirty(), "Idle -> Idle must not mark dirty");
    }

    #[test]
    fn test_at_most_one_highlight_over_many_transitions() {
        let (mut hover, mut colors) = setup(32);
        let sequence = [
            Some(0),
            Some(31),
            Some(31),
            None,
            Some(7),
            Some(8),
            Some(7),
            None,
            None,
            Some(15),
        ];
        for picked in sequence {
            hover.apply(picked, &mut colors);
            assert!(
                colors.highlight_count() <= 1,
                "more than one highlight after applying {picked:?}"
            );
            assert_eq!(colors.highlight_count() == 1, hover.current().is_some());
        }
    }

    #[test]
    fn test_reset_writes_nothing() {
        let (mut hover, mut colors) = setup(10);
        hover.apply(Some(6), &mut colors);
        colors.take_dirty();

        // Forced reset leaves the buffer alone; the caller rebuilds it for
        // the new generation.
        hover.reset(2);
        assert_eq!(hover.current(), None);
        assert_eq!(hover.previous(), None);
        assert_eq!(hover.generation(), 2);
        assert!(!colors.take_dirty());
        assert_eq!(color_at(&colors, 6), HIGHLIGHT);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        // decode_pixel already rejects ids beyond the point count; a write
        // past the buffer end must still be a no-op rather than a panic.
        let (mut hover, mut colors) = setup(4);
        hover.apply(Some(99), &mut colors);
        assert_eq!(colors.highlight_count(), 0);
    }
}
