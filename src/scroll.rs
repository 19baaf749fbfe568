//! Cursor-follow windowing over lists taller than the visible area.

use std::ops::Range;

/// Cursor plus scroll offset over an ordered list. When `window` is set and
/// smaller than the list, `offset <= cursor < offset + window` holds after
/// every move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub cursor: usize,
    pub offset: usize,
    pub window: Option<usize>,
}

impl Viewport {
    pub fn new(window: Option<usize>) -> Self {
        Self {
            cursor: 0,
            offset: 0,
            window,
        }
    }

    /// Moves the cursor by `delta` with wraparound, skipping disabled
    /// entries. The retry is bounded by the list length, so a fully
    /// disabled list leaves the cursor where it was.
    pub fn move_by(&mut self, delta: isize, disabled: impl Fn(usize) -> bool, len: usize) {
        if len == 0 {
            return;
        }
        let step = if delta >= 0 {
            delta as usize % len
        } else {
            len - (delta.unsigned_abs() % len) % len
        };
        let mut candidate = (self.cursor + step) % len;
        // One extra step per retry, in the direction of travel.
        let nudge = if delta >= 0 { 1 } else { len - 1 };
        let mut tries = 0;
        while disabled(candidate) && tries < len {
            candidate = (candidate + nudge) % len;
            tries += 1;
        }
        if !disabled(candidate) {
            self.cursor = candidate;
        }
        self.update_scroll(len);
    }

    /// Reclamps the scroll offset so the cursor stays inside the window.
    pub fn update_scroll(&mut self, len: usize) {
        let Some(window) = self.window else {
            self.offset = 0;
            return;
        };
        if window == 0 || len <= window {
            self.offset = 0;
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + window {
            self.offset = self.cursor - window + 1;
        }
        // A shrunken list can leave the offset past the end.
        self.offset = self.offset.min(len - window);
    }

    /// Index range of the visible slice.
    pub fn visible(&self, len: usize) -> Range<usize> {
        match self.window {
            Some(window) if window > 0 && len > window => self.offset..self.offset + window,
            _ => 0..len,
        }
    }

    /// Repositions the cursor onto the first enabled entry at or after
    /// `index`, used when a filtered list is rebuilt under the cursor.
    pub fn reset_to(&mut self, index: usize, disabled: impl Fn(usize) -> bool, len: usize) {
        self.cursor = index.min(len.saturating_sub(1));
        self.offset = 0;
        if len > 0 && disabled(self.cursor) {
            self.move_by(1, disabled, len);
        } else {
            self.update_scroll(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn none_disabled(_: usize) -> bool {
        false
    }

    #[test]
    fn down_wraps_modulo_len() {
        // k downs from p land on (p + k) mod n.
        let mut vp = Viewport::new(None);
        for _ in 0..3 {
            vp.move_by(1, none_disabled, 3);
        }
        assert_eq!(vp.cursor, 0);
        vp.move_by(1, none_disabled, 3);
        assert_eq!(vp.cursor, 1);
    }

    #[test]
    fn up_from_zero_wraps_to_end() {
        let mut vp = Viewport::new(None);
        vp.move_by(-1, none_disabled, 5);
        assert_eq!(vp.cursor, 4);
    }

    #[test]
    fn disabled_entries_are_skipped() {
        // Index 1 disabled: one down from 0 lands on 2.
        let mut vp = Viewport::new(None);
        vp.move_by(1, |i| i == 1, 3);
        assert_eq!(vp.cursor, 2);
    }

    #[test]
    fn skipping_respects_direction_of_travel() {
        let mut vp = Viewport::new(None);
        vp.cursor = 2;
        vp.move_by(-1, |i| i == 1, 3);
        assert_eq!(vp.cursor, 0);
    }

    #[test]
    fn all_disabled_leaves_cursor_unchanged() {
        let mut vp = Viewport::new(None);
        vp.cursor = 1;
        vp.move_by(1, |_| true, 4);
        assert_eq!(vp.cursor, 1);
    }

    #[test]
    fn scroll_clamp_invariant_holds_over_random_walk() {
        let mut vp = Viewport::new(Some(4));
        let len = 11;
        let deltas = [1, 1, 1, 1, 1, -3, 7, -1, -1, 5, -9, 2, 2, 2, 2, 2, 2];
        for delta in deltas {
            vp.move_by(delta, none_disabled, len);
            assert!(vp.offset <= vp.cursor, "offset {} cursor {}", vp.offset, vp.cursor);
            assert!(vp.cursor < vp.offset + 4, "offset {} cursor {}", vp.offset, vp.cursor);
        }
    }

    #[test]
    fn short_list_never_scrolls() {
        let mut vp = Viewport::new(Some(10));
        for _ in 0..7 {
            vp.move_by(1, none_disabled, 3);
            assert_eq!(vp.offset, 0);
            assert_eq!(vp.visible(3), 0..3);
        }
    }

    #[test]
    fn visible_window_tracks_offset() {
        let mut vp = Viewport::new(Some(3));
        for _ in 0..5 {
            vp.move_by(1, none_disabled, 8);
        }
        assert_eq!(vp.cursor, 5);
        assert_eq!(vp.visible(8), 3..6);
    }

    #[test]
    fn reset_to_skips_disabled_start() {
        let mut vp = Viewport::new(Some(2));
        vp.reset_to(0, |i| i == 0, 4);
        assert_eq!(vp.cursor, 1);
    }
}
