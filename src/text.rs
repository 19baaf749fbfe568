//! Grapheme-cluster text editing shared by the free-text widgets.
//!
//! Cursor arithmetic is in grapheme clusters, never bytes or code points,
//! so composed characters (family emoji, Hangul jamo, combining accents)
//! move and delete as one unit.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A line of text plus a cursor, addressed by grapheme cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    /// Byte offset of the cursor; always on a grapheme boundary.
    cursor: usize,
}

impl EditBuffer {
    pub fn new(initial: impl Into<String>) -> Self {
        let text = initial.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display width of the text before the cursor, for caret placement.
    pub fn width_before_cursor(&self) -> usize {
        self.text[..self.cursor].width()
    }

    /// Text before and after the cursor, split on the cursor boundary.
    pub fn parts(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }

    /// Grapheme count, the user-perceived length.
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Byte offset of the grapheme boundary before the cursor.
    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
    }

    /// Byte offset of the grapheme boundary after the cursor.
    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }

    /// Removes the grapheme before the cursor. Returns false at the start.
    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(start) => {
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    /// Removes the grapheme under the cursor. Returns false at the end.
    pub fn delete(&mut self) -> bool {
        match self.next_boundary() {
            Some(end) => {
                self.text.replace_range(self.cursor..end, "");
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        match self.prev_boundary() {
            Some(start) => {
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.next_boundary() {
            Some(end) => {
                self.cursor = end;
                true
            }
            None => false,
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn insert_and_backspace_ascii() {
        let mut buf = EditBuffer::default();
        buf.insert('h');
        buf.insert('i');
        assert_eq!(buf.text(), "hi");
        assert!(buf.backspace());
        assert_eq!(buf.text(), "h");
        assert!(buf.backspace());
        assert!(!buf.backspace());
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        // é as e + combining acute: two scalars, one grapheme.
        let mut buf = EditBuffer::new("caf\u{65}\u{301}");
        assert_eq!(buf.len(), 4);
        assert!(buf.backspace());
        assert_eq!(buf.text(), "caf");
    }

    #[test]
    fn family_emoji_is_one_cursor_step() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}";
        let mut buf = EditBuffer::new(format!("a{family}b"));
        assert_eq!(buf.len(), 3);
        buf.move_left();
        buf.move_left();
        assert!(buf.delete());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn cursor_motion_clamps_at_edges() {
        let mut buf = EditBuffer::new("ab");
        assert!(!buf.move_right());
        buf.move_home();
        assert!(!buf.move_left());
        assert!(buf.move_right());
        assert!(buf.move_right());
        assert!(!buf.move_right());
    }

    #[test]
    fn insert_mid_text_at_cursor() {
        let mut buf = EditBuffer::new("ad");
        buf.move_left();
        buf.insert('b');
        buf.insert('c');
        assert_eq!(buf.text(), "abcd");
        buf.move_end();
        buf.insert('!');
        assert_eq!(buf.text(), "abcd!");
    }

    #[test]
    fn width_accounts_for_wide_characters() {
        let mut buf = EditBuffer::new("한a");
        buf.move_left();
        assert_eq!(buf.width_before_cursor(), 2);
    }
}
