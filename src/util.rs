//! Display-width helpers shared by the widgets.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Truncates `content` to at most `max_width` terminal columns, appending
/// `ellipsis` when anything was cut. Truncation is grapheme-aware so wide
/// and composed characters are never split.
pub fn fit_width(content: &str, max_width: usize, ellipsis: &str) -> String {
    if content.width() <= max_width {
        return content.to_string();
    }
    let budget = max_width.saturating_sub(ellipsis.width());
    let mut out = String::new();
    let mut used = 0;
    for grapheme in content.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push_str(ellipsis);
    out
}

/// Number of terminal rows a frame occupies: one per newline plus the
/// final (possibly empty) line.
pub fn frame_rows(frame: &str) -> u16 {
    (frame.matches('\n').count() + 1) as u16
}
