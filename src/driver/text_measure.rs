//! Text measurement in character cells.
//!
//! Widths follow Unicode East Asian Width, measured per grapheme cluster:
//! combining marks and control characters take no cells, wide CJK forms and
//! emoji sequences take two.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Cells taken by one character.
pub fn char_cells(c: char) -> usize {
    match u32::from(c) {
        // Pictographs that terminals draw wide even when UAX #11 says narrow.
        0x2600..=0x27BF | 0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF
        | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0),
    }
}

/// Cells taken by one grapheme cluster.
pub fn grapheme_cells(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let Some(base) = chars.next() else {
        return 0;
    };
    if chars.as_str().is_empty() {
        return char_cells(base);
    }

    // Flags are regional indicator pairs.
    if (0x1F1E6..=0x1F1FF).contains(&u32::from(base)) {
        return 2;
    }
    // ZWJ, VS16, skin tones and keycaps make an emoji sequence.
    let emoji = chars.any(|c| {
        matches!(u32::from(c), 0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF)
    });
    if emoji { 2 } else { base.width().unwrap_or(0) }
}

/// Cells taken by a single line of text.
pub fn line_cells(line: &str) -> usize {
    if line.is_ascii() {
        return line.bytes().filter(|b| !b.is_ascii_control()).count();
    }
    line.graphemes(true).map(grapheme_cells).sum()
}

/// Width of the widest line and number of lines. Empty text has no lines.
pub fn text_extent(text: &str) -> (usize, usize) {
    if text.is_empty() {
        return (0, 0);
    }
    text.split('\n')
        .fold((0, 0), |(width, lines), line| (width.max(line_cells(line)), lines + 1))
}

/// Number of lines `text` takes when wrapped at `width` cells. A grapheme
/// wider than `width` gets a line of its own.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    if width == 0 {
        return text.split('\n').count();
    }

    let mut lines = 0;
    for line in text.split('\n') {
        let mut current = 0;
        lines += 1;
        for grapheme in line.graphemes(true) {
            let cells = grapheme_cells(grapheme);
            if current + cells > width && current > 0 {
                lines += 1;
                current = cells;
            } else {
                current += cells;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_cells() {
        assert_eq!(char_cells('a'), 1);
        assert_eq!(char_cells('\t'), 0);
        assert_eq!(char_cells('日'), 2);
        assert_eq!(char_cells('\u{0301}'), 0);
        assert_eq!(char_cells('\u{200D}'), 0);
        assert_eq!(char_cells('🚀'), 2);
    }

    #[test]
    fn test_grapheme_cells() {
        assert_eq!(grapheme_cells(""), 0);
        assert_eq!(grapheme_cells("e\u{301}"), 1);
        assert_eq!(grapheme_cells("🇺🇸"), 2);
        assert_eq!(grapheme_cells("👍🏽"), 2);
        assert_eq!(grapheme_cells("👨\u{200D}👩\u{200D}👧"), 2);
    }

    #[test]
    fn test_line_cells() {
        assert_eq!(line_cells("hello"), 5);
        assert_eq!(line_cells(""), 0);
        assert_eq!(line_cells("a\tb"), 2);
        assert_eq!(line_cells("日本"), 4);
        assert_eq!(line_cells("cafe\u{301}"), 4);
    }

    #[test]
    fn test_text_extent() {
        assert_eq!(text_extent(""), (0, 0));
        assert_eq!(text_extent("abc"), (3, 1));
        assert_eq!(text_extent("a\nabcd\nab"), (4, 3));
    }

    #[test]
    fn test_wrapped_line_count() {
        assert_eq!(wrapped_line_count("hello world", 5), 3);
        assert_eq!(wrapped_line_count("hello\nworld", 10), 2);
        assert_eq!(wrapped_line_count("", 10), 0);
        assert_eq!(wrapped_line_count("a\nb", 0), 2);
        assert_eq!(wrapped_line_count("e\u{301}e\u{301}e\u{301}", 3), 1);
    }
}
