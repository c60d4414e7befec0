//! Display width of line contents, used for cursor placement on redraw.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// How many terminal columns a byte sequence is assumed to occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// One column per UTF-8 leading byte.
    #[default]
    CodePoints,
    /// Per-grapheme column width (East Asian wide and emoji count as two).
    Columns,
}

impl WidthPolicy {
    pub fn measure(self, bytes: &[u8]) -> usize {
        match self {
            Self::CodePoints => display_width(bytes),
            Self::Columns => column_width(bytes),
        }
    }
}

/// Counts the bytes that start a character.
///
/// Continuation bytes (`10xxxxxx`) are skipped, so a valid UTF-8 string
/// measures its char count regardless of encoded length.
pub fn display_width(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&byte| !is_continuation(byte)).count()
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if emoji_get(grapheme).is_some() {
        return 2;
    }
    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Column width of `bytes`; invalid sequences fall back to one column each.
pub fn column_width(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let mut width = 0;
    for chunk in bytes.utf8_chunks() {
        width += chunk.valid().graphemes(true).map(grapheme_width).sum::<usize>();
        width += chunk.invalid().len();
    }
    width
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{column_width, display_width, WidthPolicy};

    #[test]
    fn ascii_counts_every_byte() {
        assert_eq!(display_width(b"hello"), 5);
        assert_eq!(display_width(b""), 0);
    }

    #[test]
    fn multibyte_chars_count_once() {
        // 2-, 3- and 4-byte encodings.
        assert_eq!(display_width("é".as_bytes()), 1);
        assert_eq!(display_width("€".as_bytes()), 1);
        assert_eq!(display_width("𝄞".as_bytes()), 1);
        assert_eq!(display_width("> naïve €".as_bytes()), 9);
    }

    #[test]
    fn stray_continuation_bytes_are_not_counted() {
        assert_eq!(display_width(&[0x80, 0xBF, b'a']), 1);
    }

    #[test]
    fn column_policy_counts_wide_chars_twice() {
        assert_eq!(column_width("日本".as_bytes()), 4);
        assert_eq!(column_width("😀".as_bytes()), 2);
        assert_eq!(WidthPolicy::CodePoints.measure("日本".as_bytes()), 2);
        assert_eq!(WidthPolicy::Columns.measure(b"ab"), 2);
    }

    #[test]
    fn column_policy_tolerates_invalid_utf8() {
        assert_eq!(column_width(&[b'a', 0xFF, b'b']), 3);
    }

    proptest! {
        #[test]
        fn width_of_valid_utf8_is_char_count(text in "\\PC{0,40}") {
            prop_assert_eq!(display_width(text.as_bytes()), text.chars().count());
        }
    }
}
