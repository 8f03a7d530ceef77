// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 The gitbook2mkdocs contributors

//! Line splitting over every Unicode line boundary.
//!
//! [`str::lines`] only breaks on `\n` and `\r\n`. GitBook exports also carry
//! vertical tabs, form feeds, `NEL` and the Unicode line/paragraph
//! separators, and those end a line too.

/// Returns `true` for characters that end a line on their own.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits `text` into lines, dropping the terminators.
///
/// `\r\n` counts as one break. A trailing break does not produce an empty
/// final line, and empty text has no lines.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn keeps_blank_lines_but_no_trailing_empty_line() {
        assert_eq!(split_lines("a\n\nb\n"), ["a", "", "b"]);
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), [""]);
    }

    #[test]
    fn splits_on_other_unicode_breaks() {
        assert_eq!(
            split_lines("a\u{b}b\u{c}c\u{85}d\u{2028}e\u{1c}f"),
            ["a", "b", "c", "d", "e", "f"]
        );
    }
}
