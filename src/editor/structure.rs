//! Line-oriented operators: indent, outdent and block alignment

use crate::config::INDENT;
use crate::editor::buffer::TextBuffer;
use crate::editor::Edit;
use crate::i18n::{Locale, Text};
use crate::utils::text::char_len;
use serde::{Deserialize, Serialize};

/// Horizontal alignment for aligned blocks and table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value
    pub fn css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    /// Inline style attribute, empty for the default left alignment
    pub fn style_attr(self) -> String {
        match self {
            Alignment::Left => String::new(),
            other => format!(" style=\"text-align: {}\"", other.css()),
        }
    }

    /// Markdown table separator cell
    pub fn separator(self) -> &'static str {
        match self {
            Alignment::Left => "---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}

/// Ordered selection bounds plus the span of the full lines they touch
fn touched_lines(buffer: &TextBuffer, sel_start: usize, sel_end: usize) -> (usize, usize, usize, usize) {
    let start = buffer.clamp(sel_start.min(sel_end));
    let end = buffer.clamp(sel_start.max(sel_end));
    (start, end, buffer.line_start(start), buffer.line_end(end))
}

/// Add two spaces to the start of every line touched by the selection
pub fn indent(buffer: &TextBuffer, sel_start: usize, sel_end: usize) -> Edit {
    let (start, end, line_start, block_end) = touched_lines(buffer, sel_start, sel_end);
    let block = buffer.slice(line_start..block_end);

    let lines: Vec<String> = block.split('\n').map(|line| format!("{INDENT}{line}")).collect();
    let inserted = char_len(INDENT) * lines.len();

    Edit::select(
        buffer.spliced(line_start..block_end, &lines.join("\n")),
        start + char_len(INDENT),
        end + inserted,
    )
}

/// Remove one level of indentation (two spaces or a tab) from every line
/// touched by the selection; lines without one are left alone
pub fn outdent(buffer: &TextBuffer, sel_start: usize, sel_end: usize) -> Edit {
    let (start, end, line_start, block_end) = touched_lines(buffer, sel_start, sel_end);
    let block = buffer.slice(line_start..block_end);

    // (line offset, characters stripped) for every touched line
    let mut stripped = Vec::new();
    let mut offset = line_start;
    let mut lines = Vec::new();
    for line in block.split('\n') {
        let strip = if line.starts_with(INDENT) {
            char_len(INDENT)
        } else if line.starts_with('\t') {
            1
        } else {
            0
        };
        stripped.push((offset, strip));
        offset += char_len(line) + 1;
        // Indent characters are ASCII so char and byte counts agree here
        lines.push(&line[strip..]);
    }

    let new_start = shift_left(start, &stripped);
    let new_end = shift_left(end, &stripped).max(new_start);

    Edit::select(
        buffer.spliced(line_start..block_end, &lines.join("\n")),
        new_start,
        new_end,
    )
}

/// Map a pre-outdent offset onto the outdented text; an offset inside a
/// removed prefix lands on its line start
fn shift_left(pos: usize, stripped: &[(usize, usize)]) -> usize {
    let mut removed = 0;
    for &(offset, strip) in stripped {
        if pos < offset {
            break;
        }
        removed += strip.min(pos - offset);
    }
    pos - removed
}

/// Wrap the selection in an aligned block element (HTML only)
pub fn align(
    buffer: &TextBuffer,
    sel_start: usize,
    sel_end: usize,
    alignment: Alignment,
    locale: Locale,
) -> Edit {
    let start = buffer.clamp(sel_start.min(sel_end));
    let end = buffer.clamp(sel_start.max(sel_end));

    let selected = buffer.slice(start..end);
    let text = if selected.is_empty() {
        locale.text(Text::Placeholder).to_string()
    } else {
        selected
    };

    let markup = format!("<div{}>{}</div>", alignment.style_attr(), text);
    let cursor = start + char_len(&markup);

    Edit::caret(buffer.spliced(start..end, &markup), cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_single_line() {
        let buffer = TextBuffer::from_str("first\nsecond\nthird");
        let edit = indent(&buffer, 8, 10);
        assert_eq!(edit.buffer.to_string(), "first\n  second\nthird");
        assert_eq!((edit.anchor, edit.head), (10, 12));
    }

    #[test]
    fn test_indent_multiple_lines() {
        let buffer = TextBuffer::from_str("a\nb\nc");
        let edit = indent(&buffer, 0, 3);
        assert_eq!(edit.buffer.to_string(), "  a\n  b\nc");
        assert_eq!((edit.anchor, edit.head), (2, 7));
    }

    #[test]
    fn test_indent_empty_selection_uses_current_line() {
        let buffer = TextBuffer::from_str("a\nbc");
        let edit = indent(&buffer, 3, 3);
        assert_eq!(edit.buffer.to_string(), "a\n  bc");
        assert_eq!((edit.anchor, edit.head), (5, 5));
    }

    #[test]
    fn test_outdent_spaces_and_tabs() {
        let buffer = TextBuffer::from_str("  a\n\tb\nc");
        let edit = outdent(&buffer, 0, 8);
        assert_eq!(edit.buffer.to_string(), "a\nb\nc");
        assert_eq!((edit.anchor, edit.head), (0, 5));
    }

    #[test]
    fn test_outdent_without_indent_is_unchanged() {
        let buffer = TextBuffer::from_str("plain");
        let edit = outdent(&buffer, 2, 4);
        assert_eq!(edit.buffer.to_string(), "plain");
        assert_eq!((edit.anchor, edit.head), (2, 4));
    }

    #[test]
    fn test_outdent_never_moves_before_line_start() {
        let buffer = TextBuffer::from_str("x\n  y");
        // Caret inside the indentation itself
        let edit = outdent(&buffer, 3, 3);
        assert_eq!(edit.buffer.to_string(), "x\ny");
        assert_eq!((edit.anchor, edit.head), (2, 2));
    }

    #[test]
    fn test_outdent_end_inside_last_indent() {
        let buffer = TextBuffer::from_str("  a\n  b");
        let edit = outdent(&buffer, 0, 5);
        assert_eq!(edit.buffer.to_string(), "a\nb");
        // End stays on the second line, so a repeat still reaches it
        assert_eq!((edit.anchor, edit.head), (0, 2));

        let buffer = TextBuffer::from_str("    a\n    b");
        let once = outdent(&buffer, 0, 7);
        assert_eq!(once.buffer.to_string(), "  a\n  b");
        assert_eq!((once.anchor, once.head), (0, 4));
        let twice = outdent(&once.buffer, once.anchor, once.head);
        assert_eq!(twice.buffer.to_string(), "a\nb");
    }

    #[test]
    fn test_lone_carriage_return_is_not_a_line_break() {
        let buffer = TextBuffer::from_str("a\rb");
        let edit = indent(&buffer, 2, 2);
        assert_eq!(edit.buffer.to_string(), "  a\rb");
        assert_eq!((edit.anchor, edit.head), (4, 4));
    }

    #[test]
    fn test_indent_then_outdent_restores_line() {
        let original = "keep\n  nested line\nkeep";
        for (start, end) in [(5, 5), (7, 12), (5, 18)] {
            let buffer = TextBuffer::from_str(original);
            let indented = indent(&buffer, start, end);
            let restored = outdent(&indented.buffer, indented.anchor, indented.head);
            assert_eq!(restored.buffer.to_string(), original);
            assert_eq!((restored.anchor, restored.head), (start, end));
        }
    }

    #[test]
    fn test_align_center() {
        let buffer = TextBuffer::from_str("say hi");
        let edit = align(&buffer, 4, 6, Alignment::Center, Locale::En);
        assert_eq!(
            edit.buffer.to_string(),
            "say <div style=\"text-align: center\">hi</div>"
        );
        assert_eq!(edit.cursor(), edit.buffer.len_chars());
    }

    #[test]
    fn test_align_left_omits_style() {
        let buffer = TextBuffer::from_str("");
        let edit = align(&buffer, 0, 0, Alignment::Left, Locale::Ja);
        assert_eq!(edit.buffer.to_string(), "<div>テキスト</div>");
    }

    #[test]
    fn test_align_right_placeholder_english() {
        let buffer = TextBuffer::from_str("");
        let edit = align(&buffer, 0, 0, Alignment::Right, Locale::En);
        assert_eq!(
            edit.buffer.to_string(),
            "<div style=\"text-align: right\">text</div>"
        );
    }

    #[test]
    fn test_separators() {
        assert_eq!(Alignment::Center.separator(), ":---:");
        assert_eq!(Alignment::Right.separator(), "---:");
        assert_eq!(Alignment::Left.separator(), "---");
    }
}
