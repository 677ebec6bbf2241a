//! Per-document editor state
//!
//! Contains the transient state of a single editing session: syntax mode,
//! selection, the open toolbar menu, and the pane layout.

use crate::config::ViewMode;
use crate::editor::buffer::TextBuffer;
use serde::{Deserialize, Serialize};

/// Target syntax for insertions and preview conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyntaxMode {
    #[default]
    Markdown,
    Html,
}

impl SyntaxMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            SyntaxMode::Markdown => SyntaxMode::Html,
            SyntaxMode::Html => SyntaxMode::Markdown,
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            SyntaxMode::Markdown => "Markdown",
            SyntaxMode::Html => "HTML",
        }
    }
}

/// Text selection as character offsets plus the selected text
///
/// Always satisfies `start <= end <= buffer.len_chars()` and
/// `text == buffer[start..end]` for the buffer it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    /// Take a selection from the buffer, ordering and clamping the bounds
    pub fn from_buffer(buffer: &TextBuffer, anchor: usize, head: usize) -> Self {
        let a = buffer.clamp(anchor);
        let b = buffer.clamp(head);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start,
            end,
            text: buffer.slice(start..end),
        }
    }

    /// A collapsed selection (caret) at `pos`
    pub fn caret(buffer: &TextBuffer, pos: usize) -> Self {
        Self::from_buffer(buffer, pos, pos)
    }

    /// Check if selection is collapsed (no text selected)
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Selected length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Toolbar dropdown that is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarMenu {
    Heading,
    List,
    Insert,
    Align,
}

/// Layout of the editor and preview panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Which panes are visible
    pub mode: ViewMode,

    /// Editor covers the whole window
    pub fullscreen: bool,
}

impl ViewState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            fullscreen: false,
        }
    }
}
