//! Editor command and effect types
//!
//! Every user gesture (toolbar button, shortcut, dialog button, keystroke)
//! becomes a `Command` handed to `Editor::dispatch`. The editor answers with
//! the `Effect`s the embedding application must carry out.

use crate::config::ViewMode;
use crate::editor::format::FormatKey;
use crate::editor::insert::{DialogKind, ImageDialog, LinkDialog, TableDialog};
use crate::editor::structure::Alignment;
use crate::state::{SyntaxMode, ToolbarMenu, ViewState};
use crate::utils::scroll::ScrollMetrics;

/// Intent sent to the editor
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Input widget
    /// Selection moved in the input widget
    SetSelection { anchor: usize, head: usize },

    /// Raw typing: the widget's full new value and its caret
    Input { value: String, cursor: usize },

    /// Replace the selection with text (paste, IME commit)
    InsertText(String),

    // Formatting
    /// Apply a format template to the selection
    Format(FormatKey),

    /// Indent every line touched by the selection
    Indent,

    /// Remove one indent level from every line touched by the selection
    Outdent,

    /// Wrap the selection in an aligned block (HTML mode only)
    Align(Alignment),

    // History
    Undo,
    Redo,

    /// Explicit save gesture
    Save,

    // Mode and view
    /// Switch between Markdown and HTML
    ToggleMode,

    /// Select a syntax mode directly
    SetMode(SyntaxMode),

    /// Cycle between edit-only and split view
    TogglePreview,

    /// Select a pane layout directly
    SetViewMode(ViewMode),

    ToggleFullscreen,

    // Toolbar dropdowns
    /// Open a dropdown, or close it when it is already open
    ToggleMenu(ToolbarMenu),

    CloseMenu,

    // Dialogs
    /// Open a modal dialog, freezing the current selection
    OpenDialog(DialogKind),

    ConfirmLink(LinkDialog),

    ConfirmImage(ImageDialog),

    ConfirmTable(TableDialog),

    /// Close the dialog without inserting anything
    CancelDialog,

    // Panes
    /// The editor pane scrolled; keeps the preview in step
    EditorScrolled {
        editor: ScrollMetrics,
        preview: ScrollMetrics,
    },
}

/// Side effect requested from the embedding application
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The buffer changed; carries the full new value (`onChange`)
    Changed(String),

    /// The caret or selection moved
    SelectionChanged { anchor: usize, head: usize },

    /// The user asked to save (`onSave`)
    Save,

    /// The preview is stale and a debounced render should be scheduled
    SchedulePreview,

    /// A dialog opened, prefilled with the frozen selection text
    DialogOpened {
        kind: DialogKind,
        selected_text: String,
    },

    DialogClosed,

    /// Dialog input was refused; the dialog stays open
    Rejected(DialogKind),

    ModeChanged(SyntaxMode),

    ViewChanged(ViewState),

    MenuChanged(Option<ToolbarMenu>),

    /// Scroll the preview pane to this offset
    ScrollPreview(f64),
}

impl Effect {
    /// Check if this effect carries a buffer change
    pub fn is_change(&self) -> bool {
        matches!(self, Effect::Changed(_))
    }
}
