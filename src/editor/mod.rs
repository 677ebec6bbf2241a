//! Editor module for the Akari editor
//!
//! Contains the core text editing functionality including:
//! - Text buffer management (using ropey)
//! - Format templates and line operators
//! - Link, image and table inserts
//! - Undo/redo snapshots
//! - The `Editor` controller that turns commands into effects

pub mod buffer;
pub mod format;
pub mod insert;
pub mod structure;
pub mod undo;

pub use buffer::TextBuffer;
pub use format::{apply_block_format, apply_format, FormatKey, FormatTemplate};
pub use insert::{DialogKind, ImageDialog, LinkDialog, TableDialog};
pub use structure::Alignment;
pub use undo::UndoManager;

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::config::{Config, PREVIEW_DEBOUNCE_MS};
use crate::error::AppResult;
use crate::i18n::Locale;
use crate::markdown::{render_preview, PreviewScheduler};
use crate::menu::{default_key_binds, key_binds, Action, KeyBind};
use crate::message::{Command, Effect};
use crate::state::{Selection, SyntaxMode, ToolbarMenu, ViewState};
use crate::utils::scroll::sync_offset;
use crate::utils::text::char_len;
use crate::utils::Debouncer;

/// Result of an engine operation: the new buffer and where the selection goes
#[derive(Debug, Clone)]
pub struct Edit {
    pub buffer: TextBuffer,
    pub anchor: usize,
    pub head: usize,
}

impl Edit {
    /// Collapsed selection at `pos`
    pub fn caret(buffer: TextBuffer, pos: usize) -> Self {
        Self {
            buffer,
            anchor: pos,
            head: pos,
        }
    }

    pub fn select(buffer: TextBuffer, anchor: usize, head: usize) -> Self {
        Self {
            buffer,
            anchor,
            head,
        }
    }

    /// Caret position after the edit
    pub fn cursor(&self) -> usize {
        self.head
    }
}

/// A modal dialog together with the selection frozen when it opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialog {
    pub kind: DialogKind,
    pub saved_selection: Selection,
}

/// Main editor component owning the document and all editing state
pub struct Editor {
    /// Identifies the document for draft recovery
    document_id: String,
    buffer: TextBuffer,
    /// Live selection; `head` is the caret
    anchor: usize,
    head: usize,
    mode: SyntaxMode,
    locale: Locale,
    history: UndoManager,
    menu: Option<ToolbarMenu>,
    dialog: Option<OpenDialog>,
    view: ViewState,
    sync_scroll: bool,
    key_binds: HashMap<KeyBind, Action>,
    /// Trailing-edge timer for preview re-renders
    preview_debounce: Debouncer,
    preview_html: String,
}

impl Editor {
    /// Create an editor with default settings
    pub fn new(value: &str, initial_mode: SyntaxMode) -> Self {
        let buffer = TextBuffer::from_str(value);
        let preview_html = render_preview(initial_mode, value);
        Self {
            document_id: Uuid::new_v4().to_string(),
            buffer,
            anchor: 0,
            head: 0,
            mode: initial_mode,
            locale: Locale::default(),
            history: UndoManager::with_default_history(),
            menu: None,
            dialog: None,
            view: ViewState::default(),
            sync_scroll: true,
            key_binds: default_key_binds(),
            preview_debounce: Debouncer::new(PREVIEW_DEBOUNCE_MS),
            preview_html,
        }
    }

    /// Create an editor from configuration; `initial_mode` overrides the
    /// configured mode
    pub fn with_config(
        value: &str,
        initial_mode: Option<SyntaxMode>,
        config: &Config,
    ) -> AppResult<Self> {
        let mode = initial_mode.unwrap_or(config.editor.initial_mode);
        let mut editor = Self::new(value, mode);
        editor.locale = config.editor.locale;
        editor.history = UndoManager::new(config.editor.max_undo_history);
        editor.view = ViewState::new(config.preview.default_view_mode);
        editor.sync_scroll = config.preview.sync_scroll;
        editor.key_binds = key_binds(&config.keybindings)?;
        editor.preview_debounce = Debouncer::new(config.preview.debounce_ms);
        Ok(editor)
    }

    /// Use a stable document id (drafts of an existing post)
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = id.into();
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Get the text buffer reference
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Get full content as string
    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    /// Current selection, ordered and with its text
    pub fn selection(&self) -> Selection {
        Selection::from_buffer(&self.buffer, self.anchor, self.head)
    }

    /// Caret position
    pub fn cursor(&self) -> usize {
        self.head
    }

    pub fn mode(&self) -> SyntaxMode {
        self.mode
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The toolbar dropdown that is open, if any
    pub fn menu(&self) -> Option<ToolbarMenu> {
        self.menu
    }

    pub fn dialog(&self) -> Option<&OpenDialog> {
        self.dialog.as_ref()
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    /// Check if buffer is modified since the last save
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Last rendered preview
    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    /// Check if a preview render is waiting on the debounce timer
    pub fn preview_pending(&self) -> bool {
        self.preview_debounce.is_pending()
    }

    /// Re-render the preview if the debounce period has passed
    pub fn poll_preview(&mut self, now: Instant) -> Option<&str> {
        if !self.preview_debounce.poll(now) {
            return None;
        }
        self.preview_html = render_preview(self.mode, &self.buffer.to_string());
        log::debug!("Preview re-rendered ({} bytes)", self.preview_html.len());
        Some(&self.preview_html)
    }

    /// Render the preview immediately, dropping any pending render
    pub fn render_preview_now(&mut self) -> &str {
        self.preview_debounce.cancel();
        self.preview_html = render_preview(self.mode, &self.buffer.to_string());
        &self.preview_html
    }

    /// Hand the current content to an async scheduler instead of polling
    ///
    /// Embedders running on tokio call this on `Effect::SchedulePreview`.
    /// Must be called from within a tokio runtime.
    pub fn schedule_preview_on(&self, scheduler: &mut PreviewScheduler) -> u64 {
        scheduler.schedule(self.mode, self.buffer.to_string())
    }

    /// Run the shortcut bound to `bind`, if any
    pub fn handle_key(&mut self, bind: &KeyBind) -> Option<Vec<Effect>> {
        let action = *self.key_binds.get(bind)?;
        log::debug!("Shortcut {} -> {:?}", bind, action);
        Some(self.dispatch(action.to_command()))
    }

    /// Apply a command, returning the effects for the embedding application
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        self.dispatch_at(command, Instant::now())
    }

    /// Apply a command at a given time (drives the preview debounce)
    pub fn dispatch_at(&mut self, command: Command, now: Instant) -> Vec<Effect> {
        log::trace!("Dispatching {:?}", command);
        let mut effects = Vec::new();

        match command {
            Command::SetSelection { anchor, head } => {
                self.anchor = self.buffer.clamp(anchor);
                self.head = self.buffer.clamp(head);
                effects.push(self.selection_effect());
            }

            Command::Input { value, cursor } => {
                if self.buffer.content_eq(&value) {
                    self.set_caret(cursor, &mut effects);
                } else {
                    let mut next = self.buffer.clone();
                    next.set_content(&value);
                    let cursor = next.clamp(cursor);
                    self.commit(Edit::caret(next, cursor), now, &mut effects);
                }
            }

            Command::InsertText(text) => {
                let sel = self.selection();
                let edit = Edit::caret(
                    self.buffer.spliced(sel.start..sel.end, &text),
                    sel.start + char_len(&text),
                );
                self.commit(edit, now, &mut effects);
            }

            Command::Format(key) => {
                self.close_menu(&mut effects);
                let template = FormatTemplate::lookup(self.mode, key, self.locale);
                let edit = if template.block_level {
                    apply_block_format(&self.buffer, self.anchor, self.head, key, &template)
                } else {
                    apply_format(&self.buffer, self.anchor, self.head, &template)
                };
                self.commit(edit, now, &mut effects);
            }

            Command::Indent => {
                let edit = structure::indent(&self.buffer, self.anchor, self.head);
                self.commit(edit, now, &mut effects);
            }

            Command::Outdent => {
                let edit = structure::outdent(&self.buffer, self.anchor, self.head);
                self.commit(edit, now, &mut effects);
            }

            Command::Align(alignment) => {
                self.close_menu(&mut effects);
                if self.mode == SyntaxMode::Html {
                    let edit = structure::align(
                        &self.buffer,
                        self.anchor,
                        self.head,
                        alignment,
                        self.locale,
                    );
                    self.commit(edit, now, &mut effects);
                } else {
                    log::debug!("Alignment is only available in HTML mode");
                }
            }

            Command::Undo => {
                if let Some(previous) = self.history.undo(&self.buffer) {
                    self.restore(&previous, now, &mut effects);
                }
            }

            Command::Redo => {
                if let Some(next) = self.history.redo(&self.buffer) {
                    self.restore(&next, now, &mut effects);
                }
            }

            Command::Save => {
                self.buffer.mark_saved();
                effects.push(Effect::Save);
            }

            Command::ToggleMode => {
                self.set_mode(self.mode.toggled(), now, &mut effects);
            }

            Command::SetMode(mode) => {
                if mode != self.mode {
                    self.set_mode(mode, now, &mut effects);
                }
            }

            Command::TogglePreview => {
                self.view.mode = self.view.mode.toggle_preview();
                effects.push(Effect::ViewChanged(self.view));
            }

            Command::SetViewMode(mode) => {
                if mode != self.view.mode {
                    self.view.mode = mode;
                    effects.push(Effect::ViewChanged(self.view));
                }
            }

            Command::ToggleFullscreen => {
                self.view.fullscreen = !self.view.fullscreen;
                effects.push(Effect::ViewChanged(self.view));
            }

            Command::ToggleMenu(menu) => {
                self.menu = if self.menu == Some(menu) { None } else { Some(menu) };
                effects.push(Effect::MenuChanged(self.menu));
            }

            Command::CloseMenu => self.close_menu(&mut effects),

            Command::OpenDialog(kind) => {
                self.close_menu(&mut effects);
                let saved_selection = self.selection();
                effects.push(Effect::DialogOpened {
                    kind,
                    selected_text: saved_selection.text.clone(),
                });
                self.dialog = Some(OpenDialog {
                    kind,
                    saved_selection,
                });
            }

            Command::ConfirmLink(mut input) => {
                if let Some(saved) = self.confirm_dialog(DialogKind::Link, input.is_valid(), &mut effects) {
                    if input.text.is_empty() {
                        input.text = saved.text.clone();
                    }
                    let markup = insert::build_link(self.mode, &input, self.locale);
                    let edit = insert::insert_markup(&self.buffer, &saved, &markup);
                    self.commit(edit, now, &mut effects);
                    effects.push(Effect::DialogClosed);
                }
            }

            Command::ConfirmImage(mut input) => {
                if let Some(saved) = self.confirm_dialog(DialogKind::Image, input.is_valid(), &mut effects) {
                    if input.alt.is_empty() {
                        input.alt = saved.text.clone();
                    }
                    let markup = insert::build_image(self.mode, &input);
                    let edit = insert::insert_markup(&self.buffer, &saved, &markup);
                    self.commit(edit, now, &mut effects);
                    effects.push(Effect::DialogClosed);
                }
            }

            Command::ConfirmTable(input) => {
                if let Some(saved) = self.confirm_dialog(DialogKind::Table, true, &mut effects) {
                    let input =
                        TableDialog::new(input.rows, input.cols, input.has_header, input.alignment);
                    let markup = insert::build_table(self.mode, &input, self.locale);
                    let edit = insert::insert_table(&self.buffer, &saved, &markup);
                    self.commit(edit, now, &mut effects);
                    effects.push(Effect::DialogClosed);
                }
            }

            Command::CancelDialog => {
                if self.dialog.take().is_some() {
                    effects.push(Effect::DialogClosed);
                }
            }

            Command::EditorScrolled { editor, preview } => {
                if self.sync_scroll && self.view.mode.shows_preview() && self.view.mode.shows_editor() {
                    effects.push(Effect::ScrollPreview(sync_offset(&editor, &preview)));
                }
            }
        }

        effects
    }

    /// Commit an engine result: snapshot the old buffer, swap in the new one
    /// and schedule a preview render. An edit that changes nothing only moves
    /// the selection and leaves the history alone.
    fn commit(&mut self, edit: Edit, now: Instant, effects: &mut Vec<Effect>) {
        if edit.buffer.rope() == self.buffer.rope() {
            self.anchor = edit.buffer.clamp(edit.anchor);
            self.head = edit.buffer.clamp(edit.head);
            effects.push(self.selection_effect());
            return;
        }

        self.history.push_edit(&self.buffer);
        self.buffer = edit.buffer;
        self.anchor = self.buffer.clamp(edit.anchor);
        self.head = self.buffer.clamp(edit.head);

        effects.push(Effect::Changed(self.buffer.to_string()));
        effects.push(self.selection_effect());
        self.schedule_preview(now, effects);
    }

    /// Swap in a history snapshot, keeping the caret within bounds
    fn restore(&mut self, snapshot: &TextBuffer, now: Instant, effects: &mut Vec<Effect>) {
        self.buffer.restore(snapshot);
        let caret = self.buffer.clamp(self.head);
        self.anchor = caret;
        self.head = caret;

        effects.push(Effect::Changed(self.buffer.to_string()));
        effects.push(self.selection_effect());
        self.schedule_preview(now, effects);
    }

    fn set_caret(&mut self, pos: usize, effects: &mut Vec<Effect>) {
        let pos = self.buffer.clamp(pos);
        self.anchor = pos;
        self.head = pos;
        effects.push(self.selection_effect());
    }

    fn set_mode(&mut self, mode: SyntaxMode, now: Instant, effects: &mut Vec<Effect>) {
        log::debug!("Syntax mode set to {}", mode.display_name());
        self.mode = mode;
        effects.push(Effect::ModeChanged(mode));
        self.schedule_preview(now, effects);
    }

    fn schedule_preview(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.preview_debounce.schedule(now);
        effects.push(Effect::SchedulePreview);
    }

    fn close_menu(&mut self, effects: &mut Vec<Effect>) {
        if self.menu.take().is_some() {
            effects.push(Effect::MenuChanged(None));
        }
    }

    /// Consume the open dialog if it is of `kind` and its input is valid.
    /// Invalid input keeps the dialog open.
    fn confirm_dialog(
        &mut self,
        kind: DialogKind,
        valid: bool,
        effects: &mut Vec<Effect>,
    ) -> Option<Selection> {
        match &self.dialog {
            Some(open) if open.kind == kind => {}
            Some(open) => {
                log::warn!("Confirm for {:?} while the {:?} dialog is open", kind, open.kind);
                return None;
            }
            None => {
                log::warn!("Confirm for {:?} without an open dialog", kind);
                return None;
            }
        }

        if !valid {
            effects.push(Effect::Rejected(kind));
            return None;
        }

        self.dialog.take().map(|open| open.saved_selection)
    }

    fn selection_effect(&self) -> Effect {
        Effect::SelectionChanged {
            anchor: self.anchor,
            head: self.head,
        }
    }
}
