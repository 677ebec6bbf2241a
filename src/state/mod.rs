//! State management module for the Akari editor
//!
//! - `editor_state`: syntax mode, selection, toolbar menu and pane layout

mod editor_state;

pub use editor_state::*;
