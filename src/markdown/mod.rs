//! Markdown module for the Akari editor
//!
//! Handles preview rendering including:
//! - Block scanning (headings, code, quotes, lists, tables)
//! - Inline spans (emphasis, code, links, images)
//! - Debounced re-rendering

pub mod inline;
pub mod preview;
pub mod scheduler;

pub use inline::render_inline;
pub use preview::{markdown_to_html, render_preview};
pub use scheduler::{PreviewScheduler, RenderedPreview};
