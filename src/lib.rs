//! Akari editor - the Markdown/HTML editing core of the Akari Math Lab admin panel
//!
//! The `Editor` owns the document and turns `Command`s into `Effect`s. The
//! text transforms underneath (`editor::format`, `editor::structure`,
//! `editor::insert`) and the preview renderer (`markdown`) are pure functions
//! and can be used on their own.

pub mod config;
pub mod editor;
pub mod error;
pub mod file_handler;
pub mod i18n;
pub mod markdown;
pub mod menu;
pub mod message;
pub mod state;
pub mod utils;

pub use config::Config;
pub use editor::{Edit, Editor};
pub use error::{AppError, AppResult};
pub use message::{Command, Effect};
pub use state::SyntaxMode;
