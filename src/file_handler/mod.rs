//! File handler module for the Akari editor
//!
//! Handles file system side channels:
//! - Draft recovery for unsaved content

pub mod recovery;

pub use recovery::{Draft, DraftEntry, DraftManifest, RecoveryManager};
