//! Draft recovery for unsaved editor content
//!
//! Provides:
//! - Draft file creation, skipped when the content hash is unchanged
//! - Recovery manifest management
//! - Restoring and discarding drafts
//! - Interval-gated autosave
//! - Stale draft cleanup on open
//!
//! Autosave is a side channel: its failures are logged, never surfaced.

use crate::config::{Config, RecoveryConfig, DEFAULT_AUTOSAVE_INTERVAL, MAX_DRAFT_AGE_DAYS};
use crate::editor::Editor;
use crate::error::{RecoveryError, RecoveryResult};
use crate::state::SyntaxMode;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File name of the manifest inside the recovery directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Recovery manifest containing all draft metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftManifest {
    /// Schema version for future compatibility
    pub version: u32,

    /// Map of document id to draft entry
    pub drafts: HashMap<String, DraftEntry>,

    /// When the manifest was last updated
    pub last_updated: DateTime<Utc>,
}

impl Default for DraftManifest {
    fn default() -> Self {
        Self {
            version: 1,
            drafts: HashMap::new(),
            last_updated: Utc::now(),
        }
    }
}

/// A single draft entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub document_id: String,

    /// Draft file name, relative to the recovery directory
    pub file_name: String,

    /// Syntax mode the draft was written in
    pub mode: SyntaxMode,

    pub created_at: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,

    /// Simple hash of content for change detection
    pub content_hash: u64,
}

/// A recovered draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub document_id: String,
    pub content: String,
    pub mode: SyntaxMode,
    pub saved_at: DateTime<Utc>,
}

/// Recovery manager for handling document drafts
pub struct RecoveryManager {
    dir: PathBuf,
    manifest: DraftManifest,
    autosave_enabled: bool,
    /// Minimum seconds between autosaves
    autosave_interval: u64,
    max_age_days: u64,
    last_autosave: Option<Instant>,
}

impl RecoveryManager {
    /// Open (creating if needed) a recovery directory
    pub fn open(dir: impl Into<PathBuf>) -> RecoveryResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| RecoveryError::Io {
            path: dir.clone(),
            source,
        })?;

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let content =
                std::fs::read_to_string(&manifest_path).map_err(|source| RecoveryError::Io {
                    path: manifest_path.clone(),
                    source,
                })?;
            serde_json::from_str(&content)?
        } else {
            DraftManifest::default()
        };

        log::debug!(
            "Recovery directory {} has {} draft(s)",
            dir.display(),
            manifest.drafts.len()
        );

        Ok(Self {
            dir,
            manifest,
            autosave_enabled: true,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            max_age_days: MAX_DRAFT_AGE_DAYS,
            last_autosave: None,
        })
    }

    /// Open the configured directory, or `<data dir>/akari-editor/recovery`,
    /// and drop drafts older than the configured age
    pub fn open_default(config: &RecoveryConfig) -> RecoveryResult<Self> {
        let dir = match &config.directory {
            Some(dir) => dir.clone(),
            None => Config::data_dir()
                .map_err(|_| RecoveryError::NoRecoveryDir)?
                .join("recovery"),
        };
        let mut manager = Self::open(dir)?;
        manager.autosave_enabled = config.autosave_enabled;
        manager.autosave_interval = config.autosave_interval;
        manager.max_age_days = config.max_age_days;

        if let Err(e) = manager.cleanup_stale(Utc::now()) {
            log::warn!("Stale draft cleanup failed: {}", e.user_message());
        }
        Ok(manager)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check if there are drafts to recover
    pub fn has_drafts(&self) -> bool {
        !self.manifest.drafts.is_empty()
    }

    /// All drafts, most recent first
    pub fn drafts(&self) -> Vec<&DraftEntry> {
        let mut drafts: Vec<&DraftEntry> = self.manifest.drafts.values().collect();
        drafts.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        drafts
    }

    /// Write a draft for a document
    ///
    /// Returns `false` when the content is unchanged since the last draft and
    /// nothing was written.
    pub fn save_draft(
        &mut self,
        document_id: &str,
        content: &str,
        mode: SyntaxMode,
    ) -> RecoveryResult<bool> {
        let hash = simple_hash(content);
        let now = Utc::now();

        let mut entry = match self.manifest.drafts.get(document_id) {
            Some(entry) if entry.content_hash == hash && entry.mode == mode => return Ok(false),
            Some(entry) => entry.clone(),
            None => DraftEntry {
                document_id: document_id.to_string(),
                file_name: draft_file_name(document_id),
                mode,
                created_at: now,
                last_modified: now,
                content_hash: hash,
            },
        };

        write_atomic(&self.dir.join(&entry.file_name), content)?;

        entry.mode = mode;
        entry.last_modified = now;
        entry.content_hash = hash;
        self.manifest.drafts.insert(document_id.to_string(), entry);
        self.save_manifest()?;

        log::debug!("Draft saved for {}", document_id);
        Ok(true)
    }

    /// Check if autosave is enabled and the interval has passed since the
    /// last attempt
    pub fn autosave_due(&self, now: Instant) -> bool {
        let elapsed = |last: Instant| now.saturating_duration_since(last).as_secs();
        self.autosave_enabled
            && self
                .last_autosave
                .map_or(true, |last| elapsed(last) >= self.autosave_interval)
    }

    /// Write a draft of the editor's document once the autosave interval has
    /// passed, logging any failure
    pub fn autosave(&mut self, editor: &Editor, now: Instant) -> bool {
        if !self.autosave_due(now) {
            return false;
        }
        self.last_autosave = Some(now);
        match self.save_draft(editor.document_id(), &editor.content(), editor.mode()) {
            Ok(written) => written,
            Err(e) => {
                log::warn!("Autosave failed: {}", e.user_message());
                false
            }
        }
    }

    /// Recover a document's draft
    pub fn recover(&self, document_id: &str) -> RecoveryResult<Draft> {
        let entry = self
            .manifest
            .drafts
            .get(document_id)
            .ok_or_else(|| RecoveryError::NotFound(document_id.to_string()))?;

        let path = self.dir.join(&entry.file_name);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| RecoveryError::Io { path, source })?;

        Ok(Draft {
            document_id: entry.document_id.clone(),
            content,
            mode: entry.mode,
            saved_at: entry.last_modified,
        })
    }

    /// Remove the draft of a document (e.g., after a successful save)
    pub fn discard(&mut self, document_id: &str) -> RecoveryResult<()> {
        if let Some(entry) = self.manifest.drafts.remove(document_id) {
            self.delete_file(&entry)?;
            self.save_manifest()?;
        }
        Ok(())
    }

    /// Remove drafts older than the configured age, returning how many went
    pub fn cleanup_stale(&mut self, now: DateTime<Utc>) -> RecoveryResult<usize> {
        // Capped at a century so the duration cannot overflow
        let max_age = Duration::days(self.max_age_days.min(36_500) as i64);

        let stale: Vec<String> = self
            .manifest
            .drafts
            .iter()
            .filter(|(_, entry)| now.signed_duration_since(entry.last_modified) > max_age)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            if let Some(entry) = self.manifest.drafts.remove(id) {
                // Best effort cleanup
                if let Err(e) = self.delete_file(&entry) {
                    log::warn!("Could not delete stale draft: {}", e);
                }
            }
        }

        if !stale.is_empty() {
            self.save_manifest()?;
            log::info!("Removed {} stale draft(s)", stale.len());
        }
        Ok(stale.len())
    }

    fn delete_file(&self, entry: &DraftEntry) -> RecoveryResult<()> {
        let path = self.dir.join(&entry.file_name);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|source| RecoveryError::Io { path, source })?;
        }
        Ok(())
    }

    fn save_manifest(&mut self) -> RecoveryResult<()> {
        self.manifest.last_updated = Utc::now();
        let content = serde_json::to_string_pretty(&self.manifest)?;
        write_atomic(&self.dir.join(MANIFEST_FILE), &content)
    }
}

/// Draft file name for a document id; anything but `[A-Za-z0-9_-]` becomes `_`
fn draft_file_name(document_id: &str) -> String {
    let safe: String = document_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.draft", safe)
}

/// Write through a temp file in the same directory, then rename over `path`
fn write_atomic(path: &Path, content: &str) -> RecoveryResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "draft".to_string());
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    std::fs::write(&temp_path, content).map_err(|source| RecoveryError::Io {
        path: temp_path.clone(),
        source,
    })?;
    std::fs::rename(&temp_path, path).map_err(|source| {
        let _ = std::fs::remove_file(&temp_path);
        RecoveryError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Simple hash function for content comparison
fn simple_hash(content: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Command;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_simple_hash() {
        assert_eq!(simple_hash("hello"), simple_hash("hello"));
        assert_ne!(simple_hash("hello"), simple_hash("world"));
    }

    #[test]
    fn test_save_and_recover() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = RecoveryManager::open(dir.path()).unwrap();
        assert!(!manager.has_drafts());

        assert!(manager.save_draft("doc-1", "# draft", SyntaxMode::Markdown).unwrap());
        // Unchanged content is not rewritten
        assert!(!manager.save_draft("doc-1", "# draft", SyntaxMode::Markdown).unwrap());

        let draft = manager.recover("doc-1").unwrap();
        assert_eq!(draft.content, "# draft");
        assert_eq!(draft.mode, SyntaxMode::Markdown);
    }

    #[test]
    fn test_manifest_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut manager = RecoveryManager::open(dir.path()).unwrap();
            manager.save_draft("a", "<p>x</p>", SyntaxMode::Html).unwrap();
        }
        let manager = RecoveryManager::open(dir.path()).unwrap();
        assert!(manager.has_drafts());
        assert_eq!(manager.recover("a").unwrap().mode, SyntaxMode::Html);
    }

    #[test]
    fn test_discard() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = RecoveryManager::open(dir.path()).unwrap();
        manager.save_draft("a", "text", SyntaxMode::Markdown).unwrap();
        manager.discard("a").unwrap();

        assert!(!manager.has_drafts());
        assert!(!dir.path().join("a.draft").exists());
        assert!(matches!(manager.recover("a"), Err(RecoveryError::NotFound(_))));
    }

    #[test]
    fn test_cleanup_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = RecoveryManager::open(dir.path()).unwrap();
        manager.save_draft("old", "1", SyntaxMode::Markdown).unwrap();
        manager.save_draft("new", "2", SyntaxMode::Markdown).unwrap();

        let later = Utc::now() + Duration::days(20);
        manager
            .manifest
            .drafts
            .get_mut("new")
            .unwrap()
            .last_modified = later;

        assert_eq!(manager.cleanup_stale(later).unwrap(), 1);
        assert!(manager.recover("old").is_err());
        assert!(manager.recover("new").is_ok());
    }

    #[test]
    fn test_document_id_is_sanitized() {
        assert_eq!(draft_file_name("../posts/1"), "___posts_1.draft");
    }

    #[test]
    fn test_autosave_editor() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = RecoveryManager::open(dir.path()).unwrap();
        let mut editor = Editor::new("start", SyntaxMode::Markdown).with_document_id("post-7");

        let start = Instant::now();
        assert!(manager.autosave(&editor, start));
        editor.dispatch(Command::InsertText("> ".to_string()));
        // Too soon after the last autosave
        assert!(!manager.autosave(&editor, start + StdDuration::from_secs(5)));
        assert!(manager.autosave(&editor, start + StdDuration::from_secs(30)));
        // Unchanged content is not rewritten
        assert!(!manager.autosave(&editor, start + StdDuration::from_secs(60)));

        assert_eq!(manager.recover("post-7").unwrap().content, "> start");
        assert_eq!(manager.drafts().len(), 1);
    }

    #[test]
    fn test_autosave_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecoveryConfig {
            autosave_enabled: false,
            directory: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut manager = RecoveryManager::open_default(&config).unwrap();
        let editor = Editor::new("x", SyntaxMode::Markdown);
        assert!(!manager.autosave_due(Instant::now()));
        assert!(!manager.autosave(&editor, Instant::now()));
        assert!(!manager.has_drafts());
    }

    #[test]
    fn test_autosave_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = RecoveryManager::open(dir.path()).unwrap();
        // Pull the directory out from under the manager
        std::fs::remove_dir_all(dir.path()).unwrap();

        let editor = Editor::new("x", SyntaxMode::Markdown);
        assert!(!manager.autosave(&editor, Instant::now()));
    }

    #[test]
    fn test_open_default_drops_stale_drafts() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut manager = RecoveryManager::open(dir.path()).unwrap();
            manager.save_draft("old", "1", SyntaxMode::Markdown).unwrap();
            manager.save_draft("fresh", "2", SyntaxMode::Markdown).unwrap();
            manager
                .manifest
                .drafts
                .get_mut("old")
                .unwrap()
                .last_modified = Utc::now() - Duration::days(10);
            manager.save_manifest().unwrap();
        }

        let config = RecoveryConfig {
            max_age_days: 7,
            directory: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let manager = RecoveryManager::open_default(&config).unwrap();
        assert!(manager.recover("old").is_err());
        assert!(manager.recover("fresh").is_ok());
        assert!(!dir.path().join("old.draft").exists());
    }
}
