//! Debounced preview rendering on the tokio runtime
//!
//! Each `schedule` aborts the previous pending render and starts a new timer,
//! so only the last change inside a quiet period is rendered. Results are
//! published on a watch channel; a render never replaces a newer revision.
//!
//! This is the async counterpart of the clock-driven `Editor::poll_preview`,
//! fed through `Editor::schedule_preview_on` by embedders that run tokio.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::markdown::preview::render_preview;
use crate::state::SyntaxMode;

/// Preview HTML tagged with the revision it was rendered from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPreview {
    pub revision: u64,
    pub html: String,
}

/// Schedules debounced preview renders
pub struct PreviewScheduler {
    delay: Duration,
    revision: u64,
    pending: Option<JoinHandle<()>>,
    sender: Arc<watch::Sender<RenderedPreview>>,
}

impl PreviewScheduler {
    pub fn new(delay_ms: u64) -> Self {
        let (sender, _) = watch::channel(RenderedPreview::default());
        Self {
            delay: Duration::from_millis(delay_ms),
            revision: 0,
            pending: None,
            sender: Arc::new(sender),
        }
    }

    /// Receiver that sees every published preview
    pub fn subscribe(&self) -> watch::Receiver<RenderedPreview> {
        self.sender.subscribe()
    }

    /// Most recently published preview
    pub fn latest(&self) -> RenderedPreview {
        self.sender.borrow().clone()
    }

    /// Render `text` once the delay passes without another call
    ///
    /// Must be called from within a tokio runtime. Returns the revision the
    /// render will carry.
    pub fn schedule(&mut self, mode: SyntaxMode, text: String) -> u64 {
        self.cancel();
        self.revision += 1;

        let revision = self.revision;
        let delay = self.delay;
        let sender = Arc::clone(&self.sender);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let html = render_preview(mode, &text);
            let published = sender.send_if_modified(|current| {
                if current.revision >= revision {
                    return false;
                }
                *current = RenderedPreview { revision, html };
                true
            });
            if published {
                log::debug!("Preview revision {} rendered", revision);
            }
        }));

        revision
    }

    /// Drop the pending render, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Check if a render is waiting on its timer
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for PreviewScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_render_after_quiet_period() {
        let mut scheduler = PreviewScheduler::new(150);
        let revision = scheduler.schedule(SyntaxMode::Markdown, "# Hi".to_string());

        tokio::time::sleep(Duration::from_millis(149)).await;
        assert_eq!(scheduler.latest().revision, 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let latest = scheduler.latest();
        assert_eq!(latest.revision, revision);
        assert_eq!(latest.html, "<h1>Hi</h1>");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_coalesce() {
        let mut scheduler = PreviewScheduler::new(150);
        let mut receiver = scheduler.subscribe();

        for text in ["a", "ab", "abc"] {
            scheduler.schedule(SyntaxMode::Markdown, text.to_string());
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!receiver.has_changed().unwrap());

        receiver.changed().await.unwrap();
        let rendered = receiver.borrow_and_update().clone();
        assert_eq!(rendered.revision, 3);
        assert_eq!(rendered.html, "<p>abc</p>");

        // The aborted renders never publish
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_render() {
        let mut scheduler = PreviewScheduler::new(150);
        scheduler.schedule(SyntaxMode::Html, "<b>x</b>".to_string());
        assert!(scheduler.is_pending());
        scheduler.cancel();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(scheduler.latest(), RenderedPreview::default());
        assert!(!scheduler.is_pending());
    }
}
