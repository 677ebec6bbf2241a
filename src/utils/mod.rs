//! Utilities module for the Akari editor
//!
//! Shared helper functions and utilities including:
//! - Debouncing
//! - Text utilities
//! - Split-pane scroll synchronisation

use std::time::{Duration, Instant};

/// Trailing-edge debouncer
///
/// Every `schedule` pushes the deadline back; `poll` fires once after the
/// input has been quiet for the full delay.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            deadline: None,
        }
    }

    /// Restart the quiet period from `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true exactly once when the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Check if a trigger is waiting
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending trigger fires
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Drop any pending trigger
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Text utilities
pub mod text {
    /// Length in characters, the unit all buffer offsets use
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// Escape text for use inside HTML element content or attribute values
    pub fn escape_html(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(c),
            }
        }
        out
    }
}

/// Scroll synchronisation between the editor and preview panes
pub mod scroll {
    /// Scroll geometry of one pane, in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct ScrollMetrics {
        pub scroll_top: f64,
        pub scroll_height: f64,
        pub client_height: f64,
    }

    impl ScrollMetrics {
        pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
            Self {
                scroll_top,
                scroll_height,
                client_height,
            }
        }

        /// Largest valid `scroll_top`
        pub fn max_scroll(&self) -> f64 {
            (self.scroll_height - self.client_height).max(0.0)
        }

        /// Scroll position as a fraction in `0.0..=1.0`
        pub fn ratio(&self) -> f64 {
            let max = self.max_scroll();
            if max <= 0.0 {
                0.0
            } else {
                (self.scroll_top / max).clamp(0.0, 1.0)
            }
        }
    }

    /// `scroll_top` for `target` that matches the scroll ratio of `source`
    pub fn sync_offset(source: &ScrollMetrics, target: &ScrollMetrics) -> f64 {
        source.ratio() * target.max_scroll()
    }
}

#[cfg(test)]
mod tests {
    use super::scroll::{sync_offset, ScrollMetrics};
    use super::*;

    #[test]
    fn test_debouncer_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(150);
        debouncer.schedule(start);
        assert!(!debouncer.poll(start + Duration::from_millis(149)));
        assert!(debouncer.poll(start + Duration::from_millis(150)));
        // Fires once
        assert!(!debouncer.poll(start + Duration::from_millis(400)));
    }

    #[test]
    fn test_debouncer_reschedule_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(150);
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(100));
        assert!(!debouncer.poll(start + Duration::from_millis(200)));
        assert_eq!(
            debouncer.time_remaining(start + Duration::from_millis(200)),
            Some(Duration::from_millis(50))
        );
        assert!(debouncer.poll(start + Duration::from_millis(250)));
    }

    #[test]
    fn test_debouncer_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            text::escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_char_len() {
        assert_eq!(text::char_len("テキスト"), 4);
    }

    #[test]
    fn test_scroll_sync_ratio() {
        let editor = ScrollMetrics::new(250.0, 1000.0, 500.0);
        let preview = ScrollMetrics::new(0.0, 2500.0, 500.0);
        assert_eq!(sync_offset(&editor, &preview), 1000.0);
    }

    #[test]
    fn test_scroll_sync_short_content() {
        let editor = ScrollMetrics::new(0.0, 300.0, 500.0);
        let preview = ScrollMetrics::new(0.0, 2000.0, 500.0);
        assert_eq!(sync_offset(&editor, &preview), 0.0);
        let past_end = ScrollMetrics::new(900.0, 1000.0, 500.0);
        assert_eq!(sync_offset(&past_end, &preview), 1500.0);
    }
}
