//! Timestamped, user-facing progress messages

use std::time::Duration;
use tracing::info;

/// `HH:MM:SS` for an elapsed duration. Hours are not wrapped.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Messages stamped with the time elapsed since the run started.
///
/// Leading newlines in a message are kept in front of the timestamp so that
/// a message can open a visually separate block.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    started: Duration,
    lines: Vec<String>,
}

impl MessageLog {
    pub fn new(started: Duration) -> Self {
        Self {
            started,
            lines: Vec::new(),
        }
    }

    pub fn print(&mut self, now: Duration, message: &str) {
        let body = message.trim_start_matches('\n');
        let breaks = &message[..message.len() - body.len()];
        let stamp = format_elapsed(now.saturating_sub(self.started));
        let line = format!("{breaks}{stamp} {body}");

        info!("{}", line.trim_start());
        self.lines.push(line);
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started)
    }

    pub fn messages(&self) -> &[String] {
        &self.lines
    }
}
