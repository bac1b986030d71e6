//! Deduplicating message buffer flushed to the log in one event

use rustc_hash::FxHashSet;
use tracing::Level;

/// Collects distinct messages in arrival order and logs them together.
///
/// Useful when a batch job would otherwise repeat the same warning for every
/// row it touches.
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    level: Level,
    messages: Vec<String>,
    seen: FxHashSet<String>,
}

impl MessageBuffer {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            messages: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Buffer for warnings
    pub fn warnings() -> Self {
        Self::new(Level::WARN)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Add a message unless it is empty or already buffered. Returns whether it was added.
    pub fn add(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if message.is_empty() || !self.seen.insert(message.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Log every buffered message as one event, clear the buffer, and return
    /// the logged text (one message per line).
    pub fn flush(&mut self) -> String {
        let mut text = String::new();
        for message in self.messages.drain(..) {
            text.push_str(&message);
            text.push('\n');
        }
        self.seen.clear();

        if text.is_empty() {
            return text;
        }

        let body = text.trim_end();
        if self.level == Level::ERROR {
            tracing::error!("{}", body);
        } else if self.level == Level::WARN {
            tracing::warn!("{}", body);
        } else if self.level == Level::INFO {
            tracing::info!("{}", body);
        } else if self.level == Level::DEBUG {
            tracing::debug!("{}", body);
        } else {
            tracing::trace!("{}", body);
        }
        text
    }
}
