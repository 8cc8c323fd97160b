//! Player-facing message log.

use std::collections::VecDeque;

/// Bounded, most-recent-first list of messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    /// Create an empty log keeping at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a message at the front, evicting the oldest beyond capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(message.into());
        self.entries.truncate(self.capacity);
    }

    /// Replace the whole log. `messages` is given newest first.
    pub fn reset<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.clear();
        self.entries
            .extend(messages.into_iter().take(self.capacity).map(Into::into));
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recent message.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Number of stored messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_bounded() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(format!("m{i}"));
        }
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["m4", "m3", "m2"]);
        assert_eq!(log.latest(), Some("m4"));
    }

    #[test]
    fn test_reset_keeps_order() {
        let mut log = EventLog::new(5);
        log.push("old");
        log.reset(["Shift reset.", "Ready for production."]);
        assert_eq!(
            log.iter().collect::<Vec<_>>(),
            vec!["Shift reset.", "Ready for production."]
        );
    }

    #[test]
    fn test_zero_capacity() {
        let mut log = EventLog::new(0);
        log.push("ignored");
        assert!(log.is_empty());
    }
}
