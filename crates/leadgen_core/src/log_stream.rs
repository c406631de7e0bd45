use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    System,
    Status,
    Result,
    Error,
}

impl LogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::System => "SYSTEM",
            LogCategory::Status => "STATUS",
            LogCategory::Result => "RESULT",
            LogCategory::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub category: LogCategory,
    pub message: String,
}

/// Append-only campaign log. Cleared only when a new campaign starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogStream {
    entries: Vec<LogEntry>,
}

impl LogStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(
        &mut self,
        timestamp: String,
        category: LogCategory,
        message: impl Into<String>,
    ) {
        self.entries.push(LogEntry {
            timestamp,
            category,
            message: message.into(),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
