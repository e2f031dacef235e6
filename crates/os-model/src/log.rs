//! Messages collected by translators.
//!
//! Translators skip objects they cannot map and keep going. Each skip is
//! recorded here and echoed through `tracing` so that callers can inspect the
//! outcome without installing a subscriber.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub channel: &'static str,
    pub message: String,
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.channel, self.level.as_str(), self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationLog {
    messages: Vec<LogMessage>,
}

impl TranslationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn push(&mut self, level: LogLevel, channel: &'static str, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!(channel, "{message}"),
            LogLevel::Info => tracing::info!(channel, "{message}"),
            LogLevel::Warn => tracing::warn!(channel, "{message}"),
            LogLevel::Error => tracing::error!(channel, "{message}"),
        }
        self.messages.push(LogMessage {
            level,
            channel,
            message,
        });
    }

    pub fn info(&mut self, channel: &'static str, message: impl Into<String>) {
        self.push(LogLevel::Info, channel, message);
    }

    pub fn warn(&mut self, channel: &'static str, message: impl Into<String>) {
        self.push(LogLevel::Warn, channel, message);
    }

    pub fn error(&mut self, channel: &'static str, message: impl Into<String>) {
        self.push(LogLevel::Error, channel, message);
    }

    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    pub fn warnings(&self) -> Vec<LogMessage> {
        self.of_level(LogLevel::Warn)
    }

    pub fn errors(&self) -> Vec<LogMessage> {
        self.of_level(LogLevel::Error)
    }

    fn of_level(&self, level: LogLevel) -> Vec<LogMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == level)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_level() {
        let mut log = TranslationLog::new();
        log.info("test", "started");
        log.warn("test", "odd value");
        log.error("test", "skipped object");
        log.warn("test", "another");
        assert_eq!(log.messages().len(), 4);
        assert_eq!(log.warnings().len(), 2);
        assert_eq!(log.errors()[0].message, "skipped object");
        assert_eq!(log.errors()[0].to_string(), "[test] error: skipped object");
        log.clear();
        assert!(log.messages().is_empty());
    }
}
