use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::mpsc;

const HISTORY_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            LogLevel::Info => "info",
            LogLevel::Success => " ok ",
            LogLevel::Warning => "warn",
            LogLevel::Error => "fail",
        };
        write!(f, "[{}] {} {}", self.at.format("%H:%M:%S"), tag, self.message)
    }
}

/// User-facing activity log. Keeps a bounded history and optionally forwards
/// every entry to a listener (the terminal printer).
#[derive(Debug)]
pub struct ActivityLog {
    history: VecDeque<LogEntry>,
    listener: Option<mpsc::UnboundedSender<LogEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            listener: None,
        }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let log = Self {
            history: VecDeque::new(),
            listener: Some(tx),
        };
        (log, rx)
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            at: Local::now(),
            level,
            message: message.into(),
        };
        tracing::debug!(?level, "{}", entry.message);

        if let Some(listener) = &self.listener {
            if listener.send(entry.clone()).is_err() {
                self.listener = None;
            }
        }

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.history.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.history.back()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
