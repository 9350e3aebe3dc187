//! In-memory diagnostic log.
//!
//! Keeps the most recent log lines (newest first) so they can be shown on
//! demand or exported after a run.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};

/// Entries beyond this are dropped, oldest first.
pub const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl DiagnosticLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl From<log::Level> for DiagnosticLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub timestamp: DateTime<Local>,
    pub level: DiagnosticLevel,
    pub target: String,
    pub message: String,
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<5} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.target,
            self.message
        )
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DiagnosticEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Record a message timestamped now.
    pub fn record(
        &mut self,
        level: DiagnosticLevel,
        target: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(DiagnosticEntry {
            timestamp: Local::now(),
            level,
            target: target.into(),
            message: message.into(),
        });
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries
            .iter()
            .filter(|e| e.level == DiagnosticLevel::Error)
    }

    pub fn count_at(&self, level: DiagnosticLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries as text, oldest first.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.iter().rev() {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;

        writeln!(file, "=== nx-content diagnostics ===")?;
        writeln!(file, "Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Entries: {}", self.len())?;
        for level in [
            DiagnosticLevel::Error,
            DiagnosticLevel::Warn,
            DiagnosticLevel::Info,
            DiagnosticLevel::Debug,
        ] {
            writeln!(file, "{}: {}", level, self.count_at(level))?;
        }
        writeln!(file)?;
        writeln!(file, "--- Entries ---")?;
        write!(file, "{}", self.export_text())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = DiagnosticLog::new();
        log.record(DiagnosticLevel::Info, "loader", "first");
        log.record(DiagnosticLevel::Error, "loader", "second");
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["second", "first"]);
        assert_eq!(log.errors().count(), 1);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut log = DiagnosticLog::new();
        for i in 0..MAX_ENTRIES + 10 {
            log.record(DiagnosticLevel::Debug, "t", i.to_string());
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries().next().unwrap().message, (MAX_ENTRIES + 9).to_string());
        assert_eq!(log.entries().last().unwrap().message, "10");
    }

    #[test]
    fn test_export_is_chronological() {
        let mut log = DiagnosticLog::new();
        log.record(DiagnosticLevel::Warn, "rss", "feed empty");
        log.record(DiagnosticLevel::Info, "loader", "loaded 3 records");
        let text = log.export_text();
        let warn = text.find("feed empty").unwrap();
        let info = text.find("loaded 3 records").unwrap();
        assert!(warn < info);
        assert!(text.contains("WARN  rss: feed empty"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics.txt");
        let mut log = DiagnosticLog::new();
        log.record(DiagnosticLevel::Error, "details", "all mirrors failed");
        log.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== nx-content diagnostics ==="));
        assert!(text.contains("ERROR: 1"));
        assert!(text.contains("all mirrors failed"));
    }

    #[test]
    fn test_clear() {
        let mut log = DiagnosticLog::new();
        log.record(DiagnosticLevel::Info, "t", "x");
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.export_text(), "");
    }

    #[test]
    fn test_level_from_log() {
        assert_eq!(DiagnosticLevel::from(log::Level::Trace), DiagnosticLevel::Debug);
        assert_eq!(DiagnosticLevel::from(log::Level::Warn), DiagnosticLevel::Warn);
    }
}
