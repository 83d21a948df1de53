//! Leveled diagnostics collected while parsing data
//!
//! Unlike the global logging service, a [`DiagnosticLog`] is a plain value
//! owned by a parse run or a row. Cloning it yields an independent snapshot.

use crate::logging::{codes, Code, LogEvent, LogLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiagnosticLevel {
    Info,
    Warn,
    Error,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Info => "INFO",
            DiagnosticLevel::Warn => "WARN",
            DiagnosticLevel::Error => "ERROR",
        }
    }

    pub fn to_log_level(self) -> LogLevel {
        match self {
            DiagnosticLevel::Info => LogLevel::Info,
            DiagnosticLevel::Warn => LogLevel::Warning,
            DiagnosticLevel::Error => LogLevel::Error,
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub level: DiagnosticLevel,
    /// Logging code used when the entry is emitted
    #[serde(skip)]
    pub code: Option<Code>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Ordered, append-only collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, level: DiagnosticLevel, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            message: message.into(),
            level,
            code: None,
        });
    }

    pub fn add_coded(&mut self, level: DiagnosticLevel, code: Code, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            message: message.into(),
            level,
            code: Some(code),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(DiagnosticLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.add(DiagnosticLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(DiagnosticLevel::Error, message);
    }

    pub fn error_with_code(&mut self, code: Code, message: impl Into<String>) {
        self.add_coded(DiagnosticLevel::Error, code, message);
    }

    /// Whether any entry of any level exists
    pub fn has_logs(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn has_logs_at(&self, level: DiagnosticLevel) -> bool {
        self.entries.iter().any(|entry| entry.level == level)
    }

    pub fn has_errors(&self) -> bool {
        self.has_logs_at(DiagnosticLevel::Error)
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn entries_at(&self, level: DiagnosticLevel) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |entry| entry.level == level)
    }

    pub fn count_at(&self, level: DiagnosticLevel) -> usize {
        self.entries_at(level).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append every entry of `other`, keeping its order
    pub fn copy_from(&mut self, other: &DiagnosticLog) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn clear_level(&mut self, level: DiagnosticLevel) {
        self.entries.retain(|entry| entry.level != level);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Forward every entry to the global logging service
    pub fn emit(&self, origin: &str) {
        for entry in &self.entries {
            let event = match (entry.level, entry.code) {
                (DiagnosticLevel::Error, code) => LogEvent::error(
                    code.unwrap_or(codes::system::INTERNAL_ERROR),
                    &entry.message,
                ),
                (DiagnosticLevel::Warn, Some(code)) => LogEvent::warning_with_code(code, &entry.message),
                (DiagnosticLevel::Warn, None) => LogEvent::warning(&entry.message),
                (DiagnosticLevel::Info, _) => LogEvent::info(&entry.message),
            };
            crate::logging::log_with_context(event, vec![("origin", origin.to_string())]);
        }
    }
}

impl fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leveled_queries() {
        let mut log = DiagnosticLog::new();
        assert!(!log.has_logs());

        log.info("started");
        log.error("bad value");
        log.error("worse value");

        assert!(log.has_logs());
        assert!(log.has_errors());
        assert!(!log.has_logs_at(DiagnosticLevel::Warn));
        assert_eq!(log.count_at(DiagnosticLevel::Error), 2);
        assert_eq!(
            log.entries_at(DiagnosticLevel::Info).next().map(|d| d.message.as_str()),
            Some("started")
        );
    }

    #[test]
    fn test_copy_from_appends_in_order() {
        let mut run = DiagnosticLog::new();
        run.warn("first");

        let mut row = DiagnosticLog::new();
        row.error("second");
        row.info("third");

        run.copy_from(&row);
        let messages: Vec<&str> = run.entries().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_clone_is_an_independent_snapshot() {
        let mut running = DiagnosticLog::new();
        running.error("row 1 failed");

        let snapshot = running.clone();
        running.error("row 2 failed");
        running.clear_level(DiagnosticLevel::Error);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.has_errors());
        assert!(running.is_empty());
    }

    #[test]
    fn test_clear_level_keeps_other_levels() {
        let mut log = DiagnosticLog::new();
        log.info("a");
        log.warn("b");
        log.clear_level(DiagnosticLevel::Info);

        assert_eq!(log.len(), 1);
        assert!(log.has_logs_at(DiagnosticLevel::Warn));

        log.clear();
        assert!(!log.has_logs());
    }

    #[test]
    fn test_json_and_display() {
        let mut log = DiagnosticLog::new();
        log.error_with_code(codes::tabular::EMPTY_LINE, "Empty line: 3");
        assert_eq!(log.entries()[0].code, Some(codes::tabular::EMPTY_LINE));

        assert_eq!(log.to_json().unwrap(), r#"[{"message":"Empty line: 3","level":"ERROR"}]"#);
        assert_eq!(log.to_string(), "[ERROR] Empty line: 3\n");
    }
}
