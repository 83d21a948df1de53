//! Error and success codes with their classification metadata
//!
//! Every code emitted by the crate is declared here together with the metadata
//! used by structured output (category, severity, recoverability).

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper shared by error, warning and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata attached to a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl ErrorMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Rejected configuration calls on builders and the runtime config loader
pub mod configuration {
    use super::Code;

    pub const SEPARATOR_CONFLICT: Code = Code::new("E010");
    pub const DELIMITER_CONFLICT: Code = Code::new("E011");
    pub const EMPTY_CLOSE_SET: Code = Code::new("E012");
    pub const IGNORED_SEPARATOR: Code = Code::new("E013");
    pub const TOO_MANY_COLUMNS: Code = Code::new("E014");
    pub const NO_COLUMNS: Code = Code::new("E015");
    pub const CONFIG_IO_ERROR: Code = Code::new("E016");
    pub const CONFIG_PARSE_ERROR: Code = Code::new("E017");
}

/// Data problems found while splitting a stream into rows
pub mod tabular {
    use super::Code;

    pub const PARSE_ALREADY_RUNNING: Code = Code::new("E030");
    pub const TOO_MANY_FIELDS: Code = Code::new("E031");
    pub const TOO_FEW_FIELDS: Code = Code::new("E032");
    pub const EMPTY_LINE: Code = Code::new("E033");
    pub const UNTERMINATED_DELIMITER: Code = Code::new("E034");
}

pub mod values {
    use super::Code;

    pub const MISSING_VALUE: Code = Code::new("E040");
    pub const INVALID_VALUE: Code = Code::new("E041");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I010");
    pub const TABULAR_PARSE_COMPLETE: Code = Code::new("I020");
    pub const CONFIG_LOADED: Code = Code::new("I030");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Internal invariant violated",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging system initialization failure",
            ),
            ErrorMetadata::new(
                "E010",
                "Configuration",
                Severity::High,
                true,
                "Line separator, column separator and end marker must be distinct",
            ),
            ErrorMetadata::new(
                "E011",
                "Configuration",
                Severity::High,
                true,
                "Delimiter type collides with a separator, end marker or ignored type",
            ),
            ErrorMetadata::new(
                "E012",
                "Configuration",
                Severity::High,
                true,
                "Open delimiter registered without any close type",
            ),
            ErrorMetadata::new(
                "E013",
                "Configuration",
                Severity::High,
                true,
                "Separator or end marker registered as ignored type",
            ),
            ErrorMetadata::new(
                "E014",
                "Configuration",
                Severity::High,
                true,
                "Column set exceeds the column limit",
            ),
            ErrorMetadata::new(
                "E015",
                "Configuration",
                Severity::High,
                true,
                "Tabular run configured with zero columns",
            ),
            ErrorMetadata::new(
                "E016",
                "Configuration",
                Severity::Medium,
                true,
                "Configuration file could not be read",
            ),
            ErrorMetadata::new(
                "E017",
                "Configuration",
                Severity::Medium,
                true,
                "Configuration file is not valid TOML for the runtime config",
            ),
            ErrorMetadata::new(
                "E030",
                "Tabular",
                Severity::High,
                true,
                "Parse requested while a parse run is in progress on the same parser",
            ),
            ErrorMetadata::new(
                "E031",
                "Tabular",
                Severity::Medium,
                true,
                "Line holds more fields than configured columns",
            ),
            ErrorMetadata::new(
                "E032",
                "Tabular",
                Severity::Medium,
                true,
                "Line holds fewer fields than configured columns",
            ),
            ErrorMetadata::new(
                "E033",
                "Tabular",
                Severity::Low,
                true,
                "Empty line inside tabular data",
            ),
            ErrorMetadata::new(
                "E034",
                "Tabular",
                Severity::Medium,
                true,
                "Open delimiter not closed before end of stream",
            ),
            ErrorMetadata::new(
                "E040",
                "Values",
                Severity::Medium,
                true,
                "Value parser received no symbols",
            ),
            ErrorMetadata::new(
                "E041",
                "Values",
                Severity::Medium,
                true,
                "Value parser could not convert the symbol text",
            ),
        ];

        entries.into_iter().map(|meta| (meta.code, meta)).collect()
    })
}

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|meta| meta.severity)
        .unwrap_or(Severity::Low)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|meta| meta.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown error")
}

pub fn get_category(code: &str) -> &'static str {
    match get_error_metadata(code) {
        Some(meta) => meta.category,
        None if code.starts_with('I') => "Success",
        None => "Unknown",
    }
}
