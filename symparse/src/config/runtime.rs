use crate::logging::{codes, Code, LogLevel};
use crate::{log_error, log_success};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerPreferences {
    /// Read `-5` as one signed number instead of a minus followed by `5`
    pub read_negative_numbers: bool,

    /// Merge consecutive whitespace into a single blanks token
    pub join_blanks: bool,

    /// Recognize `//` and `/* */` comments after a slash
    pub recognize_comments: bool,
}

impl Default for TokenizerPreferences {
    fn default() -> Self {
        Self {
            read_negative_numbers: env_flag(env_vars::TOKENIZER_READ_NEGATIVE_NUMBERS, true),
            join_blanks: env_flag(env_vars::TOKENIZER_JOIN_BLANKS, true),
            recognize_comments: env_flag(env_vars::TOKENIZER_RECOGNIZE_COMMENTS, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularPreferences {
    /// Record an ERROR diagnostic for empty lines that are not the last line
    pub report_empty_lines: bool,

    /// Emit a debug event for every row that carries diagnostics
    pub log_row_diagnostics: bool,
}

impl Default for TabularPreferences {
    fn default() -> Self {
        Self {
            report_empty_lines: env_flag(env_vars::TABULAR_REPORT_EMPTY_LINES, true),
            log_row_diagnostics: env_flag(env_vars::TABULAR_LOG_ROW_DIAGNOSTICS, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether the configured service writes to the console at all
    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Io { .. } => codes::configuration::CONFIG_IO_ERROR,
            ConfigError::Parse(_) => codes::configuration::CONFIG_PARSE_ERROR,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tokenizer: TokenizerPreferences,
    pub tabular: TabularPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing tables and keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| {
            let error = ConfigError::from(e);
            log_error!(error.error_code(), "Rejected runtime configuration",
                "reason" => &error
            );
            error
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            let error = ConfigError::Io {
                path: path.display().to_string(),
                source,
            };
            log_error!(error.error_code(), "Cannot read runtime configuration",
                "path" => path.display()
            );
            error
        })?;

        let config = Self::from_toml_str(&source)?;
        log_success!(codes::success::CONFIG_LOADED, "Runtime configuration loaded",
            "path" => path.display()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Install the logging preferences and start the global logging service
    pub fn init_logging(&self) -> Result<(), String> {
        crate::logging::config::init_runtime_preferences(self.logging.clone())?;
        crate::logging::init_global_logging()
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Tokenizer
    pub const TOKENIZER_READ_NEGATIVE_NUMBERS: &str = "SYMPARSE_TOKENIZER_READ_NEGATIVE_NUMBERS";
    pub const TOKENIZER_JOIN_BLANKS: &str = "SYMPARSE_TOKENIZER_JOIN_BLANKS";
    pub const TOKENIZER_RECOGNIZE_COMMENTS: &str = "SYMPARSE_TOKENIZER_RECOGNIZE_COMMENTS";

    // Tabular
    pub const TABULAR_REPORT_EMPTY_LINES: &str = "SYMPARSE_TABULAR_REPORT_EMPTY_LINES";
    pub const TABULAR_LOG_ROW_DIAGNOSTICS: &str = "SYMPARSE_TABULAR_LOG_ROW_DIAGNOSTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SYMPARSE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SYMPARSE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SYMPARSE_LOGGING_MIN_LEVEL";
}
