//! Logging configuration access
//!
//! Runtime preferences are installed once; until then the environment-backed
//! defaults from [`LoggingPreferences`] apply.

use crate::config::compile_time::logging::EVENT_BUFFER_SIZE;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; fails if they were already installed
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn get_event_buffer_size() -> usize {
    EVENT_BUFFER_SIZE
}

/// Human readable summary of the active logging configuration
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "min_level={} structured={} console={} buffer={}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        EVENT_BUFFER_SIZE
    )
}
