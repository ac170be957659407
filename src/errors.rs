// Error types and user-friendly error messages
//
// Reference-data failures get a typed error so callers can tell a missing
// file apart from a malformed one. Everything else goes through anyhow,
// with the helpers below turning common failures into actionable text.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading the static reference data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Reference data file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl DataError {
    /// Path of the file that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            DataError::Missing { path }
            | DataError::Io { path, .. }
            | DataError::Json { path, .. }
            | DataError::Csv { path, .. }
            | DataError::MissingColumn { path, .. } => path,
        }
    }
}

/// Format a missing API key error with helpful suggestions
pub fn api_key_missing_error() -> String {
    "OpenAI API key is invalid or missing\n\n\
    \x1b[1;33mPossible causes:\x1b[0m\n\
    • OPENAI_API_KEY is not set\n\
    • api_key is missing from the config file\n\
    • API key has been revoked\n\n\
    \x1b[1;32mTry:\x1b[0m\n\
    1. Export the key for this shell:\n\
       \x1b[36mexport OPENAI_API_KEY=\"sk-...\"\x1b[0m\n\n\
    2. Or add it to your config file:\n\
       \x1b[36mecho 'api_key = \"sk-...\"' >> ~/.copechat/config.toml\x1b[0m\n\n\
    3. Get a new API key:\n\
       https://platform.openai.com/api-keys"
        .to_string()
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(error: &str) -> String {
    format!(
        "Failed to parse config file\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat ~/.copechat/config.toml\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unclosed brackets []\n\
           • classifier must be \"keywords\" or \"llm\"\n\
           • reply_format must be \"plain\" or \"json\"",
        error
    )
}

/// Format a missing reference data file error with helpful suggestions
pub fn data_file_missing_error(path: &str, description: &str) -> String {
    format!(
        "{} not found: {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The data directory points somewhere else\n\
        • The file was renamed\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the data directory:\n\
           \x1b[36mls -la $(dirname \"{}\")\x1b[0m\n\n\
        2. Point copechat at the right directory:\n\
           \x1b[36mcopechat --data-dir /path/to/Data\x1b[0m\n\
           \x1b[36mexport COPECHAT_DATA_DIR=/path/to/Data\x1b[0m",
        description, path, path
    )
}

/// Wrap a generic error with a suggestion
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!("{}\n\n\x1b[1;33mSuggestion:\x1b[0m {}", error, suggestion)
}
