// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crisis::DEFAULT_CRISIS_KEYWORDS;
use crate::providers::{DEFAULT_MODEL, OPENAI_BASE_URL};

/// How the support resource type is chosen when the reply carries none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Literal crisis phrases plus detected symptoms
    #[default]
    Keywords,
    /// A second chat-completion call that returns hotline / warmline / none
    Llm,
}

/// Shape of the reply requested from the LLM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFormat {
    #[default]
    Plain,
    /// JSON object with `reply` and `resource_type`
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenAI API key (empty until configured)
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Chat-completion model name
    pub model: String,

    /// API base URL, without the `/v1/...` path
    pub base_url: String,

    /// Directory holding the reference JSON/CSV files
    pub data_dir: PathBuf,

    pub classifier: ClassifierMode,

    pub reply_format: ReplyFormat,

    /// Maximum number of coping skills embedded in the prompt
    pub max_skills: usize,

    /// Literal phrases that mark a message as a crisis
    pub crisis_keywords: Vec<String>,

    /// JSON array of crisis phrases; replaces `crisis_keywords` when set
    pub crisis_keywords_path: Option<PathBuf>,

    pub history: HistoryLimits,

    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            data_dir: PathBuf::from("Data"),
            classifier: ClassifierMode::default(),
            reply_format: ReplyFormat::default(),
            max_skills: 3,
            crisis_keywords: DEFAULT_CRISIS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            crisis_keywords_path: None,
            history: HistoryLimits::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Whether an API key has been configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Conversation history bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryLimits {
    /// Keep at most this many messages (user + assistant)
    pub max_messages: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self { max_messages: 20 }
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
    /// Session timeout in minutes
    pub session_timeout_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            max_sessions: 100,
            session_timeout_minutes: 30,
        }
    }
}
