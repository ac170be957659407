// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{apply_env_overrides, default_config_path, load_config, load_config_from};
pub use settings::{ClassifierMode, Config, HistoryLimits, ReplyFormat, ServerConfig};
