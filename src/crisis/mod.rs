// Crisis detection and support resource classification

mod classifier;
mod detector;

pub use classifier::{
    classify_with_llm, keyword_decision, parse_label, ResourceType, UnknownResourceType,
};
pub use detector::{CrisisDetector, DEFAULT_CRISIS_KEYWORDS};

use anyhow::Result;

use crate::config::Config;

/// Build the detector from a keywords file when configured, else the inline list
pub fn detector_from_config(config: &Config) -> Result<CrisisDetector> {
    match &config.crisis_keywords_path {
        Some(path) => CrisisDetector::load_from_file(path),
        None => Ok(CrisisDetector::new(&config.crisis_keywords)),
    }
}
