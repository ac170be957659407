// Crisis keyword detector

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Literal phrases that mark a message as a crisis
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] =
    &["suicide", "kill myself", "hurt myself", "ending my life"];

#[derive(Debug, Clone)]
pub struct CrisisDetector {
    /// Stored lowercase
    keywords: Vec<String>,
}

impl CrisisDetector {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Load crisis keywords from a JSON array of strings
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read crisis keywords file: {}", path.display()))?;

        let keywords: Vec<String> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Self::new(keywords))
    }

    /// Detect if the text contains any crisis keyword
    pub fn detect_crisis(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();

        match self.keywords.iter().find(|k| text_lower.contains(k.as_str())) {
            Some(keyword) => {
                tracing::warn!("Crisis detected: keyword '{}'", keyword);
                true
            }
            None => false,
        }
    }

    /// Get all keywords (for display purposes)
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_detection() {
        let detector = CrisisDetector::default();

        assert!(detector.detect_crisis("I feel worthless and think about suicide"));
        assert!(detector.detect_crisis("Sometimes I want to kill myself"));
        assert!(detector.detect_crisis("I keep thinking about ending my life"));
        assert!(!detector.detect_crisis("What is the meaning of life?"));
        assert!(!detector.detect_crisis(""));
    }

    #[test]
    fn test_case_insensitive() {
        let detector = CrisisDetector::new(["Hurt Myself"]);

        assert!(detector.detect_crisis("I might HURT MYSELF"));
        assert!(detector.detect_crisis("i might hurt myself"));
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let detector = CrisisDetector::new(["", "  "]);
        assert!(detector.keywords().is_empty());
        assert!(!detector.detect_crisis("anything at all"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crisis_keywords.json");
        fs::write(&path, r#"["overdose", "no reason to live"]"#).unwrap();

        let detector = CrisisDetector::load_from_file(&path).unwrap();
        assert!(detector.detect_crisis("There is no reason to live"));
        assert!(!detector.detect_crisis("suicide"));
    }
}
