// Support resource classification
//
// Decides which kind of contact (if any) accompanies a reply: the literal
// keyword rule, or a dedicated chat-completion call that returns one label.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::prompt;
use crate::providers::{CompletionRequest, LlmProvider};

/// Kind of support contact to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Emergency line
    Hotline,
    /// Non-emergency peer support line
    Warmline,
    None,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Hotline,
        ResourceType::Warmline,
        ResourceType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Hotline => "hotline",
            ResourceType::Warmline => "warmline",
            ResourceType::None => "none",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type '{0}' (expected hotline, warmline or none)")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    /// Case-insensitive, ignoring surrounding whitespace, quotes and punctuation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        match label.as_str() {
            "hotline" => Ok(ResourceType::Hotline),
            "warmline" => Ok(ResourceType::Warmline),
            "none" => Ok(ResourceType::None),
            _ => Err(UnknownResourceType(s.to_string())),
        }
    }
}

/// Keyword rule: hotline on crisis, warmline when symptoms were found
pub fn keyword_decision(crisis: bool, has_symptoms: bool) -> ResourceType {
    if crisis {
        ResourceType::Hotline
    } else if has_symptoms {
        ResourceType::Warmline
    } else {
        ResourceType::None
    }
}

/// Extract the label from a classifier reply
///
/// Accepts a bare label, or free text naming exactly one distinct label.
pub fn parse_label(raw: &str) -> Option<ResourceType> {
    if let Ok(label) = raw.parse() {
        return Some(label);
    }

    let found: HashSet<ResourceType> = raw
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.parse().ok())
        .collect();

    if found.len() == 1 {
        found.into_iter().next()
    } else {
        None
    }
}

/// Ask the LLM to classify `message`, falling back on failure
pub async fn classify_with_llm(
    provider: &dyn LlmProvider,
    model: &str,
    message: &str,
    fallback: ResourceType,
) -> ResourceType {
    let request = CompletionRequest::new(prompt::classification_messages(message))
        .with_model(model)
        .with_temperature(0.0);

    match provider.complete(&request).await {
        Ok(raw) => match parse_label(&raw) {
            Some(label) => {
                tracing::debug!(label = %label, "LLM classified message");
                label
            }
            None => {
                tracing::warn!(
                    "Unrecognized classifier reply {:?}, using '{}'",
                    raw,
                    fallback
                );
                fallback
            }
        },
        Err(e) => {
            tracing::warn!("Classifier call failed, using '{}': {:#}", fallback, e);
            fallback
        }
    }
}
