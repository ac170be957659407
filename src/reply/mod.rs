// Structured reply parsing
//
// In JSON reply mode the model is asked for {"reply", "resource_type"}.
// Anything that does not decode is shown to the user as raw text.

use serde::Deserialize;

use crate::crisis::ResourceType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub reply: String,
    /// Label chosen by the model, if it gave a recognizable one
    pub resource_type: Option<ResourceType>,
}

impl ParsedReply {
    /// Raw text reply with no structured fields
    pub fn plain(raw: &str) -> Self {
        Self {
            reply: raw.trim().to_string(),
            resource_type: None,
        }
    }
}

#[derive(Deserialize)]
struct StructuredReply {
    reply: String,
    #[serde(default)]
    resource_type: Option<String>,
}

/// Decode a JSON reply, falling back to the raw text
pub fn parse_reply(raw: &str) -> ParsedReply {
    let body = strip_code_fence(raw.trim());

    match serde_json::from_str::<StructuredReply>(body) {
        Ok(structured) => {
            let resource_type = structured.resource_type.as_deref().and_then(|label| {
                label
                    .parse::<ResourceType>()
                    .map_err(|e| tracing::warn!("Ignoring resource_type: {}", e))
                    .ok()
            });

            ParsedReply {
                reply: structured.reply.trim().to_string(),
                resource_type,
            }
        }
        Err(e) => {
            tracing::warn!("Reply was not valid JSON, showing raw text: {}", e);
            ParsedReply::plain(raw)
        }
    }
}

/// Remove a surrounding Markdown code fence (``` or ```json)
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}
