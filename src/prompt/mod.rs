// Prompt composition
//
// Builds the system and user messages sent to the chat-completion API from
// the reference data and the local match report.

use crate::config::ReplyFormat;
use crate::crisis::ResourceType;
use crate::data::ReferenceData;
use crate::matching::MatchReport;
use crate::providers::ChatMessage;

const PERSONA: &str = "You are a compassionate mental health assistant.";

const GUIDANCE: &str = "Given the user's emotional concerns and any identified symptoms, \
explain the issues in gentle language, then introduce 2-3 coping strategies clearly, \
and end with an encouraging, warm tone.";

const JSON_INSTRUCTIONS: &str = "Respond with a single JSON object and nothing else:\n\
{\"reply\": \"<your message to the user>\", \"resource_type\": \"hotline\" | \"warmline\" | \"none\"}\n\
Use \"hotline\" when the user may be in immediate danger or mentions self-harm or suicide, \
\"warmline\" when they are struggling and would benefit from non-emergency peer support, \
and \"none\" otherwise.";

const CLASSIFIER_INSTRUCTIONS: &str = "You triage messages sent to a mental health support chat. \
Decide which support line the user should be offered:\n\
- hotline: possible immediate danger, self-harm, or suicidal thoughts\n\
- warmline: emotional distress without immediate danger\n\
- none: no support line needed\n\
Answer with exactly one word:";

/// System prompt with persona, glossary and answer-shape instructions
pub fn system_prompt(glossary_text: &str, reply_format: ReplyFormat) -> String {
    let mut prompt = format!(
        "{} Here are definitions of technical terms you might use:\n{}\n\n{}",
        PERSONA, glossary_text, GUIDANCE
    );

    if reply_format == ReplyFormat::Json {
        prompt.push_str("\n\n");
        prompt.push_str(JSON_INSTRUCTIONS);
    }

    prompt
}

/// Enriched user message embedding symptoms, definitions and skills
pub fn user_prompt(
    message: &str,
    report: &MatchReport,
    data: &ReferenceData,
    max_skills: usize,
) -> String {
    let detected = if report.symptoms.is_empty() {
        "None".to_string()
    } else {
        report.symptoms.join(", ")
    };

    let definitions = report
        .symptoms
        .iter()
        .filter_map(|sym| data.definition(sym).map(|def| format!("- {}: {}", sym, def)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The user said: \"{}\"\n\n\
         Detected symptoms: {}\n\n\
         Definitions:\n{}\n\n\
         Recommended coping skills:\n{}",
        message,
        detected,
        definitions,
        report.skills_text(max_skills)
    )
}

/// Full message list: system prompt, prior turns, then the enriched message
pub fn compose(
    history: &[ChatMessage],
    message: &str,
    report: &MatchReport,
    data: &ReferenceData,
    reply_format: ReplyFormat,
    max_skills: usize,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(
        &data.glossary_text(),
        reply_format,
    )));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(user_prompt(
        message, report, data, max_skills,
    )));
    messages
}

/// Messages for the standalone resource classifier call
pub fn classification_messages(message: &str) -> Vec<ChatMessage> {
    let labels = ResourceType::ALL
        .iter()
        .map(ResourceType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        ChatMessage::system(format!("{} {}.", CLASSIFIER_INSTRUCTIONS, labels)),
        ChatMessage::user(message.to_string()),
    ]
}
