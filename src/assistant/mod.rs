// Support assistant pipeline
//
// One turn: match the message locally, pick a resource type, ask the LLM
// for a reply, then attach the resolved support resource.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::cli::Conversation;
use crate::config::{ClassifierMode, Config, ReplyFormat};
use crate::crisis::{classify_with_llm, keyword_decision, CrisisDetector, ResourceType};
use crate::data::{ReferenceData, Resource};
use crate::matching::{analyze, MatchReport};
use crate::prompt;
use crate::providers::{CompletionRequest, LlmProvider};
use crate::reply::{parse_reply, ParsedReply};
use crate::resources::{render_with_resource, resolve};

/// Settings the pipeline reads from `Config`
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub model: String,
    pub classifier: ClassifierMode,
    pub reply_format: ReplyFormat,
    pub max_skills: usize,
}

impl From<&Config> for AssistantSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            classifier: config.classifier,
            reply_format: config.reply_format,
            max_skills: config.max_skills,
        }
    }
}

/// Outcome of one user message
#[derive(Debug, Clone, Serialize)]
pub struct AssistantTurn {
    /// Reply text from the LLM, without the resource block
    pub reply: String,
    /// Reply as shown to the user
    pub rendered: String,
    pub resource_type: ResourceType,
    pub resource: Option<Resource>,
    pub crisis: bool,
    pub report: MatchReport,
}

pub struct SupportAssistant {
    data: Arc<ReferenceData>,
    detector: CrisisDetector,
    provider: Arc<dyn LlmProvider>,
    settings: AssistantSettings,
}

impl SupportAssistant {
    pub fn new(
        data: Arc<ReferenceData>,
        detector: CrisisDetector,
        provider: Arc<dyn LlmProvider>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            data,
            detector,
            provider,
            settings,
        }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// Answer `message`, recording both sides in `conversation`
    pub async fn respond(
        &self,
        conversation: &mut Conversation,
        message: &str,
    ) -> Result<AssistantTurn> {
        let report = analyze(message, &self.data);
        let crisis = self.detector.detect_crisis(message);

        let messages = prompt::compose(
            conversation.messages(),
            message,
            &report,
            &self.data,
            self.settings.reply_format,
            self.settings.max_skills,
        );
        conversation.add_user_message(message);

        let request = CompletionRequest::new(messages)
            .with_model(self.settings.model.as_str())
            .with_json_response(self.settings.reply_format == ReplyFormat::Json);

        let raw = self
            .provider
            .complete(&request)
            .await
            .context("Failed to get a reply from the assistant model")?;

        let parsed = match self.settings.reply_format {
            ReplyFormat::Json => parse_reply(&raw),
            ReplyFormat::Plain => ParsedReply::plain(&raw),
        };

        let resource_type = self
            .choose_resource_type(message, crisis, &report, parsed.resource_type)
            .await;
        let resource = resolve(resource_type, &self.data.resources);
        let rendered = render_with_resource(&parsed.reply, resource.as_ref());

        tracing::info!(
            crisis,
            symptoms = report.symptoms.len(),
            resource_type = %resource_type,
            "Composed reply"
        );

        conversation.add_assistant_message(rendered.clone());

        Ok(AssistantTurn {
            reply: parsed.reply,
            rendered,
            resource_type,
            resource,
            crisis,
            report,
        })
    }

    /// A keyword crisis always wins; then the reply's own label; then the classifier
    async fn choose_resource_type(
        &self,
        message: &str,
        crisis: bool,
        report: &MatchReport,
        from_reply: Option<ResourceType>,
    ) -> ResourceType {
        let fallback = keyword_decision(crisis, report.has_symptoms());

        if crisis {
            return ResourceType::Hotline;
        }
        if let Some(label) = from_reply {
            return label;
        }

        match self.settings.classifier {
            ClassifierMode::Keywords => fallback,
            ClassifierMode::Llm => {
                classify_with_llm(
                    self.provider.as_ref(),
                    &self.settings.model,
                    message,
                    fallback,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CopingSkill;
    use crate::matching::NO_SKILLS_MATCHED;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every request
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted-model"
        }
    }

    fn sample_data() -> Arc<ReferenceData> {
        let mut data = ReferenceData::default();
        data.ontology
            .insert("worthless".into(), vec!["self-esteem".into()]);
        data.coping_skills.push(CopingSkill {
            skill: "Self-compassion break".into(),
            description: "Speak to yourself kindly".into(),
            tags: vec!["self-esteem".into()],
        });
        data.resources = vec![
            Resource {
                kind: "warmline".into(),
                name: "Peer Warmline".into(),
                phone: "555-0100".into(),
                description: None,
            },
            Resource {
                kind: "hotline".into(),
                name: "988 Lifeline".into(),
                phone: "988".into(),
                description: None,
            },
        ];
        Arc::new(data)
    }

    fn settings(classifier: ClassifierMode, reply_format: ReplyFormat) -> AssistantSettings {
        AssistantSettings {
            model: "gpt-test".into(),
            classifier,
            reply_format,
            max_skills: 3,
        }
    }

    fn assistant(
        provider: Arc<ScriptedProvider>,
        classifier: ClassifierMode,
        reply_format: ReplyFormat,
    ) -> SupportAssistant {
        SupportAssistant::new(
            sample_data(),
            CrisisDetector::default(),
            provider,
            settings(classifier, reply_format),
        )
    }

    #[tokio::test]
    async fn test_crisis_message_gets_hotline() {
        let provider = ScriptedProvider::new(vec![Ok("You matter.".into())]);
        let assistant = assistant(provider.clone(), ClassifierMode::Keywords, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "I feel worthless and think about suicide")
            .await
            .unwrap();

        assert!(turn.crisis);
        assert_eq!(turn.resource_type, ResourceType::Hotline);
        assert_eq!(turn.resource.as_ref().unwrap().kind, "hotline");
        assert!(turn.rendered.ends_with("988 Lifeline – 988"));
        assert_eq!(turn.report.symptoms, vec!["worthless"]);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-test");
        assert!(requests[0].messages[1].content.contains("Self-compassion break"));
    }

    #[tokio::test]
    async fn test_symptom_without_crisis_gets_warmline() {
        let provider = ScriptedProvider::new(vec![Ok("That sounds hard.".into())]);
        let assistant = assistant(provider, ClassifierMode::Keywords, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "I feel worthless")
            .await
            .unwrap();

        assert!(!turn.crisis);
        assert_eq!(turn.resource.unwrap().name, "Peer Warmline");
    }

    #[tokio::test]
    async fn test_unmatched_message_has_no_resource() {
        let provider = ScriptedProvider::new(vec![Ok("  Hello!  ".into())]);
        let assistant = assistant(provider.clone(), ClassifierMode::Keywords, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let turn = assistant.respond(&mut conversation, "").await.unwrap();

        assert!(!turn.crisis);
        assert!(turn.report.symptoms.is_empty());
        assert_eq!(turn.resource_type, ResourceType::None);
        assert_eq!(turn.rendered, "Hello!");
        assert!(provider.requests()[0].messages[1]
            .content
            .contains(NO_SKILLS_MATCHED));
    }

    #[tokio::test]
    async fn test_json_reply_label_is_used() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"reply": "Let's slow down together.", "resource_type": "warmline"}"#.into(),
        )]);
        let assistant = assistant(provider.clone(), ClassifierMode::Keywords, ReplyFormat::Json);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "Everything is too much today")
            .await
            .unwrap();

        assert_eq!(turn.reply, "Let's slow down together.");
        assert_eq!(turn.resource_type, ResourceType::Warmline);
        assert!(provider.requests()[0].json_response);
    }

    #[tokio::test]
    async fn test_json_reply_cannot_downgrade_crisis() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"reply": "I hear you.", "resource_type": "none"}"#.into(),
        )]);
        let assistant = assistant(provider, ClassifierMode::Keywords, ReplyFormat::Json);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "I want to kill myself")
            .await
            .unwrap();

        assert_eq!(turn.resource_type, ResourceType::Hotline);
    }

    #[tokio::test]
    async fn test_llm_classifier_runs_second_call() {
        let provider = ScriptedProvider::new(vec![Ok("I'm listening.".into()), Ok("warmline".into())]);
        let assistant = assistant(provider.clone(), ClassifierMode::Llm, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "I've been crying every night")
            .await
            .unwrap();

        assert_eq!(turn.resource_type, ResourceType::Warmline);
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages[1].content, "I've been crying every night");
    }

    #[tokio::test]
    async fn test_llm_classifier_failure_falls_back() {
        let provider = ScriptedProvider::new(vec![Ok("I'm listening.".into())]);
        let assistant = assistant(provider, ClassifierMode::Llm, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let turn = assistant
            .respond(&mut conversation, "I feel worthless")
            .await
            .unwrap();

        assert_eq!(turn.resource_type, ResourceType::Warmline);
    }

    #[tokio::test]
    async fn test_history_is_sent_on_later_turns() {
        let provider = ScriptedProvider::new(vec![Ok("First.".into()), Ok("Second.".into())]);
        let assistant = assistant(provider.clone(), ClassifierMode::Keywords, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        assistant.respond(&mut conversation, "hi").await.unwrap();
        assistant.respond(&mut conversation, "again").await.unwrap();

        assert_eq!(conversation.message_count(), 4);
        let second = &provider.requests()[1];
        let roles: Vec<&str> = second.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(second.messages[1].content, "hi");
        assert_eq!(second.messages[2].content, "First.");
    }

    #[tokio::test]
    async fn test_provider_error_keeps_user_message() {
        let provider = ScriptedProvider::new(vec![Err(anyhow::anyhow!("network down"))]);
        let assistant = assistant(provider, ClassifierMode::Keywords, ReplyFormat::Plain);
        let mut conversation = Conversation::new();

        let err = assistant
            .respond(&mut conversation, "hello")
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("network down"));
        assert_eq!(conversation.message_count(), 1);
    }
}
