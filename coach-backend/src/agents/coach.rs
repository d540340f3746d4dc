//! Language-model backed coaching agent, one instance per domain

use super::{Agent, InvocationError};
use crate::ai::{Message, OpenAIClient};
use async_trait::async_trait;
use std::sync::Arc;

/// The coaching domains that ship with an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoachDomain {
    Career,
    Health,
    Relationships,
    Finance,
    Mindset,
}

impl CoachDomain {
    pub const ALL: [CoachDomain; 5] = [
        CoachDomain::Career,
        CoachDomain::Health,
        CoachDomain::Relationships,
        CoachDomain::Finance,
        CoachDomain::Mindset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoachDomain::Career => "career",
            CoachDomain::Health => "health",
            CoachDomain::Relationships => "relationships",
            CoachDomain::Finance => "finance",
            CoachDomain::Mindset => "mindset",
        }
    }

    /// Older domain spellings users may still be assigned to
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CoachDomain::Health => &["wellness"],
            CoachDomain::Mindset => &["mental_health"],
            _ => &[],
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            CoachDomain::Career => include_str!("prompts/career.md"),
            CoachDomain::Health => include_str!("prompts/health.md"),
            CoachDomain::Relationships => include_str!("prompts/relationships.md"),
            CoachDomain::Finance => include_str!("prompts/finance.md"),
            CoachDomain::Mindset => include_str!("prompts/mindset.md"),
        }
    }
}

pub struct CoachAgent {
    domain: CoachDomain,
    client: Arc<OpenAIClient>,
}

impl CoachAgent {
    pub fn new(domain: CoachDomain, client: Arc<OpenAIClient>) -> Self {
        Self { domain, client }
    }

    fn build_messages(&self, prompt: &str) -> Vec<Message> {
        vec![
            Message::system(self.domain.system_prompt()),
            Message::user(prompt),
        ]
    }
}

#[async_trait]
impl Agent for CoachAgent {
    fn name(&self) -> &str {
        self.domain.as_str()
    }

    async fn process(&self, prompt: &str) -> Result<String, InvocationError> {
        let reply = self
            .client
            .generate_text(self.build_messages(prompt))
            .await
            .map_err(InvocationError::Model)?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(InvocationError::EmptyResponse);
        }
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MessageRole;

    fn client() -> Arc<OpenAIClient> {
        Arc::new(OpenAIClient::new("", "http://127.0.0.1:9/v1/chat/completions", "m", 16).unwrap())
    }

    #[test]
    fn test_prompts_are_distinct_and_non_empty() {
        for domain in CoachDomain::ALL {
            assert!(!domain.system_prompt().trim().is_empty());
        }
        assert_ne!(
            CoachDomain::Career.system_prompt(),
            CoachDomain::Finance.system_prompt()
        );
    }

    #[test]
    fn test_build_messages() {
        let agent = CoachAgent::new(CoachDomain::Relationships, client());
        let messages = agent.build_messages("my friend stopped calling");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "my friend stopped calling");
        assert_eq!(agent.name(), "relationships");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_model_error() {
        // Port 9 (discard) on loopback refuses connections in test environments
        let agent = CoachAgent::new(CoachDomain::Career, client());
        let err = agent.process("hello").await.unwrap_err();
        assert!(matches!(err, InvocationError::Model(_)));
    }
}
