//! Domain coaching agents and the registry the orchestrator resolves them from
//!
//! An agent has one capability: turn a prompt into reply text, or fail with an
//! [`InvocationError`]. The registry is built once at startup and shared.

pub mod coach;

pub use coach::{CoachAgent, CoachDomain};

use crate::ai::OpenAIClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Why a single agent invocation failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("timeout")]
    Timeout,

    #[error("language model error: {0}")]
    Model(String),

    #[error("agent returned an empty response")]
    EmptyResponse,

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Domain name this agent serves
    fn name(&self) -> &str;

    async fn process(&self, prompt: &str) -> Result<String, InvocationError>;
}

/// Closed mapping from domain name to agent
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its own name
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        self.register_as(name, agent);
    }

    /// Register an agent under an explicit domain key (used for aliases)
    pub fn register_as(&mut self, domain: impl Into<String>, agent: Arc<dyn Agent>) {
        let domain = domain.into();
        log::debug!("[AGENTS] Registered '{}' → {}", domain, agent.name());
        self.agents.insert(domain, agent);
    }

    /// Look up the agent for a domain; unknown domains have no handler
    pub fn get(&self, domain: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(domain).cloned()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.agents.contains_key(domain)
    }

    /// Registered domain keys, sorted
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.agents.keys().cloned().collect();
        domains.sort();
        domains
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Registry with the built-in coaching agents sharing one model client
pub fn create_default_registry(client: Arc<OpenAIClient>) -> AgentRegistry {
    let mut registry = AgentRegistry::new();

    for domain in CoachDomain::ALL {
        let agent: Arc<dyn Agent> = Arc::new(CoachAgent::new(domain, client.clone()));
        for alias in domain.aliases() {
            registry.register_as(*alias, agent.clone());
        }
        registry.register(agent);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Agent for Echo {
        fn name(&self) -> &str {
            self.0
        }

        async fn process(&self, prompt: &str) -> Result<String, InvocationError> {
            Ok(format!("{}: {}", self.0, prompt))
        }
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(Echo("career")));

        let agent = registry.get("career").unwrap();
        assert_eq!(agent.process("hi").await.unwrap(), "career: hi");
        assert!(registry.get("astrology").is_none());
    }

    #[test]
    fn test_default_registry_domains() {
        let client = Arc::new(OpenAIClient::new("", "http://localhost:1", "m", 16).unwrap());
        let registry = create_default_registry(client);

        for domain in ["career", "health", "relationships", "finance", "mindset"] {
            assert!(registry.contains(domain), "missing {}", domain);
        }
        assert_eq!(registry.get("wellness").unwrap().name(), "health");
        assert_eq!(registry.get("mental_health").unwrap().name(), "mindset");
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(InvocationError::Timeout.to_string(), "timeout");
    }
}
