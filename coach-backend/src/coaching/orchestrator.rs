//! Coaching orchestrator - runs every eligible domain agent for one prompt
//!
//! Agents run one after another. Each invocation is bounded by a timeout,
//! isolated from its siblings, and logged exactly once before the next
//! agent starts. A failed log write does not stop the run; it is reported
//! with the decided outcome after the last agent.

use super::store::CoachingStore;
use super::types::{AgentReply, InvocationOutcome, LogFailure, OrchestrationError, RunReport};
use crate::agents::{Agent, AgentRegistry, InvocationError};
use futures_util::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub struct Orchestrator {
    store: Arc<dyn CoachingStore>,
    registry: Arc<AgentRegistry>,
    agent_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn CoachingStore>,
        registry: Arc<AgentRegistry>,
        agent_timeout: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            agent_timeout,
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Run every eligible agent and return the successful replies
    pub async fn process_user_prompt(
        &self,
        user_id: i64,
        prompt: &str,
    ) -> Result<Vec<AgentReply>, OrchestrationError> {
        self.process_user_prompt_with_cancel(user_id, prompt, CancellationToken::new())
            .await
    }

    /// Like `process_user_prompt`, but stops early when `cancel` fires
    pub async fn process_user_prompt_with_cancel(
        &self,
        user_id: i64,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<AgentReply>, OrchestrationError> {
        let report = self.run(user_id, prompt, &cancel).await?;
        if report.log_failures.is_empty() {
            Ok(report.replies)
        } else {
            Err(OrchestrationError::ExecutionLog {
                failures: report.log_failures,
                replies: report.replies,
            })
        }
    }

    /// Full orchestration run.
    ///
    /// On cancellation the in-flight invocation is abandoned without a log
    /// record; everything that completed before it is already logged.
    pub async fn run(
        &self,
        user_id: i64,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<RunReport, OrchestrationError> {
        let agents = self.resolve_agents(user_id)?;
        log::info!(
            "[ORCHESTRATOR] User {}: {} eligible agent(s)",
            user_id,
            agents.len()
        );

        let mut report = RunReport::default();

        for (domain, agent) in agents {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let started = Instant::now();
            let Some(outcome) = self.invoke(agent.as_ref(), prompt, cancel).await else {
                log::warn!(
                    "[ORCHESTRATOR] Run for user {} cancelled during '{}'",
                    user_id, domain
                );
                report.cancelled = true;
                break;
            };
            let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

            match &outcome {
                InvocationOutcome::Success(_) => {
                    log::info!("[ORCHESTRATOR] '{}' succeeded in {}ms", domain, elapsed_ms)
                }
                InvocationOutcome::Failure(reason) => {
                    log::warn!("[ORCHESTRATOR] '{}' failed in {}ms: {}", domain, elapsed_ms, reason)
                }
            }

            let entry = outcome.to_log_entry(user_id, &domain, prompt, elapsed_ms);
            if let Err(source) = self.store.append_execution_log(&entry) {
                log::error!(
                    "[ORCHESTRATOR] Failed to record execution of '{}' for user {}: {}",
                    domain, user_id, source
                );
                report.log_failures.push(LogFailure {
                    agent: domain.clone(),
                    success: outcome.is_success(),
                    source,
                });
            }
            report.attempted += 1;

            if let InvocationOutcome::Success(text) = outcome {
                report.replies.push(AgentReply::new(domain, text));
            }
        }

        Ok(report)
    }

    /// Assigned domains that are eligible and have a registered agent, in
    /// assignment order.
    ///
    /// The active-agent list is fetched once. A non-empty list is an
    /// allow-list; an empty one falls back to a per-domain check where only an
    /// explicit non-ACTIVE row excludes a domain.
    fn resolve_agents(
        &self,
        user_id: i64,
    ) -> Result<Vec<(String, Arc<dyn Agent>)>, OrchestrationError> {
        let assignments = self
            .store
            .get_assignments(user_id)
            .map_err(OrchestrationError::Store)?;
        let active: HashSet<String> = self
            .store
            .get_active_agent_names(user_id)
            .map_err(OrchestrationError::Store)?
            .into_iter()
            .collect();

        let mut resolved = Vec::new();
        for domain in assignments {
            let eligible = if active.is_empty() {
                self.store
                    .is_agent_active(user_id, &domain)
                    .map_err(OrchestrationError::Store)?
            } else {
                active.contains(&domain)
            };

            if !eligible {
                log::debug!("[ORCHESTRATOR] Skipping inactive '{}' for user {}", domain, user_id);
                continue;
            }

            match self.registry.get(&domain) {
                Some(agent) => resolved.push((domain, agent)),
                None => log::debug!("[ORCHESTRATOR] No agent registered for '{}'", domain),
            }
        }

        Ok(resolved)
    }

    /// Invoke one agent under the timeout. Returns None if cancelled first.
    ///
    /// The call branch is polled ahead of the token so a result that is ready
    /// on the same wakeup as a cancellation is still returned and logged.
    async fn invoke(
        &self,
        agent: &dyn Agent,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Option<InvocationOutcome> {
        let call = AssertUnwindSafe(agent.process(prompt)).catch_unwind();

        tokio::select! {
            biased;
            result = tokio::time::timeout(self.agent_timeout, call) => Some(match result {
                Ok(Ok(Ok(text))) => InvocationOutcome::Success(text),
                Ok(Ok(Err(e))) => InvocationOutcome::Failure(e.to_string()),
                Ok(Err(panic)) => InvocationOutcome::Failure(
                    InvocationError::Other(panic_message(&*panic)).to_string(),
                ),
                Err(_) => InvocationOutcome::Failure(InvocationError::Timeout.to_string()),
            }),
            _ = cancel.cancelled() => None,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("agent panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("agent panicked: {}", s)
    } else {
        "agent panicked".to_string()
    }
}
