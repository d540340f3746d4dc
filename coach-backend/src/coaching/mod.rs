//! Multi-agent coaching
//!
//! For one user and one prompt the orchestrator:
//!
//! 1. Reads the user's assigned domains and the active-agent list (once per run)
//! 2. Keeps domains that are eligible and have a registered agent
//! 3. Invokes each agent in assignment order, with a timeout
//! 4. Logs every completed invocation, success or failure
//! 5. Returns the successful replies
//!
//! ## Flow
//!
//! ```text
//! prompt → assignments ∩ active → [agent → outcome → execution log]* → replies
//! ```
//!
//! A failing agent only produces a failed log row; siblings are unaffected.
//! A failed log write is collected and reported once every agent has run.

pub mod aggregator;
pub mod orchestrator;
pub mod store;
pub mod types;

pub use aggregator::format_replies;
pub use orchestrator::Orchestrator;
pub use types::OrchestrationError;
