//! README suggestion pipeline for readmebot.
//!
//! Provides the GitHub repository client, the LLM client, prompt
//! construction, the suggestion generator, the publisher, and the
//! orchestrator that runs them in order.

pub mod generator;
pub mod github;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod publisher;
