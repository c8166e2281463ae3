// Content generation: brief → per-platform variations via the AI gateway.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod session;
