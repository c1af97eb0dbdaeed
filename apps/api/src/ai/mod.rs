// AI assistant features: writing suggestions, resume scoring, the in-app
// chat bot and image edits. All model calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod scoring;
pub mod suggestions;
