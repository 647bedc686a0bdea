//! MCP Prompts
//!
//! Static message templates offered to clients through `prompts/list` and
//! `prompts/get`.

use serde_json::Value;

use super::protocol::{PromptMessage, PromptsGetResult};
use super::registry::{McpRegistry, PromptBuilder, RegisteredPrompt};

pub const ASK_QUESTION_PROMPT: &str = "ask-question";
pub const GREETING_PROMPT: &str = "greeting";
pub const HELP_PROMPT: &str = "help";
pub const ERROR_PROMPT: &str = "error";

const GREETING_TEXT: &str = "Hello! I'm your movie discovery assistant. How can I help you today?";
const ERROR_TEXT: &str = "An error occurred while processing your request. Please try again later.";
const HELP_TEXT: &str = "I can help you with:\n\
- Discovering movies with various filtering options (use 'discover-movie')\n\
- Searching for people like actors, directors, etc. (use 'search-person')\n\
- Finding movies by cast, crew, release date, popularity, vote average\n\
- Filtering by cast, crew, genres, keywords\n\
- Finding movies available on specific watch providers\n\
- Getting help (use 'help')\n\n\
Just let me know what you'd like to do!";

/// Register all prompts with the registry
pub fn register_all_prompts(registry: &mut McpRegistry) {
    registry.register_prompt(ask_question_prompt());
    registry.register_prompt(static_prompt(
        GREETING_PROMPT,
        "A friendly greeting message",
        GREETING_TEXT,
    ));
    registry.register_prompt(static_prompt(
        HELP_PROMPT,
        "Provides help information about available commands",
        HELP_TEXT,
    ));
    registry.register_prompt(static_prompt(
        ERROR_PROMPT,
        "Handles error messages",
        ERROR_TEXT,
    ));
}

fn ask_question_prompt() -> RegisteredPrompt {
    PromptBuilder::new(ASK_QUESTION_PROMPT)
        .description("Prepares a question to be answered")
        .argument("question", "The question to be answered", true)
        .build(|args| {
            // Presence is checked by the registry before we get here.
            let question = args.get("question").and_then(Value::as_str).unwrap_or_default();
            Ok(PromptsGetResult {
                description: None,
                messages: vec![PromptMessage::user(format!(
                    "Please answer this question: {}",
                    question
                ))],
            })
        })
}

fn static_prompt(name: &str, description: &str, text: &'static str) -> RegisteredPrompt {
    PromptBuilder::new(name)
        .description(description)
        .build(move |_args| {
            Ok(PromptsGetResult {
                description: None,
                messages: vec![PromptMessage::assistant(text)],
            })
        })
}
