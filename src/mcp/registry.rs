//! MCP Tool and Prompt Registry
//!
//! Tools and prompts are registered once at startup and listed in
//! registration order.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::context::ToolContext;
use super::protocol::{
    McpError, PromptArgument, PromptDefinition, PromptsGetResult, ToolDefinition, ToolsCallResult,
};

// ============================================================================
// Tool Types
// ============================================================================

/// Result type for tool execution
pub type ToolResult = Result<ToolsCallResult, McpError>;

/// Boxed future for async tool execution
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool handler function type
pub type ToolHandler = Arc<dyn Fn(ToolContext, Value) -> ToolFuture + Send + Sync>;

/// A registered tool with metadata and handler
pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

impl RegisteredTool {
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

// ============================================================================
// Prompt Types
// ============================================================================

pub type PromptResult = Result<PromptsGetResult, McpError>;

/// Prompts are rendered synchronously from their arguments.
pub type PromptHandler = Arc<dyn Fn(&Map<String, Value>) -> PromptResult + Send + Sync>;

pub struct RegisteredPrompt {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<PromptArgument>,
    pub handler: PromptHandler,
}

impl RegisteredPrompt {
    pub fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            arguments: self.arguments.clone(),
        }
    }

    /// Render the prompt after checking every required argument is present
    /// as a string.
    pub fn render(&self, arguments: &Map<String, Value>) -> PromptResult {
        for arg in self.arguments.iter().filter(|a| a.required) {
            match arguments.get(&arg.name) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(McpError::InvalidParams(format!(
                        "Argument '{}' of prompt '{}' must be a string",
                        arg.name, self.name
                    )))
                }
                None => {
                    return Err(McpError::InvalidParams(format!(
                        "Missing required argument '{}' for prompt '{}'",
                        arg.name, self.name
                    )))
                }
            }
        }
        (self.handler)(arguments)
    }
}

// ============================================================================
// Registry
// ============================================================================

pub struct McpRegistry {
    tools: Vec<RegisteredTool>,
    prompts: Vec<RegisteredPrompt>,
}

impl McpRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Register a tool, replacing any earlier tool with the same name.
    pub fn register_tool(&mut self, tool: RegisteredTool) {
        self.tools.retain(|t| t.name != tool.name);
        self.tools.push(tool);
    }

    /// Register a prompt, replacing any earlier prompt with the same name.
    pub fn register_prompt(&mut self, prompt: RegisteredPrompt) {
        self.prompts.retain(|p| p.name != prompt.name);
        self.prompts.push(prompt);
    }

    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(RegisteredTool::definition).collect()
    }

    pub fn get_tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn prompt_definitions(&self) -> Vec<PromptDefinition> {
        self.prompts.iter().map(RegisteredPrompt::definition).collect()
    }

    pub fn get_prompt(&self, name: &str) -> Option<&RegisteredPrompt> {
        self.prompts.iter().find(|prompt| prompt.name == name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }
}

impl Default for McpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder helpers
// ============================================================================

/// Builder for registering a tool
pub struct ToolBuilder {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ToolContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema,
            handler: Arc::new(move |ctx, params| Box::pin(handler(ctx, params))),
        }
    }
}

/// Builder for registering a prompt
pub struct PromptBuilder {
    name: String,
    description: Option<String>,
    arguments: Vec<PromptArgument>,
}

impl PromptBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn argument(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.arguments.push(PromptArgument {
            name: name.into(),
            description: Some(description.into()),
            required,
        });
        self
    }

    pub fn build<F>(self, handler: F) -> RegisteredPrompt
    where
        F: Fn(&Map<String, Value>) -> PromptResult + Send + Sync + 'static,
    {
        RegisteredPrompt {
            name: self.name,
            description: self.description,
            arguments: self.arguments,
            handler: Arc::new(handler),
        }
    }
}
