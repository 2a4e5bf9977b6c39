//! Render chain plans into query text and arguments

use crate::{Shape, prepare};

use super::{CliError, Plan, value_to_json};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// JSON plan
    pub plan: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Render the chain as written, without dispatch wrapping
    pub direct: bool,
}

/// Result of a render operation
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub query: String,
    pub arguments: serde_json::Value,
    pub shape: Shape,
}

impl RenderResult {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "query": self.query,
            "arguments": self.arguments,
            "shape": self.shape.as_str(),
        })
    }
}

/// Execute a render operation
pub fn execute_render(options: &RenderOptions) -> Result<RenderResult, CliError> {
    let json_str = options.plan.as_ref().ok_or(CliError::NoInput)?;
    let plan: Plan = serde_json::from_str(json_str)?;
    let node = plan.build()?.to_node();

    let (query, arguments, shape) = if options.direct {
        let mut rendered = node.render();
        rendered.arguments.extend(plan.options().arguments);
        (rendered.query, rendered.arguments, node.shape())
    } else {
        let request = prepare(&node, plan.options());
        (request.query, request.arguments, request.shape)
    };

    let arguments = value_to_json(&crate::Value::Object(arguments))?;
    Ok(RenderResult {
        query,
        arguments,
        shape,
    })
}
