//! The request body for chat completions

use crate::{Function, FunctionCallPolicy, General, Message};
use serde::Serialize;

/// The request body for an OpenAI-compatible chat completion
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model we are using
    pub model: String,

    /// The messages to send to the API
    pub messages: Vec<Message>,

    /// The functions the model may call
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<Function>,

    /// Controls which (if any) function is called by the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallPolicy>,

    /// The temperature to use for the response
    pub temperature: f32,

    /// Whether to stream the response
    pub stream: bool,
}

impl Request {
    /// Construct the messages for the request
    pub fn messages(mut self, messages: &[Message]) -> Self {
        self.messages = messages.to_vec();
        self
    }

    /// Attach the function schema and call policy.
    ///
    /// The policy is dropped when there are no functions, the endpoint
    /// rejects `function_call` without `functions`.
    pub fn functions(mut self, functions: Vec<Function>, policy: FunctionCallPolicy) -> Self {
        self.function_call = (!functions.is_empty()).then_some(policy);
        self.functions = functions;
        self
    }

    /// Enable streaming for the request
    pub fn stream(mut self) -> Self {
        self.stream = true;
        self
    }
}

impl From<&General> for Request {
    fn from(config: &General) -> Self {
        Self {
            model: config.model.clone(),
            messages: Vec::new(),
            functions: Vec::new(),
            function_call: None,
            temperature: config.temperature,
            stream: false,
        }
    }
}
