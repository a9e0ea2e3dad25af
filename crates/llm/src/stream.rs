//! Streaming response abstractions

use crate::Role;
use serde::Deserialize;

/// A streaming chat completion chunk
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamChunk {
    /// A unique identifier for the chat completion
    #[serde(default)]
    pub id: String,

    /// The model used for the completion
    #[serde(default)]
    pub model: String,

    /// The list of completion choices (with delta content)
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl StreamChunk {
    /// Create a chunk carrying a single delta
    pub fn delta(delta: Delta) -> Self {
        Self {
            choices: vec![Choice {
                delta,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Create a chunk carrying a content increment
    pub fn content(content: impl Into<String>) -> Self {
        Self::delta(Delta {
            content: Some(content.into()),
            ..Default::default()
        })
    }

    /// Create a chunk carrying a function-call increment
    pub fn function_call(name: Option<&str>, arguments: Option<&str>) -> Self {
        Self::delta(Delta {
            function_call: Some(FunctionCallDelta {
                name: name.map(Into::into),
                arguments: arguments.map(Into::into),
            }),
            ..Default::default()
        })
    }

    /// Get the delta of the first choice
    pub fn first(&self) -> Option<&Delta> {
        self.choices.first().map(|choice| &choice.delta)
    }

    /// Get the reason the model stopped generating
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}

/// A completion choice in a streaming response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Choice {
    /// The index of this choice in the list
    #[serde(default)]
    pub index: u32,

    /// The delta content for this chunk
    #[serde(default)]
    pub delta: Delta,

    /// The reason the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Delta content in a streaming response
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Delta {
    /// The role of the message author
    #[serde(default)]
    pub role: Option<Role>,

    /// The content delta
    #[serde(default)]
    pub content: Option<String>,

    /// The function call delta
    #[serde(default)]
    pub function_call: Option<FunctionCallDelta>,
}

/// Function call increment in a streaming response
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct FunctionCallDelta {
    /// The function name, sent once
    #[serde(default)]
    pub name: Option<String>,

    /// An arguments increment
    #[serde(default)]
    pub arguments: Option<String>,
}

/// The reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally
    Stop,

    /// The model hit the max token limit
    Length,

    /// Content was filtered
    ContentFilter,

    /// The model is calling a function
    FunctionCall,

    /// The model is making tool calls
    ToolCalls,

    /// Any reason this crate does not know about
    #[serde(other)]
    Other,
}
