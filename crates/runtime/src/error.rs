//! Turn outcomes and errors.

use compact_str::CompactString;
use serde_json::json;

/// How a turn ended.
#[derive(Debug)]
pub enum Outcome {
    /// The model produced a final answer.
    Complete,
    /// The model kept calling functions until the iteration bound.
    ///
    /// A soft cutoff, the history simply ends with the last function result.
    IterationLimit,
    /// The turn stopped early, see [`TurnError`].
    Aborted(TurnError),
}

impl Outcome {
    /// Whether the model produced a final answer.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The error that aborted the turn, if any.
    pub fn error(&self) -> Option<&TurnError> {
        match self {
            Self::Aborted(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors that abort a turn.
///
/// None of these leave a partial message in the history.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The model endpoint was unreachable or failed while streaming.
    #[error("model stream unavailable: {0}")]
    Transport(#[source] llm::Error),

    /// The stream did not have the expected envelope.
    #[error("malformed model stream: {0}")]
    MalformedStream(String),

    /// The accumulated function arguments are not valid JSON.
    #[error("failed to parse arguments {arguments:?} of {name}: {source}")]
    ArgumentParse {
        /// The function the model called
        name: CompactString,
        /// The raw accumulated arguments
        arguments: String,
        /// The parse failure
        #[source]
        source: serde_json::Error,
    },
}

impl From<llm::Error> for TurnError {
    fn from(err: llm::Error) -> Self {
        if err.is_malformed() {
            Self::MalformedStream(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Errors that drop a single function call; the turn carries on.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The model called a function that is not registered.
    #[error("unknown function: {0}")]
    UnknownFunction(CompactString),

    /// The function failed.
    #[error("error processing function {name}: {source}")]
    Execution {
        /// The function name
        name: CompactString,
        /// The handler failure
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// The function the error is about.
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownFunction(name) | Self::Execution { name, .. } => name,
        }
    }

    /// The error as a function result payload.
    pub fn payload(&self) -> String {
        json!({ "error": self.to_string() }).to_string()
    }
}
