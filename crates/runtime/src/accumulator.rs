//! Delta accumulation.
//!
//! Folds streamed deltas into one assistant [`Message`], forwarding text and
//! function-call tokens to a [`Sink`] as they arrive. Function-call tokens are
//! only forwarded once the function name is known, tracked by [`CallState`].

use crate::{Output, Sink};
use llm::{Delta, FunctionCall, Message};

/// Progress of the function call inside one streamed response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallState {
    /// No function call seen, tokens go to the text channel.
    #[default]
    NoCall,
    /// The function name arrived and its channel is open.
    NameKnown,
    /// At least one arguments increment arrived.
    AccumulatingArgs,
}

/// Accumulates one streamed response into a message.
#[derive(Debug, Clone)]
pub struct Accumulator {
    message: Message,
    state: CallState,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            message: Message::assistant(""),
            state: CallState::NoCall,
        }
    }
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The function call progress.
    pub fn state(&self) -> CallState {
        self.state
    }

    /// The message accumulated so far.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Take the accumulated message.
    pub fn into_message(self) -> Message {
        self.message
    }

    /// Fold one delta into the message.
    pub fn accept(&mut self, delta: &Delta, sink: &mut impl Sink) {
        if let Some(role) = delta.role {
            self.message.role = role;
        }

        if let Some(content) = delta.content.as_deref().filter(|c| !c.is_empty()) {
            self.message.content.push_str(content);
            sink.emit(Output::Token(content.to_owned()));
        }

        let Some(call) = &delta.function_call else {
            return;
        };

        if let Some(name) = call.name.as_deref().filter(|n| !n.is_empty()) {
            self.open(name, sink);
        }

        if let Some(arguments) = call.arguments.as_deref() {
            self.append(arguments, sink);
        }
    }

    fn open(&mut self, name: &str, sink: &mut impl Sink) {
        if self.state != CallState::NoCall {
            tracing::trace!("ignoring repeated function name {name:?}");
            return;
        }

        self.message.function_call = Some(FunctionCall {
            name: name.into(),
            arguments: String::new(),
        });
        sink.emit(Output::ContentDone);
        sink.emit(Output::CallStart(name.into()));
        sink.emit(Output::CallToken {
            name: name.into(),
            token: name.to_owned(),
        });
        self.state = CallState::NameKnown;
    }

    fn append(&mut self, arguments: &str, sink: &mut impl Sink) {
        let Some(call) = self.message.function_call.as_mut() else {
            tracing::warn!("function arguments before a function name, ignoring {arguments:?}");
            return;
        };

        call.arguments.push_str(arguments);
        if !arguments.is_empty() {
            sink.emit(Output::CallToken {
                name: call.name.clone(),
                token: arguments.to_owned(),
            });
        }
        self.state = CallState::AccumulatingArgs;
    }
}
