//! Output sink for incremental rendering.

use compact_str::CompactString;
use llm::FunctionCall;
use tokio::sync::mpsc::UnboundedSender;

/// An event for the user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A plain conversation text token.
    Token(String),
    /// The plain text emitted so far is a completed unit.
    ContentDone,
    /// A function call opened its channel.
    CallStart(CompactString),
    /// A token on the channel of the in-flight function call.
    CallToken {
        /// The function name labelling the channel
        name: CompactString,
        /// The token
        token: String,
    },
    /// The completed function call, sent once after the stream ends.
    CallDone(FunctionCall),
    /// The result of a dispatched function.
    FunctionResult {
        /// The function name
        name: CompactString,
        /// The returned payload
        content: String,
    },
}

/// Receives output events as a turn makes progress.
pub trait Sink {
    /// Emit one output event.
    fn emit(&mut self, output: Output);
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, output: Output) {
        (**self).emit(output);
    }
}

/// Records every event, in order.
impl Sink for Vec<Output> {
    fn emit(&mut self, output: Output) {
        self.push(output);
    }
}

/// Forwards events to a UI task; a closed receiver drops them.
impl Sink for UnboundedSender<Output> {
    fn emit(&mut self, output: Output) {
        if self.send(output).is_err() {
            tracing::trace!("output receiver closed, dropping event");
        }
    }
}
