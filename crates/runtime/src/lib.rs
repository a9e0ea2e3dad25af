//! Relay runtime: the turn orchestrator.
//!
//! The [`Runtime`] holds the LLM provider, the chat config, and the function
//! [`Registry`]. Each user message runs one turn over a [`Session`]: stream a
//! completion, fold it with the [`Accumulator`], dispatch the function call it
//! carries, and repeat until the model answers or [`MAX_ITERATIONS`] calls
//! have been made.
//!
//! # Example
//!
//! ```rust,ignore
//! use runtime::{Registry, Runtime, Session};
//! use llm::General;
//!
//! let provider = openai::OpenAI::api(Client::new(), &key)?;
//! let runtime = Runtime::new(General::default(), provider, Registry::new());
//! let mut session = Session::new("You are a helpful AI assistant");
//! let mut output = Vec::new();
//! let outcome = runtime.turn(&mut session, "hello", &mut output).await;
//! ```

pub use accumulator::{Accumulator, CallState};
pub use error::{DispatchError, Outcome, TurnError};
pub use registry::{Arguments, Handler, Registry};
pub use session::Session;
pub use sink::{Output, Sink};

use futures_util::StreamExt;
use llm::{FunctionCall, FunctionCallPolicy, General, LLM, Message, Request};
use serde_json::Value;

mod accumulator;
mod error;
mod registry;
mod session;
mod sink;

/// Model calls allowed per user turn.
pub const MAX_ITERATIONS: usize = 5;

/// The top-level turn orchestrator.
///
/// Holds no per-session state, so one runtime serves any number of
/// sessions, each driven through its own `&mut Session`.
pub struct Runtime<P> {
    provider: P,
    config: General,
    registry: Registry,
}

impl<P: LLM> Runtime<P> {
    /// Create a new runtime with the given config, provider and functions.
    pub fn new(config: General, provider: P, registry: Registry) -> Self {
        Self {
            provider,
            config,
            registry,
        }
    }

    /// The LLM provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The function registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Build the streaming request for the current history.
    fn request(&self, session: &Session) -> Request {
        Request::from(&self.config)
            .messages(session.history())
            .functions(self.registry.schema(), FunctionCallPolicy::Auto)
            .stream()
    }

    /// Run one user turn to completion.
    ///
    /// Failures are logged where they happen and reported through the
    /// returned [`Outcome`]; the history never receives a partial message.
    pub async fn turn(
        &self,
        session: &mut Session,
        text: impl Into<String>,
        sink: &mut impl Sink,
    ) -> Outcome {
        session.push(Message::user(text));

        for iteration in 0..MAX_ITERATIONS {
            tracing::debug!("turn iteration {iteration}, history of {}", session.len());
            let accumulator = match self.accumulate(session, sink).await {
                Ok(accumulator) => accumulator,
                Err(e) => {
                    tracing::error!("aborting turn: {e}");
                    return Outcome::Aborted(e);
                }
            };

            let state = accumulator.state();
            if state == CallState::NoCall {
                sink.emit(Output::ContentDone);
            }

            let message = accumulator.into_message();
            let call = message.function_call.clone();
            session.push(message);

            let Some(call) = call else {
                return Outcome::Complete;
            };
            sink.emit(Output::CallDone(call.clone()));

            let args = match parse_arguments(&call, state) {
                Ok(args) => args,
                Err(e) => {
                    tracing::error!("aborting turn: {e}");
                    return Outcome::Aborted(e);
                }
            };

            let dispatched = match args {
                Value::Object(args) => self.dispatch(&call.name, args, session, sink).await,
                other => Err(DispatchError::Execution {
                    name: call.name.clone(),
                    source: anyhow::anyhow!("arguments must be a JSON object, got {other}"),
                }),
            };

            if let Err(e) = dispatched {
                tracing::warn!("dropping function call: {e}");
                if self.config.pair_results {
                    let content = e.payload();
                    session.push(Message::function(call.name.clone(), content.clone()));
                    sink.emit(Output::FunctionResult {
                        name: call.name,
                        content,
                    });
                }
            }
        }

        tracing::warn!("reached {MAX_ITERATIONS} function calls, ending turn");
        Outcome::IterationLimit
    }

    /// Stream one completion and fold it into an accumulator.
    async fn accumulate(
        &self,
        session: &Session,
        sink: &mut impl Sink,
    ) -> Result<Accumulator, TurnError> {
        let request = self.request(session);
        let stream = self.provider.stream(&request);
        futures_util::pin_mut!(stream);

        let mut accumulator = Accumulator::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let Some(delta) = chunk.first() else {
                return Err(TurnError::MalformedStream(format!(
                    "no choices in chunk {:?}",
                    chunk.id
                )));
            };

            if let Some(reason) = chunk.reason() {
                tracing::debug!("finish reason: {reason:?}");
            }
            accumulator.accept(delta, sink);
        }

        Ok(accumulator)
    }

    /// Invoke a function and append its result to the session.
    ///
    /// On error the session is left untouched.
    pub async fn dispatch(
        &self,
        name: &str,
        args: Arguments,
        session: &mut Session,
        sink: &mut impl Sink,
    ) -> Result<(), DispatchError> {
        let content = self.registry.call(name, args).await?;
        tracing::debug!("function {name} returned {} bytes", content.len());
        session.push(Message::function(name, content.clone()));
        sink.emit(Output::FunctionResult {
            name: name.into(),
            content,
        });
        Ok(())
    }
}

/// Parse the accumulated arguments as JSON.
///
/// A call whose stream never carried an arguments field gets `{}`; arguments
/// that did arrive are parsed as written, so an empty string is a syntax error.
fn parse_arguments(call: &FunctionCall, state: CallState) -> Result<Value, TurnError> {
    if state != CallState::AccumulatingArgs {
        return Ok(Value::Object(Arguments::new()));
    }

    serde_json::from_str(&call.arguments).map_err(|source| TurnError::ArgumentParse {
        name: call.name.clone(),
        arguments: call.arguments.clone(),
        source,
    })
}
