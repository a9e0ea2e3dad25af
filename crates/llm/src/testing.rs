//! Scripted LLM provider for testing.
//!
//! [`Script`] replays canned responses, one [`Round`] per `stream` call,
//! and records every request it receives. Intended for tests that drive the
//! turn loop without a real endpoint.

use crate::{Decoder, Error, LLM, Request, Result, StreamChunk};
use futures_core::Stream;
use parking_lot::Mutex;

/// One scripted model response
#[derive(Debug, Clone)]
pub enum Round {
    /// Stream these chunks, in order
    Chunks(Vec<StreamChunk>),
    /// Stream the events decoded from this raw SSE body
    Sse(String),
    /// Fail to establish the stream
    Fail(String),
    /// Stream these chunks, then fail with the reason
    Interrupted(Vec<StreamChunk>, String),
}

/// A provider replaying a fixed script of rounds.
///
/// Once the script is exhausted the provider either repeats the last round
/// or fails every further call, depending on how it was built.
#[derive(Debug, Default)]
pub struct Script {
    rounds: Vec<Round>,
    repeat: bool,
    requests: Mutex<Vec<Request>>,
}

impl Script {
    /// Create a script replaying each round once
    pub fn new(rounds: impl IntoIterator<Item = Round>) -> Self {
        Self {
            rounds: rounds.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Create a script replaying the same round forever
    pub fn repeat(round: Round) -> Self {
        Self {
            rounds: vec![round],
            repeat: true,
            ..Default::default()
        }
    }

    /// Number of `stream` calls so far
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    fn next(&self, request: &Request) -> Vec<Result<StreamChunk>> {
        let mut requests = self.requests.lock();
        let call = requests.len();
        requests.push(request.clone());

        let round = match self.rounds.get(call) {
            Some(round) => round,
            None if self.repeat => match self.rounds.last() {
                Some(round) => round,
                None => return vec![Err(Error::Provider("empty script".into()))],
            },
            None => return vec![Err(Error::Provider(format!("script exhausted at call {call}")))],
        };

        match round {
            Round::Chunks(chunks) => chunks.iter().cloned().map(Ok).collect(),
            Round::Sse(body) => {
                let mut decoder = Decoder::new();
                let mut events = decoder.push(body.as_bytes());
                events.extend(decoder.finish());
                events
            }
            Round::Fail(reason) => vec![Err(Error::Provider(reason.clone()))],
            Round::Interrupted(chunks, reason) => chunks
                .iter()
                .cloned()
                .map(Ok)
                .chain([Err(Error::Provider(reason.clone()))])
                .collect(),
        }
    }
}

impl LLM for Script {
    fn stream(&self, request: &Request) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let events = self.next(request);
        async_stream::stream! {
            for event in events {
                yield event;
            }
        }
    }
}
