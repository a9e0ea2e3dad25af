//! Provider abstractions

use crate::{Request, Result, StreamChunk};
use futures_core::Stream;

/// A trait for streaming LLM providers
pub trait LLM {
    /// Send a request to the LLM with streaming.
    ///
    /// A stream that cannot be established yields a single error item.
    fn stream(&self, request: &Request) -> impl Stream<Item = Result<StreamChunk>> + Send;
}
