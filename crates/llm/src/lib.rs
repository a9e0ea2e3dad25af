//! Chat completion wire types and the provider interface.
//!
//! This crate provides the shared types spoken with an OpenAI-compatible
//! chat endpoint using the `functions` protocol: `Message`, `Function`,
//! `StreamChunk`, `Request`, the `General` config, and the `LLM` trait that
//! streaming providers implement.

pub use config::General;
pub use error::{Error, Result};
pub use function::{Function, FunctionCall, FunctionCallPolicy};
pub use message::{Message, Role};
pub use provider::LLM;
pub use request::Request;
pub use reqwest::{self, Client};
pub use sse::Decoder;
pub use stream::{Choice, Delta, FinishReason, FunctionCallDelta, StreamChunk};

mod config;
mod error;
mod function;
mod message;
mod provider;
mod request;
mod sse;
mod stream;
#[cfg(feature = "testing")]
pub mod testing;
