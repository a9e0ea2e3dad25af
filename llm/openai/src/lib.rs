//! OpenAI-compatible LLM provider.
//!
//! Covers OpenAI, Ollama, and any other service exposing the OpenAI chat
//! completions API with the `functions` calling protocol.

use llm::reqwest::{
    Client,
    header::{self, HeaderMap},
};

mod provider;

/// OpenAI-compatible endpoint URLs.
pub mod endpoint {
    /// OpenAI chat completions.
    pub const OPENAI: &str = "https://api.openai.com/v1/chat/completions";
    /// Ollama local chat completions.
    pub const OLLAMA: &str = "http://localhost:11434/v1/chat/completions";
}

/// An OpenAI-compatible LLM provider.
#[derive(Clone)]
pub struct OpenAI {
    /// The HTTP client.
    pub client: Client,
    /// Request headers (authorization, content-type).
    headers: HeaderMap,
    /// Chat completions endpoint URL.
    endpoint: String,
}

impl OpenAI {
    /// Create a provider targeting the OpenAI API.
    pub fn api(client: Client, key: &str) -> anyhow::Result<Self> {
        Self::new(client, endpoint::OPENAI, Some(key))
    }

    /// Create a provider for any OpenAI-compatible endpoint.
    ///
    /// Without a key no authorization header is sent, which is what local
    /// servers such as Ollama expect.
    pub fn new(client: Client, endpoint: &str, key: Option<&str>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert(header::ACCEPT, "text/event-stream".parse()?);
        if let Some(key) = key {
            headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        }

        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// The request headers sent with every call.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The chat completions endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
