//! The LLM implementation

use crate::OpenAI;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{Decoder, Error, LLM, Request, Result, StreamChunk, reqwest::Method};

impl LLM for OpenAI {
    fn stream(&self, req: &Request) -> impl Stream<Item = Result<StreamChunk>> + Send {
        tracing::debug!(
            "request: {}",
            serde_json::to_string(req).unwrap_or_default()
        );
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(req);

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            tracing::debug!("chat completions responded with status: {status}");
            let mut chunk_count = 0usize;
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("chat completions failed with {status}: {body}");
                Err::<(), _>(Error::Status { status: status.as_u16(), body })?;
            } else {
                let mut decoder = Decoder::new();
                let mut bytes = response.bytes_stream();
                while let Some(bytes) = bytes.next().await {
                    let bytes = match bytes {
                        Ok(b) => b,
                        Err(e) => {
                            tracing::error!("stream error after {chunk_count} chunks: {e:?}");
                            Err(e)?
                        }
                    };

                    for chunk in decoder.push(&bytes) {
                        chunk_count += 1;
                        yield chunk?;
                    }
                    if decoder.is_done() {
                        break;
                    }
                }

                if let Some(chunk) = decoder.finish() {
                    chunk_count += 1;
                    yield chunk?;
                }
            }
            tracing::debug!("stream closed after {chunk_count} chunks");
        }
    }
}
