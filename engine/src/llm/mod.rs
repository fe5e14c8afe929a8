//! Language-model collaborator
//!
//! The orchestration core consumes the model service as a single
//! request/response call: system instruction and user text in, completion
//! text out, bounded by a `max_tokens` budget. The [`CompletionClient`]
//! trait is the seam; [`OpenAiClient`] is the baseline chat-completions
//! implementation.

use crate::error::Result;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiClient;

/// One completion from the model service
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The model's raw text response
    pub text: String,

    /// Identifier of the model that produced it
    pub model: String,
}

/// Single-call completion interface to the model service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue exactly one completion request.
    ///
    /// Service errors surface as dependency failures. The client performs
    /// no retries; backoff is the caller's concern.
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<Completion>;
}
