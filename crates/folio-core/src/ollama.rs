//! Ollama client for embeddings. Wraps ollama-rs and implements [`Embedder`].

use async_trait::async_trait;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::Ollama;
use thiserror::Error;

use crate::embed::{EmbedError, Embedder};

/// Ollama's name for sentence-transformers/all-MiniLM-L6-v2 (384 dimensions).
pub const DEFAULT_EMBED_MODEL: &str = "all-minilm";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Thin wrapper around Ollama for embedding.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    inner: Ollama,
    embed_model: String,
}

impl OllamaClient {
    /// Create from URL string, e.g. `http://localhost:11434`.
    pub fn from_url(url: &str) -> Result<Self, OllamaError> {
        let inner = Ollama::try_new(url).map_err(OllamaError::ParseUrl)?;
        Ok(Self {
            inner,
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
        })
    }

    /// Set the embedding model (e.g. `all-minilm`, `nomic-embed-text`).
    pub fn with_embed_model(mut self, model: impl Into<String>) -> Self {
        self.embed_model = model.into();
        self
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    fn model(&self) -> &str {
        &self.embed_model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let req = GenerateEmbeddingsRequest::new(
            self.embed_model.clone(),
            EmbeddingsInput::Multiple(texts.to_vec()),
        );
        let res = self
            .inner
            .generate_embeddings(req)
            .await
            .map_err(OllamaError::Request)?;
        Ok(res.embeddings)
    }
}

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("invalid Ollama URL: {0}")]
    ParseUrl(#[from] url::ParseError),
    #[error("Ollama request failed: {0}")]
    Request(#[from] ollama_rs::error::OllamaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model() {
        let c = OllamaClient::from_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(c.model(), DEFAULT_EMBED_MODEL);
    }

    #[test]
    fn custom_model() {
        let c = OllamaClient::from_url("http://127.0.0.1:11434")
            .unwrap()
            .with_embed_model("nomic-embed-text");
        assert_eq!(c.model(), "nomic-embed-text");
    }

    #[test]
    fn rejects_bad_url() {
        assert!(matches!(
            OllamaClient::from_url("not a url"),
            Err(OllamaError::ParseUrl(_))
        ));
    }

    #[tokio::test]
    async fn empty_batch_skips_request() {
        let c = OllamaClient::from_url(DEFAULT_BASE_URL).unwrap();
        assert!(c.embed_batch(&[]).await.unwrap().is_empty());
    }
}
