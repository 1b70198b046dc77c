//! Client for an OpenAI-compatible `/embeddings` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use kbvec_core::config::EmbeddingConfig;
use kbvec_core::error::{Error, Result};
use kbvec_core::traits::Embedder;

const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(API_KEY_VAR.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }

    pub fn from_env(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| Error::MissingApiKey(API_KEY_VAR.to_string()))?;
        Self::new(config, api_key)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn id(&self) -> &str {
        &self.model
    }

    fn dim(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request_body = json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "request failed with status {status}: {error_text}"
            )));
        }

        let api_response: EmbeddingsResponse = response.json().await?;
        if api_response.data.len() != texts.len() {
            return Err(Error::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                api_response.data.len()
            )));
        }

        // `data` is documented to come back in request order, but `index`
        // is the authoritative position.
        let mut slots: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for item in api_response.data {
            if item.embedding.len() != self.dimension {
                return Err(Error::InvalidResponse(format!(
                    "embedding has {} dimensions, expected {}",
                    item.embedding.len(),
                    self.dimension
                )));
            }
            let slot = slots.get_mut(item.index).ok_or_else(|| {
                Error::InvalidResponse(format!("embedding index {} out of range", item.index))
            })?;
            *slot = Some(item.embedding);
        }

        let mut vectors = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            vectors.push(slot.ok_or_else(|| {
                Error::InvalidResponse(format!("no embedding returned for input {i}"))
            })?);
        }

        debug!(model = %self.model, inputs = vectors.len(), "embedded batch");
        Ok(vectors)
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    index: usize,
    embedding: Vec<f32>,
}
