//! Client for a Supabase (PostgREST) table with a pgvector column.
//!
//! Rows are inserted with `POST {url}/rest/v1/{table}`. The service role key
//! goes in both the `apikey` header and the bearer token, which is how
//! PostgREST expects service-to-service writes to authenticate.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use kbvec_core::config::StoreConfig;
use kbvec_core::error::{Error, Result};
use kbvec_core::traits::ChunkStore;
use kbvec_core::types::DocumentChunk;

const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";

/// Metadata object persisted with every row.
///
/// `chunk_index` is 1-based within the source document.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl From<&DocumentChunk> for ChunkMetadata {
    fn from(chunk: &DocumentChunk) -> Self {
        Self {
            source: chunk.source.clone(),
            chunk_index: chunk.chunk_index,
            total_chunks: chunk.total_chunks,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChunkRow<'a> {
    content: &'a str,
    metadata: ChunkMetadata,
    embedding: &'a [f32],
}

#[derive(Debug)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig, service_key: String) -> Result<Self> {
        if config.url.is_empty() {
            return Err(Error::InvalidConfig("store.url is not set".to_string()));
        }
        if config.table.is_empty() {
            return Err(Error::InvalidConfig("store.table is not set".to_string()));
        }
        if service_key.is_empty() {
            return Err(Error::MissingApiKey(SERVICE_KEY_VAR.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key,
            table: config.table.clone(),
        })
    }

    pub fn from_env(config: &StoreConfig) -> Result<Self> {
        let service_key = std::env::var(SERVICE_KEY_VAR)
            .map_err(|_| Error::MissingApiKey(SERVICE_KEY_VAR.to_string()))?;
        Self::new(config, service_key)
    }

    fn rows<'a>(chunks: &'a [DocumentChunk], embeddings: &'a [Vec<f32>]) -> Vec<ChunkRow<'a>> {
        chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| ChunkRow {
                content: &chunk.content,
                metadata: ChunkMetadata::from(chunk),
                embedding,
            })
            .collect()
    }
}

#[async_trait]
impl ChunkStore for SupabaseStore {
    fn target(&self) -> &str {
        &self.table
    }

    async fn insert(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        if chunks.len() != embeddings.len() {
            return Err(Error::Store(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let rows = Self::rows(chunks, embeddings);
        let response = self
            .client
            .post(format!("{}/rest/v1/{}", self.base_url, self.table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "insert into '{}' failed with status {status}: {error_text}",
                self.table
            )));
        }

        debug!(table = %self.table, rows = chunks.len(), "inserted rows");
        Ok(())
    }
}
