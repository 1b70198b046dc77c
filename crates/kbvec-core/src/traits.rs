use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocumentChunk;

/// Embedding-generation API: text in, fixed-length vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the backing model (e.g. `text-embedding-3-small`).
    fn id(&self) -> &str;
    /// Embedding dimensionality.
    fn dim(&self) -> usize;
    /// Embeds a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Record-insertion API for (content, metadata, embedding) rows.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Destination label used in progress output (e.g. table name).
    fn target(&self) -> &str;
    /// Inserts one row per chunk. `chunks` and `embeddings` are parallel
    /// slices of equal length.
    async fn insert(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()>;
}
