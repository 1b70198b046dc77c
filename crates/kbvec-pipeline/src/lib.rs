//! Sequencing for the upload pipeline: embed each chunk, then insert it,
//! strictly in order.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use kbvec_core::error::{Error, Result};
use kbvec_core::traits::{ChunkStore, Embedder};
use kbvec_core::types::DocumentChunk;

/// Totals accumulated over an upload run.
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadReport {
    pub documents: usize,
    pub chunks_uploaded: usize,
}

impl UploadReport {
    pub fn add_document(&mut self, chunks_uploaded: usize) {
        self.documents += 1;
        self.chunks_uploaded += chunks_uploaded;
    }
}

pub struct Uploader<S>
where
    S: ChunkStore,
{
    store: S,
    embedder: Box<dyn Embedder>,
}

impl<S> Uploader<S>
where
    S: ChunkStore,
{
    pub fn new(store: S, embedder: Box<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    pub fn target(&self) -> &str {
        self.store.target()
    }

    /// Uploads one document's chunks.
    ///
    /// Each chunk is embedded and inserted before the next one is touched,
    /// so the rows already stored when an error aborts the run form an
    /// unbroken prefix of the document.
    pub async fn upload_document(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}").unwrap().progress_chars("#>-"));

        let mut uploaded = 0usize;
        for chunk in chunks {
            // 1) embed
            let mut vectors = self
                .embedder
                .embed_batch(std::slice::from_ref(&chunk.content))
                .await?;
            let embedding = vectors
                .pop()
                .ok_or_else(|| Error::InvalidResponse("embedder returned no vector".to_string()))?;
            if embedding.len() != self.embedder.dim() {
                return Err(Error::Embedding(format!(
                    "embedding has {} dimensions, expected {}",
                    embedding.len(),
                    self.embedder.dim()
                )));
            }

            // 2) insert
            self.store
                .insert(std::slice::from_ref(chunk), std::slice::from_ref(&embedding))
                .await?;

            uploaded += 1;
            pb.set_position(uploaded as u64);
            pb.set_message(format!("chunk {}/{}", chunk.chunk_index, chunk.total_chunks));
            debug!(id = %chunk.id, "uploaded chunk");
        }
        pb.finish_with_message("✅ uploaded");

        Ok(uploaded)
    }
}
