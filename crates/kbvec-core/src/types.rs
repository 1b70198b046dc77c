//! Domain types shared by the chunking, embedding, and upload stages.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A chunk of a source document that is independently embedded and uploaded.
///
/// - `id`: globally unique chunk identifier (`"{doc_id}:{chunk_index}"`)
/// - `doc_id`: stable document identity (file stem)
/// - `doc_path`: original path to the source file
/// - `source`: file name recorded in the uploaded row metadata
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: 1-based position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub doc_path: String,
    pub source: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}
