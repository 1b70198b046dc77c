//! Remote vector store client (record-insertion API).

pub mod supabase;

pub use supabase::{ChunkMetadata, SupabaseStore};
