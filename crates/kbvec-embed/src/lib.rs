//! Embedding providers: a remote OpenAI-compatible client plus a
//! deterministic fake for tests and offline runs.

pub mod fake;
pub mod openai;

pub use fake::FakeEmbedder;
pub use openai::OpenAiEmbedder;

use kbvec_core::config::EmbeddingConfig;
use kbvec_core::error::Result;
use kbvec_core::traits::Embedder;

/// Selects the embedder for the current environment.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) switches to [`FakeEmbedder`],
/// which needs no network access or API key; otherwise an [`OpenAiEmbedder`]
/// is built with the key from `OPENAI_API_KEY`.
pub fn get_default_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(config.dimension)));
    }
    Ok(Box::new(OpenAiEmbedder::from_env(config)?))
}
