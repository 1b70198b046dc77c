//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars (double underscore nests sections, e.g. `APP_CHUNKING__CHUNK_SIZE`).
//! Secrets never live here; API keys are read from the environment by the
//! clients that need them.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory holding the knowledge-base documents.
    pub knowledge_dir: String,
    /// Explicit file names under `knowledge_dir`. Empty means discover every
    /// `.md`/`.txt` file recursively.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Supabase project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    pub table: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            knowledge_dir: "content/knowledge".to_string(),
            files: Vec::new(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            table: "documents".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.embedding.base_url.is_empty() {
            return Err(Error::InvalidConfig(
                "embedding.base_url must not be empty".to_string(),
            ));
        }
        if self.embedding.model.is_empty() {
            return Err(Error::InvalidConfig(
                "embedding.model must not be empty".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig(
                "embedding.dimension must be greater than 0".to_string(),
            ));
        }
        if self.store.table.is_empty() {
            return Err(Error::InvalidConfig(
                "store.table must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        expand_path(&self.ingest.knowledge_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. If `p` is absolute, it's returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reasonable() {
        let config = Config::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.store.table, "documents");
        assert!(config.ingest.files.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_defaults() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [ingest]
            knowledge_dir = "docs"
            files = ["a.md", "b.md"]

            [chunking]
            chunk_size = 800

            [store]
            url = "https://example.supabase.co"
            table = "briefing_knowledge"
            "#,
        ));
        let config = Config::from_figment(figment).unwrap();

        assert_eq!(config.ingest.knowledge_dir, "docs");
        assert_eq!(config.ingest.files.len(), 2);
        assert_eq!(config.chunking.chunk_size, 800);
        // Untouched sections keep their defaults.
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.store.table, "briefing_knowledge");
    }

    #[test]
    fn invalid_chunking_is_rejected_at_load() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [chunking]
            chunk_size = 100
            overlap = 100
            "#,
        ));
        let err = Config::from_figment(figment).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn empty_model_is_rejected() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [embedding]
            model = ""
            "#,
        ));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn expand_path_handles_tilde() {
        let p = expand_path("~/data");
        assert!(!p.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn resolve_with_base_joins_relative_paths() {
        let base = Path::new("/srv/kb");
        assert_eq!(resolve_with_base(base, "docs"), PathBuf::from("/srv/kb/docs"));
        assert_eq!(resolve_with_base(base, "/abs/docs"), PathBuf::from("/abs/docs"));
    }
}
