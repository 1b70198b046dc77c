use std::fs;
use std::path::{Path, PathBuf};

use crate::chunker::{chunk_text, ChunkingConfig};
use crate::config::resolve_with_base;
use crate::error::Result;
use crate::types::DocumentChunk;

/// File extensions treated as knowledge-base documents during discovery.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Outcome of resolving an explicit file list against a base directory.
///
/// Missing entries are reported rather than failing the run, so one renamed
/// file does not block the rest of the corpus.
#[derive(Debug, Default)]
pub struct ResolvedFiles {
    pub found: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// Turns source files into upload-ready [`DocumentChunk`]s.
#[derive(Default)]
pub struct DocumentProcessor {
    chunking: ChunkingConfig,
}

impl DocumentProcessor {
    pub fn new(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    /// Reads and chunks a single file.
    ///
    /// `chunk_index` is 1-based and `total_chunks` is filled in once the
    /// whole document has been chunked.
    pub fn process_file(&self, file_path: &Path) -> Result<Vec<DocumentChunk>> {
        let content = self.read_file_content(file_path)?;
        let doc_id = extract_doc_id(file_path);
        let source = file_name(file_path);

        let pieces = chunk_text(&content, &self.chunking)?;
        let total_chunks = pieces.len();
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(i, content)| {
                let chunk_index = i + 1;
                DocumentChunk {
                    id: format!("{doc_id}:{chunk_index}"),
                    doc_id: doc_id.clone(),
                    doc_path: file_path.to_string_lossy().to_string(),
                    source: source.clone(),
                    content,
                    chunk_index,
                    total_chunks,
                }
            })
            .collect();
        Ok(chunks)
    }

    /// Chunks every document under `data_dir`, in sorted path order.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = list_document_files(data_dir);
        if files.is_empty() {
            println!("No documents found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        self.process_files(&files)
    }

    /// Like [`Self::process_directory`] but stops after the first `limit` files.
    pub fn process_directory_limited(
        &self,
        data_dir: &Path,
        limit: usize,
    ) -> Result<Vec<DocumentChunk>> {
        let mut files = list_document_files(data_dir);
        if files.is_empty() {
            println!("No documents found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            println!("🔢 Limited to first {} files", limit);
        }
        self.process_files(&files)
    }

    /// Resolves explicit file names against `base_dir`, separating the ones
    /// that exist from the ones that do not. Entries may be absolute or use
    /// `~`/`$VAR` expansion.
    pub fn resolve_files(&self, base_dir: &Path, names: &[String]) -> ResolvedFiles {
        let mut resolved = ResolvedFiles::default();
        for name in names {
            let path = resolve_with_base(base_dir, name);
            if path.is_file() {
                resolved.found.push(path);
            } else {
                resolved.missing.push(path);
            }
        }
        resolved
    }

    fn process_files(&self, files: &[PathBuf]) -> Result<Vec<DocumentChunk>> {
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!(
                "Processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            all_chunks.extend(self.process_file(file_path)?);
        }
        println!(
            "Processed {} files into {} chunks",
            files.len(),
            all_chunks.len()
        );
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }
}

/// Lists every `.md`/`.txt` file under `root`, sorted for a stable order.
pub fn list_document_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            if DOCUMENT_EXTENSIONS.contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files
}

fn extract_doc_id(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string())
}

fn file_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string())
}
