use std::env;
use std::path::PathBuf;

use kbvec_core::config::Config;
use kbvec_core::processor::{list_document_files, DocumentProcessor};
use kbvec_embed::get_default_embedder;
use kbvec_pipeline::{UploadReport, Uploader};
use kbvec_store::SupabaseStore;

fn print_usage() {
    eprintln!("Usage: kbvec-upload [--dry-run] [--limit <n>] [knowledge_dir]");
    eprintln!();
    eprintln!("Reads documents, splits them into overlapping chunks, embeds each");
    eprintln!("chunk and inserts it into the configured vector store table.");
    eprintln!();
    eprintln!("  --dry-run, -n   chunk only, skip embedding and upload");
    eprintln!("  --limit <n>     process at most n files");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut dry_run = false;
    let mut limit = None;
    let mut knowledge_dir = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dry-run" | "-n" => dry_run = true,
            "--limit" => {
                match args.get(i + 1).and_then(|n| n.parse::<usize>().ok()) {
                    Some(n) => {
                        limit = Some(n);
                        i += 1;
                    }
                    None => {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg if !arg.starts_with('-') => knowledge_dir = Some(PathBuf::from(arg)),
            other => {
                eprintln!("Unknown flag: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let knowledge_dir = knowledge_dir.unwrap_or_else(|| config.knowledge_dir());

    println!("Knowledge Base Uploader\n=======================");
    println!("Knowledge directory: {}", knowledge_dir.display());
    if dry_run {
        println!("⚠️  Dry run: chunking only, nothing will be uploaded");
    }

    let processor = DocumentProcessor::new(config.chunking.clone());

    // An explicit file list in config wins over directory discovery.
    let mut files = if config.ingest.files.is_empty() {
        list_document_files(&knowledge_dir)
    } else {
        let resolved = processor.resolve_files(&knowledge_dir, &config.ingest.files);
        for path in &resolved.missing {
            println!("⚠️  File not found: {}", path.display());
        }
        resolved.found
    };
    if let Some(limit) = limit {
        if files.len() > limit {
            files.truncate(limit);
            println!("🔢 Limited to first {} files", limit);
        }
    }

    if files.is_empty() {
        println!("No documents found under {}.", knowledge_dir.display());
        return Ok(());
    }

    if dry_run {
        let mut total_chunks = 0usize;
        for (file_index, file_path) in files.iter().enumerate() {
            let chunks = processor.process_file(file_path)?;
            println!(
                "📄 {}/{}: {} ({} chunks)",
                file_index + 1,
                files.len(),
                file_path.display(),
                chunks.len()
            );
            total_chunks += chunks.len();
        }
        println!(
            "\n✅ Dry run complete: {} files, {} chunks (nothing uploaded)",
            files.len(),
            total_chunks
        );
        return Ok(());
    }

    let embedder = get_default_embedder(&config.embedding)?;
    let store = SupabaseStore::from_env(&config.store)?;
    let uploader = Uploader::new(store, embedder);

    println!("🚀 Starting knowledge base upload...");
    let mut report = UploadReport::default();
    for (file_index, file_path) in files.iter().enumerate() {
        println!(
            "\n📄 Processing file {}/{}: {}",
            file_index + 1,
            files.len(),
            file_path.display()
        );
        let chunks = processor.process_file(file_path)?;
        println!("   Split into {} chunks", chunks.len());
        let uploaded = uploader.upload_document(&chunks).await?;
        report.add_document(uploaded);
    }

    println!(
        "\n🎉 Done! Uploaded {} chunks from {} files",
        report.chunks_uploaded, report.documents
    );
    println!("   Table: {}", uploader.target());
    println!("   Ready for vector search!");
    Ok(())
}
