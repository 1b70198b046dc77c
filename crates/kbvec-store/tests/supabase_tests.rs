use httpmock::prelude::*;
use serde_json::json;

use kbvec_core::config::StoreConfig;
use kbvec_core::error::Error;
use kbvec_core::traits::ChunkStore;
use kbvec_core::types::DocumentChunk;
use kbvec_store::SupabaseStore;

fn test_config(url: String) -> StoreConfig {
    StoreConfig {
        url,
        table: "documents".to_string(),
    }
}

fn chunk(doc_id: &str, idx: usize, total: usize, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: format!("{doc_id}:{idx}"),
        doc_id: doc_id.to_string(),
        doc_path: format!("/kb/{doc_id}.md"),
        source: format!("{doc_id}.md"),
        content: content.to_string(),
        chunk_index: idx,
        total_chunks: total,
    }
}

#[test]
fn missing_url_is_rejected() {
    let err = SupabaseStore::new(&test_config(String::new()), "key".to_string()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn empty_service_key_is_rejected() {
    let config = test_config("https://example.supabase.co".to_string());
    let err = SupabaseStore::new(&config, String::new()).unwrap_err();
    assert!(matches!(err, Error::MissingApiKey(_)));
}

#[tokio::test]
async fn insert_posts_rows_with_metadata_and_auth() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/documents")
                .header("apikey", "secret-key")
                .header("authorization", "Bearer secret-key")
                .header("prefer", "return=minimal")
                .json_body(json!([
                    {
                        "content": "first chunk",
                        "metadata": { "source": "guide.md", "chunk_index": 1, "total_chunks": 2 },
                        "embedding": [0.25, 0.5],
                    },
                    {
                        "content": "second chunk",
                        "metadata": { "source": "guide.md", "chunk_index": 2, "total_chunks": 2 },
                        "embedding": [0.75, 1.0],
                    },
                ]));
            then.status(201);
        })
        .await;

    let store =
        SupabaseStore::new(&test_config(server.base_url()), "secret-key".to_string()).expect("store");
    let chunks = vec![
        chunk("guide", 1, 2, "first chunk"),
        chunk("guide", 2, 2, "second chunk"),
    ];
    let embeddings = vec![vec![0.25, 0.5], vec![0.75, 1.0]];

    store.insert(&chunks, &embeddings).await.expect("insert");
    mock.assert_async().await;
}

#[tokio::test]
async fn insert_surfaces_api_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/documents");
            then.status(409).body("duplicate key value");
        })
        .await;

    let store =
        SupabaseStore::new(&test_config(server.base_url()), "secret-key".to_string()).expect("store");
    let chunks = vec![chunk("guide", 1, 1, "first chunk")];
    let err = store.insert(&chunks, &[vec![0.5, 0.5]]).await.unwrap_err();

    match err {
        Error::Store(msg) => {
            assert!(msg.contains("409"), "status in message: {msg}");
            assert!(msg.contains("duplicate key value"), "body in message: {msg}");
            assert!(msg.contains("documents"), "table in message: {msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn insert_rejects_mismatched_lengths() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(201);
        })
        .await;

    let store =
        SupabaseStore::new(&test_config(server.base_url()), "secret-key".to_string()).expect("store");
    let chunks = vec![chunk("guide", 1, 1, "first chunk")];
    let err = store.insert(&chunks, &[]).await.unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn insert_empty_batch_skips_the_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(201);
        })
        .await;

    let store =
        SupabaseStore::new(&test_config(server.base_url()), "secret-key".to_string()).expect("store");
    store.insert(&[], &[]).await.expect("insert");

    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn insert_strips_trailing_slash_from_url() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/documents");
            then.status(201);
        })
        .await;

    let url = format!("{}/", server.base_url());
    let store = SupabaseStore::new(&test_config(url), "secret-key".to_string()).expect("store");
    let chunks = vec![chunk("guide", 1, 1, "first chunk")];

    store.insert(&chunks, &[vec![1.0]]).await.expect("insert");
    mock.assert_async().await;
}
