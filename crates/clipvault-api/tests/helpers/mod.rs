//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p clipvault-api`. Blobs go to a temp directory and
//! metadata to the in-memory index, so no external services are needed.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use clipvault_api::setup::routes;
use clipvault_api::state::AppState;
use clipvault_core::{
    BlobBackend, Config, ElasticsearchConfig, LinkTokenConfig, MetadataBackend,
};
use clipvault_index::{MemoryMetadataIndex, MetadataIndex};
use clipvault_storage::{BlobStore, LocalBlobStore};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-link-token-secret";
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Test application: server plus the stores behind it.
pub struct TestApp {
    pub server: TestServer,
    pub blob_store: Arc<LocalBlobStore>,
    pub metadata_index: Arc<MemoryMetadataIndex>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Result of phase 1.
pub struct UploadedFile {
    pub id: String,
    pub meta_token: String,
}

/// Setup test app with local blob storage and an in-memory index.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Same as [`setup_test_app`], with a hook to adjust the config first.
pub async fn setup_test_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut config = create_test_config(&temp_dir);
    adjust(&mut config);

    let blob_store = Arc::new(
        LocalBlobStore::new(temp_dir.path())
            .await
            .expect("Failed to create local blob store"),
    );
    let metadata_index = Arc::new(MemoryMetadataIndex::new());

    let state = Arc::new(AppState::new(
        &config,
        blob_store.clone() as Arc<dyn BlobStore>,
        metadata_index.clone() as Arc<dyn MetadataIndex>,
    ));
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        blob_store,
        metadata_index,
        _temp_dir: temp_dir,
    }
}

/// Router over local blob storage and a caller-supplied metadata index.
pub async fn setup_test_server_with_index(
    metadata_index: Arc<dyn MetadataIndex>,
) -> (TestServer, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(&temp_dir);
    let blob_store: Arc<dyn BlobStore> = Arc::new(
        LocalBlobStore::new(temp_dir.path())
            .await
            .expect("Failed to create local blob store"),
    );

    let state = Arc::new(AppState::new(&config, blob_store, metadata_index));
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");
    (server, temp_dir)
}

fn create_test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_port: 3000,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        link_token: LinkTokenConfig {
            secret: TEST_SECRET.to_string(),
            not_before_skew_secs: 60,
            require_blob: false,
        },
        blob_backend: BlobBackend::Local,
        blob_storage_path: temp_dir.path().to_string_lossy().into_owned(),
        metadata_backend: MetadataBackend::Memory,
        elasticsearch: ElasticsearchConfig {
            url: "http://localhost:9200".to_string(),
            index: "video_meta".to_string(),
            username: None,
            password: None,
        },
        max_upload_size_bytes: TEST_MAX_UPLOAD_BYTES,
        search_max_results: 100,
    }
}

/// POST `content` as the `upload` field and return the ID and token.
pub async fn upload_file(client: &TestServer, content: Vec<u8>) -> UploadedFile {
    let part = Part::bytes(bytes::Bytes::from(content))
        .file_name("clip.mp4")
        .mime_type("video/mp4");
    let response = client
        .post("/upload/file")
        .multipart(MultipartForm::new().add_part("upload", part))
        .await;
    assert_eq!(response.status_code(), 200, "upload failed: {}", response.text());

    let body: serde_json::Value = response.json();
    UploadedFile {
        id: body["id"].as_str().expect("Expected 'id'").to_string(),
        meta_token: body["metaToken"]
            .as_str()
            .expect("Expected 'metaToken'")
            .to_string(),
    }
}

/// Run both phases and return the file ID.
pub async fn upload_video(client: &TestServer, content: Vec<u8>, title: &str) -> String {
    let uploaded = upload_file(client, content).await;
    let response = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": uploaded.meta_token, "title": title }))
        .await;
    assert_eq!(response.status_code(), 200, "meta failed: {}", response.text());
    uploaded.id
}
