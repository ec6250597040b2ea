//! Two-phase upload integration tests.
//!
//! Run with: `cargo test -p clipvault-api --test upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use chrono::{Duration, Utc};
use clipvault_core::LinkTokenCodec;
use clipvault_storage::BlobStore;
use helpers::fixtures::create_test_mp4;
use helpers::{setup_test_app, setup_test_app_with, upload_file, TEST_SECRET};

#[tokio::test]
async fn test_two_phase_upload_round_trip() {
    let app = setup_test_app().await;
    let client = app.client();
    let content = create_test_mp4(4096);

    let uploaded = upload_file(client, content.clone()).await;
    assert!(app.blob_store.exists(&uploaded.id).await.unwrap());

    // Metadata is absent until phase 2 completes.
    let before = client.get(&format!("/meta/{}", uploaded.id)).await;
    assert_eq!(before.status_code(), 404);

    let response = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": uploaded.meta_token, "title": "  Holiday  " }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Holiday");
    assert_eq!(body["fileId"], uploaded.id.as_str());

    let meta = client.get(&format!("/meta/{}", uploaded.id)).await;
    assert_eq!(meta.status_code(), 200);
    let meta: serde_json::Value = meta.json();
    assert_eq!(meta["title"], "Holiday");

    let video = client.get(&format!("/video/{}", uploaded.id)).await;
    assert_eq!(video.status_code(), 200);
    assert_eq!(video.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn test_each_upload_gets_a_new_id() {
    let app = setup_test_app().await;
    let client = app.client();

    let first = upload_file(client, create_test_mp4(64)).await;
    let second = upload_file(client, create_test_mp4(64)).await;
    assert_ne!(first.id, second.id);
    assert_ne!(first.meta_token, second.meta_token);
}

#[tokio::test]
async fn test_replaying_token_overwrites_title() {
    let app = setup_test_app().await;
    let client = app.client();
    let uploaded = upload_file(client, create_test_mp4(64)).await;

    for title in ["first", "second"] {
        let response = client
            .post("/upload/meta")
            .json(&serde_json::json!({ "metaToken": uploaded.meta_token, "title": title }))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let meta: serde_json::Value = client.get(&format!("/meta/{}", uploaded.id)).await.json();
    assert_eq!(meta["title"], "second");
    assert_eq!(app.metadata_index.len(), 1);
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = setup_test_app().await;
    let client = app.client();
    let uploaded = upload_file(client, create_test_mp4(64)).await;

    let mut tampered = uploaded.meta_token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": tampered, "title": "x" }))
        .await;
    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_TOKEN_SIGNATURE");
    assert!(app.metadata_index.is_empty());
}

#[tokio::test]
async fn test_token_not_yet_valid_is_unauthorized() {
    let app = setup_test_app().await;
    let client = app.client();

    let codec = LinkTokenCodec::new(TEST_SECRET.as_bytes(), Duration::seconds(60));
    let future_token = codec
        .mint("0b7f8a4e-4c1c-4a56-9d1e-7c2f3f4a5b6c", Utc::now() + Duration::hours(1))
        .unwrap();

    let response = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": future_token, "title": "early" }))
        .await;
    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOKEN_NOT_YET_VALID");
}

#[tokio::test]
async fn test_blank_title_and_missing_token_are_bad_requests() {
    let app = setup_test_app().await;
    let client = app.client();
    let uploaded = upload_file(client, create_test_mp4(64)).await;

    let blank_title = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": uploaded.meta_token, "title": "   " }))
        .await;
    assert_eq!(blank_title.status_code(), 400);

    let missing_token = client
        .post("/upload/meta")
        .json(&serde_json::json!({ "title": "no token" }))
        .await;
    assert_eq!(missing_token.status_code(), 400);
    assert!(app.metadata_index.is_empty());
}

#[tokio::test]
async fn test_upload_without_upload_field_is_bad_request() {
    let app = setup_test_app().await;
    let client = app.client();

    let part = Part::bytes(bytes::Bytes::from(create_test_mp4(64))).file_name("clip.mp4");
    let response = client
        .post("/upload/file")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_field_after_other_fields_is_stored() {
    let app = setup_test_app().await;
    let client = app.client();
    let content = create_test_mp4(128);

    let form = MultipartForm::new()
        .add_text("note", "ignored")
        .add_part(
            "upload",
            Part::bytes(bytes::Bytes::from(content.clone())).file_name("clip.mp4"),
        );
    let response = client.post("/upload/file").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();
    let video = client.get(&format!("/video/{}", id)).await;
    assert_eq!(video.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/upload/file")
        .json(&serde_json::json!({ "upload": "nope" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_truncated_multipart_body_is_bad_request() {
    let app = setup_test_app().await;

    let mut body = b"--XBOUNDARY\r\n\
Content-Disposition: form-data; name=\"upload\"; filename=\"clip.mp4\"\r\n\
Content-Type: video/mp4\r\n\r\n"
        .to_vec();
    // Field content with no closing boundary.
    body.extend_from_slice(&create_test_mp4(512));

    let response = app
        .client()
        .post("/upload/file")
        .content_type("multipart/form-data; boundary=XBOUNDARY")
        .bytes(bytes::Bytes::from(body))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    // Nothing was published next to the staging directory.
    let mut entries = std::fs::read_dir(app.blob_store.base_path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    entries.sort();
    assert_eq!(entries, vec![".staging".to_string()]);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = setup_test_app_with(|config| config.max_upload_size_bytes = 1024).await;

    let part = Part::bytes(bytes::Bytes::from(create_test_mp4(8 * 1024))).file_name("big.mp4");
    let response = app
        .client()
        .post("/upload/file")
        .multipart(MultipartForm::new().add_part("upload", part))
        .await;
    assert_eq!(response.status_code(), 413);
}

#[tokio::test]
async fn test_blob_check_rejects_token_for_missing_blob() {
    let app = setup_test_app_with(|config| config.link_token.require_blob = true).await;

    let codec = LinkTokenCodec::new(TEST_SECRET.as_bytes(), Duration::seconds(60));
    let token = codec.mint("0b7f8a4e-4c1c-4a56-9d1e-7c2f3f4a5b6c", Utc::now()).unwrap();

    let response = app
        .client()
        .post("/upload/meta")
        .json(&serde_json::json!({ "metaToken": token, "title": "ghost" }))
        .await;
    assert_eq!(response.status_code(), 404);
    assert!(app.metadata_index.is_empty());
}
