//! Video streaming integration tests.
//!
//! Run with: `cargo test -p clipvault-api --test video_test`

mod helpers;

use helpers::fixtures::{create_test_mp4, create_test_webm};
use helpers::{setup_test_app, upload_file};

#[tokio::test]
async fn test_full_video_response_headers() {
    let app = setup_test_app().await;
    let client = app.client();
    let content = create_test_mp4(2048);
    let uploaded = upload_file(client, content.clone()).await;

    let response = client.get(&format!("/video/{}", uploaded.id)).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "video/mp4");
    assert_eq!(response.header("content-length"), "2048");
    assert_eq!(response.header("accept-ranges"), "bytes");
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn test_range_request_returns_partial_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let content = create_test_mp4(1000);
    let uploaded = upload_file(client, content.clone()).await;

    let response = client
        .get(&format!("/video/{}", uploaded.id))
        .add_header("Range", "bytes=100-199")
        .await;
    assert_eq!(response.status_code(), 206);
    assert_eq!(response.header("content-range"), "bytes 100-199/1000");
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.as_bytes().as_ref(), &content[100..200]);
}

#[tokio::test]
async fn test_open_ended_and_suffix_ranges() {
    let app = setup_test_app().await;
    let client = app.client();
    let content = create_test_mp4(1000);
    let uploaded = upload_file(client, content.clone()).await;
    let path = format!("/video/{}", uploaded.id);

    let open_ended = client.get(&path).add_header("Range", "bytes=900-").await;
    assert_eq!(open_ended.status_code(), 206);
    assert_eq!(open_ended.header("content-range"), "bytes 900-999/1000");
    assert_eq!(open_ended.as_bytes().as_ref(), &content[900..]);

    let suffix = client.get(&path).add_header("Range", "bytes=-10").await;
    assert_eq!(suffix.status_code(), 206);
    assert_eq!(suffix.header("content-range"), "bytes 990-999/1000");
    assert_eq!(suffix.as_bytes().as_ref(), &content[990..]);
}

#[tokio::test]
async fn test_range_past_end_is_not_satisfiable() {
    let app = setup_test_app().await;
    let client = app.client();
    let uploaded = upload_file(client, create_test_mp4(1000)).await;

    let response = client
        .get(&format!("/video/{}", uploaded.id))
        .add_header("Range", "bytes=5000-6000")
        .await;
    assert_eq!(response.status_code(), 416);
    assert_eq!(response.header("content-range"), "bytes */1000");
}

#[tokio::test]
async fn test_content_type_is_sniffed_from_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let uploaded = upload_file(client, create_test_webm()).await;

    let response = client.get(&format!("/video/{}", uploaded.id)).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "video/webm");
}

#[tokio::test]
async fn test_unknown_and_invalid_ids_are_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let unknown = client.get("/video/0b7f8a4e-4c1c-4a56-9d1e-7c2f3f4a5b6c").await;
    assert_eq!(unknown.status_code(), 404);
    let body: serde_json::Value = unknown.json();
    assert_eq!(body["code"], "NOT_FOUND");

    let traversal = client.get("/video/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(traversal.status_code(), 404);

    let meta = client.get("/meta/not-a-file-id").await;
    assert_eq!(meta.status_code(), 404);
}
