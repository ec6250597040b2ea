use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::range::{resolve_range, RangeOutcome};
use crate::utils::sniff::{sniff_video_content_type, SNIFF_LEN};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use clipvault_core::AppError;
use clipvault_storage::BlobRead;
use std::io::SeekFrom;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Stream a stored video, honouring single `Range` requests for seeking.
#[utoipa::path(
    get,
    path = "/video/{id}",
    tag = "videos",
    params(
        ("id" = String, Path, description = "File ID"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Full video content"),
        (status = 206, description = "Requested byte range"),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable")
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let mut blob = state.retrieval.open_video(&id).await?;
    let len = blob.content_length;

    let mut head = [0u8; SNIFF_LEN];
    let head_len = read_head(&mut blob.reader, &mut head).await?;
    let content_type = sniff_video_content_type(&head[..head_len]);

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let response = match resolve_range(range, len) {
        RangeOutcome::Unsatisfiable => {
            tracing::debug!(
                file_id = %id,
                range = ?range,
                size_bytes = len,
                "Range not satisfiable"
            );
            Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_RANGE, format!("bytes */{}", len))
                .body(Body::empty())
        }
        RangeOutcome::Full => {
            blob.reader
                .seek(SeekFrom::Start(0))
                .await
                .map_err(AppError::from)?;
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, len)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from_stream(ReaderStream::new(blob.reader)))
        }
        RangeOutcome::Partial { start, end } => {
            let part_len = end - start + 1;
            blob.reader
                .seek(SeekFrom::Start(start))
                .await
                .map_err(AppError::from)?;
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, part_len)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, len),
                )
                .body(Body::from_stream(ReaderStream::new(
                    blob.reader.take(part_len),
                )))
        }
    };

    response.map_err(|e| {
        HttpAppError(AppError::Internal(format!(
            "Failed to build video response: {}",
            e
        )))
    })
}

/// Fill `buf` from the start of the blob, stopping early at end of file.
async fn read_head(
    reader: &mut Pin<Box<dyn BlobRead>>,
    buf: &mut [u8],
) -> Result<usize, AppError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
