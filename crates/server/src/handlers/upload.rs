use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::errors::ServerError;
use crate::models::UploadResponse;

pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];
const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ServerError> {
    require_admin(&state, &headers)?;
    let max_bytes = state.uploads.max_bytes;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mimetype = field.content_type().unwrap_or_default().to_ascii_lowercase();
        if !ALLOWED_MIME_TYPES.contains(&mimetype.as_str()) {
            return Err(ServerError::bad_request("Unsupported file type"));
        }
        let original = field.file_name().unwrap_or("upload").to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(too_large(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        let filename = stored_name(chrono::Utc::now().timestamp_millis(), &original);
        let path = state.uploads.dir.join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ServerError::internal(format!("upload write failed: {e}")))?;

        tracing::info!(file = %filename, size = bytes.len(), mimetype = %mimetype, "image uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("{}/{}", state.uploads.public_prefix, filename),
                filename,
                size: bytes.len(),
                mimetype,
            }),
        ));
    }

    Err(ServerError::bad_request("No file uploaded"))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ServerError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ServerError::new(status, "File too large");
    }
    ServerError::new(status, err.body_text())
}

fn too_large(max_bytes: usize) -> ServerError {
    ServerError::new(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("File too large (limit {max_bytes} bytes)"),
    )
}

/// `<millis>-<name>` with everything outside `[A-Za-z0-9.-]` replaced by `_`.
pub fn stored_name(millis: i64, original: &str) -> String {
    let sanitized: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{millis}-{sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sanitized() {
        assert_eq!(stored_name(1700000000000, "my photo (1).PNG"), "1700000000000-my_photo__1_.PNG");
        assert_eq!(stored_name(5, "../../etc/passwd"), "5-.._.._etc_passwd");
        assert_eq!(stored_name(5, "héllo.jpg"), "5-h_llo.jpg");
    }
}
