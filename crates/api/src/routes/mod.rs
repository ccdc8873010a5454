pub mod file;
pub mod job;
pub mod transcript;
pub mod upload;

use crate::error::ApiError;

/// Reduces a client-supplied name to a bare file name, rejecting anything
/// that could escape the transcription directory.
pub(crate) fn sanitize_file_name(name: &str) -> Result<String, ApiError> {
    let bare = std::path::Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    if bare.is_empty() || bare != name.trim() || bare.starts_with('.') {
        return Err(ApiError::BadRequest(format!("Invalid file name: {name}")));
    }
    Ok(bare.to_string())
}
