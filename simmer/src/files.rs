//! Asynchronous file reading helper.
//!
//! Not used by any pipeline; kept for narratives that load text from disk.

use std::path::Path;

/// Read a UTF-8 file to a string without blocking the runtime.
pub async fn read_text(path: impl AsRef<Path>) -> std::io::Result<String> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Reading file");
    tokio::fs::read_to_string(path).await
}
