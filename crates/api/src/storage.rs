//! Research-note attachments on local disk.
//!
//! Files live under `{media_root}/{project_id}/` with a generated name that
//! keeps the original extension. The database stores the path relative to
//! `media_root`; the original file name is stored separately.

use std::path::{Path, PathBuf};

use storyforge_core::types::DbId;

use crate::error::AppError;

/// Fallback name for uploads without a usable file name.
pub const DEFAULT_FILE_NAME: &str = "attachment";

/// Longest extension kept from the original file name.
const MAX_EXTENSION_LEN: usize = 16;

/// Reduce a client-supplied name to its final path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        DEFAULT_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

/// Lowercase alphanumeric extension of `name`, if any.
fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    ext.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then(|| ext.to_ascii_lowercase())
}

/// Path of a stored file relative to the media root.
pub fn relative_path(project_id: DbId, file_name: &str) -> String {
    let stored = match extension(file_name) {
        Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4()),
        None => uuid::Uuid::new_v4().to_string(),
    };
    format!("{project_id}/{stored}")
}

/// Write `data` for a note in `project_id`, returning its relative path.
pub async fn save_attachment(
    media_root: &Path,
    project_id: DbId,
    file_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let relative = relative_path(project_id, file_name);
    let full_path = media_root.join(&relative);
    if let Some(dir) = full_path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }
    tokio::fs::write(&full_path, data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::debug!(path = %full_path.display(), bytes = data.len(), "Stored attachment");
    Ok(relative)
}

/// Delete a stored file. A file that is already gone is not an error.
pub async fn remove_attachment(media_root: &Path, relative: &str) -> Result<(), AppError> {
    let full_path: PathBuf = media_root.join(relative);
    match tokio::fs::remove_file(&full_path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %full_path.display(), "Attachment already missing");
            Ok(())
        }
        Err(e) => Err(AppError::InternalError(e.to_string())),
    }
}

/// Delete every stored file of a project. A missing directory is not an
/// error.
pub async fn remove_project_files(media_root: &Path, project_id: DbId) -> Result<(), AppError> {
    let dir = media_root.join(project_id.to_string());
    match tokio::fs::remove_dir_all(&dir).await {
        Ok(()) => {
            tracing::debug!(path = %dir.display(), "Removed project attachments");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::InternalError(e.to_string())),
    }
}
