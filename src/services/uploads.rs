//! Persistence of multipart file uploads.

use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use uuid::Uuid;

use crate::services::{ServiceError, ServiceResult};

/// File extensions accepted for project imagery.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

fn extension_of(file_name: Option<&str>) -> Option<String> {
    let ext = Path::new(file_name?).extension()?.to_str()?.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Moves a temp upload under `uploads_dir` with a generated name, returning
/// the stored relative path. Empty parts (no file chosen) yield `None`.
pub fn store_image(temp: &TempFile, uploads_dir: &str) -> ServiceResult<Option<String>> {
    if temp.size == 0 {
        return Ok(None);
    }

    let ext = extension_of(temp.file_name.as_deref())
        .ok_or_else(|| ServiceError::Form("unsupported image type".to_string()))?;
    let name = format!("{}.{ext}", Uuid::new_v4());
    let target = Path::new(uploads_dir).join(&name);

    std::fs::create_dir_all(uploads_dir)
        .map_err(|e| ServiceError::Internal(format!("failed to create uploads dir: {e}")))?;
    // copy + remove instead of rename: the temp dir may sit on another device.
    std::fs::copy(temp.file.path(), &target)
        .map_err(|e| ServiceError::Internal(format!("failed to store upload: {e}")))?;
    let _ = std::fs::remove_file(temp.file.path());

    Ok(Some(name))
}

/// Stores every non-empty part, preserving submission order.
pub fn store_images(files: &[TempFile], uploads_dir: &str) -> ServiceResult<Vec<String>> {
    let mut stored = Vec::new();
    for file in files {
        if let Some(path) = store_image(file, uploads_dir)? {
            stored.push(path);
        }
    }
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_accepts_images_only() {
        assert_eq!(extension_of(Some("photo.JPG")), Some("jpg".to_string()));
        assert_eq!(extension_of(Some("shot.webp")), Some("webp".to_string()));
        assert_eq!(extension_of(Some("report.pdf")), None);
        assert_eq!(extension_of(Some("noext")), None);
        assert_eq!(extension_of(None), None);
    }
}
