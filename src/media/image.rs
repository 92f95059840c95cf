//! File image source.
//!
//! The alternative to camera capture: the user points at an existing
//! image file on disk.

use std::path::Path;

use super::{CapturedImage, MediaError};

/// Reads a user-chosen image file into a card payload.
///
/// Rejects empty files; the MIME type is sniffed from the extension.
pub fn load_from_file(path: &Path) -> Result<CapturedImage, MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::UnreadableImage {
        path: path.display().to_string(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(MediaError::EmptyImage(path.display().to_string()));
    }

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(CapturedImage { bytes, mime_type })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_file_sniffs_mime_type() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("card.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).expect("Failed to write image");

        let image = load_from_file(&path).expect("Failed to load image");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_load_from_file_rejects_empty_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, []).expect("Failed to write file");

        assert!(matches!(
            load_from_file(&path),
            Err(MediaError::EmptyImage(_))
        ));
    }

    #[test]
    fn test_load_from_file_missing_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("missing.jpg");

        assert!(matches!(
            load_from_file(&path),
            Err(MediaError::UnreadableImage { .. })
        ));
    }

    #[test]
    fn test_load_from_file_unknown_extension_is_octet_stream() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("card.zzz");
        std::fs::write(&path, [1, 2, 3]).expect("Failed to write file");

        let image = load_from_file(&path).expect("Failed to load image");
        assert_eq!(image.mime_type, "application/octet-stream");
    }
}
