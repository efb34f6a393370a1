use crate::sorter_core::error::{Result, SorterError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Image file extensions (lowercase) picked up from a source folder.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

/// Whether a path has one of the supported image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the image files directly inside `folder`, sorted by path.
///
/// Subfolders are not descended into. The result is a snapshot: files added
/// afterwards are not seen by whoever holds the list.
pub fn list_images(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SorterError::NotADirectory(folder.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();

    log::info!("Found {} images in {}", images.len(), folder.display());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("scan.TIF")));
        assert!(is_supported_image(Path::new("anim.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("raw.cr2")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_list_images_sorted_and_flat() {
        let temp = TempDir::new().unwrap();
        temp.child("b.png").touch().unwrap();
        temp.child("a.jpg").touch().unwrap();
        temp.child("c.GIF").touch().unwrap();
        temp.child("readme.txt").touch().unwrap();
        temp.child("nested/d.jpg").touch().unwrap();

        let images = list_images(temp.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.GIF"]);
    }

    #[test]
    fn test_list_images_ignores_image_named_folders() {
        let temp = TempDir::new().unwrap();
        temp.child("album.jpg").create_dir_all().unwrap();
        assert!(list_images(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_images_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("a.jpg");
        file.touch().unwrap();
        assert!(matches!(
            list_images(file.path()),
            Err(SorterError::NotADirectory(_))
        ));
    }
}
