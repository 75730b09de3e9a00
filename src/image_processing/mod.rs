pub mod batch;
pub mod convert;

use anyhow::{Context, Result};
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::utils::has_valid_extension;

pub use batch::{
    process_and_export, process_selection, BatchOutcome, BatchProgress, ConversionFailure,
    RunSummary, Selection, EMPTY_SELECTION_MESSAGE,
};
pub use convert::{convert_to_webp, ConversionResult, WEBP_QUALITY};

/// Extensions offered by the image picker and used when scanning directories
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Expand input paths into a list of image files
///
/// Files are kept as given, whatever their extension. Directories are walked
/// and contribute the files with a supported extension, sorted by path.
/// Input order is preserved otherwise.
pub fn discover_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(false).max_depth(10) {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();
                if path.is_file() && has_valid_extension(path, SUPPORTED_EXTENSIONS) {
                    found.push(path.to_path_buf());
                }
            }
            found.sort();
            image_files.extend(found);
        } else {
            image_files.push(input.clone());
        }
    }

    Ok(image_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_images_expands_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        for name in ["b.png", "a.JPG", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(nested.join("c.gif"), b"x").unwrap();

        let found = discover_images(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(
            found,
            vec![
                dir.path().join("a.JPG"),
                dir.path().join("b.png"),
                nested.join("c.gif"),
            ]
        );
    }

    #[test]
    fn test_discover_images_keeps_explicit_files_in_order() {
        let dir = TempDir::new().unwrap();
        let z = dir.path().join("z.bmp");
        let a = dir.path().join("a.tiff");
        fs::write(&z, b"x").unwrap();
        fs::write(&a, b"x").unwrap();

        let found = discover_images(&[z.clone(), a.clone()]).unwrap();
        assert_eq!(found, vec![z, a]);
    }
}
