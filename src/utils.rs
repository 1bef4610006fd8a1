use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The key joining an annotation file to its index entries: the file name
/// without its final extension.
pub fn base_id(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// List the `*.xml` files directly inside `dir`, in lexicographic order.
pub fn list_annotation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }

    let pattern = Path::new(&Pattern::escape(&dir.to_string_lossy())).join("*.xml");
    let mut files = Vec::new();
    for entry in glob(&pattern.to_string_lossy())? {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            Error::io(path, std::io::Error::from(e))
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create `path` and its parents if missing. Existing contents are kept.
pub fn ensure_output_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        log::debug!("Creating output directory {}", path.display());
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    Ok(path.to_path_buf())
}
