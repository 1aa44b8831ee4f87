//! Directory scanning for the `dub` command's batch mode (a directory of
//! independent video files instead of a single source).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TdseError, TdseResult};

/// Video file extensions the batch scanner recognizes.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "avi", "webm"];

/// Resolves a single path argument into the list of video files it denotes:
/// the file itself, or every video file directly inside the directory
/// (optionally recursing into subdirectories).
pub fn collect_video_files(path: &Path, recursive: bool) -> TdseResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(TdseError::config(format!("input path does not exist: {}", path.display())));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if recursive {
        scan_directory_recursive(path)
    } else {
        scan_directory_flat(path)
    }
}

fn matches_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| VIDEO_EXTENSIONS.iter().any(|ext| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

fn scan_directory_flat(dir: &Path) -> TdseResult<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in fs::read_dir(dir).map_err(TdseError::from)? {
        let entry = entry.map_err(TdseError::from)?;
        let p = entry.path();
        if p.is_file() && matches_video_extension(&p) {
            result.push(p);
        }
    }
    result.sort();
    Ok(result)
}

fn scan_directory_recursive(dir: &Path) -> TdseResult<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in fs::read_dir(dir).map_err(TdseError::from)? {
        let entry = entry.map_err(TdseError::from)?;
        let p = entry.path();
        if p.is_file() {
            if matches_video_extension(&p) {
                result.push(p);
            }
        } else if p.is_dir() {
            result.extend(scan_directory_recursive(&p)?);
        }
    }
    result.sort();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn collects_a_single_file_regardless_of_extension() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("clip.mp4");
        fs::write(&file, b"x").unwrap();
        let files = collect_video_files(&file, false).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn flat_scan_ignores_non_video_files_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(tmp.path().join("a.mp4"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::write(nested.join("b.mp4"), b"x").unwrap();

        let files = collect_video_files(tmp.path(), false).unwrap();
        assert_eq!(files, vec![tmp.path().join("a.mp4")]);
    }

    #[test]
    fn recursive_scan_finds_nested_files() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(tmp.path().join("a.mp4"), b"x").unwrap();
        fs::write(nested.join("b.mkv"), b"x").unwrap();

        let mut files = collect_video_files(tmp.path(), true).unwrap();
        files.sort();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn rejects_nonexistent_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        assert!(collect_video_files(&missing, false).is_err());
    }
}
