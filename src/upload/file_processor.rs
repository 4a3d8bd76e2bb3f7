use crate::upload::types::SelectedFile;
use ignore::Walk;
use std::fs;
use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Video => &VIDEO_EXTENSIONS,
            Self::Image => &IMAGE_EXTENSIONS,
        }
    }

    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions().contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

pub struct FileProcessor;

impl FileProcessor {
    /// Walks `folder` (honouring .gitignore and hidden-file rules) and returns
    /// every file of the given kind, sorted by path.
    pub fn collect_from_folder(folder: &Path, kind: MediaKind) -> Vec<SelectedFile> {
        let mut files: Vec<SelectedFile> = Walk::new(folder)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(folder = %folder.display(), error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.path().is_file() && kind.matches(entry.path()))
            .filter_map(|entry| Self::describe(entry.path()))
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(folder = %folder.display(), count = files.len(), "collected files from folder");
        files
    }

    /// Splits picked or dropped paths into accepted files and rejected paths.
    pub fn partition(paths: Vec<PathBuf>, kind: MediaKind) -> (Vec<SelectedFile>, Vec<PathBuf>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for path in paths {
            if !kind.matches(&path) {
                rejected.push(path);
                continue;
            }
            match Self::describe(&path) {
                Some(file) => accepted.push(file),
                None => rejected.push(path),
            }
        }

        (accepted, rejected)
    }

    pub fn describe(path: &Path) -> Option<SelectedFile> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let name = path.file_name()?.to_string_lossy().to_string();

        Some(SelectedFile {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    pub fn mime_type(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp4" => "video/mp4",
            "avi" => "video/x-msvideo",
            "mov" => "video/quicktime",
            "mkv" => "video/x-matroska",
            "webm" => "video/webm",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}
