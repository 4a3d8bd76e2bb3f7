//! Overlay ("modal") images used by the backend when it composites
//! thumbnails.

use crate::api::{ApiClient, ApiError, ModalAsset};
use crate::upload::{FileProcessor, MediaKind, SelectedFile};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("Select at least one image (JPG, PNG, GIF or WebP)")]
    NoImages,
    #[error("{0} is not available yet")]
    NotImplemented(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileUploadState {
    Uploading,
    Uploaded,
    Failed(String),
}

/// Progress of one file in an overlay batch. `index` is the file's position
/// in the batch, so files sharing a name stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub index: usize,
    pub name: String,
    pub state: FileUploadState,
}

/// Keeps only image files from a drop or picker selection. Errors when
/// nothing usable is left.
pub fn select_images(paths: Vec<PathBuf>) -> Result<(Vec<SelectedFile>, Vec<PathBuf>), ModalError> {
    let (images, rejected) = FileProcessor::partition(paths, MediaKind::Image);
    if images.is_empty() {
        return Err(ModalError::NoImages);
    }
    Ok((images, rejected))
}

/// Replaces the row of the same batch position, or appends a new one.
pub fn record_status(statuses: &mut Vec<FileStatus>, status: FileStatus) {
    match statuses
        .iter_mut()
        .find(|existing| existing.index == status.index)
    {
        Some(existing) => *existing = status,
        None => statuses.push(status),
    }
}

// No backend call exists for these yet.
pub fn delete_modal(modal: &ModalAsset) -> Result<(), ModalError> {
    tracing::debug!(modal_id = %modal.id, "overlay deletion requested");
    Err(ModalError::NotImplemented("Deleting overlays"))
}

pub fn preview_modal(modal: &ModalAsset) -> Result<(), ModalError> {
    tracing::debug!(modal_id = %modal.id, "overlay preview requested");
    Err(ModalError::NotImplemented("Overlay preview"))
}

pub struct ModalUploader {
    client: ApiClient,
}

impl ModalUploader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads one file at a time so every result can be attributed to its
    /// file, then refreshes the listing once regardless of failures.
    pub async fn upload_all(
        &self,
        files: Vec<SelectedFile>,
        status_sender: &Sender<FileStatus>,
    ) -> Result<Vec<ModalAsset>, ApiError> {
        for (index, file) in files.into_iter().enumerate() {
            status_sender
                .send(FileStatus {
                    index,
                    name: file.name.clone(),
                    state: FileUploadState::Uploading,
                })
                .unwrap_or_default();

            let state = match self.client.upload_modal(&file.path).await {
                Ok(()) => {
                    tracing::info!(file = %file.name, "overlay uploaded");
                    FileUploadState::Uploaded
                }
                Err(err) => {
                    tracing::warn!(file = %file.name, error = %err, "overlay upload failed");
                    FileUploadState::Failed(err.user_message(&format!("Uploading \"{}\"", file.name)))
                }
            };
            status_sender
                .send(FileStatus {
                    index,
                    name: file.name,
                    state,
                })
                .unwrap_or_default();
        }

        self.client.list_modals().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use std::sync::mpsc::channel;

    fn modal() -> ModalAsset {
        ModalAsset {
            id: "m-1".into(),
            filename: "soft.png".into(),
            upload_date: String::new(),
            file_size: None,
        }
    }

    #[test]
    fn non_images_are_filtered_out() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.png");
        let video = dir.path().join("b.mp4");
        fs::write(&image, b"png").unwrap();
        fs::write(&video, b"mp4").unwrap();

        let (images, rejected) = select_images(vec![image.clone(), video.clone()]).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].path, image);
        assert_eq!(rejected, vec![video.clone()]);

        assert_eq!(select_images(vec![video]), Err(ModalError::NoImages));
        assert_eq!(select_images(Vec::new()), Err(ModalError::NoImages));
    }

    #[test]
    fn delete_and_preview_are_not_wired() {
        assert_eq!(
            delete_modal(&modal()),
            Err(ModalError::NotImplemented("Deleting overlays"))
        );
        assert!(matches!(preview_modal(&modal()), Err(ModalError::NotImplemented(_))));
    }

    #[test]
    fn same_file_names_keep_separate_rows() {
        let status = |index, state| FileStatus {
            index,
            name: "logo.png".into(),
            state,
        };
        let mut rows = Vec::new();
        record_status(&mut rows, status(0, FileUploadState::Uploading));
        record_status(&mut rows, status(0, FileUploadState::Uploaded));
        record_status(&mut rows, status(1, FileUploadState::Uploading));
        record_status(&mut rows, status(1, FileUploadState::Failed("too large".into())));

        assert_eq!(
            rows,
            vec![
                status(0, FileUploadState::Uploaded),
                status(1, FileUploadState::Failed("too large".into())),
            ]
        );
    }

    #[tokio::test]
    async fn uploads_sequentially_and_refreshes_once() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        fs::write(&good, b"png").unwrap();
        fs::write(&bad, b"png").unwrap();

        let server = MockServer::start_async().await;
        let good_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/modal")
                .body_includes("filename=\"good.png\"");
            then.status(200).json_body(json!({"success": true, "modal_id": "m-1"}));
        });
        let bad_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/modal")
                .body_includes("filename=\"bad.png\"");
            then.status(200).json_body(json!({"success": false, "error": "unsupported image"}));
        });
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/modals");
            then.status(200).json_body(json!({"modals": [
                {"id": "m-1", "filename": "good.png", "upload_date": "2025-03-07T09:05:00"}
            ]}));
        });

        let config = AppConfig::from_values(Some(&server.base_url()), None).unwrap();
        let uploader = ModalUploader::new(ApiClient::new(config).unwrap());
        let files = vec![
            FileProcessor::describe(&good).unwrap(),
            FileProcessor::describe(&bad).unwrap(),
        ];
        let (sender, receiver) = channel();

        let modals = uploader.upload_all(files, &sender).await.unwrap();
        let statuses: Vec<FileStatus> = receiver.try_iter().collect();

        good_mock.assert();
        bad_mock.assert();
        list_mock.assert_hits(1);
        assert_eq!(modals.len(), 1);
        assert_eq!(
            statuses,
            vec![
                FileStatus { index: 0, name: "good.png".into(), state: FileUploadState::Uploading },
                FileStatus { index: 0, name: "good.png".into(), state: FileUploadState::Uploaded },
                FileStatus { index: 1, name: "bad.png".into(), state: FileUploadState::Uploading },
                FileStatus {
                    index: 1,
                    name: "bad.png".into(),
                    state: FileUploadState::Failed(
                        "Uploading \"bad.png\" failed: unsupported image".into()
                    ),
                },
            ]
        );
    }
}
