//! HTTP client for the campaign backend.
//!
//! Every call resolves its path against the configured base URL and goes
//! through the same `{ success, error }` envelope handling.

mod error;
mod types;

pub use error::ApiError;
pub use types::{
    IntegrationStatuses, ModalAsset, SetupResponse, StoredSettings, Template, TestResponse,
    UploadOutcome, UploadRecord, UploadReport, UploadStatus, UploadTotals,
};

use crate::config::AppConfig;
use crate::integrations::{Credentials, Provider};
use crate::upload::{FileProcessor, UploadEndpoint, UploadRequest, VideoPayload};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::path::Path;
use types::{
    BatchUploadResponse, Envelope, ModalList, SettingsList, SingleUploadResponse, StatusList,
    TemplateList, UploadList,
};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config
            .api_base_url
            .join(path)
            .map_err(|err| ApiError::Endpoint {
                path: path.to_string(),
                reason: err.to_string(),
            })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    pub async fn list_modals(&self) -> Result<Vec<ModalAsset>, ApiError> {
        let list: ModalList = self.get("modals").await?;
        Ok(list.modals)
    }

    pub async fn list_uploads(&self) -> Result<Vec<UploadRecord>, ApiError> {
        let list: UploadList = self.get("uploads").await?;
        Ok(list.uploads)
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        let list: TemplateList = self.get("templates").await?;
        Ok(list.templates)
    }

    /// Fetches uploads and templates concurrently; fails if either fails.
    pub async fn load_registry(&self) -> Result<(Vec<UploadRecord>, Vec<Template>), ApiError> {
        tokio::try_join!(self.list_uploads(), self.list_templates())
    }

    pub async fn upload_modal(&self, path: &Path) -> Result<(), ApiError> {
        let form = Form::new().part("image", file_part(path).await?);
        let url = self.url("upload/modal")?;
        tracing::debug!(%url, file = %path.display(), "uploading overlay image");

        let response = self.http.post(url).multipart(form).send().await?;
        read_envelope::<serde_json::Value>(response).await.map(|_| ())
    }

    /// Sends a validated upload to the single or batch endpoint and
    /// normalizes either answer into an [`UploadReport`].
    pub async fn upload_videos(&self, request: &UploadRequest) -> Result<UploadReport, ApiError> {
        let endpoint = request.endpoint();
        let mut form = Form::new();
        for (name, value) in request.text_fields() {
            form = form.text(name, value);
        }
        match &request.payload {
            VideoPayload::DriveUrls(urls) => {
                form = form.text("drive_urls", serde_json::to_string(urls)?);
            }
            VideoPayload::Files(paths) => {
                for path in paths {
                    form = form.part(endpoint.file_field(), file_part(path).await?);
                }
            }
        }

        let url = self.url(endpoint.path())?;
        tracing::info!(%url, ?endpoint, "sending video upload");
        let response = self.http.post(url).multipart(form).send().await?;

        match endpoint {
            UploadEndpoint::Single => {
                let body: SingleUploadResponse = read_envelope(response).await?;
                Ok(body.into_report())
            }
            UploadEndpoint::Batch => {
                let body: BatchUploadResponse = read_batch(response).await?;
                Ok(body.into_report())
            }
        }
    }

    pub async fn setup_integration(
        &self,
        credentials: &Credentials,
    ) -> Result<SetupResponse, ApiError> {
        let provider = credentials.provider();
        let redirect_uri = provider
            .uses_redirect_uri()
            .then(|| self.config.redirect_uri(provider.slug()));
        let url = self.url(&format!("integrations/{}/setup", provider.slug()))?;
        tracing::info!(provider = provider.slug(), "saving integration credentials");

        let response = self
            .http
            .post(url)
            .form(&credentials.form_fields(redirect_uri))
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn test_integration(&self, provider: Provider) -> Result<TestResponse, ApiError> {
        let url = self.url(&format!("integrations/{}/test", provider.slug()))?;
        tracing::info!(provider = provider.slug(), "testing integration");

        let response = self.http.post(url).send().await?;
        read_envelope(response).await
    }

    pub async fn integration_status(&self) -> Result<IntegrationStatuses, ApiError> {
        let list: StatusList = self.get("integrations/status").await?;
        Ok(list.integrations)
    }

    pub async fn integration_settings(&self) -> Result<StoredSettings, ApiError> {
        let list: SettingsList = self.get("integrations/settings").await?;
        Ok(list.settings)
    }
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(FileProcessor::mime_type(path))?)
}

/// Reads the body, turning a non-2xx status into `Rejected` when the backend
/// explained itself and `Status` otherwise.
async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    tracing::warn!(%status, "backend returned an error status");
    match serde_json::from_str::<Envelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error)
    {
        Some(message) => Err(ApiError::Rejected(message)),
        None => Err(ApiError::Status { status, body }),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = read_body(response).await?;
    Ok(serde_json::from_str(&body)?)
}

fn rejection(envelope: Envelope) -> ApiError {
    ApiError::Rejected(
        envelope
            .error
            .unwrap_or_else(|| "the request was not successful".to_string()),
    )
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = read_body(response).await?;
    let envelope: Envelope = serde_json::from_str(&body)?;
    if !envelope.success {
        return Err(rejection(envelope));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Like [`read_envelope`], but a batch with per-video results is a report even
/// when the backend flags the batch as unsuccessful.
async fn read_batch(response: Response) -> Result<BatchUploadResponse, ApiError> {
    let body = read_body(response).await?;
    let envelope: Envelope = serde_json::from_str(&body)?;
    let batch: BatchUploadResponse = serde_json::from_str(&body)?;
    if !envelope.success && batch.results.is_empty() {
        return Err(rejection(envelope));
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::types::IntegrationState;
    use super::*;
    use crate::upload::{ThumbnailOption, VideoSource};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn client_for(server: &MockServer) -> ApiClient {
        let config = AppConfig::from_values(Some(&server.base_url()), None).unwrap();
        ApiClient::new(config).unwrap()
    }

    fn upload_request(payload: VideoPayload) -> UploadRequest {
        UploadRequest {
            campaign_name: "Spring".into(),
            video_source: match payload {
                VideoPayload::Files(_) => VideoSource::Local,
                VideoPayload::DriveUrls(_) => VideoSource::Drive,
            },
            thumbnail_option: ThumbnailOption::FirstFrame,
            modal_image_id: None,
            create_formats: true,
            payload,
        }
    }

    fn write_video(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"fake video").unwrap();
        path
    }

    #[tokio::test]
    async fn lists_modals() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/modals");
            then.status(200).json_body(json!({
                "modals": [{"id": "m-1", "filename": "soft.png", "upload_date": "2025-03-01T10:00:00", "file_size": 2048}]
            }));
        });

        let modals = client_for(&server).list_modals().await.unwrap();

        mock.assert();
        assert_eq!(modals.len(), 1);
        assert_eq!(modals[0].filename, "soft.png");
        assert_eq!(modals[0].file_size, Some(2048));
    }

    #[tokio::test]
    async fn registry_needs_both_lists() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/uploads");
            then.status(200).json_body(json!({"uploads": [{
                "id": "u1", "campaign_name": "Spring", "youtube_url": "https://y/1",
                "status": "active", "upload_date": "2025-03-01T10:00:00"
            }]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/templates");
            then.status(200).json_body(json!({"templates": [{
                "id": "t1", "style": "bold", "language": "en", "background": "dark",
                "aggressiveness": "low", "category": "games", "characteristics": ["fast"]
            }]}));
        });

        let (uploads, templates) = client_for(&server).load_registry().await.unwrap();
        assert_eq!(uploads[0].status, UploadStatus::Active);
        assert_eq!(templates[0].characteristics, vec!["fast".to_string()]);
    }

    #[tokio::test]
    async fn registry_fails_when_one_list_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/uploads");
            then.status(200).json_body(json!({"uploads": []}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/templates");
            then.status(503).body("unavailable");
        });

        let err = client_for(&server).load_registry().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn single_file_goes_to_single_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path(), "clip.mp4");
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/video")
                .body_includes("name=\"video_file\"")
                .body_includes("name=\"create_formats\"");
            then.status(200).json_body(json!({
                "success": true,
                "upload_id": "up-1",
                "video_title": "Spring 01.03.25",
                "youtube_url": "https://youtube.com/watch?v=abc"
            }));
        });

        let report = client_for(&server)
            .upload_videos(&upload_request(VideoPayload::Files(vec![video])))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(report.upload_id.as_deref(), Some("up-1"));
        assert_eq!(report.outcomes.len(), 1);
    }

    #[tokio::test]
    async fn several_files_go_to_batch_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_video(dir.path(), "a.mp4"), write_video(dir.path(), "b.mp4")];
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/videos")
                .body_includes("name=\"video_files\"; filename=\"a.mp4\"")
                .body_includes("name=\"video_files\"; filename=\"b.mp4\"");
            then.status(200).json_body(json!({
                "success": true,
                "total_videos": 2,
                "successful_uploads": 1,
                "failed_uploads": 1,
                "results": [
                    {"success": true, "video_title": "a", "youtube_url": "https://y/a", "group_name": "a"},
                    {"success": false, "video_title": "b", "error": "quota exceeded"}
                ]
            }));
        });

        let report = client_for(&server)
            .upload_videos(&upload_request(VideoPayload::Files(files)))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(report.totals, UploadTotals { total: 2, successful: 1, failed: 1 });
        assert_eq!(report.outcomes[1].error.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn unsuccessful_batch_with_results_is_a_rejected_report() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_video(dir.path(), "a.mp4"), write_video(dir.path(), "b.mp4")];
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/upload/videos");
            then.status(200).json_body(json!({
                "success": false,
                "error": "YouTube quota exceeded",
                "results": [
                    {"success": false, "video_title": "a", "error": "quota exceeded"},
                    {"success": false, "video_title": "b", "error": "quota exceeded"}
                ]
            }));
        });
        let request = upload_request(VideoPayload::Files(files));

        let report = client_for(&server).upload_videos(&request).await.unwrap();

        mock.assert();
        assert_eq!(report.rejection.as_deref(), Some("YouTube quota exceeded"));
        assert_eq!(report.totals, UploadTotals { total: 2, successful: 0, failed: 2 });

        let mut form = crate::upload::UploadForm::default();
        form.state.campaign_name = request.campaign_name.clone();
        form.state.add_files(
            dir.path()
                .read_dir()
                .unwrap()
                .filter_map(|entry| FileProcessor::describe(&entry.unwrap().path()))
                .collect(),
        );
        form.begin_submit().unwrap();
        form.complete(report);
        assert_eq!(form.state.video_files.len(), 2);
        assert_eq!(form.state.campaign_name, request.campaign_name);
    }

    #[tokio::test]
    async fn unsuccessful_batch_without_results_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_video(dir.path(), "a.mp4"), write_video(dir.path(), "b.mp4")];
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/upload/videos");
            then.status(200)
                .json_body(json!({"success": false, "error": "campaign is archived"}));
        });

        let err = client_for(&server)
            .upload_videos(&upload_request(VideoPayload::Files(files)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Rejected(message) if message == "campaign is archived"));
    }

    #[tokio::test]
    async fn drive_links_are_sent_as_json_array() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/video")
                .body_includes(r#"["https://drive.google.com/file/d/1","https://drive.google.com/file/d/2"]"#)
                .body_includes("drive");
            then.status(200).json_body(json!({"success": true, "youtube_url": "https://y/1"}));
        });

        let urls = crate::upload::parse_drive_urls(
            "https://drive.google.com/file/d/1\n\nhttps://drive.google.com/file/d/2",
        );
        client_for(&server)
            .upload_videos(&upload_request(VideoPayload::DriveUrls(urls)))
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn unsuccessful_upload_surfaces_backend_text() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path(), "clip.mp4");
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/upload/video");
            then.status(500).json_body(json!({"success": false, "error": "YouTube credentials are not configured"}));
        });

        let err = client_for(&server)
            .upload_videos(&upload_request(VideoPayload::Files(vec![video])))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "YouTube credentials are not configured");
    }

    #[tokio::test]
    async fn missing_file_never_reaches_the_server() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/upload/video");
            then.status(200).json_body(json!({"success": true}));
        });

        let err = client_for(&server)
            .upload_videos(&upload_request(VideoPayload::Files(vec![PathBuf::from("/no/such/file.mp4")])))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::File { .. }));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn modal_upload_uses_image_field() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("overlay.png");
        std::fs::write(&image, b"png").unwrap();
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/modal")
                .body_includes("name=\"image\"; filename=\"overlay.png\"");
            then.status(200).json_body(json!({"success": true, "modal_id": "m-9"}));
        });

        client_for(&server).upload_modal(&image).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn setup_posts_credentials_with_redirect() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/integrations/youtube/setup")
                .form_urlencoded_tuple("client_id", "id")
                .form_urlencoded_tuple("client_secret", "secret")
                .form_urlencoded_tuple_exists("redirect_uri");
            then.status(200).json_body(json!({
                "success": true,
                "auth_url": "https://accounts.google.com/o/oauth2/auth?x=1"
            }));
        });

        let response = client_for(&server)
            .setup_integration(&Credentials::OAuthClient {
                provider: Provider::YouTube,
                client_id: "id".into(),
                client_secret: "secret".into(),
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(
            response.auth_url.as_deref(),
            Some("https://accounts.google.com/o/oauth2/auth?x=1")
        );
    }

    #[tokio::test]
    async fn failed_connection_test_is_rejected() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/integrations/telegram/test");
            then.status(200).json_body(json!({"success": false, "error": "Telegram bot is not configured"}));
        });

        let err = client_for(&server)
            .test_integration(Provider::Telegram)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Telegram test"), "Telegram test failed: Telegram bot is not configured");
    }

    #[tokio::test]
    async fn reads_integration_status_and_settings() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/integrations/status");
            then.status(200).json_body(json!({
                "integrations": {"youtube": {"configured": true, "authorized": false}}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/integrations/settings");
            then.status(200).json_body(json!({
                "settings": {"telegram": {"bot_token": "tok", "chat_id": "42"}}
            }));
        });

        let client = client_for(&server);
        let status = client.integration_status().await.unwrap();
        let settings = client.integration_settings().await.unwrap();

        assert_eq!(
            status.get("youtube"),
            Some(&IntegrationState { configured: true, authorized: false })
        );
        assert_eq!(settings["telegram"]["chat_id"], json!("42"));
    }
}
