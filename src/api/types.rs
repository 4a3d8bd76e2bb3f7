use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle status of an uploaded creative. Statuses the client does not know
/// are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UploadStatus {
    Active,
    Banned,
    Limited,
    Other(String),
}

impl UploadStatus {
    pub const KNOWN: [UploadStatus; 3] = [Self::Active, Self::Banned, Self::Limited];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
            Self::Limited => "limited",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Banned => "Banned",
            Self::Limited => "Limited",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for UploadStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Self::Active,
            "banned" => Self::Banned,
            "limited" => Self::Limited,
            _ => Self::Other(value),
        }
    }
}

impl From<UploadStatus> for String {
    fn from(status: UploadStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub campaign_name: String,
    pub youtube_url: String,
    pub status: UploadStatus,
    pub upload_date: String,
    #[serde(default)]
    pub ad_group: Option<String>,
    /// Opaque to the client; only ever serialized back out.
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub aggressiveness: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalAsset {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub upload_date: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// One element of an upload result set. A single source video may expand into
/// several of these, one per generated format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub copy_number: Option<u32>,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// Counters reported by the batch endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadTotals {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Normalized answer of either upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadReport {
    pub upload_id: Option<String>,
    pub outcomes: Vec<UploadOutcome>,
    pub totals: UploadTotals,
    /// Set when the backend flagged the whole upload as unsuccessful but
    /// still returned per-video results.
    pub rejection: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct IntegrationState {
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub authorized: bool,
}

pub type IntegrationStatuses = HashMap<String, IntegrationState>;

/// Stored credentials keyed by provider slug, then by field name.
pub type StoredSettings = HashMap<String, HashMap<String, serde_json::Value>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SetupResponse {
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TestResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModalList {
    #[serde(default)]
    pub modals: Vec<ModalAsset>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadList {
    #[serde(default)]
    pub uploads: Vec<UploadRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateList {
    #[serde(default)]
    pub templates: Vec<Template>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusList {
    #[serde(default)]
    pub integrations: IntegrationStatuses,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsList {
    #[serde(default)]
    pub settings: StoredSettings,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SingleUploadResponse {
    #[serde(default)]
    pub upload_id: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub videos: Vec<UploadOutcome>,
    #[serde(default)]
    pub results: Vec<UploadOutcome>,
}

impl SingleUploadResponse {
    pub fn into_report(self) -> UploadReport {
        let outcomes = if !self.videos.is_empty() || !self.results.is_empty() {
            self.videos.into_iter().chain(self.results).collect()
        } else {
            vec![UploadOutcome {
                success: true,
                video_title: self.video_title,
                youtube_url: self.youtube_url,
                ..UploadOutcome::default()
            }]
        };
        let successful = outcomes.iter().filter(|outcome| outcome.success).count();

        UploadReport {
            upload_id: self.upload_id,
            rejection: None,
            totals: UploadTotals {
                total: outcomes.len(),
                successful,
                failed: outcomes.len() - successful,
            },
            outcomes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchUploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_videos: Option<usize>,
    #[serde(default)]
    pub successful_uploads: Option<usize>,
    #[serde(default)]
    pub failed_uploads: Option<usize>,
    #[serde(default)]
    pub results: Vec<UploadOutcome>,
}

impl BatchUploadResponse {
    pub fn into_report(self) -> UploadReport {
        let counted_successes = self.results.iter().filter(|outcome| outcome.success).count();
        let successful = self.successful_uploads.unwrap_or(counted_successes);
        let failed = self
            .failed_uploads
            .unwrap_or(self.results.len() - counted_successes);

        let error = self.error;
        let rejection = (!self.success).then(|| {
            error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| "the upload was not successful".to_string())
        });

        UploadReport {
            upload_id: None,
            rejection,
            totals: UploadTotals {
                total: self.total_videos.unwrap_or(successful + failed),
                successful,
                failed,
            },
            outcomes: self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_is_preserved() {
        let record: UploadRecord = serde_json::from_value(json!({
            "id": "u1",
            "campaign_name": "Spring",
            "youtube_url": "https://youtube.com/watch?v=abc",
            "status": "under_review",
            "upload_date": "2025-03-01T10:00:00"
        }))
        .unwrap();

        assert_eq!(record.status, UploadStatus::Other("under_review".into()));
        assert_eq!(record.ad_group, None);
        assert_eq!(
            serde_json::to_value(&record.status).unwrap(),
            json!("under_review")
        );
    }

    #[test]
    fn plain_single_response_becomes_one_outcome() {
        let response: SingleUploadResponse = serde_json::from_value(json!({
            "success": true,
            "upload_id": "up-1",
            "video_title": "Spring 01-03-25",
            "youtube_url": "https://youtube.com/watch?v=abc"
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.upload_id.as_deref(), Some("up-1"));
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].success);
        assert_eq!(report.totals, UploadTotals { total: 1, successful: 1, failed: 0 });
    }

    #[test]
    fn format_expansion_keeps_every_variant() {
        let response: SingleUploadResponse = serde_json::from_value(json!({
            "success": true,
            "videos": [
                {"success": true, "video_title": "A 16:9", "youtube_url": "https://y/1", "group_name": "A"},
                {"success": false, "video_title": "A 9:16", "error": "quota", "group_name": "A"}
            ]
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.totals, UploadTotals { total: 2, successful: 1, failed: 1 });
    }

    #[test]
    fn batch_totals_prefer_backend_counters() {
        let response: BatchUploadResponse = serde_json::from_value(json!({
            "success": true,
            "total_videos": 3,
            "successful_uploads": 2,
            "failed_uploads": 1,
            "results": [{"success": true, "youtube_url": "https://y/1"}]
        }))
        .unwrap();

        assert_eq!(
            response.into_report().totals,
            UploadTotals { total: 3, successful: 2, failed: 1 }
        );
    }

    #[test]
    fn unsuccessful_batch_keeps_results_and_reason() {
        let response: BatchUploadResponse = serde_json::from_value(json!({
            "success": false,
            "error": "YouTube quota exceeded",
            "results": [{"success": false, "video_title": "a", "error": "quota"}]
        }))
        .unwrap();

        let report = response.into_report();
        assert_eq!(report.rejection.as_deref(), Some("YouTube quota exceeded"));
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.totals, UploadTotals { total: 1, successful: 0, failed: 1 });

        let accepted: BatchUploadResponse =
            serde_json::from_value(json!({"success": true, "results": []})).unwrap();
        assert_eq!(accepted.into_report().rejection, None);
    }
}
