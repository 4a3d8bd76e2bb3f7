use crate::api::UploadReport;
use crate::upload::results::BatchSummary;
use crate::upload::types::{
    SelectedFile, ThumbnailOption, UploadRequest, VideoPayload, VideoSource,
};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Enter a campaign name")]
    MissingCampaignName,
    #[error("Select at least one video file")]
    NoVideoFiles,
    #[error("Enter at least one Google Drive link")]
    MissingDriveUrls,
    #[error("Select an overlay image for the thumbnail")]
    MissingModal,
    #[error("An upload is already in progress")]
    InFlight,
}

/// Draft of one upload. Reset to defaults after a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFormState {
    pub campaign_name: String,
    pub video_source: VideoSource,
    pub video_files: Vec<SelectedFile>,
    /// One link per line.
    pub drive_urls: String,
    pub thumbnail_option: ThumbnailOption,
    pub modal_image_id: Option<String>,
    pub create_formats: bool,
}

impl UploadFormState {
    pub fn validate(&self) -> Result<UploadRequest, FormError> {
        let campaign_name = self.campaign_name.trim();
        if campaign_name.is_empty() {
            return Err(FormError::MissingCampaignName);
        }

        let payload = match self.video_source {
            VideoSource::Local => {
                if self.video_files.is_empty() {
                    return Err(FormError::NoVideoFiles);
                }
                VideoPayload::Files(self.video_files.iter().map(|f| f.path.clone()).collect())
            }
            VideoSource::Drive => {
                if self.drive_urls.trim().is_empty() {
                    return Err(FormError::MissingDriveUrls);
                }
                VideoPayload::DriveUrls(parse_drive_urls(&self.drive_urls))
            }
        };

        let modal_image_id = match self.thumbnail_option {
            ThumbnailOption::SoftModal => match &self.modal_image_id {
                Some(id) if !id.is_empty() => Some(id.clone()),
                _ => return Err(FormError::MissingModal),
            },
            _ => None,
        };

        Ok(UploadRequest {
            campaign_name: campaign_name.to_string(),
            video_source: self.video_source,
            thumbnail_option: self.thumbnail_option,
            modal_image_id,
            create_formats: self.create_formats,
            payload,
        })
    }

    /// Adds files that are not already selected. Returns how many were new.
    pub fn add_files(&mut self, files: Vec<SelectedFile>) -> usize {
        let before = self.video_files.len();
        for file in files {
            if !self.video_files.iter().any(|existing| existing.path == file.path) {
                self.video_files.push(file);
            }
        }
        self.video_files.len() - before
    }

    pub fn remove_file(&mut self, index: usize) {
        if index < self.video_files.len() {
            self.video_files.remove(index);
        }
    }

    pub fn total_file_size(&self) -> u64 {
        self.video_files.iter().map(|f| f.size).sum()
    }
}

/// Trimmed, non-empty lines of the Drive links box.
pub fn parse_drive_urls(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title the backend gives an uploaded video: campaign name plus `dd.mm.yy`.
pub fn video_title_preview(campaign_name: &str, today: NaiveDate) -> String {
    let name = match campaign_name.trim() {
        "" => "Campaign name",
        name => name,
    };
    format!("{} {}", name, today.format("%d.%m.%y"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Succeeded(BatchSummary),
    /// The backend flagged the upload as failed but still reported
    /// per-video results.
    Rejected {
        summary: BatchSummary,
        message: String,
    },
    Failed(String),
}

/// Upload form controller. Validation guards the `Editing -> Submitting`
/// transition, and only one submission can be outstanding.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub state: UploadFormState,
    phase: FormPhase,
    last_upload_id: Option<String>,
}

impl UploadForm {
    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn last_upload_id(&self) -> Option<&str> {
        self.last_upload_id.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    /// Validates the draft and moves to `Submitting`. On error the phase is
    /// left untouched and no request should be sent.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, FormError> {
        if self.is_submitting() {
            return Err(FormError::InFlight);
        }
        let request = self.state.validate()?;
        tracing::info!(
            campaign = %request.campaign_name,
            endpoint = ?request.endpoint(),
            "submitting upload"
        );
        self.phase = FormPhase::Submitting;
        Ok(request)
    }

    /// Records the backend's answer. The draft is reset only when the
    /// backend accepted the upload; a rejected report keeps it for a retry.
    pub fn complete(&mut self, report: UploadReport) {
        let summary = BatchSummary::from_report(&report);
        self.last_upload_id = report.upload_id;
        self.phase = match report.rejection {
            Some(message) => FormPhase::Rejected { summary, message },
            None => {
                self.state = UploadFormState::default();
                FormPhase::Succeeded(summary)
            }
        };
    }

    /// Keeps the draft so the user can retry.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.phase = FormPhase::Failed(message.into());
    }

    /// Leaves a finished phase when the user edits the draft again.
    pub fn acknowledge(&mut self) {
        if matches!(self.phase, FormPhase::Failed(_) | FormPhase::Rejected { .. }) {
            self.phase = FormPhase::Editing;
        }
    }
}
