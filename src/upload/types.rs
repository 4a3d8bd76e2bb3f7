use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSource {
    #[default]
    Local,
    Drive,
}

impl VideoSource {
    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Drive => "drive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailOption {
    #[default]
    None,
    FirstFrame,
    /// First frame composited with an overlay image by the backend.
    SoftModal,
}

impl ThumbnailOption {
    pub const ALL: [ThumbnailOption; 3] = [Self::None, Self::FirstFrame, Self::SoftModal];

    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FirstFrame => "first_frame",
            Self::SoftModal => "soft_modal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Keep the default thumbnail",
            Self::FirstFrame => "Use the first frame",
            Self::SoftModal => "First frame with an overlay",
        }
    }
}

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEndpoint {
    Single,
    Batch,
}

impl UploadEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Single => "upload/video",
            Self::Batch => "upload/videos",
        }
    }

    /// Multipart field name the backend expects the video bytes under.
    pub fn file_field(self) -> &'static str {
        match self {
            Self::Single => "video_file",
            Self::Batch => "video_files",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPayload {
    Files(Vec<PathBuf>),
    DriveUrls(Vec<String>),
}

/// A validated submission, ready to be turned into a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub campaign_name: String,
    pub video_source: VideoSource,
    pub thumbnail_option: ThumbnailOption,
    pub modal_image_id: Option<String>,
    pub create_formats: bool,
    pub payload: VideoPayload,
}

impl UploadRequest {
    /// More than one local file goes to the batch endpoint; the backend relies
    /// on this split.
    pub fn endpoint(&self) -> UploadEndpoint {
        match &self.payload {
            VideoPayload::Files(files) if files.len() > 1 => UploadEndpoint::Batch,
            _ => UploadEndpoint::Single,
        }
    }

    /// Text parts of the multipart body, in the order they are sent.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("campaign_name", self.campaign_name.clone()),
            ("video_source", self.video_source.as_form_value().to_string()),
            (
                "thumbnail_option",
                self.thumbnail_option.as_form_value().to_string(),
            ),
            ("create_formats", self.create_formats.to_string()),
        ];
        if let Some(modal_id) = &self.modal_image_id {
            fields.push(("modal_image_id", modal_id.clone()));
        }
        fields
    }
}
