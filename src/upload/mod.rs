mod file_processor;
mod form;
mod results;
mod types;

pub use file_processor::{FileProcessor, MediaKind};
pub use form::{parse_drive_urls, video_title_preview, FormPhase, UploadForm};
pub use results::BatchSummary;
pub use types::{
    SelectedFile, ThumbnailOption, UploadEndpoint, UploadRequest, VideoPayload, VideoSource,
};
