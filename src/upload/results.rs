//! Grouping of upload outcomes for display.
//!
//! Successful outcomes are clustered by group key in order of first
//! appearance; failures are listed flat. The transform is pure, so the same
//! input always yields the same summary.

use crate::api::{UploadOutcome, UploadReport, UploadTotals};

pub const UNTITLED: &str = "Untitled video";
pub const UNKNOWN_GROUP: &str = "Ungrouped";
pub const MISSING_URL_ERROR: &str = "backend reported success without a YouTube URL";
pub const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOutcome {
    Uploaded { title: String, youtube_url: String },
    Failed { title: String, error: String },
}

/// Applies the outcome invariants: a success always has a link and a failure
/// always has an error text.
pub fn resolve(outcome: &UploadOutcome) -> ResolvedOutcome {
    let title = outcome
        .video_title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();
    let url = outcome
        .youtube_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    match (outcome.success, url) {
        (true, Some(url)) => ResolvedOutcome::Uploaded {
            title,
            youtube_url: url.to_string(),
        },
        (true, None) => ResolvedOutcome::Failed {
            title,
            error: MISSING_URL_ERROR.to_string(),
        },
        (false, _) => ResolvedOutcome::Failed {
            title,
            error: outcome
                .error
                .as_deref()
                .map(str::trim)
                .filter(|error| !error.is_empty())
                .unwrap_or(UNKNOWN_ERROR)
                .to_string(),
        },
    }
}

/// What successful outcomes are clustered by. Backend names and copy
/// numbers never collide, even when a name reads like a copy label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Named(String),
    Copy(u32),
    Unknown,
}

impl GroupKey {
    /// `group_name`, else `copy_number`, else the shared fallback. Never
    /// drops an outcome.
    pub fn of(outcome: &UploadOutcome) -> Self {
        if let Some(name) = outcome
            .group_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            return Self::Named(name.to_string());
        }
        match outcome.copy_number {
            Some(copy) => Self::Copy(copy),
            None => Self::Unknown,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Copy(copy) => format!("Copy {}", copy),
            Self::Unknown => UNKNOWN_GROUP.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedVideo {
    pub title: String,
    pub youtube_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedVideo {
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeGroup {
    pub key: GroupKey,
    pub label: String,
    pub videos: Vec<UploadedVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub groups: Vec<OutcomeGroup>,
    pub failures: Vec<FailedVideo>,
    pub totals: UploadTotals,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[UploadOutcome]) -> Self {
        let mut groups: Vec<OutcomeGroup> = Vec::new();
        let mut failures = Vec::new();

        for outcome in outcomes {
            match resolve(outcome) {
                ResolvedOutcome::Uploaded { title, youtube_url } => {
                    let key = GroupKey::of(outcome);
                    let video = UploadedVideo { title, youtube_url };
                    match groups.iter_mut().find(|group| group.key == key) {
                        Some(group) => group.videos.push(video),
                        None => groups.push(OutcomeGroup {
                            label: key.label(),
                            key,
                            videos: vec![video],
                        }),
                    }
                }
                ResolvedOutcome::Failed { title, error } => {
                    failures.push(FailedVideo { title, error });
                }
            }
        }

        let successful = groups.iter().map(|group| group.videos.len()).sum();
        Self {
            totals: UploadTotals {
                total: outcomes.len(),
                successful,
                failed: failures.len(),
            },
            groups,
            failures,
        }
    }

    /// Uses the counters the backend reported, which may cover videos that
    /// produced no outcome entry.
    pub fn from_report(report: &UploadReport) -> Self {
        let mut summary = Self::from_outcomes(&report.outcomes);
        if report.totals.total > 0 {
            summary.totals = report.totals;
        }
        summary
    }

    /// A lone group starts open; with several, all start collapsed.
    pub fn expanded_by_default(&self) -> bool {
        self.groups.len() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.failures.is_empty()
    }
}
