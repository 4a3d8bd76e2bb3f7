//! Registry of past uploads: client-side filtering, summary counts, and CSV
//! export of the filtered view.

use crate::api::{UploadRecord, UploadStatus};
use crate::utils::date::format_timestamp;
use chrono::NaiveDate;

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Campaign name",
    "YouTube URL",
    "Status",
    "Upload date",
    "Ad group",
    "Metrics",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(UploadStatus),
}

impl StatusFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All statuses",
            Self::Only(status) => status.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryFilter {
    pub status: StatusFilter,
    pub search: String,
}

impl RegistryFilter {
    pub fn matches(&self, record: &UploadRecord) -> bool {
        let status_ok = match &self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => &record.status == status,
        };
        if !status_ok {
            return false;
        }

        let needle = self.search.to_lowercase();
        needle.is_empty()
            || record.campaign_name.to_lowercase().contains(&needle)
            || record.youtube_url.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, records: &'a [UploadRecord]) -> Vec<&'a UploadRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All || !self.search.is_empty()
    }
}

/// Always computed over the full list, whatever the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub banned: usize,
    pub limited: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[UploadRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut counts, record| {
                match record.status {
                    UploadStatus::Active => counts.active += 1,
                    UploadStatus::Banned => counts.banned += 1,
                    UploadStatus::Limited => counts.limited += 1,
                    UploadStatus::Other(_) => {}
                }
                counts
            },
        )
    }
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| escape_csv_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes the given records (normally the filtered view) with a fixed
/// column order. Fields containing delimiters or quotes are quoted.
pub fn export_csv(records: &[&UploadRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(csv_row(CSV_HEADER));

    for record in records {
        let metrics = record
            .metrics
            .as_ref()
            .map(|metrics| metrics.to_string())
            .unwrap_or_default();
        lines.push(csv_row([
            record.id.as_str(),
            record.campaign_name.as_str(),
            record.youtube_url.as_str(),
            record.status.as_str(),
            format_timestamp(&record.upload_date).as_str(),
            record.ad_group.as_deref().unwrap_or(""),
            metrics.as_str(),
        ]));
    }

    lines.join("\n")
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("creative_registry_{}.csv", today.format("%Y-%m-%d"))
}
