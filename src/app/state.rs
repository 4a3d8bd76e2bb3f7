use crate::api::{
    ApiError, IntegrationStatuses, ModalAsset, SetupResponse, StoredSettings, Template,
    TestResponse, UploadRecord, UploadReport,
};
use crate::integrations::{CredentialForms, Provider, ProviderPhases};
use crate::modals::FileStatus;
use crate::registry::RegistryFilter;
use crate::upload::UploadForm;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Upload,
    Registry,
    Overlays,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Upload, Self::Registry, Self::Overlays, Self::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "📤 Upload",
            Self::Registry => "📋 Registry",
            Self::Overlays => "🖼 Overlays",
            Self::Settings => "⚙ Settings",
        }
    }
}

/// Which overlay list a fetch belongs to. The upload form and the overlay
/// manager each keep their own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalListTarget {
    UploadForm,
    Manager,
}

/// Results posted back to the UI thread by background tasks.
pub enum AppEvent {
    ModalsLoaded {
        target: ModalListTarget,
        result: Result<Vec<ModalAsset>, ApiError>,
    },
    UploadFinished(Result<UploadReport, ApiError>),
    RegistryLoaded(Result<(Vec<UploadRecord>, Vec<Template>), ApiError>),
    OverlayUploadsFinished(Result<Vec<ModalAsset>, ApiError>),
    SetupFinished {
        provider: Provider,
        result: Result<SetupResponse, ApiError>,
    },
    TestFinished {
        provider: Provider,
        result: Result<TestResponse, ApiError>,
    },
    StatusLoaded(Result<IntegrationStatuses, ApiError>),
    SettingsLoaded(Result<StoredSettings, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    created: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => tracing::warn!(%message, "notification"),
            _ => tracing::info!(%message, "notification"),
        }
        self.toasts.push(Toast {
            level,
            message,
            created: Instant::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.duration_since(toast.created) < TOAST_LIFETIME);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }
}

#[derive(Default)]
pub struct UploadView {
    pub form: UploadForm,
    pub modals: Vec<ModalAsset>,
}

#[derive(Default)]
pub struct RegistryView {
    pub loading: bool,
    pub uploads: Vec<UploadRecord>,
    pub templates: Vec<Template>,
    pub filter: RegistryFilter,
}

#[derive(Default)]
pub struct OverlayView {
    pub modals: Vec<ModalAsset>,
    pub is_uploading: bool,
    pub file_statuses: Vec<FileStatus>,
    pub show_details: bool,
    pub status_receiver: Option<Receiver<FileStatus>>,
}

#[derive(Default)]
pub struct SettingsView {
    pub forms: CredentialForms,
    pub phases: ProviderPhases,
    pub statuses: IntegrationStatuses,
    /// Drive consent link waiting to be copied by the user.
    pub drive_auth_link: Option<String>,
    pub settings_loaded: bool,
    pub show_secrets: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire() {
        let mut notifications = Notifications::default();
        notifications.success("saved");
        notifications.error("failed");
        assert_eq!(notifications.visible().len(), 2);
        assert_eq!(notifications.visible()[1].level, ToastLevel::Error);

        notifications.prune(Instant::now());
        assert_eq!(notifications.visible().len(), 2);

        notifications.prune(Instant::now() + TOAST_LIFETIME + Duration::from_millis(1));
        assert!(notifications.visible().is_empty());
    }
}
