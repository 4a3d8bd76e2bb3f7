mod state;
mod ui;

use crate::api::{ApiClient, UploadReport};
use crate::integrations::{AuthLinkHandling, Provider, ProviderAction};
use crate::modals::{record_status, select_images, FileUploadState, ModalUploader};
use crate::registry::{export_csv, export_file_name};
use crate::upload::{FileProcessor, MediaKind};
use chrono::Local;
use eframe::{egui, App};
use rfd::FileDialog;
use state::{
    AppEvent, ModalListTarget, Notifications, OverlayView, RegistryView, SettingsView, Tab,
    UploadView,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

pub struct CreativeManager {
    runtime: Runtime,
    client: ApiClient,
    sender: std_mpsc::Sender<AppEvent>,
    receiver: std_mpsc::Receiver<AppEvent>,
    active_tab: Tab,
    mounted_tab: Option<Tab>,
    notifications: Notifications,
    upload: UploadView,
    registry: RegistryView,
    overlays: OverlayView,
    settings: SettingsView,
}

impl CreativeManager {
    pub fn new(_cc: &eframe::CreationContext<'_>, client: ApiClient, runtime: Runtime) -> Self {
        tracing::info!(api = %client.config().api_base_url, "starting creative manager");
        let (sender, receiver) = std_mpsc::channel();
        Self {
            runtime,
            client,
            sender,
            receiver,
            active_tab: Tab::default(),
            mounted_tab: None,
            notifications: Notifications::default(),
            upload: UploadView::default(),
            registry: RegistryView::default(),
            overlays: OverlayView::default(),
            settings: SettingsView::default(),
        }
    }

    /// Runs `task` on the runtime and posts its event back to the UI thread.
    fn spawn<F>(&self, ctx: &egui::Context, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            sender.send(event).unwrap_or_default();
            ctx.request_repaint();
        });
    }

    /// Each view fetches its data when it becomes the active tab.
    fn mount_active_tab(&mut self, ctx: &egui::Context) {
        if self.mounted_tab == Some(self.active_tab) {
            return;
        }
        self.mounted_tab = Some(self.active_tab);
        tracing::debug!(tab = ?self.active_tab, "tab mounted");

        match self.active_tab {
            Tab::Upload => self.load_modals(ctx, ModalListTarget::UploadForm),
            Tab::Registry => self.load_registry(ctx),
            Tab::Overlays => self.load_modals(ctx, ModalListTarget::Manager),
            Tab::Settings => {
                self.load_integration_status(ctx);
                if !self.settings.settings_loaded {
                    self.load_integration_settings(ctx);
                }
            }
        }
    }

    pub fn load_modals(&mut self, ctx: &egui::Context, target: ModalListTarget) {
        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::ModalsLoaded {
                target,
                result: client.list_modals().await,
            }
        });
    }

    pub fn load_registry(&mut self, ctx: &egui::Context) {
        self.registry.loading = true;
        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::RegistryLoaded(client.load_registry().await)
        });
    }

    pub fn load_integration_status(&mut self, ctx: &egui::Context) {
        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::StatusLoaded(client.integration_status().await)
        });
    }

    pub fn load_integration_settings(&mut self, ctx: &egui::Context) {
        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::SettingsLoaded(client.integration_settings().await)
        });
    }

    pub fn add_video_files(&mut self, paths: Vec<PathBuf>) {
        let (accepted, rejected) = FileProcessor::partition(paths, MediaKind::Video);
        if !rejected.is_empty() {
            self.notifications
                .info(format!("Skipped {} file(s) that are not videos", rejected.len()));
        }
        let added = self.upload.form.state.add_files(accepted);
        if added > 0 {
            self.upload.form.acknowledge();
        }
    }

    pub fn add_video_folder(&mut self, folder: PathBuf) {
        let found = FileProcessor::collect_from_folder(&folder, MediaKind::Video);
        if found.is_empty() {
            self.notifications
                .error(format!("No videos found in {}", folder.display()));
            return;
        }
        let added = self.upload.form.state.add_files(found);
        self.upload.form.acknowledge();
        tracing::info!(folder = %folder.display(), added, "videos added from folder");
    }

    pub fn start_upload(&mut self, ctx: &egui::Context) {
        let request = match self.upload.form.begin_submit() {
            Ok(request) => request,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };

        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::UploadFinished(client.upload_videos(&request).await)
        });
    }

    pub fn upload_overlays(&mut self, ctx: &egui::Context, paths: Vec<PathBuf>) {
        if self.overlays.is_uploading {
            return;
        }
        let (files, rejected) = match select_images(paths) {
            Ok(selection) => selection,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };
        if !rejected.is_empty() {
            self.notifications
                .info(format!("Skipped {} file(s) that are not images", rejected.len()));
        }

        tracing::info!(count = files.len(), "uploading overlays");
        self.overlays.is_uploading = true;
        self.overlays.file_statuses.clear();

        let (status_sender, status_receiver) = std_mpsc::channel();
        self.overlays.status_receiver = Some(status_receiver);

        let uploader = ModalUploader::new(self.client.clone());
        self.spawn(ctx, async move {
            AppEvent::OverlayUploadsFinished(uploader.upload_all(files, &status_sender).await)
        });
    }

    pub fn setup_provider(&mut self, ctx: &egui::Context, provider: Provider) {
        let credentials = match self.settings.forms.credentials(provider) {
            Ok(credentials) => credentials,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };
        if !self.settings.phases.start(provider, ProviderAction::Setup) {
            return;
        }

        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::SetupFinished {
                provider,
                result: client.setup_integration(&credentials).await,
            }
        });
    }

    pub fn test_provider(&mut self, ctx: &egui::Context, provider: Provider) {
        if !self.settings.phases.start(provider, ProviderAction::Test) {
            return;
        }

        let client = self.client.clone();
        self.spawn(ctx, async move {
            AppEvent::TestFinished {
                provider,
                result: client.test_integration(provider).await,
            }
        });
    }

    /// Writes the currently filtered registry rows to a CSV file chosen by
    /// the user.
    pub fn export_registry(&mut self) {
        let records = self.registry.filter.apply(&self.registry.uploads);
        let count = records.len();
        let csv = export_csv(&records);
        let file_name = export_file_name(Local::now().date_naive());

        let Some(path) = FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, csv) {
            Ok(()) => {
                tracing::info!(path = %path.display(), count, "registry exported");
                self.notifications
                    .success(format!("Exported {} record(s) to {}", count, path.display()));
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "registry export failed");
                self.notifications
                    .error(format!("Could not write {}: {}", path.display(), err));
            }
        }
    }

    pub fn copy_to_clipboard(&mut self, ctx: &egui::Context, text: &str) {
        ctx.output_mut(|output| output.copied_text = text.to_string());
        self.notifications.info("Link copied to clipboard");
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: AppEvent) {
        match event {
            AppEvent::ModalsLoaded { target, result } => match result {
                Ok(modals) => {
                    tracing::debug!(?target, count = modals.len(), "overlays loaded");
                    match target {
                        ModalListTarget::UploadForm => {
                            let selected = self.upload.form.state.modal_image_id.clone();
                            if let Some(id) = selected {
                                if !modals.iter().any(|modal| modal.id == id) {
                                    self.upload.form.state.modal_image_id = None;
                                }
                            }
                            self.upload.modals = modals;
                        }
                        ModalListTarget::Manager => self.overlays.modals = modals,
                    }
                }
                Err(err) => self
                    .notifications
                    .error(err.user_message("Loading overlays")),
            },
            AppEvent::UploadFinished(result) => match result {
                Ok(report) => self.finish_upload(report),
                Err(err) => {
                    let message = err.user_message("Upload");
                    tracing::error!(error = %err, "upload failed");
                    self.notifications.error(message.clone());
                    self.upload.form.complete_failure(message);
                }
            },
            AppEvent::RegistryLoaded(result) => {
                self.registry.loading = false;
                match result {
                    Ok((uploads, templates)) => {
                        tracing::debug!(
                            uploads = uploads.len(),
                            templates = templates.len(),
                            "registry loaded"
                        );
                        self.registry.uploads = uploads;
                        self.registry.templates = templates;
                    }
                    Err(err) => self
                        .notifications
                        .error(err.user_message("Loading the registry")),
                }
            }
            AppEvent::OverlayUploadsFinished(result) => {
                self.drain_overlay_statuses();
                self.overlays.is_uploading = false;
                self.overlays.status_receiver = None;
                match result {
                    Ok(modals) => {
                        self.overlays.modals = modals.clone();
                        self.upload.modals = modals;
                    }
                    Err(err) => self
                        .notifications
                        .error(err.user_message("Refreshing overlays")),
                }
            }
            AppEvent::SetupFinished { provider, result } => match result {
                Ok(response) => {
                    let message = response
                        .message
                        .unwrap_or_else(|| format!("{} credentials saved", provider.label()));
                    self.notifications.success(message.clone());
                    self.settings.phases.succeed(provider, message);
                    if let Some(url) = response.auth_url {
                        self.handle_auth_link(provider, url);
                    }
                    self.load_integration_status(ctx);
                }
                Err(err) => {
                    let message = err.user_message(&format!("{} setup", provider.label()));
                    self.notifications.error(message.clone());
                    self.settings.phases.fail(provider, message);
                }
            },
            AppEvent::TestFinished { provider, result } => match result {
                Ok(response) => {
                    let message = response
                        .message
                        .unwrap_or_else(|| format!("{} connection works", provider.label()));
                    self.notifications.success(message.clone());
                    self.settings.phases.succeed(provider, message);
                }
                Err(err) => {
                    let message = err.user_message(&format!("{} test", provider.label()));
                    self.notifications.error(message.clone());
                    self.settings.phases.fail(provider, message);
                }
            },
            AppEvent::StatusLoaded(result) => match result {
                Ok(statuses) => self.settings.statuses = statuses,
                Err(err) => self
                    .notifications
                    .error(err.user_message("Loading integration status")),
            },
            AppEvent::SettingsLoaded(result) => match result {
                Ok(stored) => {
                    self.settings.forms.populate(&stored);
                    self.settings.settings_loaded = true;
                }
                Err(err) => self
                    .notifications
                    .error(err.user_message("Loading saved settings")),
            },
        }
    }

    fn finish_upload(&mut self, report: UploadReport) {
        let totals = report.totals;
        tracing::info!(
            upload_id = ?report.upload_id,
            total = totals.total,
            successful = totals.successful,
            failed = totals.failed,
            rejected = report.rejection.is_some(),
            "upload finished"
        );

        if let Some(reason) = &report.rejection {
            self.notifications
                .error(format!("Upload failed: {}", reason));
        } else if totals.failed == 0 {
            self.notifications
                .success(format!("Uploaded {} video(s) to YouTube", totals.successful));
        } else if totals.successful == 0 {
            self.notifications
                .error(format!("All {} video(s) failed to upload", totals.failed));
        } else {
            self.notifications.info(format!(
                "Uploaded {} of {} video(s), {} failed",
                totals.successful, totals.total, totals.failed
            ));
        }
        self.upload.form.complete(report);
    }

    fn handle_auth_link(&mut self, provider: Provider, url: String) {
        match provider.auth_link_handling() {
            AuthLinkHandling::OpenInBrowser => {
                tracing::info!(provider = provider.slug(), "opening authorization page");
                if let Err(err) = open::that(&url) {
                    tracing::warn!(error = %err, "could not open browser");
                    self.notifications.error(format!(
                        "Could not open the browser, visit this link to authorize {}: {}",
                        provider.label(),
                        url
                    ));
                }
            }
            AuthLinkHandling::ShowCopyableLink => {
                self.notifications.info(format!(
                    "Open the authorization link in the {} section to finish connecting",
                    provider.label()
                ));
                self.settings.drive_auth_link = Some(url);
            }
            AuthLinkHandling::Ignore => {
                tracing::debug!(provider = provider.slug(), "authorization link ignored");
            }
        }
    }

    fn drain_overlay_statuses(&mut self) {
        let Some(receiver) = &self.overlays.status_receiver else {
            return;
        };
        let statuses: Vec<_> = receiver.try_iter().collect();

        for status in statuses {
            match &status.state {
                FileUploadState::Uploading => {}
                FileUploadState::Uploaded => self
                    .notifications
                    .success(format!("Overlay \"{}\" uploaded", status.name)),
                FileUploadState::Failed(message) => self.notifications.error(message.clone()),
            }

            record_status(&mut self.overlays.file_statuses, status);
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.mount_active_tab(ctx);

        while let Ok(event) = self.receiver.try_recv() {
            self.handle_event(ctx, event);
        }

        if self.overlays.is_uploading {
            self.drain_overlay_statuses();
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.notifications.prune(Instant::now());
        if !self.notifications.visible().is_empty() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl App for CreativeManager {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
