use super::{drop_hint, muted, ERROR_COLOR, SUCCESS_COLOR};
use crate::app::CreativeManager;
use crate::upload::{
    parse_drive_urls, video_title_preview, BatchSummary, FormPhase, MediaKind, ThumbnailOption,
    VideoSource,
};
use crate::utils::file_size::FileSizeUtils;
use chrono::Local;
use eframe::egui::{self, RichText};
use rfd::FileDialog;

impl CreativeManager {
    pub(super) fn render_upload(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading("Upload videos");
        ui.add_space(10.0);

        let submitting = self.upload.form.is_submitting();
        ui.add_enabled_ui(!submitting, |ui| {
            ui.group(|ui| {
                ui.label("Campaign name");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.upload.form.state.campaign_name)
                        .hint_text("Spring Sale")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.upload.form.acknowledge();
                }
                let preview = video_title_preview(
                    &self.upload.form.state.campaign_name,
                    Local::now().date_naive(),
                );
                muted(ui, format!("Video title: {}", preview));
            });

            ui.add_space(10.0);
            ui.group(|ui| {
                ui.label("Video source");
                ui.horizontal(|ui| {
                    let source = &mut self.upload.form.state.video_source;
                    ui.radio_value(source, VideoSource::Local, "Local files");
                    ui.radio_value(source, VideoSource::Drive, "Google Drive links");
                });
                ui.add_space(6.0);
                match self.upload.form.state.video_source {
                    VideoSource::Local => self.render_local_files(ui),
                    VideoSource::Drive => self.render_drive_links(ui),
                }
            });

            ui.add_space(10.0);
            ui.group(|ui| {
                ui.label("Thumbnail");
                for option in ThumbnailOption::ALL {
                    ui.radio_value(
                        &mut self.upload.form.state.thumbnail_option,
                        option,
                        option.label(),
                    );
                }
                if self.upload.form.state.thumbnail_option == ThumbnailOption::SoftModal {
                    ui.add_space(4.0);
                    self.render_modal_select(ui);
                }
            });

            ui.add_space(10.0);
            ui.checkbox(
                &mut self.upload.form.state.create_formats,
                "Also create format copies of every video",
            );
        });

        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            let label = if submitting {
                "⏳ Uploading..."
            } else {
                "📤 Upload to YouTube"
            };
            let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(self.upload.form.can_submit(), button).clicked() {
                self.start_upload(ctx);
            }
            if submitting {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    muted(ui, "Uploading to YouTube, this can take several minutes");
                });
            }
        });

        ui.add_space(16.0);
        let mut copied = None;
        match self.upload.form.phase() {
            FormPhase::Succeeded(summary) => {
                copied = render_summary(ui, summary, self.upload.form.last_upload_id());
            }
            FormPhase::Rejected { summary, message } => {
                ui.colored_label(ERROR_COLOR, format!("Upload failed: {}", message));
                muted(ui, "Your selection was kept so you can try again");
                ui.add_space(6.0);
                copied = render_summary(ui, summary, self.upload.form.last_upload_id());
            }
            FormPhase::Failed(message) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            FormPhase::Editing | FormPhase::Submitting => {}
        }
        if let Some(link) = copied {
            self.copy_to_clipboard(ctx, &link);
        }
    }

    fn render_local_files(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("🎬 Add videos").clicked() {
                if let Some(paths) = FileDialog::new()
                    .add_filter("Videos", MediaKind::Video.extensions())
                    .pick_files()
                {
                    self.add_video_files(paths);
                }
            }
            if ui.button("📁 Add folder").clicked() {
                if let Some(folder) = FileDialog::new().pick_folder() {
                    self.add_video_folder(folder);
                }
            }
        });
        drop_hint(ui, "You can also drop video files onto the window");

        let files = &self.upload.form.state.video_files;
        if files.is_empty() {
            return;
        }

        ui.add_space(6.0);
        let mut remove = None;
        egui::ScrollArea::vertical()
            .id_source("selected_videos")
            .max_height(160.0)
            .show(ui, |ui| {
                for (index, file) in files.iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui.small_button("✖").on_hover_text("Remove").clicked() {
                            remove = Some(index);
                        }
                        ui.label(&file.name);
                        muted(ui, FileSizeUtils::format_size(file.size));
                    });
                }
            });

        let count = files.len();
        let mut summary = format!(
            "{} file(s), {} total",
            count,
            FileSizeUtils::format_size(self.upload.form.state.total_file_size())
        );
        if count > 1 {
            summary.push_str(", sent as one batch");
        }
        muted(ui, summary);

        if let Some(index) = remove {
            self.upload.form.state.remove_file(index);
        }
    }

    fn render_drive_links(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.upload.form.state.drive_urls)
                .hint_text("One Google Drive link per line")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.upload.form.acknowledge();
        }
        let count = parse_drive_urls(&self.upload.form.state.drive_urls).len();
        muted(ui, format!("{} link(s)", count));
    }

    fn render_modal_select(&mut self, ui: &mut egui::Ui) {
        let modals = &self.upload.modals;
        let selected = &mut self.upload.form.state.modal_image_id;
        let selected_text = selected
            .as_ref()
            .and_then(|id| modals.iter().find(|modal| &modal.id == id))
            .map(|modal| modal.filename.clone())
            .unwrap_or_else(|| "Choose an overlay".to_string());

        egui::ComboBox::from_id_source("modal_select")
            .selected_text(selected_text)
            .width(260.0)
            .show_ui(ui, |ui| {
                for modal in modals {
                    ui.selectable_value(selected, Some(modal.id.clone()), modal.filename.as_str());
                }
            });

        if modals.is_empty() {
            muted(ui, "No overlays yet, add some on the Overlays tab");
        }
    }
}

/// Returns a link the user asked to copy.
fn render_summary(
    ui: &mut egui::Ui,
    summary: &BatchSummary,
    upload_id: Option<&str>,
) -> Option<String> {
    let mut copied = None;
    ui.group(|ui| {
        let totals = summary.totals;
        ui.label(
            RichText::new(format!(
                "{} uploaded, {} failed, {} total",
                totals.successful, totals.failed, totals.total
            ))
            .strong(),
        );
        if let Some(id) = upload_id {
            muted(ui, format!("Upload ID: {}", id));
        }
        ui.add_space(6.0);

        if summary.is_empty() {
            muted(ui, "The backend did not report any videos");
        }
        let open = summary.expanded_by_default();
        for (index, group) in summary.groups.iter().enumerate() {
            egui::CollapsingHeader::new(format!("{} ({})", group.label, group.videos.len()))
                .id_source(("outcome_group", index))
                .default_open(open)
                .show(ui, |ui| {
                    for video in &group.videos {
                        ui.horizontal(|ui| {
                            ui.colored_label(SUCCESS_COLOR, "✅");
                            ui.hyperlink_to(video.title.as_str(), &video.youtube_url);
                            if ui.small_button("📋").on_hover_text("Copy link").clicked() {
                                copied = Some(video.youtube_url.clone());
                            }
                        });
                    }
                });
        }

        if !summary.failures.is_empty() {
            ui.add_space(6.0);
            ui.label(RichText::new("Failed").strong().color(ERROR_COLOR));
            for failure in &summary.failures {
                ui.horizontal(|ui| {
                    ui.label("❌");
                    ui.colored_label(
                        ERROR_COLOR,
                        format!("{} - {}", failure.title, failure.error),
                    );
                });
            }
        }
    });
    copied
}
