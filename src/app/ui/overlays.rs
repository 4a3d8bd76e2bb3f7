use super::{drop_hint, muted, ERROR_COLOR, MUTED_COLOR, SUCCESS_COLOR};
use crate::app::state::ModalListTarget;
use crate::app::CreativeManager;
use crate::modals::{delete_modal, preview_modal, FileUploadState};
use crate::upload::MediaKind;
use crate::utils::date::format_timestamp;
use crate::utils::file_size::FileSizeUtils;
use eframe::egui;
use rfd::FileDialog;

enum OverlayAction {
    Preview(usize),
    Delete(usize),
}

impl CreativeManager {
    pub(super) fn render_overlays(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading("Overlays");
        muted(
            ui,
            "Images composited onto the first frame when a thumbnail uses an overlay",
        );
        ui.add_space(10.0);

        ui.group(|ui| {
            ui.horizontal(|ui| {
                let idle = !self.overlays.is_uploading;
                if ui
                    .add_enabled(idle, egui::Button::new("🖼 Add images"))
                    .clicked()
                {
                    if let Some(paths) = FileDialog::new()
                        .add_filter("Images", MediaKind::Image.extensions())
                        .pick_files()
                    {
                        self.upload_overlays(ctx, paths);
                    }
                }
                if ui.button("🔄 Refresh").clicked() {
                    self.load_modals(ctx, ModalListTarget::Manager);
                }
                if self.overlays.is_uploading {
                    ui.spinner();
                    ui.label("Uploading...");
                }
            });
            drop_hint(ui, "You can also drop images onto the window");
        });

        if !self.overlays.file_statuses.is_empty() {
            ui.add_space(10.0);
            self.render_upload_details(ui);
        }

        ui.add_space(16.0);
        if self.overlays.modals.is_empty() {
            muted(ui, "No overlays uploaded yet");
            return;
        }

        let mut action = None;
        egui::Grid::new("overlay_list")
            .striped(true)
            .num_columns(5)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (index, modal) in self.overlays.modals.iter().enumerate() {
                    ui.label(format!("🖼 {}", modal.filename));
                    muted(ui, FileSizeUtils::format_optional(modal.file_size));
                    muted(ui, format_timestamp(&modal.upload_date));
                    if ui.small_button("👁 Preview").clicked() {
                        action = Some(OverlayAction::Preview(index));
                    }
                    if ui.small_button("🗑 Delete").clicked() {
                        action = Some(OverlayAction::Delete(index));
                    }
                    ui.end_row();
                }
            });

        let result = match action {
            Some(OverlayAction::Preview(index)) => preview_modal(&self.overlays.modals[index]),
            Some(OverlayAction::Delete(index)) => delete_modal(&self.overlays.modals[index]),
            None => Ok(()),
        };
        if let Err(err) = result {
            self.notifications.info(err.to_string());
        }
    }

    fn render_upload_details(&mut self, ui: &mut egui::Ui) {
        let label = if self.overlays.show_details {
            "Hide Details"
        } else {
            "Show Details"
        };
        if ui.button(label).clicked() {
            self.overlays.show_details = !self.overlays.show_details;
        }

        if !self.overlays.show_details {
            return;
        }
        egui::ScrollArea::vertical()
            .id_source("overlay_details")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        for status in &self.overlays.file_statuses {
                            ui.horizontal(|ui| match &status.state {
                                FileUploadState::Uploading => {
                                    ui.label("⏳");
                                    ui.colored_label(
                                        MUTED_COLOR,
                                        format!("{} - Uploading...", status.name),
                                    );
                                }
                                FileUploadState::Uploaded => {
                                    ui.label("✅");
                                    ui.colored_label(SUCCESS_COLOR, &status.name);
                                }
                                FileUploadState::Failed(err) => {
                                    ui.label("❌");
                                    ui.colored_label(ERROR_COLOR, err);
                                }
                            });
                            ui.add_space(4.0);
                        }
                        ui.add_space(8.0);
                    });
            });
    }
}
