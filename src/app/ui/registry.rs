use super::{muted, ERROR_COLOR, MUTED_COLOR, SUCCESS_COLOR, WARNING_COLOR};
use crate::api::{Template, UploadStatus};
use crate::app::CreativeManager;
use crate::registry::{RegistryFilter, StatusCounts, StatusFilter};
use crate::utils::date::format_timestamp;
use eframe::egui::{self, Color32, RichText};

fn status_color(status: &UploadStatus) -> Color32 {
    match status {
        UploadStatus::Active => SUCCESS_COLOR,
        UploadStatus::Banned => ERROR_COLOR,
        UploadStatus::Limited => WARNING_COLOR,
        UploadStatus::Other(_) => MUTED_COLOR,
    }
}

fn counter(ui: &mut egui::Ui, label: &str, value: usize, color: Color32) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(value.to_string()).heading().color(color));
            muted(ui, label);
        });
    });
}

impl CreativeManager {
    pub(super) fn render_registry(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Upload registry");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⬇ Export CSV").clicked() {
                    self.export_registry();
                }
                if ui
                    .add_enabled(!self.registry.loading, egui::Button::new("🔄 Refresh"))
                    .clicked()
                {
                    self.load_registry(ctx);
                }
                if self.registry.loading {
                    ui.spinner();
                }
            });
        });
        ui.add_space(10.0);

        let counts = StatusCounts::from_records(&self.registry.uploads);
        let text_color = ui.visuals().text_color();
        ui.horizontal(|ui| {
            counter(ui, "Total", counts.total, text_color);
            counter(ui, "Active", counts.active, SUCCESS_COLOR);
            counter(ui, "Banned", counts.banned, ERROR_COLOR);
            counter(ui, "Limited", counts.limited, WARNING_COLOR);
        });
        ui.add_space(10.0);

        let filter = &mut self.registry.filter;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut filter.search)
                    .hint_text("🔍 Search campaign or URL")
                    .desired_width(260.0),
            );
            egui::ComboBox::from_id_source("status_filter")
                .selected_text(filter.status.label().to_string())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.status, StatusFilter::All, "All statuses");
                    for status in UploadStatus::KNOWN {
                        let label = status.label().to_string();
                        ui.selectable_value(&mut filter.status, StatusFilter::Only(status), label);
                    }
                });
            if filter.is_active() && ui.button("Clear filters").clicked() {
                *filter = RegistryFilter::default();
            }
        });
        ui.add_space(10.0);

        let records = self.registry.filter.apply(&self.registry.uploads);
        let mut copied = None;
        if self.registry.uploads.is_empty() {
            if !self.registry.loading {
                muted(ui, "No uploads yet");
            }
        } else if records.is_empty() {
            muted(ui, "No uploads match the current filters");
        } else {
            if self.registry.filter.is_active() {
                muted(
                    ui,
                    format!("Showing {} of {}", records.len(), self.registry.uploads.len()),
                );
            }
            egui::Grid::new("registry_table")
                .striped(true)
                .num_columns(6)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for header in ["Campaign", "Video", "Status", "Uploaded", "Ad group", ""] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for record in &records {
                        ui.label(&record.campaign_name);
                        ui.hyperlink_to("▶ Open", &record.youtube_url)
                            .on_hover_text(&record.youtube_url);
                        ui.colored_label(status_color(&record.status), record.status.label());
                        ui.label(format_timestamp(&record.upload_date));
                        ui.label(record.ad_group.as_deref().unwrap_or("-"));
                        if ui.small_button("📋").on_hover_text("Copy link").clicked() {
                            copied = Some(record.youtube_url.clone());
                        }
                        ui.end_row();
                    }
                });
        }

        if let Some(link) = copied {
            self.copy_to_clipboard(ctx, &link);
        }

        ui.add_space(16.0);
        render_templates(ui, &self.registry.templates);
    }
}

fn render_templates(ui: &mut egui::Ui, templates: &[Template]) {
    egui::CollapsingHeader::new(format!("Templates ({})", templates.len()))
        .id_source("templates")
        .default_open(false)
        .show(ui, |ui| {
            if templates.is_empty() {
                muted(ui, "No templates available");
                return;
            }
            egui::Grid::new("templates_table")
                .striped(true)
                .num_columns(6)
                .show(ui, |ui| {
                    for header in [
                        "Style",
                        "Language",
                        "Background",
                        "Aggressiveness",
                        "Category",
                        "Characteristics",
                    ] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for template in templates {
                        ui.label(&template.style);
                        ui.label(&template.language);
                        ui.label(&template.background);
                        ui.label(&template.aggressiveness);
                        ui.label(&template.category);
                        ui.label(template.characteristics.join(", "));
                        ui.end_row();
                    }
                });
        });
}
