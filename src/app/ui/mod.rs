mod overlays;
mod registry;
mod settings;
mod upload;

use super::state::{Tab, ToastLevel};
use super::CreativeManager;
use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;

const SUCCESS_COLOR: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 50, 50);
const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 30);
const MUTED_COLOR: Color32 = Color32::from_rgb(150, 150, 150);
const ACCENT_COLOR: Color32 = Color32::from_rgb(161, 89, 225);

impl CreativeManager {
    pub fn render(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Creative Manager").heading().color(ACCENT_COLOR));
                ui.add_space(20.0);
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.active_tab, tab, tab.label());
                }
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("notifications")
            .min_height(32.0)
            .show(ctx, |ui| self.render_footer(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(10.0);
                    match self.active_tab {
                        Tab::Upload => self.render_upload(ctx, ui),
                        Tab::Registry => self.render_registry(ctx, ui),
                        Tab::Overlays => self.render_overlays(ctx, ui),
                        Tab::Settings => self.render_settings(ctx, ui),
                    }
                    ui.add_space(20.0);
                });
        });
    }

    /// Dropped files go to whichever tab accepts them.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }

        match self.active_tab {
            Tab::Upload => self.add_video_files(dropped),
            Tab::Overlays => self.upload_overlays(ctx, dropped),
            Tab::Registry | Tab::Settings => self
                .notifications
                .info("Drop videos on the Upload tab or images on the Overlays tab"),
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        let toasts = self.notifications.visible();
        if toasts.is_empty() {
            ui.label(
                RichText::new(format!("Backend: {}", self.client.config().api_base_url))
                    .color(MUTED_COLOR),
            );
        }
        for toast in toasts {
            let (icon, color) = match toast.level {
                ToastLevel::Info => ("ℹ", ui.visuals().text_color()),
                ToastLevel::Success => ("✅", SUCCESS_COLOR),
                ToastLevel::Error => ("❌", ERROR_COLOR),
            };
            ui.horizontal(|ui| {
                ui.label(icon);
                ui.colored_label(color, &toast.message);
            });
        }
        ui.add_space(4.0);
    }
}

fn muted(ui: &mut egui::Ui, text: impl Into<String>) {
    ui.label(RichText::new(text).color(MUTED_COLOR));
}

fn drop_hint(ui: &mut egui::Ui, text: &str) {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    if hovering {
        ui.label(RichText::new(text).strong().color(ACCENT_COLOR));
    } else {
        muted(ui, text);
    }
}
