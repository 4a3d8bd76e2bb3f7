use super::{muted, ERROR_COLOR, MUTED_COLOR, SUCCESS_COLOR};
use crate::app::CreativeManager;
use crate::integrations::{OAuthClientForm, Provider, ProviderPhase};
use eframe::egui;

fn credential_field(ui: &mut egui::Ui, label: &str, value: &mut String, secret: bool) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .password(secret)
            .desired_width(340.0),
    );
    ui.end_row();
}

fn oauth_fields(ui: &mut egui::Ui, form: &mut OAuthClientForm, hide: bool) {
    credential_field(ui, "Client ID", &mut form.client_id, false);
    credential_field(ui, "Client Secret", &mut form.client_secret, hide);
}

fn indicator(ui: &mut egui::Ui, on: bool, label: &str) {
    let color = if on { SUCCESS_COLOR } else { MUTED_COLOR };
    ui.colored_label(color, if on { "●" } else { "○" });
    ui.label(label);
}

impl CreativeManager {
    pub(super) fn render_settings(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Integrations");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🔄 Refresh status").clicked() {
                    self.load_integration_status(ctx);
                }
                ui.checkbox(&mut self.settings.show_secrets, "Show secrets");
            });
        });
        ui.add_space(10.0);

        for provider in Provider::ALL {
            egui::CollapsingHeader::new(provider.label())
                .id_source(provider.slug())
                .default_open(true)
                .show(ui, |ui| self.render_provider(ctx, ui, provider));
            ui.add_space(6.0);
        }
    }

    fn render_provider(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, provider: Provider) {
        let state = self
            .settings
            .statuses
            .get(provider.slug())
            .copied()
            .unwrap_or_default();
        ui.horizontal(|ui| {
            indicator(ui, state.configured, "Configured");
            if provider.uses_redirect_uri() {
                ui.add_space(12.0);
                indicator(ui, state.authorized, "Authorized");
            }
        });
        ui.add_space(4.0);

        let hide = !self.settings.show_secrets;
        let forms = &mut self.settings.forms;
        egui::Grid::new(("credentials", provider.slug()))
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| match provider {
                Provider::YouTube => oauth_fields(ui, &mut forms.youtube, hide),
                Provider::GoogleDrive => oauth_fields(ui, &mut forms.google_drive, hide),
                Provider::GoogleAds => {
                    let form = &mut forms.google_ads;
                    credential_field(ui, "Client ID", &mut form.client_id, false);
                    credential_field(ui, "Client Secret", &mut form.client_secret, hide);
                    credential_field(ui, "Refresh Token", &mut form.refresh_token, hide);
                    credential_field(ui, "Developer Token", &mut form.developer_token, hide);
                    credential_field(ui, "Customer ID", &mut form.customer_id, false);
                }
                Provider::Telegram => {
                    let form = &mut forms.telegram;
                    credential_field(ui, "Bot Token", &mut form.bot_token, hide);
                    credential_field(ui, "Chat ID (optional)", &mut form.chat_id, false);
                }
                Provider::Supabase => {
                    let form = &mut forms.supabase;
                    credential_field(ui, "Project URL", &mut form.url, false);
                    credential_field(ui, "API Key", &mut form.key, hide);
                }
            });

        if provider.uses_redirect_uri() {
            muted(
                ui,
                format!(
                    "Redirect URI: {}",
                    self.client.config().redirect_uri(provider.slug())
                ),
            );
        }

        let mut copy_link = None;
        if provider == Provider::GoogleDrive {
            if let Some(link) = &self.settings.drive_auth_link {
                ui.horizontal(|ui| {
                    ui.label("Authorization link:");
                    ui.hyperlink_to("Open", link);
                    if ui.small_button("📋 Copy").clicked() {
                        copy_link = Some(link.clone());
                    }
                });
            }
        }
        if let Some(link) = copy_link {
            self.copy_to_clipboard(ctx, &link);
        }

        ui.add_space(4.0);
        let pending = self.settings.phases.is_pending(provider);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!pending, egui::Button::new("💾 Save"))
                .clicked()
            {
                self.setup_provider(ctx, provider);
            }
            if ui
                .add_enabled(!pending, egui::Button::new("🔌 Test connection"))
                .clicked()
            {
                self.test_provider(ctx, provider);
            }

            match self.settings.phases.get(provider) {
                ProviderPhase::Idle => {}
                ProviderPhase::Pending(action) => {
                    ui.spinner();
                    ui.label(format!("{}...", action.label()));
                }
                ProviderPhase::Succeeded(message) => {
                    ui.colored_label(SUCCESS_COLOR, message);
                }
                ProviderPhase::Failed(message) => {
                    ui.colored_label(ERROR_COLOR, message);
                }
            }
        });
    }
}
