//! Third-party integration settings: credential forms, validation, and one
//! pending/result phase per provider.

use crate::api::StoredSettings;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    YouTube,
    GoogleDrive,
    GoogleAds,
    Telegram,
    Supabase,
}

/// What to do with an authorization URL returned by a successful setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLinkHandling {
    OpenInBrowser,
    ShowCopyableLink,
    Ignore,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Self::YouTube,
        Self::GoogleDrive,
        Self::GoogleAds,
        Self::Telegram,
        Self::Supabase,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::GoogleDrive => "google_drive",
            Self::GoogleAds => "google_ads",
            Self::Telegram => "telegram",
            Self::Supabase => "supabase",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::GoogleDrive => "Google Drive",
            Self::GoogleAds => "Google Ads",
            Self::Telegram => "Telegram",
            Self::Supabase => "Database (Supabase)",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::YouTube => 0,
            Self::GoogleDrive => 1,
            Self::GoogleAds => 2,
            Self::Telegram => 3,
            Self::Supabase => 4,
        }
    }

    // YouTube consent opens a browser window while Drive only shows the link.
    pub fn auth_link_handling(self) -> AuthLinkHandling {
        match self {
            Self::YouTube => AuthLinkHandling::OpenInBrowser,
            Self::GoogleDrive => AuthLinkHandling::ShowCopyableLink,
            _ => AuthLinkHandling::Ignore,
        }
    }

    pub fn uses_redirect_uri(self) -> bool {
        matches!(self, Self::YouTube | Self::GoogleDrive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAction {
    Setup,
    Test,
}

impl ProviderAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Setup => "Saving",
            Self::Test => "Testing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderPhase {
    #[default]
    Idle,
    Pending(ProviderAction),
    Succeeded(String),
    Failed(String),
}

/// Exactly one phase per provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderPhases {
    phases: [ProviderPhase; 5],
}

impl ProviderPhases {
    pub fn get(&self, provider: Provider) -> &ProviderPhase {
        &self.phases[provider.index()]
    }

    pub fn is_pending(&self, provider: Provider) -> bool {
        matches!(self.get(provider), ProviderPhase::Pending(_))
    }

    /// Marks `provider` as busy. Returns `false` if it already was, in which
    /// case nothing should be sent.
    pub fn start(&mut self, provider: Provider, action: ProviderAction) -> bool {
        if self.is_pending(provider) {
            return false;
        }
        self.phases[provider.index()] = ProviderPhase::Pending(action);
        true
    }

    pub fn succeed(&mut self, provider: Provider, message: impl Into<String>) {
        self.phases[provider.index()] = ProviderPhase::Succeeded(message.into());
    }

    pub fn fail(&mut self, provider: Provider, message: impl Into<String>) {
        self.phases[provider.index()] = ProviderPhase::Failed(message.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("{provider}: {field} is required")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },
}

/// Validated credentials for one provider's setup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    OAuthClient {
        provider: Provider,
        client_id: String,
        client_secret: String,
    },
    GoogleAds {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        developer_token: String,
        customer_id: String,
    },
    Telegram {
        bot_token: String,
        chat_id: Option<String>,
    },
    Supabase {
        url: String,
        key: String,
    },
}

impl Credentials {
    pub fn provider(&self) -> Provider {
        match self {
            Self::OAuthClient { provider, .. } => *provider,
            Self::GoogleAds { .. } => Provider::GoogleAds,
            Self::Telegram { .. } => Provider::Telegram,
            Self::Supabase { .. } => Provider::Supabase,
        }
    }

    /// Form-encoded body of the setup request.
    pub fn form_fields(&self, redirect_uri: Option<String>) -> Vec<(&'static str, String)> {
        let mut fields = match self {
            Self::OAuthClient {
                client_id,
                client_secret,
                ..
            } => vec![
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
            ],
            Self::GoogleAds {
                client_id,
                client_secret,
                refresh_token,
                developer_token,
                customer_id,
            } => vec![
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
                ("refresh_token", refresh_token.clone()),
                ("developer_token", developer_token.clone()),
                ("customer_id", customer_id.clone()),
            ],
            Self::Telegram { bot_token, chat_id } => {
                let mut fields = vec![("bot_token", bot_token.clone())];
                if let Some(chat_id) = chat_id {
                    fields.push(("chat_id", chat_id.clone()));
                }
                fields
            }
            Self::Supabase { url, key } => vec![("url", url.clone()), ("key", key.clone())],
        };
        if let Some(uri) = redirect_uri.filter(|_| self.provider().uses_redirect_uri()) {
            fields.push(("redirect_uri", uri));
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthClientForm {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleAdsForm {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub developer_token: String,
    pub customer_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelegramForm {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupabaseForm {
    pub url: String,
    pub key: String,
}

/// Editable credential drafts, one per provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForms {
    pub youtube: OAuthClientForm,
    pub google_drive: OAuthClientForm,
    pub google_ads: GoogleAdsForm,
    pub telegram: TelegramForm,
    pub supabase: SupabaseForm,
}

fn required(provider: Provider, field: &'static str, value: &str) -> Result<String, CredentialsError> {
    match value.trim() {
        "" => Err(CredentialsError::MissingField {
            provider: provider.label(),
            field,
        }),
        value => Ok(value.to_string()),
    }
}

impl CredentialForms {
    pub fn credentials(&self, provider: Provider) -> Result<Credentials, CredentialsError> {
        match provider {
            Provider::YouTube | Provider::GoogleDrive => {
                let form = if provider == Provider::YouTube {
                    &self.youtube
                } else {
                    &self.google_drive
                };
                Ok(Credentials::OAuthClient {
                    provider,
                    client_id: required(provider, "Client ID", &form.client_id)?,
                    client_secret: required(provider, "Client Secret", &form.client_secret)?,
                })
            }
            Provider::GoogleAds => {
                let form = &self.google_ads;
                Ok(Credentials::GoogleAds {
                    client_id: required(provider, "Client ID", &form.client_id)?,
                    client_secret: required(provider, "Client Secret", &form.client_secret)?,
                    refresh_token: required(provider, "Refresh Token", &form.refresh_token)?,
                    developer_token: required(provider, "Developer Token", &form.developer_token)?,
                    customer_id: required(provider, "Customer ID", &form.customer_id)?,
                })
            }
            Provider::Telegram => Ok(Credentials::Telegram {
                bot_token: required(provider, "Bot Token", &self.telegram.bot_token)?,
                chat_id: Some(self.telegram.chat_id.trim())
                    .filter(|chat_id| !chat_id.is_empty())
                    .map(str::to_string),
            }),
            Provider::Supabase => Ok(Credentials::Supabase {
                url: required(provider, "Project URL", &self.supabase.url)?,
                key: required(provider, "API Key", &self.supabase.key)?,
            }),
        }
    }

    /// Fills the drafts from stored settings. Fields missing from the backend
    /// keep their current value.
    pub fn populate(&mut self, stored: &StoredSettings) {
        let value = |provider: Provider, field: &str| -> Option<String> {
            let raw = stored.get(provider.slug())?.get(field)?;
            match raw {
                serde_json::Value::String(text) => Some(text.clone()),
                serde_json::Value::Number(number) => Some(number.to_string()),
                _ => None,
            }
        };
        let set = |target: &mut String, provider: Provider, field: &str| {
            if let Some(found) = value(provider, field) {
                *target = found;
            }
        };

        set(&mut self.youtube.client_id, Provider::YouTube, "client_id");
        set(&mut self.youtube.client_secret, Provider::YouTube, "client_secret");
        set(&mut self.google_drive.client_id, Provider::GoogleDrive, "client_id");
        set(&mut self.google_drive.client_secret, Provider::GoogleDrive, "client_secret");
        set(&mut self.google_ads.client_id, Provider::GoogleAds, "client_id");
        set(&mut self.google_ads.client_secret, Provider::GoogleAds, "client_secret");
        set(&mut self.google_ads.refresh_token, Provider::GoogleAds, "refresh_token");
        set(&mut self.google_ads.developer_token, Provider::GoogleAds, "developer_token");
        set(&mut self.google_ads.customer_id, Provider::GoogleAds, "customer_id");
        set(&mut self.telegram.bot_token, Provider::Telegram, "bot_token");
        set(&mut self.telegram.chat_id, Provider::Telegram, "chat_id");
        set(&mut self.supabase.url, Provider::Supabase, "url");
        set(&mut self.supabase.key, Provider::Supabase, "key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn oauth_providers_need_id_and_secret() {
        let mut forms = CredentialForms::default();
        forms.youtube.client_id = "id".into();

        assert_eq!(
            forms.credentials(Provider::YouTube),
            Err(CredentialsError::MissingField {
                provider: "YouTube",
                field: "Client Secret"
            })
        );

        forms.youtube.client_secret = " secret ".into();
        assert_eq!(
            forms.credentials(Provider::YouTube),
            Ok(Credentials::OAuthClient {
                provider: Provider::YouTube,
                client_id: "id".into(),
                client_secret: "secret".into(),
            })
        );
        assert!(forms.credentials(Provider::GoogleDrive).is_err());
    }

    #[test]
    fn ads_needs_all_five_fields() {
        let mut forms = CredentialForms::default();
        forms.google_ads = GoogleAdsForm {
            client_id: "id".into(),
            client_secret: "secret".into(),
            refresh_token: "refresh".into(),
            developer_token: "dev".into(),
            customer_id: String::new(),
        };
        assert_eq!(
            forms.credentials(Provider::GoogleAds).unwrap_err().to_string(),
            "Google Ads: Customer ID is required"
        );

        forms.google_ads.customer_id = "123-456".into();
        let fields = forms
            .credentials(Provider::GoogleAds)
            .unwrap()
            .form_fields(Some("http://cb".into()));
        assert_eq!(fields.len(), 5);
        assert!(!fields.iter().any(|(name, _)| *name == "redirect_uri"));
    }

    #[test]
    fn telegram_chat_id_is_optional() {
        let mut forms = CredentialForms::default();
        assert!(forms.credentials(Provider::Telegram).is_err());

        forms.telegram.bot_token = "123:abc".into();
        let credentials = forms.credentials(Provider::Telegram).unwrap();
        assert_eq!(
            credentials,
            Credentials::Telegram {
                bot_token: "123:abc".into(),
                chat_id: None
            }
        );
        assert_eq!(credentials.form_fields(None), vec![("bot_token", "123:abc".to_string())]);
    }

    #[test]
    fn oauth_setup_carries_redirect_uri() {
        let credentials = Credentials::OAuthClient {
            provider: Provider::GoogleDrive,
            client_id: "id".into(),
            client_secret: "secret".into(),
        };
        let fields = credentials.form_fields(Some("http://localhost:8000/integrations/google_drive/callback".into()));
        assert_eq!(
            fields.last(),
            Some(&(
                "redirect_uri",
                "http://localhost:8000/integrations/google_drive/callback".to_string()
            ))
        );
    }

    #[test]
    fn phases_are_independent_per_provider() {
        let mut phases = ProviderPhases::default();
        assert!(phases.start(Provider::YouTube, ProviderAction::Setup));
        assert!(!phases.start(Provider::YouTube, ProviderAction::Test));
        assert!(phases.start(Provider::Telegram, ProviderAction::Test));

        phases.fail(Provider::YouTube, "bad secret");
        assert_eq!(phases.get(Provider::YouTube), &ProviderPhase::Failed("bad secret".into()));
        assert!(phases.is_pending(Provider::Telegram));
        assert_eq!(phases.get(Provider::GoogleAds), &ProviderPhase::Idle);

        phases.succeed(Provider::Telegram, "ok");
        assert!(!phases.is_pending(Provider::Telegram));
    }

    #[test]
    fn auth_link_asymmetry() {
        assert_eq!(Provider::YouTube.auth_link_handling(), AuthLinkHandling::OpenInBrowser);
        assert_eq!(Provider::GoogleDrive.auth_link_handling(), AuthLinkHandling::ShowCopyableLink);
        assert_eq!(Provider::Telegram.auth_link_handling(), AuthLinkHandling::Ignore);
    }

    #[test]
    fn populate_from_stored_settings() {
        let mut stored: StoredSettings = HashMap::new();
        stored.insert(
            "youtube".into(),
            serde_json::from_value(json!({"client_id": "yt-id", "client_secret": "yt-secret"})).unwrap(),
        );
        stored.insert(
            "telegram".into(),
            serde_json::from_value(json!({"bot_token": "tok", "chat_id": -100123})).unwrap(),
        );

        let mut forms = CredentialForms::default();
        forms.supabase.url = "https://keep.supabase.co".into();
        forms.populate(&stored);

        assert_eq!(forms.youtube.client_id, "yt-id");
        assert_eq!(forms.youtube.client_secret, "yt-secret");
        assert_eq!(forms.telegram.chat_id, "-100123");
        assert_eq!(forms.supabase.url, "https://keep.supabase.co");
    }
}
