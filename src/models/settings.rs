use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.profile-widget.dev/v1/profiles";
pub const DEFAULT_ATTRIBUTION_URL: &str = "https://profile-widget.dev";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 300_000;
pub const MIN_REFRESH_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_AVATAR_SIZE: u32 = 256;
pub const MAX_AVATAR_SIZE: u32 = 2048;

/// Options supplied by the embedding page. Keys use the page's camelCase names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    pub api_url: String,
    pub auth_token: String,
    pub refresh_interval_ms: u64,
    pub debug: bool,
    pub avatar_size: u32,
    pub avatar_fallback_style: String,
    pub attribution_url: String,
    pub attribution_label: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: String::new(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            debug: false,
            avatar_size: DEFAULT_AVATAR_SIZE,
            avatar_fallback_style: "identicon".to_string(),
            attribution_url: DEFAULT_ATTRIBUTION_URL.to_string(),
            attribution_label: "Profile Widget".to_string(),
        }
    }
}

impl WidgetSettings {
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS))
    }

    pub fn avatar_size(&self) -> u32 {
        self.avatar_size.clamp(1, MAX_AVATAR_SIZE)
    }
}
