use std::path::Path;

use crate::error::WidgetError;
use crate::models::WidgetSettings;

const ENV_API_URL: &str = "PROFILE_WIDGET_API_URL";
const ENV_AUTH_TOKEN: &str = "PROFILE_WIDGET_TOKEN";
const ENV_REFRESH_MS: &str = "PROFILE_WIDGET_REFRESH_MS";
const ENV_DEBUG: &str = "PROFILE_WIDGET_DEBUG";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn auth_token_from_env() -> Option<String> {
    env_value(ENV_AUTH_TOKEN)
}

pub fn resolve_auth_token(explicit_token: &str) -> String {
    let trimmed = explicit_token.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    auth_token_from_env().unwrap_or_default()
}

/// Fill settings from the environment. An explicit token in the settings
/// file wins over the environment; the other variables override.
pub fn apply_env_defaults(settings: &mut WidgetSettings) {
    settings.auth_token = resolve_auth_token(&settings.auth_token);
    if let Some(url) = env_value(ENV_API_URL) {
        settings.api_url = url;
    }
    if let Some(ms) = env_value(ENV_REFRESH_MS).and_then(|v| v.parse::<u64>().ok()) {
        settings.refresh_interval_ms = ms;
    }
    if let Some(debug) = env_value(ENV_DEBUG) {
        settings.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }
}

/// Read settings from an optional JSON file, then apply environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<WidgetSettings, WidgetError> {
    let mut settings = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => WidgetSettings::default(),
    };
    apply_env_defaults(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_token_wins_over_env() {
        assert_eq!(resolve_auth_token("  abc  "), "abc");
    }

    #[test]
    fn loads_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"apiUrl": "http://localhost:9000/profiles", "authToken": "file-token", "avatarSize": 64}}"#
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.auth_token, "file-token");
        assert_eq!(settings.avatar_size, 64);
        assert_eq!(settings.refresh_interval_ms, 300_000);
    }

    #[test]
    fn unreadable_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_settings(Some(&missing)), Err(WidgetError::Io(_))));
    }
}
