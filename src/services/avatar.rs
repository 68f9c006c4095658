use crate::models::{DEFAULT_AVATAR_SIZE, MAX_AVATAR_SIZE};
use crate::utils::identity_digest;

const AVATAR_BASE_URL: &str = "https://gravatar.com/avatar";

/// Picks the image shown in the about section.
///
/// A URL precomputed by the API always wins; otherwise the identity is hashed
/// locally so only the digest leaves the page.
#[derive(Debug, Clone)]
pub struct AvatarResolver {
    size: u32,
    fallback_style: String,
}

impl Default for AvatarResolver {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_SIZE, "identicon")
    }
}

impl AvatarResolver {
    pub fn new(size: u32, fallback_style: &str) -> Self {
        let fallback_style = fallback_style.trim();
        Self {
            size: size.clamp(1, MAX_AVATAR_SIZE),
            fallback_style: if fallback_style.is_empty() {
                "identicon".to_string()
            } else {
                fallback_style.to_string()
            },
        }
    }

    pub fn resolve(&self, precomputed_url: Option<&str>, identity: Option<&str>) -> Option<String> {
        if let Some(url) = precomputed_url.filter(|u| !u.trim().is_empty()) {
            return Some(url.to_string());
        }

        let digest = identity.and_then(identity_digest)?;
        let mut url = url::Url::parse(AVATAR_BASE_URL).ok()?;
        url.path_segments_mut().ok()?.push(&digest);
        url.query_pairs_mut()
            .append_pair("s", &self.size.to_string())
            .append_pair("d", &self.fallback_style);
        Some(url.to_string())
    }
}
