use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::de::Error as _;
use tokio::sync::watch;
use url::Url;

use crate::error::WidgetError;
use crate::models::{ModalKind, ProfileSnapshot, WidgetSettings};
use crate::services::modal::{CloseTrigger, ModalController};
use crate::services::renderer::Renderer;
use crate::services::surface::Surface;
use crate::services::view_model::{visible_items, AboutSource};

/// Where profile documents come from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, username: &str) -> Result<ProfileSnapshot, WidgetError>;
}

/// Fetches `{api_url}/{username}` with a bearer token.
pub struct HttpProfileSource {
    client: reqwest::Client,
    base_url: Url,
    auth_token: String,
    debug: bool,
}

impl HttpProfileSource {
    pub fn new(settings: &WidgetSettings) -> Result<Self, WidgetError> {
        let base_url = Url::parse(settings.api_url.trim())
            .map_err(|e| WidgetError::Config(format!("apiUrl {:?}: {}", settings.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(WidgetError::Config(format!(
                "apiUrl {:?} cannot carry a username path",
                settings.api_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            auth_token: settings.auth_token.trim().to_string(),
            debug: settings.debug,
        })
    }

    pub fn profile_url(&self, username: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(username);
        }
        url
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self, username: &str) -> Result<ProfileSnapshot, WidgetError> {
        let url = self.profile_url(username);
        if self.debug {
            log::debug!("fetching profile from {}", url);
        }

        let mut request = self
            .client
            .get(url)
            .header("Content-Type", "application/json");
        if !self.auth_token.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.auth_token));
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(WidgetError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_snapshot(&text)
    }
}

/// Decode a response body. Anything but a JSON object is rejected; inside
/// the object, malformed sections are dropped individually.
pub fn parse_snapshot(body: &str) -> Result<ProfileSnapshot, WidgetError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom("profile document must be a JSON object").into());
    }
    Ok(serde_json::from_value(value)?)
}

/// Everything the widget draws and remembers, guarded by one lock.
pub struct WidgetState {
    surface: Box<dyn Surface>,
    renderer: Renderer,
    modal: ModalController,
    snapshot: Option<ProfileSnapshot>,
    applied_seq: u64,
}

pub type SharedState = Arc<Mutex<WidgetState>>;

impl WidgetState {
    pub fn new(surface: Box<dyn Surface>, settings: &WidgetSettings) -> Self {
        Self {
            surface,
            renderer: Renderer::new(settings),
            modal: ModalController::new(settings.debug),
            snapshot: None,
            applied_seq: 0,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    pub fn snapshot(&self) -> Option<&ProfileSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    /// Replace the snapshot and redraw every section from it.
    pub fn apply_snapshot(&mut self, mut snapshot: ProfileSnapshot, now: DateTime<Utc>) {
        let last_updated = *snapshot.last_updated.get_or_insert(now);
        self.snapshot = Some(snapshot);
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };

        let surface = self.surface.as_mut();
        let visible = visible_items(&snapshot.items);

        self.renderer
            .render_current_state(surface, snapshot.current_state(), now);
        self.renderer.render_about(
            surface,
            AboutSource {
                identity: snapshot.identity(),
                about: snapshot.about(),
                custom_bio: snapshot.custom_bio.as_deref(),
                username: Some(snapshot.username.as_str()),
                avatar_url: snapshot.avatar_url.as_deref(),
                email: snapshot.email.as_deref(),
            },
        );
        self.renderer.render_items(surface, &visible);
        self.renderer.render_expertise(surface, &snapshot.expertise);
        self.modal.cache(visible, snapshot.expertise.clone());
        self.renderer.render_last_updated(surface, last_updated, now);
    }

    pub fn apply_offline(&mut self) {
        self.renderer.render_offline(self.surface.as_mut());
    }

    pub fn open_modal(&mut self, kind: ModalKind, index: usize) -> bool {
        self.modal.open(self.surface.as_mut(), kind, index)
    }

    pub fn close_modal(&mut self, trigger: CloseTrigger) -> bool {
        self.modal.close(self.surface.as_mut(), trigger)
    }

    pub fn key_pressed(&mut self, key: &str) -> bool {
        self.modal.handle_key(self.surface.as_mut(), key)
    }

    pub fn toggle_expertise(&mut self, index: usize) -> Option<bool> {
        self.renderer.toggle_expertise(self.surface.as_mut(), index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh snapshot was rendered.
    Applied,
    /// The fetch failed; the offline indicator is showing.
    Offline,
    /// A newer request already completed, so this result was dropped.
    Stale,
}

/// Owns the snapshot: fetches, then renders or falls back to offline.
pub struct ProfileClient {
    username: String,
    source: Arc<dyn ProfileSource>,
    state: SharedState,
    sequence: AtomicU64,
    renders: watch::Sender<u64>,
    debug: bool,
}

impl ProfileClient {
    pub fn new(
        username: &str,
        source: Arc<dyn ProfileSource>,
        state: SharedState,
        debug: bool,
    ) -> Self {
        let (renders, _) = watch::channel(0);
        Self {
            username: username.to_string(),
            source,
            state,
            sequence: AtomicU64::new(0),
            renders,
            debug,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Receiver that ticks after every completed render (fresh or offline).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.renders.subscribe()
    }

    /// Fetch the profile and apply it. Failures never escape: they switch the
    /// last-updated indicator to offline and keep the rendered sections.
    pub async fn fetch_and_apply(&self) -> RefreshOutcome {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.source.fetch(&self.username).await;

        let outcome = {
            let mut state = self.state.lock();
            if seq < state.applied_seq {
                if self.debug {
                    log::debug!(
                        "dropping response #{} for {}: #{} already applied",
                        seq,
                        self.username,
                        state.applied_seq
                    );
                }
                return RefreshOutcome::Stale;
            }
            state.applied_seq = seq;

            match result {
                Ok(snapshot) => {
                    if self.debug {
                        log::debug!(
                            "applying profile for {} ({} items, {} expertise entries)",
                            self.username,
                            snapshot.items.len(),
                            snapshot.expertise.len()
                        );
                    }
                    state.apply_snapshot(snapshot, Utc::now());
                    RefreshOutcome::Applied
                }
                Err(e) => {
                    log::warn!("profile refresh for {} failed, showing offline: {}", self.username, e);
                    state.apply_offline();
                    RefreshOutcome::Offline
                }
            }
        };

        self.renders.send_modify(|n| *n += 1);
        outcome
    }
}
