use std::sync::Arc;

use tokio::sync::watch;

use crate::error::WidgetError;
use crate::models::{ProfileSnapshot, WidgetSettings};
use crate::services::profile_client::{
    HttpProfileSource, ProfileClient, ProfileSource, RefreshOutcome, SharedState, WidgetState,
};
use crate::services::refresh_scheduler::{RefreshScheduler, RefreshState};
use crate::services::surface::Surface;

/// The widget as seen by the embedding page.
pub struct ProfileWidget {
    pub(crate) state: SharedState,
    client: Arc<ProfileClient>,
    scheduler: RefreshScheduler,
}

impl ProfileWidget {
    /// Build a widget that fetches from the configured HTTP endpoint.
    pub fn new<S>(username: &str, settings: &WidgetSettings, surface: S) -> Result<Self, WidgetError>
    where
        S: Surface + 'static,
    {
        let source = Arc::new(HttpProfileSource::new(settings)?);
        Self::with_source(username, settings, surface, source)
    }

    pub fn with_source<S>(
        username: &str,
        settings: &WidgetSettings,
        surface: S,
        source: Arc<dyn ProfileSource>,
    ) -> Result<Self, WidgetError>
    where
        S: Surface + 'static,
    {
        let username = username.trim();
        if username.is_empty() {
            return Err(WidgetError::Config("username must not be empty".to_string()));
        }

        let state = WidgetState::new(Box::new(surface), settings).shared();
        let client = Arc::new(ProfileClient::new(username, source, state.clone(), settings.debug));
        let scheduler = RefreshScheduler::new(client.clone(), settings.refresh_interval());
        Ok(Self {
            state,
            client,
            scheduler,
        })
    }

    pub fn username(&self) -> &str {
        self.client.username()
    }

    /// First fetch plus auto-refresh. Calling it again restarts the timer.
    pub fn init(&self) -> Result<(), WidgetError> {
        self.scheduler.start()
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.scheduler.refresh().await
    }

    pub fn stop_auto_refresh(&self) {
        self.scheduler.stop();
    }

    /// The current snapshot, if any fetch has succeeded.
    pub fn get_data(&self) -> Option<ProfileSnapshot> {
        self.state.lock().snapshot().cloned()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.scheduler.state()
    }

    /// Ticks after every render, fresh or offline.
    pub fn renders(&self) -> watch::Receiver<u64> {
        self.client.subscribe()
    }
}
