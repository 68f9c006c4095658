use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::WidgetError;
use crate::services::profile_client::{ProfileClient, RefreshOutcome};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshState {
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub running: bool,
}

/// Owns the repeating refresh timer. At most one timer task exists.
pub struct RefreshScheduler {
    client: Arc<ProfileClient>,
    period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshScheduler {
    pub fn new(client: Arc<ProfileClient>, period: Duration) -> Self {
        Self {
            client,
            period,
            timer: Mutex::new(None),
            state: Arc::new(Mutex::new(RefreshState::default())),
        }
    }

    /// Fetch now, then every period. Restarts the timer if one is running.
    pub fn start(&self) -> Result<(), WidgetError> {
        let runtime = tokio::runtime::Handle::try_current()?;
        let mut timer = self.timer.lock();
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let client = self.client.clone();
        let state = self.state.clone();
        let period = self.period;
        *timer = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                run_cycle(&client, &state).await;
            }
        }));
        self.state.lock().running = true;

        log::info!(
            "auto-refresh for {} started, every {}s",
            self.client.username(),
            period.as_secs()
        );
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
            log::info!("auto-refresh for {} stopped", self.client.username());
        }
        self.state.lock().running = false;
    }

    /// One fetch outside the timer cadence; the timer keeps its schedule.
    pub async fn refresh(&self) -> RefreshOutcome {
        run_cycle(&self.client, &self.state).await
    }

    pub fn is_running(&self) -> bool {
        self.timer.lock().is_some()
    }

    pub fn state(&self) -> RefreshState {
        self.state.lock().clone()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_cycle(client: &ProfileClient, state: &Mutex<RefreshState>) -> RefreshOutcome {
    state.lock().last_attempt_at = Some(Utc::now());
    let outcome = client.fetch_and_apply().await;
    if outcome == RefreshOutcome::Applied {
        state.lock().last_success_at = Some(Utc::now());
    }
    outcome
}
