use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::Config;
use crate::generation::sessions::SessionStore;
use crate::imagen_client::ImageGenerator;
use crate::models::settings::{CoverSettings, TypographySettings};

/// Upper bound on how often idle sessions are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The image collaborator. `ImagenClient` in production, fakes in tests.
    pub generator: Arc<dyn ImageGenerator>,
    pub cover_sessions: SessionStore<CoverSettings>,
    pub typography_sessions: SessionStore<TypographySettings>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            config,
            generator,
            cover_sessions: SessionStore::new(),
            typography_sessions: SessionStore::new(),
        }
    }

    /// Periodically evicts sessions idle for `ttl`, covering clients that
    /// close the tab without deleting their session.
    pub fn spawn_session_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let cover = self.cover_sessions.clone();
        let typography = self.typography_sessions.clone();
        let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = cover.evict_idle(ttl).await + typography.evict_idle(ttl).await;
                if evicted > 0 {
                    debug!(
                        "Swept {} idle sessions ({} cover, {} typography remain)",
                        evicted,
                        cover.len().await,
                        typography.len().await
                    );
                }
            }
        })
    }
}
