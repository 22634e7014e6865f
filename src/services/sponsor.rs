use super::{Latency, SimRng};
use crate::error::AppError;
use crate::store::models::Sponsor;
use crate::store::SponsorStore;
use std::sync::Arc;

const INVALID_EPISODE: &str = "0";

/// Simulated sponsor database backed by the shared [`SponsorStore`].
pub struct SponsorDirectory {
    store: Arc<SponsorStore>,
    list_latency: Latency,
    link_latency: Latency,
    rng: SimRng,
}

impl SponsorDirectory {
    pub fn new(store: Arc<SponsorStore>, list_latency: Latency, link_latency: Latency, rng: SimRng) -> Self {
        Self {
            store,
            list_latency,
            link_latency,
            rng,
        }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Sponsor>>, AppError> {
        log::info!("Fetching sponsors from the grid...");
        self.list_latency.wait(&self.rng).await;
        Ok(self.store.snapshot())
    }

    /// Link a sponsor to an episode and return the full refreshed grid.
    #[tracing::instrument(skip(self))]
    pub async fn link(&self, sponsor_id: &str, episode_number: &str) -> Result<Arc<Vec<Sponsor>>, AppError> {
        log::info!("Syncing sponsor {} with Episode {}...", sponsor_id, episode_number);
        self.link_latency.wait(&self.rng).await;

        if episode_number.trim() == INVALID_EPISODE {
            return Err(AppError::Service(
                "Invalid Episode Number provided for sync.".to_string(),
            ));
        }

        let updated = self.store.link(sponsor_id, episode_number.trim());
        log::info!("Sync successful, {} sponsors in grid", updated.len());
        Ok(updated)
    }
}
