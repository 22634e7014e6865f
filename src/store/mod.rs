//! In-memory state shared across panels.
//!
//! Writers always swap in a whole new value (`Arc` of a fresh collection or
//! record) so a view holding an earlier snapshot keeps a consistent copy.

pub mod models;

#[cfg(test)]
mod tests;

use crate::error::AppError;
use crate::forms::{read_lock, write_lock};
use models::{seed_playlists, seed_sponsors, ActiveEpisode, BundleOutcome, Playlist, Sponsor, SponsorStatus};
use std::sync::{Arc, RwLock};

/// Process-wide "active episode", injected into each panel.
#[derive(Clone, Default)]
pub struct EpisodeContext {
    inner: Arc<RwLock<Option<Arc<ActiveEpisode>>>>,
}

impl EpisodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<ActiveEpisode>> {
        read_lock(&self.inner).clone()
    }

    /// Replace the active episode. There is no removal path.
    pub fn set(&self, episode: ActiveEpisode) {
        log::info!(
            "Active episode set: Ep{} - {} ({})",
            episode.ep_number,
            episode.title,
            episode.external_video_id
        );
        *write_lock(&self.inner) = Some(Arc::new(episode));
    }
}

pub struct SponsorStore {
    sponsors: RwLock<Arc<Vec<Sponsor>>>,
}

impl SponsorStore {
    pub fn new(sponsors: Vec<Sponsor>) -> Self {
        Self {
            sponsors: RwLock::new(Arc::new(sponsors)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_sponsors())
    }

    pub fn snapshot(&self) -> Arc<Vec<Sponsor>> {
        read_lock(&self.sponsors).clone()
    }

    /// Mark `sponsor_id` onboarded for `Ep{episode_number}` and return the
    /// whole refreshed grid. An unknown id leaves the grid as it was.
    pub fn link(&self, sponsor_id: &str, episode_number: &str) -> Arc<Vec<Sponsor>> {
        let mut guard = write_lock(&self.sponsors);
        if !guard.iter().any(|s| s.id == sponsor_id) {
            log::warn!("No sponsor with id {}, grid unchanged", sponsor_id);
            return guard.clone();
        }

        let updated: Vec<Sponsor> = guard
            .iter()
            .map(|sponsor| {
                if sponsor.id == sponsor_id {
                    Sponsor {
                        status: SponsorStatus::Onboarded,
                        linked_episode: Some(format!("Ep{}", episode_number)),
                        ..sponsor.clone()
                    }
                } else {
                    sponsor.clone()
                }
            })
            .collect();

        let updated = Arc::new(updated);
        *guard = updated.clone();
        updated
    }
}

impl Default for SponsorStore {
    fn default() -> Self {
        Self::seeded()
    }
}

pub struct PlaylistStore {
    playlists: RwLock<Arc<Vec<Playlist>>>,
}

impl PlaylistStore {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self {
            playlists: RwLock::new(Arc::new(playlists)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_playlists())
    }

    pub fn snapshot(&self) -> Arc<Vec<Playlist>> {
        read_lock(&self.playlists).clone()
    }

    /// Append `episode_id` to the playlist unless it is already there.
    pub fn bundle(&self, playlist_id: &str, episode_id: &str) -> Result<BundleOutcome, AppError> {
        let mut guard = write_lock(&self.playlists);
        let target = guard
            .iter()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| AppError::NotFound(format!("playlist {}", playlist_id)))?;

        let playlist_name = target.name.clone();
        let added = !target.video_ids.iter().any(|v| v == episode_id);

        if added {
            let updated: Vec<Playlist> = guard
                .iter()
                .map(|playlist| {
                    let mut playlist = playlist.clone();
                    if playlist.id == playlist_id {
                        playlist.video_ids.push(episode_id.to_string());
                    }
                    playlist
                })
                .collect();
            *guard = Arc::new(updated);
            log::info!("Bundled {} into {}", episode_id, playlist_name);
        } else {
            log::info!("{} already bundled in {}", episode_id, playlist_name);
        }

        Ok(BundleOutcome {
            playlist_name,
            episode_id: episode_id.to_string(),
            added,
        })
    }
}

impl Default for PlaylistStore {
    fn default() -> Self {
        Self::seeded()
    }
}
