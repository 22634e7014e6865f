//! Simulated backends.
//!
//! Each service sleeps for a configured latency and can fail on a sentinel
//! input or a random roll. All randomness comes from one [`SimRng`] so a
//! fixed seed reproduces a whole session.

pub mod description;
pub mod outreach;
pub mod qr;
pub mod sponsor;
pub mod upload;
pub mod vault;

use crate::config::ConsoleConfig;
use crate::store::SponsorStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use description::DescriptionService;
pub use outreach::{BroadcastPayload, BroadcastResult, BroadcastStatus, Channel, OutreachService};
pub use qr::QrService;
pub use sponsor::SponsorDirectory;
pub use upload::{UploadMetadata, UploadReceipt, UploadService, VideoFile};
pub use vault::{ArchivePayload, ArchiveResult, VaultService};

const TOKEN_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Replace each run of whitespace with a single `-`.
pub fn dash_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Shared, seedable random source.
#[derive(Clone)]
pub struct SimRng {
    inner: Arc<Mutex<StdRng>>,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    /// True with probability `p` (clamped to `[0, 1]`).
    pub fn roll(&self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.with(|rng| rng.gen_bool(p))
    }

    pub fn millis_between(&self, min_ms: u64, max_ms: u64) -> Duration {
        if max_ms <= min_ms {
            return Duration::from_millis(min_ms);
        }
        Duration::from_millis(self.with(|rng| rng.gen_range(min_ms..=max_ms)))
    }

    /// Uppercase base-36 token of `len` characters.
    pub fn token(&self, len: usize) -> String {
        self.with(|rng| {
            (0..len)
                .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
                .collect()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    None,
    Fixed(Duration),
    Uniform { min_ms: u64, max_ms: u64 },
}

impl Latency {
    pub fn fixed_ms(ms: u64) -> Self {
        if ms == 0 {
            Self::None
        } else {
            Self::Fixed(Duration::from_millis(ms))
        }
    }

    pub fn uniform_ms(min_ms: u64, max_ms: u64) -> Self {
        if max_ms == 0 {
            Self::None
        } else {
            Self::Uniform { min_ms, max_ms }
        }
    }

    pub async fn wait(&self, rng: &SimRng) {
        let delay = match *self {
            Self::None => return,
            Self::Fixed(delay) => delay,
            Self::Uniform { min_ms, max_ms } => rng.millis_between(min_ms, max_ms),
        };
        tokio::time::sleep(delay).await;
    }
}

/// Every backend a panel can call.
pub struct Services {
    pub upload: UploadService,
    pub outreach: OutreachService,
    pub vault: VaultService,
    pub sponsors: SponsorDirectory,
    pub qr: QrService,
    pub descriptions: DescriptionService,
    pub rng: SimRng,
}

impl Services {
    pub fn from_config(config: &ConsoleConfig, sponsor_store: Arc<SponsorStore>) -> Self {
        let rng = SimRng::from_config(config.rng_seed);
        let latency = &config.latency;

        Self {
            upload: UploadService::new(Latency::fixed_ms(latency.upload_ms), rng.clone()),
            outreach: OutreachService::new(
                Latency::uniform_ms(latency.channel_min_ms, latency.channel_max_ms),
                config.failure.email_failure_rate,
                rng.clone(),
            ),
            vault: VaultService::new(
                [
                    Latency::fixed_ms(latency.vault_connect_ms),
                    Latency::fixed_ms(latency.vault_encrypt_ms),
                    Latency::fixed_ms(latency.vault_hash_ms),
                ],
                rng.clone(),
            ),
            sponsors: SponsorDirectory::new(
                sponsor_store,
                Latency::fixed_ms(latency.sponsor_list_ms),
                Latency::fixed_ms(latency.sponsor_link_ms),
                rng.clone(),
            ),
            qr: QrService::from_config(&config.qr),
            descriptions: DescriptionService::from_config(
                config,
                Latency::fixed_ms(latency.description_ms),
                rng.clone(),
            ),
            rng,
        }
    }
}
