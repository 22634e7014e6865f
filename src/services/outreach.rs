use super::{Latency, SimRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    WhatsApp,
    Email,
    FlushingNode,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::WhatsApp, Channel::Email, Channel::FlushingNode];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WhatsApp => write!(f, "WhatsApp"),
            Self::Email => write!(f, "Email"),
            Self::FlushingNode => write!(f, "FlushingNode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastPayload {
    pub episode_number: String,
    pub message: String,
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastResult {
    pub channel: Channel,
    pub status: BroadcastStatus,
    pub message: String,
}

pub struct OutreachService {
    latency: Latency,
    email_failure_rate: f64,
    rng: SimRng,
}

impl OutreachService {
    pub fn new(latency: Latency, email_failure_rate: f64, rng: SimRng) -> Self {
        Self {
            latency,
            email_failure_rate,
            rng,
        }
    }

    async fn send_to_channel(&self, channel: Channel) -> BroadcastResult {
        self.latency.wait(&self.rng).await;

        if channel == Channel::Email && self.rng.roll(self.email_failure_rate) {
            BroadcastResult {
                channel,
                status: BroadcastStatus::Failed,
                message: "SMTP server connection timed out.".to_string(),
            }
        } else {
            BroadcastResult {
                channel,
                status: BroadcastStatus::Success,
                message: format!("Broadcast to {} successful.", channel),
            }
        }
    }

    /// Dispatch to each channel in order, one at a time, reporting every
    /// outcome on `progress`. A failed channel does not stop the rest.
    #[tracing::instrument(skip_all, fields(ep = %payload.episode_number, channels = payload.channels.len()))]
    pub async fn broadcast(&self, payload: &BroadcastPayload, progress: mpsc::Sender<BroadcastResult>) {
        log::info!(
            "Initiating diaspora broadcast for Ep{} to {} channel(s)",
            payload.episode_number,
            payload.channels.len()
        );

        for &channel in &payload.channels {
            let result = self.send_to_channel(channel).await;
            match result.status {
                BroadcastStatus::Success => log::info!("{}", result.message),
                BroadcastStatus::Failed => log::warn!("{} dispatch failed: {}", channel, result.message),
            }
            if progress.send(result).await.is_err() {
                log::warn!("Broadcast progress receiver dropped");
            }
        }

        log::info!("Diaspora broadcast sequence complete");
    }
}
