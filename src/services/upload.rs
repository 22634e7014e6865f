use super::{Latency, SimRng};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Identifier returned by the simulated video host.
pub const MOCK_VIDEO_ID: &str = "dQw4w9WgXcQ";

const FAILURE_MARKER: &str = "fail";

/// A selected video file. Only the name and size are inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMetadata {
    pub ep_number: String,
    pub title: String,
    pub lang: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub video_id: String,
    pub watch_url: String,
}

impl UploadReceipt {
    fn for_video(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            watch_url: format!("https://www.youtube.com/watch?v={}", video_id),
        }
    }
}

pub struct UploadService {
    latency: Latency,
    rng: SimRng,
}

impl UploadService {
    pub fn new(latency: Latency, rng: SimRng) -> Self {
        Self { latency, rng }
    }

    /// Simulated upload. Fails when the filename carries the failure marker.
    #[tracing::instrument(skip_all, fields(file = %file.name, ep = %metadata.ep_number))]
    pub async fn upload(&self, file: &VideoFile, metadata: &UploadMetadata) -> Result<UploadReceipt, AppError> {
        log::info!(
            "Starting simulated upload of {} ({} bytes) as Ep{} \"{}\"",
            file.name,
            file.size_bytes,
            metadata.ep_number,
            metadata.title
        );

        self.latency.wait(&self.rng).await;

        if file.name.to_lowercase().contains(FAILURE_MARKER) {
            log::warn!("Simulated upload rejected: {}", file.name);
            return Err(AppError::Service(
                "Simulated upload failure: Invalid file format detected.".to_string(),
            ));
        }

        log::info!("Simulated upload successful. Video ID: {}", MOCK_VIDEO_ID);
        Ok(UploadReceipt::for_video(MOCK_VIDEO_ID))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> UploadMetadata {
        UploadMetadata {
            ep_number: "56".into(),
            title: "CivicTechIntegration".into(),
            lang: "EN".into(),
            description: "desc".into(),
            tags: vec!["GN AI".into()],
        }
    }

    #[tokio::test]
    async fn upload_returns_mock_id() {
        let service = UploadService::new(Latency::None, SimRng::seeded(0));
        let file = VideoFile { name: "episode56.mp4".into(), size_bytes: 1024 };
        let receipt = service.upload(&file, &metadata()).await.unwrap();
        assert_eq!(receipt.video_id, MOCK_VIDEO_ID);
        assert_eq!(receipt.watch_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn failure_marker_is_case_insensitive() {
        let service = UploadService::new(Latency::None, SimRng::seeded(0));
        let file = VideoFile { name: "Ep56_FAIL_cut.mp4".into(), size_bytes: 1 };
        let err = service.upload(&file, &metadata()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid file format"));
    }

    #[tokio::test(start_paused = true)]
    async fn upload_waits_for_latency() {
        let service = UploadService::new(Latency::fixed_ms(3000), SimRng::seeded(0));
        let file = VideoFile { name: "ok.mp4".into(), size_bytes: 1 };
        let start = tokio::time::Instant::now();
        service.upload(&file, &metadata()).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(3000));
    }
}
