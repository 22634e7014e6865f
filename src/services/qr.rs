use crate::config::QrConfig;
use crate::error::AppError;
use reqwest::Url;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// QR image renderer backed by a public image endpoint.
pub struct QrService {
    endpoint: String,
    size: u32,
    client: Option<reqwest::Client>,
}

impl QrService {
    pub fn from_config(config: &QrConfig) -> Self {
        let client = if config.offline {
            None
        } else {
            Some(
                reqwest::Client::builder()
                    .timeout(REQUEST_TIMEOUT)
                    .build()
                    .unwrap_or_default(),
            )
        };
        Self {
            endpoint: config.endpoint.clone(),
            size: config.size,
            client,
        }
    }

    /// Build the image URL without contacting the endpoint.
    pub fn offline(endpoint: &str, size: u32) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            size,
            client: None,
        }
    }

    pub fn image_url(&self, data: &str) -> Result<Url, AppError> {
        let dimensions = format!("{0}x{0}", self.size);
        Url::parse_with_params(&self.endpoint, &[("size", dimensions.as_str()), ("data", data)])
            .map_err(|e| AppError::Config(format!("Invalid QR endpoint {}: {}", self.endpoint, e)))
    }

    /// Resolve the image URL for `data`. Online, the endpoint must answer
    /// with a success status and the final (post-redirect) URL is returned.
    pub async fn render(&self, data: &str) -> Result<String, AppError> {
        let url = self.image_url(data)?;

        let Some(client) = &self.client else {
            return Ok(url.to_string());
        };

        log::info!("Requesting QR image for {}", data);
        let response = client.get(url).send().await.map_err(|e| {
            log::warn!("QR request failed: {}", e);
            AppError::Service("QR code service is unavailable.".to_string())
        })?;

        if !response.status().is_success() {
            log::warn!("QR service returned {}", response.status());
            return Err(AppError::Service("QR code service is unavailable.".to_string()));
        }

        Ok(response.url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_encodes_target() {
        let service = QrService::offline("https://api.qrserver.com/v1/create-qr-code/", 128);
        let url = service.image_url("https://example.com/reform-form/ep42?a=b&c=d").unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("size".to_string(), "128x128".to_string()));
        assert_eq!(pairs[1].1, "https://example.com/reform-form/ep42?a=b&c=d");
        assert!(!url.as_str().contains("?a=b&c=d"));
    }

    #[test]
    fn bad_endpoint_is_config_error() {
        let service = QrService::offline("not a url", 128);
        assert!(matches!(service.image_url("x"), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn offline_render_skips_network() {
        let service = QrService::offline("https://qr.invalid/create", 64);
        let url = service.render("hello").await.unwrap();
        assert_eq!(url, "https://qr.invalid/create?size=64x64&data=hello");
    }
}
