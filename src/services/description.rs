use super::{Latency, SimRng};
use crate::config::ConsoleConfig;
use crate::ollama::OllamaClient;
use crate::store::models::EpisodeDetails;

/// Text returned in place of a description when generation fails.
pub const DESCRIPTION_FAILURE: &str =
    "Error: Could not generate description. Please check your API key and connection.";

enum Backend {
    Ollama(OllamaClient),
    Template,
}

/// Bilingual description writer. Never returns an error: any backend
/// failure becomes [`DESCRIPTION_FAILURE`].
pub struct DescriptionService {
    backend: Backend,
    latency: Latency,
    rng: SimRng,
}

impl DescriptionService {
    pub fn template(latency: Latency, rng: SimRng) -> Self {
        Self {
            backend: Backend::Template,
            latency,
            rng,
        }
    }

    pub fn ollama(client: OllamaClient, latency: Latency, rng: SimRng) -> Self {
        Self {
            backend: Backend::Ollama(client),
            latency,
            rng,
        }
    }

    pub fn from_config(config: &ConsoleConfig, latency: Latency, rng: SimRng) -> Self {
        if config.ollama.enabled {
            log::info!(
                "Description backend: Ollama at {} ({})",
                config.ollama.base_url,
                config.ollama.model
            );
            Self::ollama(OllamaClient::from_config(&config.ollama), latency, rng)
        } else {
            log::info!("Description backend: offline template writer");
            Self::template(latency, rng)
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Ollama(_) => "ollama",
            Backend::Template => "template",
        }
    }

    #[tracing::instrument(skip_all, fields(ep = %details.ep_number, backend = self.backend_name()))]
    pub async fn generate_description(&self, details: &EpisodeDetails) -> String {
        self.latency.wait(&self.rng).await;

        match &self.backend {
            Backend::Template => template_description(details),
            Backend::Ollama(client) => match client.describe_episode(details).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Error generating description: {}", e);
                    DESCRIPTION_FAILURE.to_string()
                }
            },
        }
    }
}

fn hashtag(tag: &str) -> Option<String> {
    let body: String = tag.chars().filter(|c| c.is_alphanumeric()).collect();
    (!body.is_empty()).then(|| format!("#{}", body))
}

/// Deterministic offline description with the same four-part layout the
/// model is asked for.
pub fn template_description(details: &EpisodeDetails) -> String {
    let theme = if details.theme.trim().is_empty() {
        "civic reform"
    } else {
        details.theme.trim()
    };

    let mut tags: Vec<String> = details.tags.iter().filter_map(|t| hashtag(t)).collect();
    tags.push(format!("#GNEp{}", details.ep_number));
    tags.push("#GNLegacy".to_string());

    format!(
        "Episode {ep}: {title}\n\n\
         In this episode of GN AI Authority we examine {theme} and what it means for \
         communities working toward transparent, accountable institutions.\n\n\
         পর্ব {ep}: {title}। এই পর্বে আমরা {theme} নিয়ে আলোচনা করি এবং স্বচ্ছ ও \
         জবাবদিহিমূলক প্রতিষ্ঠানের পথে আমাদের সম্প্রদায়ের ভূমিকা তুলে ধরি।\n\n\
         Diaspora members: share this episode, join the reform form, and bring the \
         conversation to your local node.\n\n\
         {tags}",
        ep = details.ep_number,
        title = details.title,
        theme = theme,
        tags = tags.join(" ")
    )
}
