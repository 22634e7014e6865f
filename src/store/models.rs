use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SponsorStatus {
    Pending,
    Active,
    Onboarded,
}

impl Default for SponsorStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for SponsorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Active => write!(f, "Active"),
            Self::Onboarded => write!(f, "Onboarded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    pub status: SponsorStatus,
    pub linked_episode: Option<String>,
}

impl Sponsor {
    fn fixture(id: &str, name: &str, status: SponsorStatus, linked_episode: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            linked_episode: linked_episode.map(str::to_string),
        }
    }
}

/// Sponsor grid as seeded at startup.
pub fn seed_sponsors() -> Vec<Sponsor> {
    vec![
        Sponsor::fixture("sp_01", "FutureScape Analytics", SponsorStatus::Active, Some("Ep42")),
        Sponsor::fixture("sp_02", "Diaspora Connect Initiative", SponsorStatus::Pending, None),
        Sponsor::fixture("sp_03", "Civic Ledger Foundation", SponsorStatus::Onboarded, Some("Ep51")),
        Sponsor::fixture("sp_04", "NourishNet Systems", SponsorStatus::Pending, None),
        Sponsor::fixture("sp_05", "Veritas Chain", SponsorStatus::Active, None),
    ]
}

/// The most recently uploaded episode, used to prefill other panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEpisode {
    pub ep_number: String,
    pub title: String,
    pub external_video_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "BN")]
    Bn,
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "EN"),
            Self::Bn => write!(f, "BN"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EN" => Ok(Self::En),
            "BN" => Ok(Self::Bn),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Input to the description writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub ep_number: String,
    pub title: String,
    pub lang: Language,
    pub date: String,
    pub theme: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub video_ids: Vec<String>,
}

impl Playlist {
    fn fixture(id: &str, name: &str, video_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            video_ids: video_ids.iter().map(|v| v.to_string()).collect(),
        }
    }
}

pub fn seed_playlists() -> Vec<Playlist> {
    vec![
        Playlist::fixture("PL-C1", "Cycle1_CollapseToCurriculum", &["Ep01", "Ep02", "Ep03", "Ep15"]),
        Playlist::fixture("PL-C2", "Cycle2_ConstitutionToDiaspora", &["Ep16", "Ep24", "Ep30"]),
        Playlist::fixture("PL-SO", "Sponsor_Onboarding", &["S01", "S02"]),
        Playlist::fixture("PL-FS", "FoodSafety_Surveillance", &["Ep42", "Ep48"]),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleOutcome {
    pub playlist_name: String,
    pub episode_id: String,
    /// False when the playlist already held the episode.
    pub added: bool,
}
