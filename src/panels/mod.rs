//! Dashboard panels
//!
//! One struct per dashboard module. Each panel validates a caller-owned
//! form, runs the matching service call through its [`FormState`] and keeps
//! the outcome for the view. Panels share state only through the injected
//! [`PanelContext`].
//!
//! [`FormState`]: crate::forms::FormState

pub mod archive;
pub mod broadcast;
pub mod description;
pub mod modal;
pub mod playlist;
pub mod qr_overlay;
pub mod sponsor_sync;
pub mod stat_chart;
pub mod subtitle_sync;
pub mod thumbnail;
pub mod upload;

use crate::config::ConsoleConfig;
use crate::diagnostics::{DiagnosticsReport, ErrorLog};
use crate::services::Services;
use crate::store::{EpisodeContext, PlaylistStore, SponsorStore};
use serde::Serialize;
use std::sync::Arc;

pub use archive::{ArchiveForm, ArchivePanel};
pub use broadcast::{BroadcastForm, BroadcastPanel};
pub use description::{DescriptionForm, DescriptionPanel};
pub use modal::{ModalPhase, ModuleModal};
pub use playlist::{BundleForm, PlaylistPanel};
pub use qr_overlay::{LinkDestination, QrForm, QrPanel};
pub use sponsor_sync::{SponsorLinkForm, SponsorSyncPanel};
pub use stat_chart::{ChartForm, StatChartPanel};
pub use subtitle_sync::{AssetSlot, SubtitleForm, SubtitleSyncPanel};
pub use thumbnail::{ThumbnailForm, ThumbnailPanel, ThumbnailTheme};
pub use upload::{UploadForm, UploadPanel};

pub(crate) const EPISODE_NUMBER_INVALID: &str = "Episode number must be a positive number.";

// ============================================================================
// Module registry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    UploadManager,
    PlaylistBundler,
    QrOverlayGenerator,
    ThumbnailCreator,
    DescriptionEncoder,
    DiasporaBroadcast,
    ArchiveToVault,
    SponsorGridSync,
    StatChartUploader,
    VoiceSubtitleSync,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 10] = [
        ModuleKind::UploadManager,
        ModuleKind::PlaylistBundler,
        ModuleKind::QrOverlayGenerator,
        ModuleKind::ThumbnailCreator,
        ModuleKind::DescriptionEncoder,
        ModuleKind::DiasporaBroadcast,
        ModuleKind::ArchiveToVault,
        ModuleKind::SponsorGridSync,
        ModuleKind::StatChartUploader,
        ModuleKind::VoiceSubtitleSync,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::UploadManager => "upload_manager",
            Self::PlaylistBundler => "playlist_bundler",
            Self::QrOverlayGenerator => "qr_overlay_generator",
            Self::ThumbnailCreator => "thumbnail_creator",
            Self::DescriptionEncoder => "description_encoder",
            Self::DiasporaBroadcast => "diaspora_broadcast",
            Self::ArchiveToVault => "archive_to_vault",
            Self::SponsorGridSync => "sponsor_grid_sync",
            Self::StatChartUploader => "stat_chart_uploader",
            Self::VoiceSubtitleSync => "voice_subtitle_sync",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::UploadManager => "Upload Manager",
            Self::PlaylistBundler => "Playlist Bundler",
            Self::QrOverlayGenerator => "QR Overlay Generator",
            Self::ThumbnailCreator => "Thumbnail Creator",
            Self::DescriptionEncoder => "Description Encoder",
            Self::DiasporaBroadcast => "Diaspora Broadcast",
            Self::ArchiveToVault => "Archive to Vault",
            Self::SponsorGridSync => "Sponsor Grid Sync",
            Self::StatChartUploader => "Stat Chart Uploader",
            Self::VoiceSubtitleSync => "Voice & Subtitle Sync",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::UploadManager => "Uploads episodes to YouTube with sovereign naming and metadata.",
            Self::PlaylistBundler => "Groups episodes into reform cycles and thematic playlists.",
            Self::QrOverlayGenerator => "Adds bilingual QR overlays to thumbnails and video frames.",
            Self::ThumbnailCreator => "Generates reform-themed thumbnails with poster logic.",
            Self::DescriptionEncoder => "Writes bilingual, encrypted descriptions with legacy tags via AI.",
            Self::DiasporaBroadcast => "Automates outreach to diaspora nodes (WhatsApp, Email).",
            Self::ArchiveToVault => "Stores each episode in GN AI Vault with timestamp and reform tag.",
            Self::SponsorGridSync => "Links sponsor onboarding logic to relevant episodes.",
            Self::StatChartUploader => "Uploads pie/bar charts for reform impact analysis.",
            Self::VoiceSubtitleSync => "Syncs bilingual voice and subtitle overlays for episodes.",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s.trim())
            .ok_or_else(|| format!("Unknown module: {}", s))
    }
}

// ============================================================================
// Shared context
// ============================================================================

/// Everything a panel may read or write outside its own form.
#[derive(Clone)]
pub struct PanelContext {
    pub config: Arc<ConsoleConfig>,
    pub episode: EpisodeContext,
    pub services: Arc<Services>,
    pub playlists: Arc<PlaylistStore>,
    pub sponsors: Arc<SponsorStore>,
    pub error_log: Arc<ErrorLog>,
}

impl PanelContext {
    pub fn new(config: ConsoleConfig) -> Self {
        let sponsors = Arc::new(SponsorStore::seeded());
        let services = Arc::new(Services::from_config(&config, sponsors.clone()));
        let error_log = Arc::new(ErrorLog::new(config.ui.error_log_capacity));

        Self {
            config: Arc::new(config),
            episode: EpisodeContext::new(),
            services,
            playlists: Arc::new(PlaylistStore::seeded()),
            sponsors,
            error_log,
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// All ten panels plus the modal that shows one of them at a time.
pub struct Dashboard {
    ctx: PanelContext,
    pub modal: ModuleModal,
    pub upload: UploadPanel,
    pub playlist: PlaylistPanel,
    pub qr_overlay: QrPanel,
    pub thumbnail: ThumbnailPanel,
    pub description: DescriptionPanel,
    pub broadcast: BroadcastPanel,
    pub archive: ArchivePanel,
    pub sponsor_sync: SponsorSyncPanel,
    pub stat_chart: StatChartPanel,
    pub subtitle_sync: SubtitleSyncPanel,
}

impl Dashboard {
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_context(PanelContext::new(config))
    }

    pub fn with_context(ctx: PanelContext) -> Self {
        log::info!("Dashboard ready with {} modules", ModuleKind::ALL.len());
        Self {
            modal: ModuleModal::from_config(&ctx.config.ui),
            upload: UploadPanel::new(ctx.clone()),
            playlist: PlaylistPanel::new(ctx.clone()),
            qr_overlay: QrPanel::new(ctx.clone()),
            thumbnail: ThumbnailPanel::new(ctx.clone()),
            description: DescriptionPanel::new(ctx.clone()),
            broadcast: BroadcastPanel::new(ctx.clone()),
            archive: ArchivePanel::new(ctx.clone()),
            sponsor_sync: SponsorSyncPanel::new(ctx.clone()),
            stat_chart: StatChartPanel::new(ctx.clone()),
            subtitle_sync: SubtitleSyncPanel::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    pub fn modules(&self) -> &'static [ModuleKind] {
        &ModuleKind::ALL
    }

    pub fn active_context_banner(&self) -> Option<String> {
        self.ctx.episode.get().map(|ep| {
            format!(
                "ACTIVE CONTEXT: Ep{} - {} (ID: {})",
                ep.ep_number, ep.title, ep.external_video_id
            )
        })
    }

    pub fn diagnostics(&self) -> DiagnosticsReport {
        DiagnosticsReport {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            config_source: self.ctx.config.source_label(),
            active_episode: self.ctx.episode.get().map(|ep| (*ep).clone()),
            open_module: self.modal.active_module().map(|m| m.id().to_string()),
            sponsors: self.ctx.sponsors.snapshot().to_vec(),
            playlist_count: self.ctx.playlists.snapshot().len(),
            recent_errors: self.ctx.error_log.get_errors(),
        }
    }
}
