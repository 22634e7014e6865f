use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, FieldErrors, FormState, SubmissionState};
use crate::services::Latency;
use crate::store::models::Language;
use crate::timeline::{active_caption, caption_fixture, to_srt, HighlightSegment, KeywordSet, TimelinePlayer};
use serde::Serialize;
use std::collections::BTreeMap;

pub const SYNC_COMPLETE: &str = "Sync analysis complete. Timeline is now active.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    AudioEn,
    AudioBn,
    SubtitlesSrt,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 3] = [Self::AudioEn, Self::AudioBn, Self::SubtitlesSrt];

    pub fn id(self) -> &'static str {
        match self {
            Self::AudioEn => "audio_en",
            Self::AudioBn => "audio_bn",
            Self::SubtitlesSrt => "subtitles_srt",
        }
    }

    /// Button text for an empty slot.
    pub fn upload_label(self) -> &'static str {
        match self {
            Self::AudioEn => "Upload AUDIO EN",
            Self::AudioBn => "Upload AUDIO BN",
            Self::SubtitlesSrt => "Upload SUBTITLES SRT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleForm {
    pub episode_number: String,
    /// Selected file name per slot. Slots are optional.
    pub assets: BTreeMap<AssetSlot, String>,
    pub keywords: String,
}

impl Default for SubtitleForm {
    fn default() -> Self {
        Self {
            episode_number: "42".to_string(),
            assets: BTreeMap::new(),
            keywords: "reform, civic action, diaspora justice, transparency".to_string(),
        }
    }
}

impl SubtitleForm {
    pub fn attach(&mut self, slot: AssetSlot, file_name: &str) {
        self.assets.insert(slot, file_name.to_string());
    }

    pub fn slot_label(&self, slot: AssetSlot) -> String {
        match self.assets.get(&slot) {
            Some(name) => format!("✔️ {}", name),
            None => slot.upload_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionPreview {
    pub primary: Vec<HighlightSegment>,
    pub secondary: Vec<HighlightSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncPreview {
    pub current_time: f64,
    pub duration: f64,
    /// `current_time / duration × 100`.
    pub playhead_percent: f64,
    pub caption: Option<CaptionPreview>,
    /// Shown when no caption is active.
    pub idle_text: &'static str,
    pub synced: bool,
    pub notice: Option<&'static str>,
}

impl SyncPreview {
    pub fn clock_label(&self) -> String {
        format!("{:.1}s / {:.1}s", self.current_time, self.duration)
    }
}

pub struct SubtitleSyncPanel {
    ctx: PanelContext,
    form: FormState<()>,
    player: TimelinePlayer,
}

impl SubtitleSyncPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::VoiceSubtitleSync.id(), ctx.error_log.clone());
        let player = TimelinePlayer::from_config(&ctx.config.timeline);
        Self { ctx, form, player }
    }

    pub fn default_form(&self) -> SubtitleForm {
        let mut form = SubtitleForm::default();
        if let Some(ep) = self.ctx.episode.get() {
            form.episode_number = ep.ep_number.clone();
        }
        form
    }

    pub fn state(&self) -> SubmissionState<()> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    pub fn is_synced(&self) -> bool {
        self.form.state().success().is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_running()
    }

    /// "Analyze & Sync": stop any running timeline, wait out the analysis,
    /// then restart playback from zero.
    pub async fn analyze(&self, input: &SubtitleForm) -> Result<(), AppError> {
        let episode = self.form.check(|errors| {
            require_positive_int(errors, "episode_number", &input.episode_number, EPISODE_NUMBER_INVALID)
        })?;

        self.player.stop();
        self.form
            .run(async {
                log::info!(
                    "Analyzing Ep{} with {} of {} asset(s)",
                    episode,
                    input.assets.len(),
                    AssetSlot::ALL.len()
                );
                let analysis = Latency::fixed_ms(self.ctx.config.latency.subtitle_analysis_ms);
                analysis.wait(&self.ctx.services.rng).await;
                self.player.start();
                Ok(())
            })
            .await
    }

    pub fn stop(&self) {
        self.player.stop();
    }

    pub fn preview(&self, input: &SubtitleForm) -> SyncPreview {
        let clock = self.player.snapshot();
        let t = clock.current_time();
        let keywords = KeywordSet::parse(&input.keywords);
        let synced = self.is_synced();

        let caption = active_caption(caption_fixture(), t).map(|entry| CaptionPreview {
            primary: keywords.highlight(entry.text(Language::En)),
            secondary: keywords.highlight(entry.text(Language::Bn)),
        });

        SyncPreview {
            current_time: t,
            duration: clock.duration(),
            playhead_percent: clock.playhead_percent(),
            caption,
            idle_text: if synced { "..." } else { "Awaiting sync analysis" },
            synced,
            notice: synced.then_some(SYNC_COMPLETE),
        }
    }

    /// SubRip text for one language. Offered only after a sync.
    pub fn export_srt(&self, lang: Language) -> Result<String, AppError> {
        if !self.is_synced() {
            return Err(AppError::Other(
                "Run sync analysis before exporting.".to_string(),
            ));
        }
        Ok(to_srt(caption_fixture(), lang))
    }
}
