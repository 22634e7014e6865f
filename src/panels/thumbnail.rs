use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, require_text, FieldErrors, FormState, SubmissionState};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailTheme {
    Collapse,
    #[default]
    Curriculum,
    Diaspora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    /// Gradient stops, top-left to bottom-right.
    pub background: [&'static str; 3],
    pub accent: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl ThumbnailTheme {
    pub const ALL: [ThumbnailTheme; 3] = [Self::Collapse, Self::Curriculum, Self::Diaspora];

    pub fn id(self) -> &'static str {
        match self {
            Self::Collapse => "collapse",
            Self::Curriculum => "curriculum",
            Self::Diaspora => "diaspora",
        }
    }

    pub fn palette(self) -> ThemePalette {
        match self {
            Self::Collapse => ThemePalette {
                background: ["gray-900", "gray-800", "black"],
                accent: "red-400",
                title: "white",
                subtitle: "gray-300",
            },
            Self::Curriculum => ThemePalette {
                background: ["blue-900", "gray-900", "cyan-900"],
                accent: "cyan-400",
                title: "white",
                subtitle: "blue-200",
            },
            Self::Diaspora => ThemePalette {
                background: ["indigo-900", "purple-900", "gray-900"],
                accent: "amber-400",
                title: "white",
                subtitle: "indigo-200",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailForm {
    pub ep_number: String,
    pub title_en: String,
    pub title_bn: String,
    pub theme: ThumbnailTheme,
}

impl Default for ThumbnailForm {
    fn default() -> Self {
        Self {
            ep_number: "42".to_string(),
            title_en: "Food Safety".to_string(),
            title_bn: "খাদ্য নিরাপত্তা".to_string(),
            theme: ThumbnailTheme::Curriculum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailSpec {
    pub badge: String,
    pub title_en: String,
    pub title_bn: String,
    pub theme: ThumbnailTheme,
    pub palette: ThemePalette,
}

pub struct ThumbnailPanel {
    ctx: PanelContext,
    form: FormState<ThumbnailSpec>,
}

impl ThumbnailPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::ThumbnailCreator.id(), ctx.error_log.clone());
        Self { ctx, form }
    }

    /// Episode number and English title follow the active episode.
    pub fn default_form(&self) -> ThumbnailForm {
        let mut form = ThumbnailForm::default();
        if let Some(ep) = self.ctx.episode.get() {
            form.ep_number = ep.ep_number.clone();
            form.title_en = ep.title.clone();
        }
        form
    }

    pub fn state(&self) -> SubmissionState<ThumbnailSpec> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Any edit hides the previously generated thumbnail.
    pub fn edited(&self) {
        self.form.reset();
    }

    pub fn generate(&self, input: &ThumbnailForm) -> Result<ThumbnailSpec, AppError> {
        let spec = self.form.check(|errors| {
            let ep = require_positive_int(errors, "ep_number", &input.ep_number, EPISODE_NUMBER_INVALID);
            let title_en = require_text(errors, "title_en", &input.title_en, "English title is required.");
            Some(ThumbnailSpec {
                badge: format!("EP {}", ep?),
                title_en: title_en?,
                title_bn: input.title_bn.trim().to_string(),
                theme: input.theme,
                palette: input.theme.palette(),
            })
        })?;

        log::info!("Thumbnail generated with '{}' theme", input.theme.id());
        self.form.complete(Ok(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::test_support;

    #[test]
    fn generates_spec_with_theme_palette() {
        let panel = ThumbnailPanel::new(test_support::context());
        let spec = panel.generate(&panel.default_form()).unwrap();
        assert_eq!(spec.badge, "EP 42");
        assert_eq!(spec.theme, ThumbnailTheme::Curriculum);
        assert_eq!(spec.palette.accent, "cyan-400");

        panel.edited();
        assert_eq!(panel.state(), SubmissionState::Idle);
    }

    #[test]
    fn every_theme_has_distinct_accent() {
        let accents: Vec<&str> = ThumbnailTheme::ALL.iter().map(|t| t.palette().accent).collect();
        assert_eq!(accents, vec!["red-400", "cyan-400", "amber-400"]);
    }

    #[test]
    fn rejects_zero_episode_and_blank_title() {
        let panel = ThumbnailPanel::new(test_support::context());
        let input = ThumbnailForm {
            ep_number: "0".into(),
            title_en: " ".into(),
            ..ThumbnailForm::default()
        };
        let err = panel.generate(&input).unwrap_err();
        assert_eq!(err.field_errors().unwrap().len(), 2);
    }
}
