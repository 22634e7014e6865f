use super::{ModuleKind, PanelContext};
use crate::chart::{dispatch_hover, parse_chart_input, ChartKind, ChartLayout, ParsedChart, PointerEvent, Tooltip};
use crate::error::AppError;
use crate::forms::{read_lock, write_lock, FieldErrors, FormState, SubmissionState};
use crate::timer::ScopedTask;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

pub const EMPTY_CHART: &str = "Enter data to generate a chart.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartForm {
    pub title: String,
    pub kind: ChartKind,
    /// Comma separated.
    pub labels: String,
    /// Comma separated; entries that are not numbers are ignored.
    pub values: String,
}

impl Default for ChartForm {
    fn default() -> Self {
        Self {
            title: "Army Arrest Grid".to_string(),
            kind: ChartKind::Bar,
            labels: "Dhaka, Chittagong, Sylhet, Rajshahi".to_string(),
            values: "65, 42, 28, 15".to_string(),
        }
    }
}

/// What the live preview shows for the current form.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPreview {
    pub title: String,
    pub parsed: ParsedChart,
    pub layout: Option<Arc<ChartLayout>>,
}

impl ChartPreview {
    pub fn svg(&self) -> Option<String> {
        self.layout.as_ref().map(|layout| layout.to_svg())
    }

    /// Shown in place of the chart when there is nothing to draw.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.layout.is_none().then_some(EMPTY_CHART)
    }

    /// Upload is offered only for drawable input.
    pub fn can_upload(&self) -> bool {
        self.layout.is_some()
    }
}

pub struct StatChartPanel {
    ctx: PanelContext,
    form: FormState<String>,
    layout: RwLock<Option<Arc<ChartLayout>>>,
    tooltip: RwLock<Option<Tooltip>>,
    notice: Arc<RwLock<Option<String>>>,
    notice_timer: Mutex<Option<ScopedTask>>,
}

impl StatChartPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::StatChartUploader.id(), ctx.error_log.clone());
        Self {
            ctx,
            form,
            layout: RwLock::new(None),
            tooltip: RwLock::new(None),
            notice: Arc::new(RwLock::new(None)),
            notice_timer: Mutex::new(None),
        }
    }

    pub fn default_form(&self) -> ChartForm {
        ChartForm::default()
    }

    pub fn state(&self) -> SubmissionState<String> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Re-parse `input` and rebuild the layout the pointer handlers use.
    /// Any visible tooltip belongs to the old layout and is cleared.
    pub fn preview(&self, input: &ChartForm) -> ChartPreview {
        let parsed = parse_chart_input(&input.labels, &input.values);
        let layout = match &parsed {
            ParsedChart::Data(data) => Some(Arc::new(ChartLayout::build(input.kind, data))),
            _ => None,
        };

        *write_lock(&self.layout) = layout.clone();
        *write_lock(&self.tooltip) = None;

        ChartPreview {
            title: input.title.clone(),
            parsed,
            layout,
        }
    }

    pub fn hover(&self, event: PointerEvent) {
        let layout = read_lock(&self.layout).clone();
        let mut slot = write_lock(&self.tooltip);
        match layout {
            Some(layout) => dispatch_hover(&layout, event, &mut |tip| *slot = tip),
            None => *slot = None,
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        read_lock(&self.tooltip).clone()
    }

    pub fn notice(&self) -> Option<String> {
        read_lock(&self.notice).clone()
    }

    /// Publish the chart. The success notice clears itself after
    /// `ui.chart_notice_ms`; a second upload restarts that timer.
    /// Must be called from within a Tokio runtime.
    pub fn upload(&self, input: &ChartForm) -> Result<String, AppError> {
        let title = self.form.check(|errors| {
            match parse_chart_input(&input.labels, &input.values) {
                ParsedChart::Invalid(message) => errors.insert("values", &message),
                ParsedChart::Empty => errors.insert("values", EMPTY_CHART),
                ParsedChart::Data(_) => {}
            }
            Some(input.title.trim().to_string())
        })?;

        let message = format!("Chart '{}' uploaded successfully.", title);
        *write_lock(&self.notice) = Some(message.clone());

        let notice = self.notice.clone();
        let delay = Duration::from_millis(self.ctx.config.ui.chart_notice_ms);
        let timer = ScopedTask::delay(delay, move || {
            *write_lock(&notice) = None;
        });
        let previous = self
            .notice_timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(timer);
        drop(previous);

        log::info!("Chart '{}' uploaded ({:?})", title, input.kind);
        self.form.complete(Ok(message))
    }
}
