//! End-to-end dashboard scenarios against the instant, offline profile.

use episode_console_lib::config::ConsoleConfig;
use episode_console_lib::panels::{ArchiveForm, Dashboard, ModalPhase, ModuleKind, SponsorLinkForm, UploadForm};
use episode_console_lib::services::VideoFile;
use episode_console_lib::store::models::SponsorStatus;
use std::time::Duration;

fn dashboard() -> Dashboard {
    Dashboard::new(ConsoleConfig::instant())
}

fn video(name: &str) -> VideoFile {
    VideoFile {
        name: name.to_string(),
        size_bytes: 1_048_576,
    }
}

#[tokio::test]
async fn upload_sets_context_for_every_panel() {
    let dashboard = dashboard();
    let form = UploadForm {
        ep_number: "57".into(),
        title: "DiasporaJustice".into(),
        file: Some(video("episode57.mp4")),
        ..UploadForm::default()
    };

    let outcome = dashboard.upload.submit(&form).await.unwrap();
    assert_eq!(outcome.video_id, "dQw4w9WgXcQ");
    assert_eq!(
        dashboard.active_context_banner().as_deref(),
        Some("ACTIVE CONTEXT: Ep57 - DiasporaJustice (ID: dQw4w9WgXcQ)")
    );

    assert_eq!(dashboard.playlist.default_form().episode_id, "Ep57_DiasporaJustice");
    assert_eq!(dashboard.qr_overlay.default_form().episode_number, "57");
    assert_eq!(dashboard.thumbnail.default_form().title_en, "DiasporaJustice");
    assert_eq!(dashboard.description.default_form().ep_number, "57");
    assert_eq!(dashboard.broadcast.default_form().episode_number(), "57");
    assert_eq!(dashboard.archive.default_form().episode_number, "57");
    assert_eq!(dashboard.subtitle_sync.default_form().episode_number, "57");

    let report = dashboard.diagnostics();
    assert_eq!(report.active_episode.map(|ep| ep.title), Some("DiasporaJustice".to_string()));
}

#[tokio::test]
async fn empty_upload_form_reports_three_errors_and_keeps_context() {
    let dashboard = dashboard();
    let form = UploadForm {
        ep_number: "0".into(),
        title: "".into(),
        file: None,
        ..UploadForm::default()
    };

    let err = dashboard.upload.submit(&form).await.unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["ep_number", "file", "title"]);
    assert!(dashboard.active_context_banner().is_none());
    assert!(dashboard.context().error_log.get_errors().is_empty());
}

#[tokio::test]
async fn failing_upload_is_logged_for_diagnostics() {
    let dashboard = dashboard();
    let form = UploadForm {
        file: Some(video("will_fail.mp4")),
        ..UploadForm::default()
    };

    assert!(dashboard.upload.submit(&form).await.is_err());
    let report = dashboard.diagnostics();
    assert_eq!(report.recent_errors.len(), 1);
    assert_eq!(report.recent_errors[0].module, "upload_manager");
    assert!(report.active_episode.is_none());
}

#[tokio::test]
async fn archive_sentinel_episode_fails_without_result() {
    let dashboard = dashboard();
    let form = ArchiveForm {
        episode_number: "0".into(),
        ..ArchiveForm::default()
    };

    assert!(dashboard.archive.submit(&form).await.is_err());
    assert!(dashboard.archive.log().iter().any(|line| line.contains("FAILED")));
    assert!(dashboard.archive.state().success().is_none());
}

#[tokio::test]
async fn sponsor_link_updates_shared_grid() {
    let dashboard = dashboard();
    dashboard.sponsor_sync.load().await.unwrap();
    let before = dashboard.context().sponsors.snapshot();

    let form = SponsorLinkForm {
        sponsor_id: "sp_02".into(),
        episode_number: "57".into(),
    };
    dashboard.sponsor_sync.submit(&form).await.unwrap();

    let after = dashboard.diagnostics().sponsors;
    for (old, new) in before.iter().zip(&after) {
        if new.id == "sp_02" {
            assert_eq!(new.status, SponsorStatus::Onboarded);
            assert_eq!(new.linked_episode.as_deref(), Some("Ep57"));
        } else {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn modal_tracks_open_module() {
    let dashboard = dashboard();
    dashboard.modal.open(ModuleKind::StatChartUploader);
    assert_eq!(dashboard.modal.phase(), ModalPhase::Opening(ModuleKind::StatChartUploader));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(dashboard.modal.phase(), ModalPhase::Open(ModuleKind::StatChartUploader));
    assert_eq!(
        dashboard.diagnostics().open_module.as_deref(),
        Some("stat_chart_uploader")
    );

    dashboard.modal.close();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(dashboard.modal.phase(), ModalPhase::Closed);
}
