// Edge-case tests for the in-memory stores
// Run with: cargo test --lib store::tests

mod sponsor_tests {
    use crate::store::models::SponsorStatus;
    use crate::store::SponsorStore;

    #[test]
    fn test_seeded_grid() {
        let store = SponsorStore::seeded();
        let sponsors = store.snapshot();
        assert_eq!(sponsors.len(), 5);
        assert_eq!(sponsors[1].id, "sp_02");
        assert_eq!(sponsors[1].status, SponsorStatus::Pending);
        assert_eq!(sponsors[1].linked_episode, None);
    }

    #[test]
    fn test_link_onboards_only_target() {
        let store = SponsorStore::seeded();
        let before = store.snapshot();

        let after = store.link("sp_02", "57");
        let linked = after.iter().find(|s| s.id == "sp_02").unwrap();
        assert_eq!(linked.status, SponsorStatus::Onboarded);
        assert_eq!(linked.linked_episode.as_deref(), Some("Ep57"));

        for (old, new) in before.iter().zip(after.iter()) {
            if old.id != "sp_02" {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_link_replaces_whole_collection() {
        let store = SponsorStore::seeded();
        let held = store.snapshot();
        store.link("sp_04", "60");

        // An earlier snapshot is untouched
        assert_eq!(held[3].status, SponsorStatus::Pending);
        assert_eq!(store.snapshot()[3].status, SponsorStatus::Onboarded);
    }

    #[test]
    fn test_relink_overwrites_episode() {
        let store = SponsorStore::seeded();
        store.link("sp_01", "43");
        let after = store.link("sp_01", "44");
        assert_eq!(after[0].linked_episode.as_deref(), Some("Ep44"));
    }

    #[test]
    fn test_link_unknown_sponsor_returns_grid_unchanged() {
        let store = SponsorStore::seeded();
        let before = store.snapshot();
        let after = store.link("sp_99", "57");
        assert_eq!(*before, *after);
        assert_eq!(*before, *store.snapshot());
    }
}

mod playlist_tests {
    use crate::error::AppError;
    use crate::store::PlaylistStore;

    #[test]
    fn test_bundle_appends_episode() {
        let store = PlaylistStore::seeded();
        let outcome = store.bundle("PL-SO", "Ep57_Sponsors").unwrap();
        assert!(outcome.added);
        assert_eq!(outcome.playlist_name, "Sponsor_Onboarding");

        let playlists = store.snapshot();
        let target = playlists.iter().find(|p| p.id == "PL-SO").unwrap();
        assert_eq!(target.video_ids, vec!["S01", "S02", "Ep57_Sponsors"]);
    }

    #[test]
    fn test_bundle_is_idempotent() {
        let store = PlaylistStore::seeded();
        let outcome = store.bundle("PL-FS", "Ep42").unwrap();
        assert!(!outcome.added);

        let playlists = store.snapshot();
        let target = playlists.iter().find(|p| p.id == "PL-FS").unwrap();
        assert_eq!(target.video_ids.len(), 2);
    }

    #[test]
    fn test_bundle_unknown_playlist() {
        let store = PlaylistStore::seeded();
        assert!(matches!(store.bundle("PL-XX", "Ep1"), Err(AppError::NotFound(_))));
    }
}

mod context_tests {
    use crate::store::models::ActiveEpisode;
    use crate::store::EpisodeContext;

    #[test]
    fn test_context_starts_empty_and_overwrites() {
        let ctx = EpisodeContext::new();
        assert!(ctx.get().is_none());

        let shared = ctx.clone();
        ctx.set(ActiveEpisode {
            ep_number: "56".into(),
            title: "CivicTechIntegration".into(),
            external_video_id: "abc".into(),
        });
        assert_eq!(shared.get().unwrap().ep_number, "56");

        let first = shared.get().unwrap();
        ctx.set(ActiveEpisode {
            ep_number: "57".into(),
            title: "Next".into(),
            external_video_id: "def".into(),
        });
        assert_eq!(first.ep_number, "56");
        assert_eq!(shared.get().unwrap().ep_number, "57");
    }
}
