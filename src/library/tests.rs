use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn builtins_come_first_and_default_to_body_scan() {
    let catalog = Catalog::new(Vec::new());
    assert_eq!(catalog.len(), 3);
    assert!(catalog.tracks().iter().all(|t| t.built_in));
    assert_eq!(catalog.default_track().title, "Body Scan");
    assert_eq!(catalog.default_track().audio_url, "/meditations/body-scan.mp3");
    assert_eq!(catalog.get(1).map(|t| t.duration_secs), Some(180));
}

#[test]
fn user_track_applies_form_defaults() {
    let entry = TrackEntry {
        audio_url: "https://example.com/evening.mp3".into(),
        title: Some("   ".into()),
        duration_secs: Some(0),
        ..TrackEntry::default()
    };
    let t = user_track(&entry, "user-1".into());

    assert_eq!(t.title, "Untitled Meditation");
    assert_eq!(t.duration_secs, DEFAULT_TRACK_SECS);
    assert_eq!(t.image_url, PLACEHOLDER_IMAGE);
    assert_eq!(t.description, "");
    assert!(!t.built_in);
}

#[test]
fn load_appends_config_tracks_and_scanned_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Evening Wind Down.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        tracks: vec![
            TrackEntry {
                audio_url: "/meditations/walk.mp3".into(),
                title: Some("Walking".into()),
                duration_secs: Some(420),
                ..TrackEntry::default()
            },
            // No source: skipped.
            TrackEntry::default(),
        ],
        user_dir: Some(dir.path().to_path_buf()),
        ..LibrarySettings::default()
    };
    let catalog = Catalog::load(&settings);

    let titles: Vec<&str> = catalog.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Body Scan",
            "Breath Awareness",
            "Mindful Relaxation",
            "Walking",
            "Evening Wind Down",
        ]
    );
    assert_eq!(catalog.get(3).map(|t| t.id.as_str()), Some("user-1"));
    assert_eq!(catalog.get(3).map(|t| t.duration_secs), Some(420));
}

#[test]
fn catalog_never_accepts_extra_built_ins() {
    let mut fake = builtin_tracks().remove(0);
    fake.id = "x".into();
    let catalog = Catalog::new(vec![fake]);
    assert_eq!(catalog.len(), 3);
}
