use super::*;
use crate::audio::ErrorReason;
use crate::library::builtin_tracks;
use std::sync::mpsc;

fn handle_and_iface() -> (MprisHandle, PlayerIface, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let handle = MprisHandle {
        state: state.clone(),
    };
    (handle, PlayerIface { tx, state }, rx)
}

#[test]
fn status_follows_the_session() {
    assert_eq!(
        MprisStatus::from_playback(&PlaybackState::Playing, false),
        MprisStatus::Stopped
    );
    assert_eq!(
        MprisStatus::from_playback(&PlaybackState::Playing, true),
        MprisStatus::Playing
    );
    assert_eq!(
        MprisStatus::from_playback(&PlaybackState::Loading, true),
        MprisStatus::Paused
    );
    assert_eq!(
        MprisStatus::from_playback(&PlaybackState::Error(ErrorReason::Unavailable), true),
        MprisStatus::Paused
    );
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (handle, iface, _rx) = handle_and_iface();
    assert_eq!(iface.playback_status(), "Stopped");

    handle.set_status(MprisStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");

    handle.set_status(MprisStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn set_session_publishes_and_clears_metadata() {
    let (handle, iface, _rx) = handle_and_iface();
    let track = builtin_tracks().remove(1);

    handle.set_session(Some((&track, 180)));
    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:url", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
    {
        let s = iface.state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Breath Awareness"));
        assert_eq!(s.length_micros, Some(180_000_000));
        assert_eq!(
            s.track_id.as_deref(),
            Some("/org/mpris/MediaPlayer2/track/2")
        );
    }

    handle.set_session(None);
    let map = iface.metadata();
    assert!(map.contains_key("mpris:trackid"));
    assert!(!map.contains_key("xesam:title"));
    assert!(!map.contains_key("mpris:length"));
}

#[test]
fn track_ids_become_valid_object_paths() {
    assert_eq!(
        track_object_path("file-12"),
        "/org/mpris/MediaPlayer2/track/file_12"
    );
    assert!(ObjectPath::try_from(track_object_path("user-1.x")).is_ok());
}

#[test]
fn player_methods_forward_commands() {
    let (_handle, iface, rx) = handle_and_iface();
    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop
        ]
    );
}
