//! Media keys and desktop widgets over D-Bus (MPRIS).
//!
//! The service runs on its own thread. Incoming method calls are forwarded
//! as `ControlCmd`s to the event loop; the loop publishes what the session
//! is doing through `MprisHandle`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use log::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::audio::PlaybackState;
use crate::library::Track;

pub const BUS_NAME: &str = "org.mpris.MediaPlayer2.mindful";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    /// Ends the session.
    Stop,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MprisStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl MprisStatus {
    pub fn from_playback(state: &PlaybackState, session_active: bool) -> Self {
        if !session_active {
            return MprisStatus::Stopped;
        }
        match state {
            PlaybackState::Playing => MprisStatus::Playing,
            _ => MprisStatus::Paused,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            MprisStatus::Stopped => "Stopped",
            MprisStatus::Playing => "Playing",
            MprisStatus::Paused => "Paused",
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    status: MprisStatus,
    track_id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
}

#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_status(&self, status: MprisStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.status = status;
        }
    }

    /// Publish the session's track; `None` clears the metadata.
    pub fn set_session(&self, session: Option<(&Track, u64)>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match session {
            Some((track, duration_secs)) => {
                s.track_id = Some(track_object_path(&track.id));
                s.title = Some(track.title.clone());
                s.url = Some(track.audio_url.clone());
                s.length_micros = i64::try_from(duration_secs.saturating_mul(1_000_000)).ok();
            }
            None => {
                s.track_id = None;
                s.title = None;
                s.url = None;
                s.length_micros = None;
            }
        }
    }
}

/// D-Bus object paths only allow `[A-Za-z0-9_]` per element.
fn track_object_path(id: &str) -> String {
    let element: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{OBJECT_PATH}/track/{element}")
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

fn metadata_map(s: &SharedState) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();

    let track_id = s
        .track_id
        .clone()
        .unwrap_or_else(|| "/org/mpris/MediaPlayer2/TrackList/NoTrack".to_string());
    if let Some(v) = ObjectPath::try_from(track_id)
        .ok()
        .and_then(|p| owned(Value::from(p)))
    {
        map.insert("mpris:trackid".to_string(), v);
    }
    if let Some(v) = s.title.clone().and_then(|t| owned(Value::from(t))) {
        map.insert("xesam:title".to_string(), v);
    }
    if let Some(v) = s.url.clone().and_then(|u| owned(Value::from(u))) {
        map.insert("xesam:url".to_string(), v);
    }
    if let Some(v) = s.length_micros.and_then(|l| owned(Value::from(l))) {
        map.insert("mpris:length".to_string(), v);
    }
    map
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "mindful"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    // A session has no track list to move through.
    fn next(&self) {}

    fn previous(&self) {}

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.state
            .lock()
            .map(|s| s.status.as_str())
            .unwrap_or("Stopped")
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.state
            .lock()
            .map(|s| metadata_map(&s))
            .unwrap_or_default()
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }
            info!("MPRIS: serving {BUS_NAME}");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
