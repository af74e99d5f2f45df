use crate::app::SessionView;
use crate::library::Track;
use crate::mpris::{MprisHandle, MprisStatus};

/// What MPRIS was last told, to avoid republishing every frame.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MprisSnapshot {
    status: MprisStatus,
    title: Option<String>,
    duration_secs: u64,
}

impl MprisSnapshot {
    fn of(view: &SessionView) -> Self {
        Self {
            status: MprisStatus::from_playback(&view.state, view.active),
            title: view.active.then(|| view.title.clone()),
            duration_secs: view.duration_secs,
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, view: &SessionView, track: &Track, last: &mut MprisSnapshot) {
    let next = MprisSnapshot::of(view);
    if next == *last {
        return;
    }
    mpris.set_status(next.status);
    mpris.set_session(view.active.then_some((track, view.duration_secs)));
    *last = next;
}
