//! Track catalog: the built-in meditations followed by the user's own.
//!
//! The session layer only reads from here. User tracks come from
//! `[[library.tracks]]` entries in the config file and from scanning
//! `library.user_dir`; nothing is ever written back.

mod builtin;
mod model;
mod scan;

pub use builtin::builtin_tracks;
pub use model::{DEFAULT_TRACK_SECS, PLACEHOLDER_IMAGE, Track};
pub use scan::scan;

use crate::config::{LibrarySettings, TrackEntry};

/// Build a user track from a config entry, filling the same defaults the
/// "add meditation" form applies.
pub fn user_track(entry: &TrackEntry, id: String) -> Track {
    let title = entry
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Untitled Meditation");

    Track {
        id,
        title: title.to_string(),
        description: entry.description.clone().unwrap_or_default(),
        audio_url: entry.audio_url.clone(),
        duration_secs: entry
            .duration_secs
            .filter(|&d| d > 0)
            .unwrap_or(DEFAULT_TRACK_SECS),
        built_in: false,
        image_url: entry
            .image_url
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
    }
}

/// An ordered, read-only list of tracks with a default.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(user_tracks: Vec<Track>) -> Self {
        let mut tracks = builtin_tracks();
        tracks.extend(user_tracks.into_iter().filter(|t| !t.built_in));
        Self { tracks }
    }

    pub fn load(settings: &LibrarySettings) -> Self {
        let mut user: Vec<Track> = settings
            .tracks
            .iter()
            .filter(|e| !e.audio_url.trim().is_empty())
            .enumerate()
            .map(|(i, e)| user_track(e, format!("user-{}", i + 1)))
            .collect();

        if let Some(dir) = &settings.user_dir {
            let scanned = scan(dir, settings);
            log::info!("found {} tracks in {}", scanned.len(), dir.display());
            user.extend(scanned);
        }

        Self::new(user)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track a session uses when none was picked.
    pub fn default_track(&self) -> &Track {
        // Built-ins are always present.
        &self.tracks[0]
    }
}

#[cfg(test)]
mod tests;
