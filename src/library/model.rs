pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
pub const DEFAULT_TRACK_SECS: u64 = 300;

/// A guided meditation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Audio source locator: URL, `file://` URL or path.
    pub audio_url: String,
    /// Nominal length of the recording in seconds.
    pub duration_secs: u64,
    pub built_in: bool,
    pub image_url: String,
}
