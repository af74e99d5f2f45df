use super::model::{PLACEHOLDER_IMAGE, Track};

fn builtin(id: &str, title: &str, description: &str, file: &str, duration_secs: u64) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        audio_url: format!("/meditations/{file}"),
        duration_secs,
        built_in: true,
        image_url: PLACEHOLDER_IMAGE.to_string(),
    }
}

/// The tracks shipped with the app. The first one is the default.
pub fn builtin_tracks() -> Vec<Track> {
    vec![
        builtin(
            "1",
            "Body Scan",
            "A guided meditation to help you connect with your body.",
            "body-scan.mp3",
            300,
        ),
        builtin(
            "2",
            "Breath Awareness",
            "Focus on your breath to anchor yourself in the present moment.",
            "breath-awareness.mp3",
            180,
        ),
        builtin(
            "3",
            "Mindful Relaxation",
            "Release tension and find deep relaxation with this guided practice.",
            "mindful-relaxation.mp3",
            600,
        ),
    ]
}
