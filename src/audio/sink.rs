//! Fetching sources and creating `rodio` sinks from them.
//!
//! A locator is either an `http(s)://` URL, a `file://` URL or a path.
//! Paths that do not exist as given are looked up under the media root, so
//! web-style locators like `/meditations/body-scan.mp3` work unchanged.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

#[derive(Debug, Error)]
pub(super) enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no HTTP client available")]
    NoClient,
    #[error("cannot decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Resolve a non-HTTP locator to a file on disk.
pub(super) fn resolve_path(locator: &str, media_root: &Path) -> PathBuf {
    let raw = locator.strip_prefix("file://").unwrap_or(locator);
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let path = PathBuf::from(&decoded);

    if path.is_absolute() && path.exists() {
        path
    } else {
        media_root.join(decoded.trim_start_matches('/'))
    }
}

fn is_http(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read the raw bytes behind `locator`.
pub(super) fn fetch_source(
    locator: &str,
    media_root: &Path,
    client: Option<&reqwest::blocking::Client>,
) -> Result<Arc<[u8]>, SourceError> {
    if is_http(locator) {
        let client = client.ok_or(SourceError::NoClient)?;
        let bytes = client.get(locator).send()?.error_for_status()?.bytes()?;
        return Ok(Arc::from(bytes.as_ref()));
    }

    let path = resolve_path(locator, media_root);
    std::fs::read(&path)
        .map(Arc::from)
        .map_err(|source| SourceError::Io { path, source })
}

/// Fail early when `bytes` is not something rodio can decode.
pub(super) fn verify_decodable(bytes: &Arc<[u8]>) -> Result<(), SourceError> {
    Decoder::new(Cursor::new(bytes.clone()))?;
    Ok(())
}

/// Create a paused `Sink` playing `bytes` from the start.
pub(super) fn create_sink(
    stream: &OutputStream,
    bytes: &Arc<[u8]>,
    volume: f32,
) -> Result<Sink, SourceError> {
    let source = Decoder::new(Cursor::new(bytes.clone()))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn web_style_paths_resolve_under_the_media_root() {
        let root = Path::new("/srv/mindful");
        assert_eq!(
            resolve_path("/meditations/body-scan.mp3", root),
            PathBuf::from("/srv/mindful/meditations/body-scan.mp3")
        );
        assert_eq!(
            resolve_path("file://meditations/Evening%20Calm.mp3", root),
            PathBuf::from("/srv/mindful/meditations/Evening Calm.mp3")
        );
    }

    #[test]
    fn existing_absolute_paths_are_used_as_is() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mp3");
        std::fs::write(&file, b"x").unwrap();

        let locator = file.display().to_string();
        assert_eq!(resolve_path(&locator, Path::new("/elsewhere")), file);
    }

    #[test]
    fn missing_files_and_junk_bytes_fail_to_load() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            fetch_source("/nope.mp3", dir.path(), None),
            Err(SourceError::Io { .. })
        ));
        assert!(matches!(
            fetch_source("https://example.com/a.mp3", dir.path(), None),
            Err(SourceError::NoClient)
        ));

        std::fs::write(dir.path().join("junk.mp3"), b"definitely not audio").unwrap();
        let bytes = fetch_source("junk.mp3", dir.path(), None).unwrap();
        assert!(verify_decodable(&bytes).is_err());
    }
}
