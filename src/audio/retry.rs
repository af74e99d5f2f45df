//! Fallback-URL retry policy for audio loads.
//!
//! A load starts at attempt 0 with the original locator. Each failure moves
//! to the next attempt until `MAX_RETRIES` retries have been spent:
//!
//! - attempt 1 places the file under an alternate path segment inside its
//!   original directory (`/m/a.mp3` -> `/m/audio/a.mp3`);
//! - attempt 2 normalizes the filename (`/m/Body_Scan.MP3` -> `/m/body-scan.mp3`).
//!
//! Query strings and fragments are carried over untouched.

use std::borrow::Cow;

/// Number of retries after the first attempt (3 attempts in total).
pub const MAX_RETRIES: u8 = 2;

/// One try at fetching/decoding a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAttempt {
    pub attempt: u8,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct RetrySequence {
    original: String,
    fallback_segment: String,
    attempt: u8,
}

impl RetrySequence {
    pub fn new(original: impl Into<String>, fallback_segment: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            fallback_segment: fallback_segment.into(),
            attempt: 0,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Move back to `attempt` (clamped to the last one).
    pub fn restart_at(&mut self, attempt: u8) {
        self.attempt = attempt.min(MAX_RETRIES);
    }

    pub fn current(&self) -> LoadAttempt {
        LoadAttempt {
            attempt: self.attempt,
            url: derive_source_url(&self.original, self.attempt, &self.fallback_segment),
        }
    }

    /// Step to the next attempt, or `None` once the retries are spent.
    pub fn advance(&mut self) -> Option<LoadAttempt> {
        if self.attempt >= MAX_RETRIES {
            return None;
        }
        self.attempt += 1;
        Some(self.current())
    }

    pub fn attempts_made(&self) -> u8 {
        self.attempt + 1
    }
}

/// Compute the locator tried on `attempt` for `original`.
pub fn derive_source_url(original: &str, attempt: u8, fallback_segment: &str) -> String {
    if attempt == 0 {
        return original.to_string();
    }

    let split_at = original.find(['?', '#']).unwrap_or(original.len());
    let (base, suffix) = original.split_at(split_at);

    // Never look for the directory separator inside `scheme://host`.
    let path_start = base
        .find("://")
        .map(|i| base[i + 3..].find('/').map_or(base.len(), |p| i + 3 + p))
        .unwrap_or(0);

    let (dir, file) = match base[path_start..].rfind('/') {
        Some(i) => base.split_at(path_start + i + 1),
        None if path_start > 0 => (base, ""),
        None => ("", base),
    };
    let dir: Cow<'_, str> = if path_start > 0 && !dir.ends_with('/') {
        Cow::Owned(format!("{dir}/"))
    } else {
        Cow::Borrowed(dir)
    };

    if attempt == 1 {
        let segment = fallback_segment.trim_matches('/');
        format!("{dir}{segment}/{file}{suffix}")
    } else {
        format!("{dir}{}{suffix}", normalize_filename(file))
    }
}

/// Lowercase, percent-decode and hyphenate a filename, keeping its extension.
pub fn normalize_filename(file: &str) -> String {
    let decoded = urlencoding::decode(file).unwrap_or(Cow::Borrowed(file));
    let (stem, ext) = match decoded.rfind('.') {
        Some(i) if i > 0 => (&decoded[..i], Some(&decoded[i + 1..])),
        _ => (&decoded[..], None),
    };

    let mut out = String::with_capacity(decoded.len());
    for c in stem.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.extend(c.to_lowercase());
        }
    }
    let trimmed = out.trim_matches('-').to_string();

    match ext {
        Some(ext) => format!("{trimmed}.{}", ext.to_ascii_lowercase()),
        None => trimmed,
    }
}
