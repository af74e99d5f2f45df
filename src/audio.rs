//! Audio subsystem: the loader state machine with its fallback-URL retry
//! policy, the backend boundary and the rodio-backed audio thread.

mod backend;
mod loader;
mod player;
mod retry;
mod sink;
mod thread;
mod types;

pub use backend::AudioBackend;
pub use loader::{AudioLoader, LoaderUpdate};
pub use player::{AudioPlayer, SourceOptions};
pub use retry::{LoadAttempt, MAX_RETRIES, RetrySequence, derive_source_url, normalize_filename};
pub use types::{AudioCmd, AudioError, AudioEvent, ErrorReason, LoadTicket, PlaybackState};
