//! Application module: the UI-side model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the current view, the library
//! cursor, the duration preset and pending toasts.

mod model;

pub use model::*;
