use crate::audio::MAX_RETRIES;

/// What the user can do about an error notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    /// Press play again to reload from the original source.
    Retry,
    TryAlternativeSource,
}

impl NoticeAction {
    pub fn hint(self) -> &'static str {
        match self {
            NoticeAction::Retry => "press p to retry",
            NoticeAction::TryAlternativeSource => "press a to try another source",
        }
    }
}

/// A discrete message for the toast area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    StillLoading,
    Loading,
    Retrying { attempt: u8 },
    Error {
        message: String,
        action: Option<NoticeAction>,
    },
    Completed,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error { .. })
    }

    pub fn text(&self) -> String {
        match self {
            Notice::StillLoading => "Audio is still loading, please wait".to_string(),
            Notice::Loading => "Loading audio...".to_string(),
            Notice::Retrying { attempt } => {
                format!("Trying alternative source ({attempt}/{MAX_RETRIES})")
            }
            Notice::Error { message, action } => match action {
                Some(a) => format!("{message} ({})", a.hint()),
                None => message.clone(),
            },
            Notice::Completed => "Meditation complete. Well done!".to_string(),
        }
    }
}
