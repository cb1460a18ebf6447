use serde::{Deserialize, Serialize};

/// Runtime status of a task
///
/// `Paused` covers both "never started" and "explicitly paused"; both are resumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Paused,
    Running,
    Completed,
}

impl TaskStatus {
    /// Convert status to a short tag for list rows and CLI output
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::Running => "RUNNING",
            Self::Completed => "DONE",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Which screen the terminal UI is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Task list ("today" view)
    Today,
    /// Countdown view for the active task
    Task,
    /// Add / edit form
    Editing,
    /// Deleted-tasks bin
    Trash,
    /// Yes/no confirmation modal
    Confirm,
    /// Mindful break overlay
    MindfulBreak,
}

/// Field focus inside the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Minutes,
    Seconds,
    Reminders,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds => Self::Reminders,
            Self::Reminders => Self::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Name => Self::Reminders,
            Self::Minutes => Self::Name,
            Self::Seconds => Self::Minutes,
            Self::Reminders => Self::Seconds,
        }
    }
}
