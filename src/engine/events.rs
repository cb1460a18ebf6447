use uuid::Uuid;

/// Observable state changes, drained by the presentation layer after each call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Created { task_id: Uuid },
    Started { task_id: Uuid },
    /// The previous active task was set aside because another one started
    SessionEnded { task_id: Uuid },
    Paused { task_id: Uuid },
    Resumed { task_id: Uuid },
    Completed { task_id: Uuid },
    Reopened { task_id: Uuid },
    OverdueEntered { task_id: Uuid },
    OverdueCleared { task_id: Uuid },
    ReminderFired { task_id: Uuid, index: u8, offset: i64 },
    Extended { task_id: Uuid, extra: i64 },
    /// Duration of the active task changed (edit or extension)
    TimeProjected { task_id: Uuid },
    Edited { task_id: Uuid },
    Restarted { task_id: Uuid },
    Deleted { task_id: Uuid },
    Restored { task_id: Uuid },
    PersistFailed { message: String },
}
