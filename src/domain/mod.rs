pub mod enums;
pub mod task;
pub mod views;

pub use enums::{EditField, TaskStatus, UiMode};
pub use task::{DeletedTask, Task, TaskDraft};
pub use views::{format_clock, format_offset, leaf_glyph, progress_track, status_badge};
