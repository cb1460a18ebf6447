use crate::animation::{LeafField, BURST_SIZE};
use crate::domain::{format_offset, EditField, Task, TaskDraft, UiMode};
use crate::engine::{EngineEvent, TimerEngine};
use crate::error::ValidationError;
use crate::persistence::Settings;
use log::info;
use std::collections::BTreeSet;
use std::time::Instant;
use uuid::Uuid;

/// Number of progress milestones that each drop a leaf (every 20% of the target)
const PROGRESS_MILESTONES: i64 = 5;

/// Add / edit form state
#[derive(Debug, Clone)]
pub struct EditFormState {
    /// `None` while adding a new task
    pub task_id: Option<Uuid>,
    pub name: String,
    pub minutes: String,
    pub seconds: String,
    /// Offsets offered as chips
    pub chips: Vec<i64>,
    pub selected: BTreeSet<i64>,
    pub chip_cursor: usize,
    pub field: EditField,
    /// Why the last save was refused
    pub error: Option<String>,
}

fn parse_number(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<i64>().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl EditFormState {
    fn blank(settings: &Settings) -> Self {
        Self {
            task_id: None,
            name: String::new(),
            minutes: (settings.default_duration_secs / 60).to_string(),
            seconds: (settings.default_duration_secs % 60).to_string(),
            chips: settings.reminder_offsets.clone(),
            selected: settings.default_reminders.iter().copied().collect(),
            chip_cursor: 0,
            field: EditField::Name,
            error: None,
        }
    }

    fn for_task(task: &Task, settings: &Settings) -> Self {
        let mut chips: Vec<i64> = settings.reminder_offsets.clone();
        chips.extend(task.reminders.iter().copied());
        chips.sort_unstable();
        chips.dedup();

        Self {
            task_id: Some(task.id),
            name: task.name.clone(),
            minutes: (task.total_duration / 60).to_string(),
            seconds: (task.total_duration % 60).to_string(),
            chips,
            selected: task.reminders.clone(),
            chip_cursor: 0,
            field: EditField::Name,
            error: None,
        }
    }

    /// Duration currently typed into the minutes and seconds fields
    pub fn entered_duration(&self) -> Result<i64, ValidationError> {
        let minutes = parse_number("minutes", &self.minutes)?;
        let seconds = parse_number("seconds", &self.seconds)?;
        Ok(minutes.saturating_mul(60).saturating_add(seconds))
    }

    /// An offset can only be chosen if it falls inside the entered duration
    pub fn is_offset_available(&self, offset: i64) -> bool {
        self.entered_duration()
            .map_or(false, |total| offset > 0 && offset < total)
    }

    /// Validate the form; offsets that no longer fit are dropped
    pub fn to_draft(&self) -> Result<TaskDraft, ValidationError> {
        let total = self.entered_duration()?;
        let reminders = self
            .selected
            .iter()
            .copied()
            .filter(|offset| *offset > 0 && *offset < total);
        TaskDraft::new(&self.name, total, reminders)
    }

    pub fn current_chip(&self) -> Option<i64> {
        self.chips.get(self.chip_cursor).copied()
    }
}

/// What a yes/no confirmation will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete(Uuid),
    Restart(Uuid),
    EmptyTrash,
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub action: ConfirmAction,
    pub prompt: String,
    /// Where "no" returns to
    pub cancel_mode: UiMode,
}

/// Main application state
pub struct AppState {
    pub engine: TimerEngine,
    pub settings: Settings,
    pub ui_mode: UiMode,
    pub selected_index: usize,
    pub trash_index: usize,
    pub edit_form: Option<EditFormState>,
    pub confirm: Option<ConfirmState>,
    pub leaves: LeafField,
    pub use_emoji: bool,
    /// One-line notice shown in the footer
    pub status_message: Option<String>,
    /// Animation frame counter (increments every frame)
    pub animation_frame: u32,
    /// Mode to return to when the form or the break overlay closes
    return_mode: UiMode,
    /// Last progress milestone a leaf was dropped for
    milestone: Option<(Uuid, i64)>,
}

impl AppState {
    pub fn new(engine: TimerEngine, settings: Settings) -> Self {
        Self {
            engine,
            settings,
            ui_mode: UiMode::Today,
            selected_index: 0,
            trash_index: 0,
            edit_form: None,
            confirm: None,
            leaves: LeafField::new(),
            use_emoji: true,
            status_message: None,
            animation_frame: 0,
            return_mode: UiMode::Today,
            milestone: None,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.engine.tasks().get(self.selected_index)
    }

    fn selected_id(&self) -> Option<Uuid> {
        self.selected_task().map(|task| task.id)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.engine.tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.engine.tasks().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
        let trash_len = self.engine.deleted().len();
        self.trash_index = self.trash_index.min(trash_len.saturating_sub(1));
    }

    /// Screen shown underneath the form, a confirmation or the break overlay
    pub fn underlying_mode(&self) -> UiMode {
        let mode = match (self.ui_mode, &self.confirm) {
            (UiMode::Confirm, Some(confirm)) => confirm.cancel_mode,
            (mode, _) => mode,
        };
        match mode {
            UiMode::Editing | UiMode::MindfulBreak => self.return_mode,
            mode => mode,
        }
    }

    /// Start (or continue) the selected task and open the task view
    pub fn start_selected(&mut self) {
        let Some(task_id) = self.selected_id() else {
            return;
        };

        if self.engine.is_active(task_id) {
            if !self.engine.is_running() {
                self.engine.resume();
            }
            self.ui_mode = UiMode::Task;
        } else if self.engine.start(task_id) {
            self.ui_mode = UiMode::Task;
        } else {
            self.status_message = Some("Completed tasks cannot be started".to_string());
        }
    }

    /// Return to the active task's view without changing its state
    pub fn open_task_view(&mut self) {
        if self.engine.active_id().is_some() {
            self.ui_mode = UiMode::Task;
        }
    }

    /// Back to the list; the task is paused while it is not on screen
    pub fn leave_task_view(&mut self) {
        if self.engine.is_running() {
            self.engine.pause();
        }
        self.ui_mode = UiMode::Today;
    }

    pub fn toggle_pause(&mut self) {
        if self.engine.is_running() {
            self.engine.pause();
        } else {
            self.engine.resume();
        }
    }

    pub fn complete_active(&mut self) {
        if self.engine.complete() {
            self.ui_mode = UiMode::Today;
        }
    }

    pub fn toggle_complete_selected(&mut self) {
        if let Some(task_id) = self.selected_id() {
            self.engine.toggle_complete(task_id);
        }
    }

    /// Grant the configured extension to the overdue active task
    pub fn extend_active(&mut self) {
        let extra = self.settings.extension_secs();
        if self.engine.extend_overdue(extra) {
            self.status_message = Some(format!("Added {} minutes", self.settings.extension_minutes));
        }
    }

    pub fn start_add_task(&mut self) {
        self.edit_form = Some(EditFormState::blank(&self.settings));
        self.return_mode = UiMode::Today;
        self.ui_mode = UiMode::Editing;
    }

    pub fn start_edit_selected(&mut self) {
        if let Some(task_id) = self.selected_id() {
            self.start_edit(task_id, UiMode::Today);
        }
    }

    pub fn start_edit_active(&mut self) {
        if let Some(task_id) = self.engine.active_id() {
            self.start_edit(task_id, UiMode::Task);
        }
    }

    fn start_edit(&mut self, task_id: Uuid, return_mode: UiMode) {
        let Some(task) = self.engine.task(task_id) else {
            return;
        };
        self.edit_form = Some(EditFormState::for_task(task, &self.settings));
        self.return_mode = return_mode;
        self.ui_mode = UiMode::Editing;
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.edit_form {
            form.field = form.field.next();
        }
    }

    pub fn form_previous_field(&mut self) {
        if let Some(form) = &mut self.edit_form {
            form.field = form.field.previous();
        }
    }

    pub fn form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.edit_form {
            match form.field {
                EditField::Name => form.name.push(c),
                EditField::Minutes => form.minutes.push(c),
                EditField::Seconds => form.seconds.push(c),
                EditField::Reminders => {}
            }
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = &mut self.edit_form {
            match form.field {
                EditField::Name => {
                    form.name.pop();
                }
                EditField::Minutes => {
                    form.minutes.pop();
                }
                EditField::Seconds => {
                    form.seconds.pop();
                }
                EditField::Reminders => {}
            }
        }
    }

    pub fn form_chip_left(&mut self) {
        if let Some(form) = &mut self.edit_form {
            form.chip_cursor = form.chip_cursor.saturating_sub(1);
        }
    }

    pub fn form_chip_right(&mut self) {
        if let Some(form) = &mut self.edit_form {
            if form.chip_cursor + 1 < form.chips.len() {
                form.chip_cursor += 1;
            }
        }
    }

    /// Select or deselect the chip under the cursor; out-of-range offsets are ignored
    pub fn form_toggle_chip(&mut self) {
        if let Some(form) = &mut self.edit_form {
            let Some(offset) = form.current_chip() else {
                return;
            };
            if form.selected.contains(&offset) {
                form.selected.remove(&offset);
            } else if form.is_offset_available(offset) {
                form.selected.insert(offset);
            }
        }
    }

    /// Save the form; an invalid form stays open with the reason shown
    pub fn submit_form(&mut self) {
        let Some(form) = self.edit_form.as_mut() else {
            return;
        };

        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };

        match form.task_id {
            Some(task_id) => {
                self.engine.edit_task(task_id, &draft);
            }
            None => {
                self.engine.create_task(&draft);
                self.selected_index = self.engine.tasks().len().saturating_sub(1);
            }
        }
        self.edit_form = None;
        self.ui_mode = self.return_mode;
    }

    pub fn cancel_form(&mut self) {
        self.edit_form = None;
        self.ui_mode = self.return_mode;
    }

    /// Ask before restarting; only the active task can be restarted
    pub fn request_restart(&mut self) {
        let Some(task_id) = self.edit_form.as_ref().and_then(|form| form.task_id) else {
            return;
        };
        if !self.engine.is_active(task_id) {
            self.status_message = Some("Only the active task can be restarted".to_string());
            return;
        }
        self.ask(
            ConfirmAction::Restart(task_id),
            "Restart this task from the beginning?".to_string(),
        );
    }

    /// Ask before deleting the task being edited, or the selected one from the list
    pub fn request_delete(&mut self) {
        let task_id = match self.ui_mode {
            UiMode::Editing => self.edit_form.as_ref().and_then(|form| form.task_id),
            _ => self.selected_id(),
        };
        let Some(task) = task_id.and_then(|id| self.engine.task(id)) else {
            return;
        };
        let (task_id, prompt) = (task.id, format!("Move \"{}\" to the bin?", task.name));
        self.ask(ConfirmAction::Delete(task_id), prompt);
    }

    pub fn request_empty_trash(&mut self) {
        if self.engine.deleted().is_empty() {
            return;
        }
        let prompt = format!(
            "Permanently discard {} deleted task(s)?",
            self.engine.deleted().len()
        );
        self.ask(ConfirmAction::EmptyTrash, prompt);
    }

    fn ask(&mut self, action: ConfirmAction, prompt: String) {
        self.confirm = Some(ConfirmState {
            action,
            prompt,
            cancel_mode: self.ui_mode,
        });
        self.ui_mode = UiMode::Confirm;
    }

    pub fn confirm_yes(&mut self) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };

        match confirm.action {
            ConfirmAction::Delete(task_id) => {
                self.engine.delete_task(task_id);
                self.edit_form = None;
                self.ui_mode = UiMode::Today;
            }
            ConfirmAction::Restart(task_id) => {
                self.engine.restart(task_id);
                self.edit_form = None;
                self.ui_mode = UiMode::Task;
            }
            ConfirmAction::EmptyTrash => {
                let count = self.engine.empty_trash();
                self.status_message = Some(format!("Discarded {} task(s)", count));
                self.ui_mode = UiMode::Trash;
            }
        }
        self.clamp_selection();
    }

    pub fn confirm_no(&mut self) {
        if let Some(confirm) = self.confirm.take() {
            self.ui_mode = confirm.cancel_mode;
        }
    }

    pub fn open_trash(&mut self) {
        self.trash_index = 0;
        self.ui_mode = UiMode::Trash;
    }

    pub fn close_trash(&mut self) {
        self.ui_mode = UiMode::Today;
    }

    pub fn trash_up(&mut self) {
        self.trash_index = self.trash_index.saturating_sub(1);
    }

    pub fn trash_down(&mut self) {
        if self.trash_index + 1 < self.engine.deleted().len() {
            self.trash_index += 1;
        }
    }

    pub fn restore_selected_trash(&mut self) {
        let Some(record) = self.engine.deleted().get(self.trash_index) else {
            return;
        };
        let deleted_id = record.task.id;
        if self.engine.restore_task(deleted_id).is_some() {
            self.clamp_selection();
        }
    }

    pub fn begin_mindful_break(&mut self) {
        self.return_mode = self.ui_mode;
        self.engine.begin_mindful_break();
        self.leaves.begin_swirl();
        self.ui_mode = UiMode::MindfulBreak;
    }

    pub fn end_mindful_break(&mut self) {
        self.engine.end_mindful_break();
        self.leaves.end_swirl();
        self.ui_mode = self.return_mode;
    }

    /// Called once per UI frame: drive the engine clock, react to events, animate
    pub fn on_frame(&mut self, now: Instant) {
        self.engine.advance(now);
        self.handle_engine_events();
        self.drop_milestone_leaf();
        self.leaves.step();
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    fn handle_engine_events(&mut self) {
        for event in self.engine.take_events() {
            match event {
                EngineEvent::TimeProjected { .. } => self.leaves.drop_burst(BURST_SIZE),
                EngineEvent::ReminderFired { offset, .. } => {
                    self.leaves.drop_leaf(false);
                    self.status_message = Some(format!("Reminder: {} left", format_offset(offset)));
                }
                EngineEvent::PersistFailed { message } => {
                    self.status_message = Some(format!("Could not save tasks: {}", message));
                }
                EngineEvent::Deleted { .. } | EngineEvent::Restored { .. } => {
                    self.clamp_selection();
                }
                _ => {}
            }
        }
    }

    /// Drop a leaf each time the active task passes another fifth of its target
    fn drop_milestone_leaf(&mut self) {
        let Some(task) = self.engine.active_task() else {
            self.milestone = None;
            return;
        };
        if task.total_duration <= 0 {
            return;
        }
        let reached = (task.elapsed().max(0) * PROGRESS_MILESTONES / task.total_duration)
            .min(PROGRESS_MILESTONES);

        match self.milestone {
            Some((id, last)) if id == task.id && reached > last => {
                self.milestone = Some((id, reached));
                self.leaves.drop_leaf(false);
            }
            Some((id, _)) if id == task.id => {
                // Restart or edit moved progress backwards
                self.milestone = Some((id, reached));
            }
            _ => self.milestone = Some((task.id, reached)),
        }
    }

    /// Leave nothing running behind when the app exits
    pub fn shutdown(&mut self) {
        if self.engine.is_running() {
            info!("pausing active task on exit");
            self.engine.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_sync::NoopDisplay;
    use crate::domain::TaskStatus;
    use crate::persistence::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_test_app() -> AppState {
        let tasks = vec![
            Task::new(&TaskDraft::new("Article Reading", 600, [60]).unwrap()),
            Task::new(&TaskDraft::new("Bike Sketch", 1800, [300, 600]).unwrap()),
        ];
        let engine = TimerEngine::load(
            Box::new(MemoryStore::with_tasks(tasks)),
            Box::new(NoopDisplay),
            Duration::from_secs(1),
        )
        .unwrap();
        AppState::new(engine, Settings::default())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.form_add_char(c);
        }
    }

    fn clear_field(app: &mut AppState) {
        for _ in 0..64 {
            app.form_backspace();
        }
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.engine.tasks().len(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.ui_mode, UiMode::Today);
        assert!(app.edit_form.is_none());
    }

    #[test]
    fn test_move_selection() {
        let mut app = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_start_selected_opens_task_view() {
        let mut app = create_test_app();
        app.start_selected();

        assert_eq!(app.ui_mode, UiMode::Task);
        assert_eq!(app.engine.active_id(), Some(app.engine.tasks()[0].id));
        assert!(app.engine.is_running());
    }

    #[test]
    fn test_leaving_task_view_pauses() {
        let mut app = create_test_app();
        app.start_selected();
        app.leave_task_view();

        assert_eq!(app.ui_mode, UiMode::Today);
        assert!(app.engine.is_paused());
        assert_eq!(app.engine.tasks()[0].status, TaskStatus::Paused);

        // Selecting it again continues the same run
        app.start_selected();
        assert!(app.engine.is_running());
    }

    #[test]
    fn test_toggle_pause() {
        let mut app = create_test_app();
        app.start_selected();

        app.toggle_pause();
        assert!(app.engine.is_paused());
        app.toggle_pause();
        assert!(app.engine.is_running());
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = create_test_app();
        app.start_add_task();
        assert_eq!(app.ui_mode, UiMode::Editing);

        type_text(&mut app, "HCI Quiz Preparation");
        app.form_next_field();
        clear_field(&mut app);
        type_text(&mut app, "45");
        app.submit_form();

        assert_eq!(app.ui_mode, UiMode::Today);
        let created = app.engine.tasks().last().unwrap();
        assert_eq!(created.name, "HCI Quiz Preparation");
        assert_eq!(created.total_duration, 45 * 60);
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_invalid_form_shows_reason() {
        let mut app = create_test_app();
        app.start_add_task();
        app.submit_form();

        let form = app.edit_form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("task name cannot be empty"));
        assert_eq!(app.ui_mode, UiMode::Editing);

        type_text(&mut app, "Reading");
        app.form_next_field();
        clear_field(&mut app);
        app.form_next_field();
        clear_field(&mut app);
        app.submit_form();
        let form = app.edit_form.as_ref().unwrap();
        assert_eq!(
            form.error.as_deref(),
            Some("duration must be greater than zero (got 0s)")
        );

        app.form_previous_field();
        type_text(&mut app, "ten");
        app.submit_form();
        let form = app.edit_form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("minutes is not a number: \"ten\""));
        assert_eq!(app.engine.tasks().len(), 2);
    }

    #[test]
    fn test_chips_outside_duration_are_unavailable() {
        let mut app = create_test_app();
        app.start_add_task();
        // Default duration is one minute; 30s is the only offset that fits
        app.edit_form.as_mut().unwrap().field = EditField::Reminders;

        app.form_toggle_chip(); // 30s
        app.form_chip_right();
        app.form_toggle_chip(); // 60s, not below the duration
        let form = app.edit_form.as_ref().unwrap();
        assert_eq!(form.selected, BTreeSet::from([30]));
        assert!(!form.is_offset_available(60));
    }

    #[test]
    fn test_shrinking_duration_drops_offsets() {
        let mut app = create_test_app();
        app.move_selection_down();
        app.start_edit_selected();

        let form = app.edit_form.as_mut().unwrap();
        form.minutes = "8".to_string();
        form.seconds = "0".to_string();
        app.submit_form();

        let task = &app.engine.tasks()[1];
        assert_eq!(task.total_duration, 480);
        assert_eq!(task.reminders, BTreeSet::from([300]));
    }

    #[test]
    fn test_edit_active_returns_to_task_view() {
        let mut app = create_test_app();
        app.start_selected();
        app.start_edit_active();
        assert_eq!(app.ui_mode, UiMode::Editing);

        app.edit_form.as_mut().unwrap().minutes = "20".to_string();
        app.submit_form();
        assert_eq!(app.ui_mode, UiMode::Task);
        assert_eq!(app.engine.active_task().unwrap().total_duration, 1200);

        // The edit projects a new finish time, which drops a burst of leaves
        app.on_frame(Instant::now());
        assert!(app.leaves.leaves().len() >= BURST_SIZE);
    }

    #[test]
    fn test_restart_requires_active_task_and_confirmation() {
        let mut app = create_test_app();
        app.start_edit_selected();
        app.request_restart();
        assert_eq!(app.ui_mode, UiMode::Editing);
        assert!(app.confirm.is_none());
        app.cancel_form();

        app.start_selected();
        app.start_edit_active();
        app.request_restart();
        assert_eq!(app.ui_mode, UiMode::Confirm);

        assert_eq!(app.underlying_mode(), UiMode::Task);
        app.confirm_no();
        assert_eq!(app.ui_mode, UiMode::Editing);

        app.request_restart();
        app.confirm_yes();
        assert_eq!(app.ui_mode, UiMode::Task);
        assert!(!app.engine.is_running());
        assert_eq!(app.engine.active_task().unwrap().remaining_time, 600);
    }

    #[test]
    fn test_delete_with_confirmation_and_restore() {
        let mut app = create_test_app();
        app.move_selection_down();
        app.request_delete();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        app.confirm_yes();

        assert_eq!(app.engine.tasks().len(), 1);
        assert_eq!(app.selected_index, 0);

        app.open_trash();
        app.restore_selected_trash();
        assert_eq!(app.engine.tasks().len(), 2);
        assert!(app.engine.deleted().is_empty());
        assert_eq!(app.engine.tasks()[1].name, "Bike Sketch");
    }

    #[test]
    fn test_delete_active_from_form_returns_to_list() {
        let mut app = create_test_app();
        app.start_selected();
        app.start_edit_active();
        app.request_delete();
        app.confirm_yes();

        assert_eq!(app.ui_mode, UiMode::Today);
        assert_eq!(app.engine.active_id(), None);
        assert!(app.edit_form.is_none());
    }

    #[test]
    fn test_empty_trash_asks_first() {
        let mut app = create_test_app();
        app.request_delete();
        app.confirm_yes();
        app.open_trash();

        app.request_empty_trash();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        app.confirm_yes();
        assert_eq!(app.ui_mode, UiMode::Trash);
        assert!(app.engine.deleted().is_empty());
    }

    #[test]
    fn test_mindful_break_keeps_timer_running() {
        let mut app = create_test_app();
        app.start_selected();
        app.begin_mindful_break();
        assert_eq!(app.ui_mode, UiMode::MindfulBreak);
        assert!(app.leaves.is_swirling());
        assert!(app.engine.is_running());

        assert_eq!(app.underlying_mode(), UiMode::Task);

        app.end_mindful_break();
        assert_eq!(app.ui_mode, UiMode::Task);
        assert!(!app.leaves.is_swirling());
    }

    #[test]
    fn test_on_frame_drives_the_clock() {
        let mut app = create_test_app();
        app.start_selected();
        app.on_frame(Instant::now() + Duration::from_millis(2500));

        assert_eq!(app.engine.active_task().unwrap().remaining_time, 598);
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn test_fired_reminder_drops_one_leaf() {
        let task = Task::new(&TaskDraft::new("Inbox Zero", 600, [598]).unwrap());
        let engine = TimerEngine::load(
            Box::new(MemoryStore::with_tasks(vec![task])),
            Box::new(NoopDisplay),
            Duration::from_secs(1),
        )
        .unwrap();
        let mut app = AppState::new(engine, Settings::default());
        app.start_selected();
        assert!(app.leaves.leaves().is_empty());

        app.on_frame(Instant::now() + Duration::from_millis(2500));

        let task = app.engine.active_task().unwrap();
        assert_eq!(task.remaining_time, 598);
        assert!(task.fired_reminders.contains(&598));
        assert_eq!(app.leaves.leaves().len(), 1);
        assert!(app.status_message.as_deref().unwrap().starts_with("Reminder:"));
    }

    #[test]
    fn test_quiet_frame_drops_no_leaf() {
        let mut app = create_test_app();
        app.start_selected();
        app.on_frame(Instant::now() + Duration::from_millis(2500));
        assert!(app.leaves.leaves().is_empty());
    }

    #[test]
    fn test_complete_active_returns_to_list() {
        let mut app = create_test_app();
        app.start_selected();
        app.complete_active();

        assert_eq!(app.ui_mode, UiMode::Today);
        assert_eq!(app.engine.tasks()[0].status, TaskStatus::Completed);

        // Completed tasks do not start again
        app.start_selected();
        assert_eq!(app.ui_mode, UiMode::Today);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_shutdown_pauses_running_task() {
        let mut app = create_test_app();
        app.start_selected();
        app.shutdown();
        assert!(!app.engine.is_running());
        assert_eq!(app.engine.tasks()[0].status, TaskStatus::Paused);
    }
}
