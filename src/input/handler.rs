use crate::app::AppState;
use crate::domain::{EditField, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Any key press dismisses the previous notice
    app.status_message = None;

    match app.ui_mode {
        UiMode::Today => handle_today_mode(app, key),
        UiMode::Task => handle_task_mode(app, key),
        UiMode::Editing => handle_edit_form_mode(app, key),
        UiMode::Trash => handle_trash_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
        UiMode::MindfulBreak => handle_mindful_break_mode(app, key),
    }
}

/// Handle keys on the task list
fn handle_today_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Start (or continue) the selected task
        KeyCode::Enter => app.start_selected(),

        // Back to the running task
        KeyCode::Tab => app.open_task_view(),

        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_complete_selected(),
        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('e') => app.start_edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('t') => app.open_trash(),

        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys on the countdown view
fn handle_task_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // The overdue prompt takes over the view until it is answered
    if app.engine.is_overdue() {
        match key.code {
            KeyCode::Char('x') | KeyCode::Char('+') => {
                app.extend_active();
                return Ok(false);
            }
            KeyCode::Char('d') => {
                app.complete_active();
                return Ok(false);
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_pause(),
        KeyCode::Char('d') => app.complete_active(),
        KeyCode::Char('e') => app.start_edit_active(),
        KeyCode::Char('b') => app.begin_mindful_break(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Tab => app.leave_task_view(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add / edit form
fn handle_edit_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.request_restart(),
            KeyCode::Char('d') => app.request_delete(),
            _ => {}
        }
        return Ok(false);
    }

    let on_reminders = app
        .edit_form
        .as_ref()
        .map_or(false, |form| form.field == EditField::Reminders);

    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form_previous_field(),
        KeyCode::Left if on_reminders => app.form_chip_left(),
        KeyCode::Right if on_reminders => app.form_chip_right(),
        KeyCode::Char(' ') if on_reminders => app.form_toggle_chip(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the deleted-tasks bin
fn handle_trash_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.trash_up(),
        KeyCode::Down | KeyCode::Char('j') => app.trash_down(),
        KeyCode::Enter | KeyCode::Char('r') => app.restore_selected_trash(),
        KeyCode::Char('E') => app.request_empty_trash(),
        KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('q') => app.close_trash(),
        _ => {}
    }
    Ok(false)
}

fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_yes(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
        _ => {}
    }
    Ok(false)
}

fn handle_mindful_break_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('b')) {
        app.end_mindful_break();
    }
    Ok(false)
}
