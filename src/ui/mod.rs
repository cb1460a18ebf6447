pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod leaves_pane;
pub mod list_pane;
pub mod modal;
pub mod styles;
pub mod timer_pane;
pub mod trash_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use input_form::render_edit_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use leaves_pane::render_leaves_pane;
use list_pane::render_list_pane;
use modal::{render_confirm_modal, render_mindful_break, render_overdue_prompt, render_pause_overlay};
use ratatui::Frame;
use timer_pane::render_timer_pane;
use trash_pane::render_trash_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);
    render_status_line(f, app, layout.status_area);

    match app.underlying_mode() {
        UiMode::Task => {
            render_timer_pane(f, app, layout.main_area);
            render_leaves_pane(f, app, layout.side_area);
        }
        UiMode::Trash => {
            render_trash_pane(f, app, layout.main_area);
            render_details_pane(f, app, layout.side_area);
        }
        _ => {
            render_list_pane(f, app, layout.main_area);
            render_details_pane(f, app, layout.side_area);
        }
    }

    match app.ui_mode {
        UiMode::Task if app.engine.is_overdue() => render_overdue_prompt(f, app, size),
        UiMode::Task if app.engine.is_paused() => render_pause_overlay(f, size),
        UiMode::Editing => render_edit_form(f, app, size),
        UiMode::Confirm => {
            // Keep the form visible behind a confirmation raised from it
            if app.edit_form.is_some() {
                render_edit_form(f, app, size);
            }
            render_confirm_modal(f, app, size);
        }
        UiMode::MindfulBreak => render_mindful_break(f, app, size),
        _ => {}
    }
}
