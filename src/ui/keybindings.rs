use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{hint_style, paused_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

fn hints_for(app: &AppState) -> Vec<&'static str> {
    match app.ui_mode {
        UiMode::Today => vec![
            " ↑/↓ select   ",
            "Enter start   ",
            "Tab task view   ",
            "Space done/reopen   ",
            "a add   ",
            "e edit   ",
            "d delete   ",
            "t bin   ",
            "q quit",
        ],
        UiMode::Task if app.engine.is_overdue() => vec![
            " x / + extend   ",
            "d done   ",
            "p pause   ",
            "e edit   ",
            "Esc back",
        ],
        UiMode::Task => vec![
            " Space/p pause-resume   ",
            "d done   ",
            "e edit   ",
            "b mindful break   ",
            "Esc back (pauses)",
        ],
        UiMode::Editing => vec![
            " Tab/↑/↓ field   ",
            "←/→ + Space reminder   ",
            "Enter save   ",
            "Ctrl+R restart   ",
            "Ctrl+D delete   ",
            "Esc cancel",
        ],
        UiMode::Trash => vec![
            " ↑/↓ select   ",
            "Enter/r restore   ",
            "E empty bin   ",
            "Esc back",
        ],
        UiMode::Confirm => vec![" y yes   ", "n no"],
        UiMode::MindfulBreak => vec![" Enter/Esc end break"],
    }
}

/// Render the keybindings hint bar for the current mode
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = Line::from(hints_for(app).into_iter().map(Span::raw).collect::<Vec<_>>());

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the one-line notice at the bottom of the screen
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(format!(" {}", message), paused_style())),
        None => Line::from(Span::styled(
            format!(
                " {} tasks · {} in bin",
                app.engine.tasks().len(),
                app.engine.deleted().len()
            ),
            hint_style(),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
