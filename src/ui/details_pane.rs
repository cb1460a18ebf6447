use crate::app::AppState;
use crate::domain::{format_clock, format_offset, TaskStatus};
use crate::ui::styles::{
    border_style, default_style, hint_style, overdue_style, running_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.").block(block);
        f.render_widget(empty, area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Name:      ", title_style()),
        Span::raw(task.name.clone()),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Target:    ", title_style()),
        Span::raw(format_clock(task.total_duration)),
    ]));

    let remaining_style = match task.status {
        TaskStatus::Completed => default_style(),
        _ if task.is_overdue() => overdue_style(),
        TaskStatus::Running => running_style(),
        TaskStatus::Paused => default_style(),
    };
    lines.push(Line::from(vec![
        Span::styled("Remaining: ", title_style()),
        Span::styled(format_clock(task.remaining_time), remaining_style),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Status:    ", title_style()),
        Span::raw(task.status.to_tag()),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled("Reminders:", title_style())));
    if task.reminders.is_empty() {
        lines.push(Line::from(Span::styled("  none", hint_style())));
    }
    for offset in task.reminders.iter().rev() {
        let mark = if task.fired_reminders.contains(offset) {
            "◦"
        } else {
            "•"
        };
        let mut spans = vec![Span::raw(format!("  {} {} before end", mark, format_offset(*offset)))];
        if *offset >= task.total_duration {
            spans.push(Span::styled(" (never reached)", hint_style()));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Created:   ", title_style()),
        Span::raw(task.created_at.format("%b %d %H:%M").to_string()),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
