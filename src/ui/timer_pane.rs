use crate::app::AppState;
use crate::domain::{format_clock, format_offset, progress_track, Task};
use crate::ui::styles::{
    border_style, default_style, gauge_style, hint_style, overdue_style, paused_style,
    running_style, title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Short state label for the countdown header
fn state_label(app: &AppState) -> (&'static str, ratatui::style::Style) {
    if app.engine.is_overdue() {
        ("OVERDUE", overdue_style())
    } else if app.engine.is_paused() {
        ("PAUSED", paused_style())
    } else if app.engine.is_running() {
        ("RUNNING", running_style())
    } else {
        ("READY", default_style())
    }
}

fn reminder_line(task: &Task) -> Line<'static> {
    let mut spans = vec![Span::styled("Reminders: ".to_string(), title_style())];
    let positions = task.reminder_positions();
    if positions.is_empty() {
        spans.push(Span::styled("none".to_string(), hint_style()));
    }
    for (offset, _) in positions {
        let (mark, style) = if task.fired_reminders.contains(&offset) {
            ("◦", hint_style())
        } else {
            ("•", default_style())
        };
        spans.push(Span::styled(format!("{} {}  ", mark, format_offset(offset)), style));
    }
    Line::from(spans)
}

/// Render the countdown for the active task
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Focus ", title_style()));

    let Some(task) = app.engine.active_task() else {
        let empty = Paragraph::new("No active task").block(block);
        f.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Name
            Constraint::Length(1), // State
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Track with reminder dots
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Reminders
            Constraint::Min(0),
        ])
        .split(inner);

    let name = Paragraph::new(Line::from(Span::styled(
        task.name.clone(),
        title_style().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(name, chunks[1]);

    let (label, label_style) = state_label(app);
    let state = Paragraph::new(Line::from(Span::styled(label, label_style)))
        .alignment(Alignment::Center);
    f.render_widget(state, chunks[2]);

    let clock_style = if app.engine.is_overdue() {
        overdue_style()
    } else {
        default_style().add_modifier(Modifier::BOLD)
    };
    let clock = Paragraph::new(Line::from(Span::styled(
        format_clock(task.remaining_time),
        clock_style,
    )))
    .alignment(Alignment::Center);
    f.render_widget(clock, chunks[4]);

    let percent = (task.progress_ratio() * 100.0).round() as u16;
    let gauge = Gauge::default()
        .block(Block::default())
        .gauge_style(gauge_style())
        .percent(percent.min(100))
        .label(format!("{}%", percent));
    f.render_widget(gauge, chunks[6]);

    let track = progress_track(task, chunks[7].width as usize);
    f.render_widget(Paragraph::new(track).style(hint_style()), chunks[7]);

    f.render_widget(Paragraph::new(reminder_line(task)), chunks[9]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;

    #[test]
    fn test_reminder_line_marks_fired() {
        let mut task = Task::new(&TaskDraft::new("Reading", 600, [60, 300]).unwrap());
        task.fired_reminders.insert(300);
        let text: String = reminder_line(&task)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(text, "Reminders: ◦ 5m  • 1m  ");
    }
}
