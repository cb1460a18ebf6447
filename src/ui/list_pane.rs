use crate::app::AppState;
use crate::domain::{format_clock, leaf_glyph, status_badge, Task, TaskStatus};
use crate::ui::styles::{
    border_style, default_style, done_style, idle_style, overdue_style, paused_style,
    running_style, selected_style, title_style,
};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the "Today" task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .engine
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let line = create_task_line(task, app.engine.is_active(task.id), app.use_emoji);
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let date = Local::now().format("%a %b %d");
    let title = format!(" Today 🌱 ({}) ", date);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

/// Create a single line for a task
/// Format: [🌿] Article Reading  ⏱ 06:40 / 10:00 (RUNNING) • 2 reminders
fn create_task_line(task: &Task, is_active: bool, use_emoji: bool) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("[{}] ", leaf_glyph(task, use_emoji))));

    let name_style = if task.status.is_completed() {
        done_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(task.name.clone(), name_style));
    spans.push(Span::raw("  ".to_string()));

    let clock_style = if task.is_overdue() && !task.status.is_completed() {
        overdue_style()
    } else {
        default_style()
    };
    spans.push(Span::raw("⏱ ".to_string()));
    spans.push(Span::styled(format_clock(task.remaining_time), clock_style));
    spans.push(Span::raw(format!(" / {} ", format_clock(task.total_duration))));

    let badge_style = match task.status {
        TaskStatus::Running => running_style(),
        TaskStatus::Paused => paused_style(),
        TaskStatus::Completed => done_style(),
    };
    spans.push(Span::styled(status_badge(task, is_active).to_string(), badge_style));

    if !task.reminders.is_empty() && !task.status.is_completed() {
        let count = task.reminders.len();
        let noun = if count == 1 { "reminder" } else { "reminders" };
        spans.push(Span::styled(format!(" • {} {}", count, noun), idle_style()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let task = Task::new(&TaskDraft::new("Article Reading", 600, [60, 120]).unwrap());
        let text = line_text(&create_task_line(&task, false, true));

        assert!(text.contains("Article Reading"));
        assert!(text.contains("10:00 / 10:00"));
        assert!(text.contains("2 reminders"));
    }

    #[test]
    fn test_overdue_line_shows_plus_clock() {
        let mut task = Task::new(&TaskDraft::new("Quiz", 60, []).unwrap());
        task.remaining_time = -75;
        task.status = TaskStatus::Running;
        let text = line_text(&create_task_line(&task, true, false));

        assert!(text.contains("+01:15 / 01:00"));
        assert!(text.contains("(RUNNING)"));
        assert!(text.starts_with("[!]"));
    }
}
