use crate::app::AppState;
use crate::domain::{format_clock, DeletedTask};
use crate::ui::styles::{border_style, default_style, hint_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for a deleted task
fn create_deleted_line(record: &DeletedTask) -> Line<'static> {
    let task = &record.task;
    Line::from(vec![
        Span::raw("🗑 ".to_string()),
        Span::raw(task.name.clone()),
        Span::raw("  ".to_string()),
        Span::styled(format!("({})", format_clock(task.total_duration)), default_style()),
        Span::styled(
            format!("  deleted {}", record.deleted_at.format("%b %d %H:%M")),
            hint_style(),
        ),
    ])
}

/// Render the deleted-tasks bin
pub fn render_trash_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let deleted = app.engine.deleted();

    let items: Vec<ListItem> = if deleted.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "The bin is empty",
            hint_style(),
        )))]
    } else {
        deleted
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let style = if idx == app.trash_index {
                    selected_style()
                } else {
                    default_style()
                };
                ListItem::new(create_deleted_line(record)).style(style)
            })
            .collect()
    };

    let title = format!(" Deleted Tasks ({}) ", deleted.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}
