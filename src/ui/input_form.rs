use crate::app::{AppState, EditFormState};
use crate::domain::{format_offset, EditField};
use crate::ui::{
    layout::create_modal_area,
    styles::{
        chip_selected_style, chip_unavailable_style, error_style, modal_bg_style,
        modal_title_style,
    },
};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn field_lines(label: &str, value: &str, editing: bool) -> [Line<'static>; 2] {
    let label = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };
    [
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]),
    ]
}

fn chip_line(form: &EditFormState) -> Line<'static> {
    let editing = form.field == EditField::Reminders;
    let mut spans = vec![Span::raw("  ")];

    for (idx, offset) in form.chips.iter().enumerate() {
        let selected = form.selected.contains(offset);
        let mut style = if selected {
            chip_selected_style()
        } else if !form.is_offset_available(*offset) {
            chip_unavailable_style()
        } else {
            modal_bg_style()
        };
        if editing && idx == form.chip_cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {} ", format_offset(*offset)), style));
        spans.push(Span::raw(" "));
    }

    Line::from(spans)
}

/// Render the add / edit form
pub fn render_edit_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.edit_form else {
        return;
    };
    let modal_area = create_modal_area(area, 19);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = if form.task_id.is_some() {
        " Edit Task "
    } else {
        " Add Task "
    };

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.extend(field_lines("Name", &form.name, form.field == EditField::Name));
    lines.push(Line::raw(""));
    lines.extend(field_lines(
        "Minutes",
        &form.minutes,
        form.field == EditField::Minutes,
    ));
    lines.extend(field_lines(
        "Seconds",
        &form.seconds,
        form.field == EditField::Seconds,
    ));
    lines.push(Line::raw(""));

    let reminders_label = if form.field == EditField::Reminders {
        "Remind me before the end: (editing)"
    } else {
        "Remind me before the end:"
    };
    lines.push(Line::raw(reminders_label));
    lines.push(chip_line(form));
    lines.push(Line::raw(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(format!("✗ {}", error), error_style())));
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));
    if let Some(task_id) = form.task_id {
        let mut hints = vec![Span::styled("Ctrl+D", modal_title_style()), Span::raw(" delete")];
        if app.engine.is_active(task_id) {
            hints.push(Span::raw("  ·  "));
            hints.push(Span::styled("Ctrl+R", modal_title_style()));
            hints.push(Span::raw(" restart"));
        }
        lines.push(Line::from(hints));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
