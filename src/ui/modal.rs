use crate::app::AppState;
use crate::domain::{format_clock, UiMode};
use crate::ui::{
    layout::create_modal_area,
    leaves_pane::leaf_lines,
    styles::{modal_bg_style, modal_title_style, overdue_style, title_style},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the prompt shown once the active task runs past its target
pub fn render_overdue_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(task) = app.engine.active_task() else {
        return;
    };
    let modal_area = create_modal_area(area, 11);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("  Time is up for \"{}\".", task.name)));
    lines.push(Line::from(vec![
        Span::raw("  Over by "),
        Span::styled(format_clock(task.remaining_time), overdue_style()),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::raw("  Need a little longer?"));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("  [x]", modal_title_style()),
        Span::raw(format!(" Add {} minutes  ", app.settings.extension_minutes)),
        Span::styled("[d]", modal_title_style()),
        Span::raw(" Done  "),
        Span::styled("[p]", modal_title_style()),
        Span::raw(" Pause  "),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" ⏱ Overdue ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the small overlay over a paused countdown
pub fn render_pause_overlay(f: &mut Frame, area: Rect) {
    let modal_area = create_modal_area(area, 5);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("  Paused. Press "),
            Span::styled("[Space]", modal_title_style()),
            Span::raw(" to resume."),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" ⏸ Paused ", modal_title_style()))
            .style(modal_bg_style()),
    );
    f.render_widget(paragraph, modal_area);
}

/// Render the yes/no confirmation modal
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    if app.ui_mode != UiMode::Confirm {
        return;
    }
    let modal_area = create_modal_area(area, 7);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", confirm.prompt)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Yes  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" No"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Are you sure? ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Render the mindful break overlay with its shower of leaves
pub fn render_mindful_break(f: &mut Frame, app: &AppState, area: Rect) {
    let modal_area = create_modal_area(area, area.height.saturating_sub(4));
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" 🍃 Mindful Break ", title_style()))
        .style(modal_bg_style());
    let inner = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Leaves
            Constraint::Length(1), // Message
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    let lines = leaf_lines(app.leaves.leaves(), chunks[0].width, chunks[0].height);
    f.render_widget(Paragraph::new(lines), chunks[0]);

    f.render_widget(
        Paragraph::new("  Breathe in. Watch the leaves fall. Breathe out."),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("  [Enter]", modal_title_style()),
            Span::raw(" End break"),
        ])),
        chunks[2],
    );
}
