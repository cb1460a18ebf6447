use crate::animation::{Leaf, LeafField};
use crate::app::AppState;
use crate::ui::styles::{branch_style, leaf_style, title_style, yellow_leaf_style};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LEAF_FRAMES: [&str; 4] = ["❦", "❧", "☙", "❧"];

/// Build the falling-leaf lines for a `width` x `height` area, branch on the top row
pub fn leaf_lines(leaves: &[Leaf], width: u16, height: u16) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut grid: Vec<Vec<Option<&Leaf>>> = vec![vec![None; width as usize]; height as usize];
    for leaf in leaves {
        let (col, row) = leaf.cell(width, height);
        // Keep the branch row clear
        let row = row.max(1).min(height - 1) as usize;
        grid[row][col as usize] = Some(leaf);
    }

    let mut lines = Vec::with_capacity(height as usize);
    let branch: String = (0..width)
        .map(|i| if i % 7 == 3 { '❦' } else { '─' })
        .collect();
    lines.push(Line::from(Span::styled(branch, branch_style())));

    for row in grid.into_iter().skip(1) {
        let spans: Vec<Span> = row
            .into_iter()
            .map(|cell| match cell {
                Some(leaf) => {
                    let style: Style = if leaf.yellow {
                        yellow_leaf_style()
                    } else {
                        leaf_style()
                    };
                    Span::styled(LEAF_FRAMES[leaf.spin()], style)
                }
                None => Span::raw(" "),
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Render the leaves beside the countdown
pub fn render_leaves_pane(f: &mut Frame, app: &AppState, area: Rect) {
    render_leaf_field(f, &app.leaves, area, " 🍃 ");
}

/// Render a leaf field inside a bordered block
pub fn render_leaf_field(f: &mut Frame, field: &LeafField, area: Rect, title: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), title_style()))
        .style(leaf_style());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = leaf_lines(field.leaves(), inner.width, inner.height);
    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    f.render_widget(paragraph, inner);
}
