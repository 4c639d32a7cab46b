//! Screen split for the game view: play field and status line on the left,
//! stats panel on the right.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const STATS_PANEL_WIDTH: u16 = 22;
const STATUS_HEIGHT: u16 = 2;
const QUIT_HINT: (&str, &str) = ("[q/Esc]", "Quit");

pub struct SceneLayout {
    pub field: Rect,
    pub status: Rect,
    pub stats: Rect,
}

/// Draw the outer border titled `title` and carve out the three areas.
///
/// ```text
/// ┌─ Title ──────────────────────┬─ Stats ──┐
/// │ [field]                      │          │
/// │                              │          │
/// │ [status: 2 lines]            │          │
/// └──────────────────────────────┴──────────┘
/// ```
pub fn split_scene(frame: &mut Frame, area: Rect, title: &str) -> SceneLayout {
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [left, stats] = split2(
        inner,
        Direction::Horizontal,
        [Constraint::Min(20), Constraint::Length(STATS_PANEL_WIDTH)],
    );
    let [field, status] = split2(
        left,
        Direction::Vertical,
        [Constraint::Min(4), Constraint::Length(STATUS_HEIGHT)],
    );

    SceneLayout {
        field,
        status,
        stats,
    }
}

fn split2(area: Rect, direction: Direction, constraints: [Constraint; 2]) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);
    [chunks[0], chunks[1]]
}

/// Centered status text with the quit hint underneath.
pub fn render_status(frame: &mut Frame, area: Rect, text: &str) {
    if area.height == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center),
        Rect { height: 1, ..area },
    );

    if area.height > 1 {
        let (key, action) = QUIT_HINT;
        let hint = Line::from(vec![
            Span::styled(key, Style::default().fg(Color::White)),
            Span::styled(format!(" {action}"), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(
            Paragraph::new(hint).alignment(Alignment::Center),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

/// Bordered stats panel. Returns the area inside the border.
pub fn stats_block(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Stats ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}
