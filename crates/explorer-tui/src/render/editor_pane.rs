use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Editor ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let dim_style = Style::default().fg(Color::DarkGray);

    if let Some((left, right)) = &app.editor.comparison {
        let label_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled("Comparing", label_style)),
            Line::from(vec![
                Span::styled("  left:  ", dim_style),
                Span::raw(left.to_string()),
            ]),
            Line::from(vec![
                Span::styled("  right: ", dim_style),
                Span::raw(right.to_string()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    if app.editor.tabs.is_empty() {
        let hint = Paragraph::new("Open a file from the explorer")
            .style(dim_style);
        frame.render_widget(hint, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    // Tab strip.
    let active_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let tabs: Vec<Span> = app
        .editor
        .tabs
        .iter()
        .enumerate()
        .flat_map(|(idx, url)| {
            let style = if Some(idx) == app.editor.active {
                active_style
            } else {
                dim_style
            };
            [Span::styled(format!(" {} ", url.display_name()), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let body = match &app.editor.preview {
        None => Paragraph::new("Loading...").style(dim_style),
        Some(Err(msg)) => Paragraph::new(msg.clone()).style(Style::default().fg(Color::Red)),
        Some(Ok(lines)) => Paragraph::new(
            lines
                .iter()
                .map(|line| Line::from(line.clone()))
                .collect::<Vec<_>>(),
        ),
    };
    frame.render_widget(body, chunks[1]);
}
