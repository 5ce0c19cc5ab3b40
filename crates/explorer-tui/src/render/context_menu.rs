use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(menu) = &app.menu else {
        return;
    };
    let Some(node) = app.tree.node(&menu.target) else {
        return;
    };

    let popup_height = (menu.actions.len() as u16) + 2; // +2 for borders
    let popup_width = 32u16.min(area.width.saturating_sub(4));
    let popup_area = super::centered_rect_fixed(popup_width, popup_height, area);

    // Clear background under the popup.
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", node.name()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let normal_style = Style::default().fg(Color::White);
    let destructive_style = Style::default().fg(Color::Red);
    let selected_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = menu
        .actions
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let style = if idx == menu.cursor {
                selected_style
            } else if action.is_destructive() {
                destructive_style
            } else {
                normal_style
            };
            Line::from(Span::styled(format!("  {}", action.label(node)), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
