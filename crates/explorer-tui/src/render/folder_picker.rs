use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;

/// Render the directory picker used by Copy/Download to Folder.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(picker) = &app.picker else {
        return;
    };

    let (list_area, hint_area) = super::picker_chunks(area);
    let popup_area = super::centered_rect_percent(60, 70, area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(
            " Copy {} to… {} ",
            picker.source.display_name(),
            picker.explorer.cwd().display()
        ));
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    // Render the file explorer inside the block
    frame.render_widget(&picker.explorer.widget(), inner);

    let hint_style = Style::default().fg(Color::DarkGray);
    let key_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);

    let hints = Line::from(vec![
        Span::styled(" j/k", key_style),
        Span::styled(" nav  ", hint_style),
        Span::styled("l/h", key_style),
        Span::styled(" in/out  ", hint_style),
        Span::styled("c", key_style),
        Span::styled(" copy here  ", hint_style),
        Span::styled("Esc", key_style),
        Span::styled(" cancel", hint_style),
    ]);

    frame.render_widget(Paragraph::new(hints), hint_area);
}
