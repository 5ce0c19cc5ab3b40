use explorer::Feedback;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Mode};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(msg) = &app.status_message {
        let style = match msg.feedback {
            Feedback::Error(_) => Style::default().fg(Color::Red),
            Feedback::Warning(_) => Style::default().fg(Color::Yellow),
            Feedback::Info(_) => Style::default().fg(Color::Green),
        };
        Line::from(Span::styled(format!(" {}", msg.feedback.message()), style))
    } else {
        let hint_style = Style::default().fg(Color::DarkGray);
        let hints: &[(&str, &str)] = match app.mode {
            Mode::Rename => &[
                ("type", "name"),
                ("Ctrl+U", "clear"),
                ("\u{23ce}", "rename"),
                ("Esc", "cancel"),
            ],
            Mode::ContextMenu => &[("j/k", "move"), ("\u{23ce}", "choose"), ("Esc", "close")],
            Mode::Normal | Mode::FolderPicker => &[
                ("\u{2191}\u{2193}", "navigate"),
                ("\u{23ce}", "open"),
                ("o", "new tab"),
                ("m", "menu"),
                ("r", "rename"),
                (".", "hidden"),
                ("1-4", "tabs"),
                ("q", "quit"),
            ],
        };
        let spans: Vec<Span> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(format!(" {key}"), hint_style),
                    Span::styled(format!(" {label} "), hint_style),
                ]
            })
            .collect();
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line), area);
}
