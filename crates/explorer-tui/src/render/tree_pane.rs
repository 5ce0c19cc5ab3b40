use explorer::{CellView, GitStatus, SidebarTab};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use super::compute_scroll_offset;
use crate::app::App;
use crate::tree::TreeRow;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.is_resizing() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", app.tab.title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.tab != SidebarTab::Explorer {
        let hint = Paragraph::new(Line::from(Span::styled(
            format!("{} is not available here.", app.tab.title()),
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(hint, inner);
        return;
    }

    let visible_height = inner.height as usize;
    if visible_height == 0 || app.tree.is_empty() {
        return;
    }

    // Adjust scroll so cursor is always visible.
    let scroll_offset = compute_scroll_offset(app.cursor, app.scroll_offset, visible_height);

    let lines: Vec<Line> = app
        .tree
        .rows()
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .filter_map(|(idx, row)| {
            let cell = app.tree.cell(&row.url)?;
            let dragging = app.drag_source() == Some(&row.url);
            Some(render_row(row, &cell.view(&app.ctx), idx == app.cursor, dragging))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);

    // Render scrollbar if content exceeds visible height.
    if app.tree.len() > visible_height {
        let mut scrollbar_state = ScrollbarState::new(app.tree.len())
            .position(scroll_offset)
            .viewport_content_length(visible_height);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}

fn render_row<'a>(row: &TreeRow, view: &CellView, is_selected: bool, dragging: bool) -> Line<'a> {
    let indent = "  ".repeat(row.depth);
    let marker = match (row.is_folder, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };

    if view.renaming {
        let draft = view.draft.clone().unwrap_or_default();
        let field_style = if view.selection_all {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED)
        };
        return Line::from(vec![
            Span::raw(format!("{indent}{marker}")),
            Span::styled(draft, field_style),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]);
    }

    let mut name_style = match view.git_status {
        Some(status) => Style::default().fg(status_color(status)),
        None if view.is_folder => Style::default().fg(Color::Blue),
        None => Style::default(),
    };
    if dragging {
        name_style = name_style.add_modifier(Modifier::DIM | Modifier::ITALIC);
    }
    if is_selected {
        name_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(format!("{indent}{marker}")),
        Span::styled(view.name.clone(), name_style),
    ];
    if let Some(status) = view.git_status {
        spans.push(Span::styled(
            format!(" {}", status.badge()),
            Style::default().fg(status_color(status)),
        ));
    }
    Line::from(spans)
}

fn status_color(status: GitStatus) -> Color {
    match status {
        GitStatus::Modified | GitStatus::Renamed => Color::Yellow,
        GitStatus::Added | GitStatus::Untracked => Color::Green,
        GitStatus::Deleted | GitStatus::Conflicted => Color::Red,
        GitStatus::Ignored => Color::DarkGray,
    }
}
