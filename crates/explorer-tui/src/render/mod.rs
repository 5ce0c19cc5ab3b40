mod context_menu;
mod editor_pane;
mod folder_picker;
mod status_bar;
mod tree_pane;

use explorer::SidebarTab;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, LayoutGeometry, Mode};

pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let areas = split(size, app);

    render_title_bar(frame, areas.title, app);
    tree_pane::render(frame, areas.sidebar, app);
    editor_pane::render(frame, areas.editor, app);
    status_bar::render(frame, areas.bottom, app);

    // Overlays (rendered on top).
    match app.mode {
        Mode::ContextMenu => context_menu::render(frame, size, app),
        Mode::FolderPicker => folder_picker::render(frame, size, app),
        Mode::Normal | Mode::Rename => {}
    }
}

struct Areas {
    title: Rect,
    sidebar: Rect,
    editor: Rect,
    bottom: Rect,
}

/// Title bar (1), sidebar and editor side by side, bottom bar (1).
fn split(frame_size: Rect, app: &App) -> Areas {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let sidebar_width = app.sidebar_width_for(frame_size.width).min(frame_size.width);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(outer[1]);

    Areas {
        title: outer[0],
        sidebar: panes[0],
        editor: panes[1],
        bottom: outer[2],
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::DarkGray);
    let active_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" Explorer", title_style),
        Span::raw("  "),
        Span::styled(format!("[{}]", app.root.display_name()), label_style),
        Span::raw("  "),
    ];

    for (idx, tab) in SidebarTab::ALL.iter().enumerate() {
        let style = if *tab == app.tab {
            active_style
        } else {
            label_style
        };
        spans.push(Span::styled(format!("{} {}", idx + 1, tab.title()), style));
        spans.push(Span::raw(" "));
    }

    if let Some(selected) = app.ctx.compare.get() {
        spans.push(Span::styled(
            format!(" {{compare:{}}}", selected.display_name()),
            label_style,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compute layout geometry for mouse hit testing.
/// This mirrors the layout calculations in render() but returns Rect values.
pub fn compute_layout(frame_size: Rect, app: &App) -> LayoutGeometry {
    let areas = split(frame_size, app);

    // Tree rows live inside the sidebar borders.
    let tree_inner = Block::default().borders(Borders::ALL).inner(areas.sidebar);

    let overlay = compute_overlay_rect(frame_size, app);
    let picker_list_inner = if app.mode == Mode::FolderPicker {
        compute_picker_list_inner(frame_size)
    } else {
        None
    };

    LayoutGeometry {
        frame: frame_size,
        sidebar: areas.sidebar,
        tree_inner,
        editor: areas.editor,
        overlay,
        picker_list_inner,
    }
}

/// Compute the overlay Rect based on current mode.
fn compute_overlay_rect(area: Rect, app: &App) -> Option<Rect> {
    match app.mode {
        Mode::ContextMenu => {
            let item_count = app.menu.as_ref().map_or(0, |menu| menu.actions.len());
            let popup_height = (item_count as u16) + 2;
            let popup_width = 32u16.min(area.width.saturating_sub(4));
            Some(centered_rect_fixed(popup_width, popup_height, area))
        }
        Mode::FolderPicker => Some(centered_rect_percent(60, 70, area)),
        Mode::Normal | Mode::Rename => None,
    }
}

/// Helper to create a centered rectangle with fixed dimensions.
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [vertical_area] = vertical.areas(area);
    let [centered] = horizontal.areas(vertical_area);
    centered
}

/// Split of the picker overlay: explorer list, then a hint bar.
fn picker_chunks(area: Rect) -> (Rect, Rect) {
    let popup_area = centered_rect_percent(60, 70, area);
    let chunks = Layout::default()
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(popup_area);
    (chunks[0], chunks[1])
}

/// Compute the inner area of the file explorer list in FolderPicker mode.
/// This mirrors the layout in folder_picker::render.
fn compute_picker_list_inner(area: Rect) -> Option<Rect> {
    let (list_area, _) = picker_chunks(area);

    // The outer block with borders (rendered by folder_picker)
    let outer_inner = Block::default().borders(Borders::ALL).inner(list_area);

    // The file explorer widget has its own internal block with borders
    // (from Theme::default() which uses Borders::ALL)
    Some(Block::default().borders(Borders::ALL).inner(outer_inner))
}

/// Helper to create a centered rectangle with percentage dimensions.
fn centered_rect_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn compute_scroll_offset(cursor: usize, current_offset: usize, visible_height: usize) -> usize {
    if cursor < current_offset {
        cursor
    } else if cursor >= current_offset + visible_height {
        cursor.saturating_sub(visible_height - 1)
    } else {
        current_offset
    }
}

#[cfg(test)]
mod tests {
    use explorer::PanelState;
    use explorer::test_support::sample_workspace;

    use super::*;
    use crate::app::PanelConfig;

    #[test]
    fn layout_places_sidebar_at_panel_width() {
        let app = App::new(
            sample_workspace(),
            PanelState::default(),
            PanelConfig::default(),
        );
        let geometry = compute_layout(Rect::new(0, 0, 120, 40), &app);
        assert_eq!(geometry.sidebar, Rect::new(0, 1, 32, 38));
        assert_eq!(geometry.tree_inner, Rect::new(1, 2, 30, 36));
        assert_eq!(geometry.editor.x, 32);
        assert_eq!(geometry.sidebar_border(), Some(31));
        assert!(geometry.overlay.is_none());
    }

    #[test]
    fn sidebar_never_exceeds_editor_minimum() {
        let state = PanelState {
            sidebar_width: Some(500.0),
            ..PanelState::default()
        };
        let app = App::new(sample_workspace(), state, PanelConfig::default());
        let geometry = compute_layout(Rect::new(0, 0, 80, 24), &app);
        assert_eq!(geometry.sidebar.width, 60);
    }

    #[test]
    fn scroll_offset_follows_cursor() {
        assert_eq!(compute_scroll_offset(0, 5, 10), 0);
        assert_eq!(compute_scroll_offset(12, 0, 10), 3);
        assert_eq!(compute_scroll_offset(4, 2, 10), 2);
    }
}
