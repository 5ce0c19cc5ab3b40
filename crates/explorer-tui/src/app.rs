use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use explorer::{
    ContainerGeometry, DragPayload, ExplorerCommand, ExplorerContext, Feedback, FocusState,
    Locator, MenuAction, MenuOutcome, NodeIdentity, PanelLimits, PanelResizer, PanelState,
    SidebarTab, available_actions, copy_into_folder, dispatch,
};
use ratatui::layout::{Position, Rect};
use ratatui_explorer::{FileExplorer, Input, Theme};

use crate::action::{Action, AppCommand};
use crate::tree::{TreeModel, TreeRow};

/// Duration threshold for detecting double-clicks (in milliseconds).
const DOUBLE_CLICK_THRESHOLD_MS: u128 = 400;

/// ~3 seconds at the 250ms tick.
const STATUS_TICKS: u8 = 12;

/// Tracks clickable regions for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub struct LayoutGeometry {
    /// The whole terminal.
    pub frame: Rect,
    /// Sidebar including its border.
    pub sidebar: Rect,
    /// Inner area of the tree (excluding borders).
    pub tree_inner: Rect,
    /// Editor pane including its border.
    pub editor: Rect,
    /// Overlay area if one is currently displayed.
    pub overlay: Option<Rect>,
    /// Inner area of the folder picker list.
    pub picker_list_inner: Option<Rect>,
}

impl LayoutGeometry {
    /// Column of the sidebar's right border, the resize handle.
    pub fn sidebar_border(&self) -> Option<u16> {
        (self.sidebar.width > 0).then(|| self.sidebar.x + self.sidebar.width - 1)
    }
}

/// UI mode the app is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    ContextMenu,
    Rename,
    FolderPicker,
}

/// The open context menu.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    pub target: Locator,
    pub actions: Vec<MenuAction>,
    pub cursor: usize,
}

/// Directory picker for Copy/Download to Folder.
pub struct FolderPicker {
    /// The node being copied.
    pub source: Locator,
    pub explorer: FileExplorer,
}

/// Side-panel sizing in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    pub limits: PanelLimits,
    pub fixed_insets: f64,
    pub activity_bar_width: f64,
    pub editor_min_width: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            limits: PanelLimits::default(),
            fixed_insets: 0.0,
            activity_bar_width: 0.0,
            editor_min_width: 20.0,
        }
    }
}

impl PanelConfig {
    pub fn geometry(&self, container_width: u16) -> ContainerGeometry {
        ContainerGeometry {
            container_width: f64::from(container_width),
            fixed_insets: self.fixed_insets,
            fixed_panel_widths: self.activity_bar_width,
            sibling_min_width: self.editor_min_width,
        }
    }
}

/// What the editor pane shows.
#[derive(Debug, Clone, Default)]
pub struct EditorPane {
    pub tabs: Vec<Locator>,
    pub active: Option<usize>,
    /// First lines of the active file, once loaded.
    pub preview: Option<Result<Vec<String>, String>>,
    pub comparison: Option<(Locator, Locator)>,
}

impl EditorPane {
    /// Show `url`, reusing the active tab unless a new one is forced.
    pub fn open(&mut self, url: Locator, new_tab: bool) {
        if !new_tab && let Some(existing) = self.tabs.iter().position(|tab| tab == &url) {
            self.active = Some(existing);
        } else if new_tab || self.active.is_none() {
            self.tabs.push(url);
            self.active = Some(self.tabs.len() - 1);
        } else if let Some(active) = self.active {
            self.tabs[active] = url;
        }
        self.preview = None;
        self.comparison = None;
    }

    pub fn active_file(&self) -> Option<&Locator> {
        self.active.and_then(|idx| self.tabs.get(idx))
    }
}

/// Transient status message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub feedback: Feedback,
    /// Remaining ticks before the message expires.
    pub ticks_remaining: u8,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    /// Button down on a row, not yet moved.
    Pressed { url: Locator },
    Dragging {
        source: Locator,
        payload: DragPayload,
    },
    /// Dragging the sidebar border, from this column.
    Resizing { origin: u16 },
}

/// The TUI application state. This is a pure state machine:
/// inputs produce commands (side effects), actions update state.
pub struct App {
    /// Workspace root shown at the top of the tree.
    pub root: Locator,
    pub show_hidden: bool,
    pub tree: TreeModel,
    /// Current cursor position in the tree rows.
    pub cursor: usize,
    /// Viewport scroll offset for the tree.
    pub scroll_offset: usize,
    /// Compare selection, active editor, git status: shared by every cell.
    pub ctx: ExplorerContext,

    pub mode: Mode,
    pub menu: Option<ContextMenu>,
    pub picker: Option<FolderPicker>,

    pub panel: PanelResizer,
    pub panel_config: PanelConfig,
    pub tab: SidebarTab,
    pub editor: EditorPane,

    /// Transient feedback message.
    pub status_message: Option<StatusMessage>,
    /// Layout geometry for mouse hit testing.
    pub layout_geometry: LayoutGeometry,

    gesture: Gesture,
    /// Row to put the cursor on after the next tree reload.
    pending_focus: Option<Locator>,
    last_click_time: Option<Instant>,
    last_click_pos: Option<(u16, u16)>,
}

impl App {
    pub fn new(tree: NodeIdentity, state: PanelState, panel_config: PanelConfig) -> Self {
        let width = state
            .sidebar_width
            .unwrap_or(panel_config.limits.default_width);
        Self {
            root: tree.url().clone(),
            show_hidden: false,
            tree: TreeModel::new(tree),
            cursor: 0,
            scroll_offset: 0,
            ctx: ExplorerContext::new(),
            mode: Mode::Normal,
            menu: None,
            picker: None,
            panel: PanelResizer::new(panel_config.limits, width),
            panel_config,
            tab: state.sidebar_tab,
            editor: EditorPane::default(),
            status_message: None,
            layout_geometry: LayoutGeometry::default(),
            gesture: Gesture::Idle,
            pending_focus: None,
            last_click_time: None,
            last_click_pos: None,
        }
    }

    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Handle a terminal event, returning a command for the event loop.
    pub fn handle_event(&mut self, event: Event) -> AppCommand {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => AppCommand::None,
        }
    }

    /// Handle an async action (result from a background task).
    pub fn handle_action(&mut self, action: Action) -> AppCommand {
        match action {
            Action::FolderListed {
                folder,
                result: Ok(children),
            } => {
                let at_cursor = self.selected_url().cloned();
                if !self.tree.set_listing(&folder, children) {
                    tracing::debug!(%folder, "dropping listing outside the workspace");
                    return AppCommand::None;
                }

                // A pending focus resolves once its parent folder is listed.
                let lands_here = self
                    .pending_focus
                    .as_ref()
                    .is_some_and(|url| url.parent().as_ref() == Some(&folder));
                let focus = if lands_here {
                    self.pending_focus.take()
                } else {
                    at_cursor
                };
                if let Some(idx) = focus.and_then(|url| self.tree.index_of(&url)) {
                    self.cursor = idx;
                }
                self.cursor = self.cursor.min(self.tree.len().saturating_sub(1));
                self.ensure_cursor_visible();
                if self.mode == Mode::Rename && self.tree.renaming().is_none() {
                    self.mode = Mode::Normal;
                }
                AppCommand::None
            }
            Action::FolderListed {
                folder,
                result: Err(msg),
            } => {
                if folder == self.root {
                    self.set_status(Feedback::error(format!("Could not list workspace: {msg}")));
                } else {
                    self.set_status(Feedback::error(format!(
                        "Could not list {}: {msg}",
                        folder.display_name()
                    )));
                    self.tree.forget(&folder);
                    self.cursor = self.cursor.min(self.tree.len().saturating_sub(1));
                }
                AppCommand::None
            }
            Action::StatusLoaded(snapshot) => {
                self.ctx.git = snapshot;
                AppCommand::None
            }
            Action::Executed {
                command,
                outcome,
                active_editor,
            } => {
                self.ctx.active_editor = active_editor;
                self.handle_executed(command, outcome)
            }
            Action::PreviewLoaded(url, result) => {
                if self.editor.active_file() == Some(&url) {
                    self.editor.preview = Some(result);
                }
                AppCommand::None
            }
            Action::Persisted(Ok(())) => AppCommand::None,
            Action::Persisted(Err(msg)) => {
                self.set_status(Feedback::warning(format!("Could not save panel state: {msg}")));
                AppCommand::None
            }
        }
    }

    /// Tick the app forward (called on interval). Used for expiring status messages.
    pub fn tick(&mut self) {
        if let Some(msg) = &mut self.status_message {
            if msg.ticks_remaining == 0 {
                self.status_message = None;
            } else {
                msg.ticks_remaining -= 1;
            }
        }
    }

    /// Install freshly computed geometry and keep the cursor in view.
    pub fn set_layout(&mut self, geometry: LayoutGeometry) {
        self.layout_geometry = geometry;
        self.ensure_cursor_visible();
    }

    /// Sidebar width in cells for a terminal of `frame_width` columns.
    pub fn sidebar_width_for(&self, frame_width: u16) -> u16 {
        let geometry = self.panel_config.geometry(frame_width);
        self.panel.live_width(&geometry).round().max(0.0) as u16
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.tree.row(self.cursor)
    }

    pub fn selected_url(&self) -> Option<&Locator> {
        self.selected_row().map(|row| &row.url)
    }

    pub fn selected_node(&self) -> Option<&NodeIdentity> {
        self.selected_url().and_then(|url| self.tree.node(url))
    }

    /// The row under the drag pointer, for highlighting drop targets.
    pub fn drag_source(&self) -> Option<&Locator> {
        match &self.gesture {
            Gesture::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resizing { .. })
    }

    // -- executed commands --

    fn handle_executed(
        &mut self,
        command: ExplorerCommand,
        outcome: Result<Option<Feedback>, String>,
    ) -> AppCommand {
        let follow_up = match outcome {
            Ok(feedback) => {
                if let Some(feedback) = feedback {
                    self.set_status(feedback);
                }
                self.apply_success(&command)
            }
            Err(msg) => {
                self.set_status(Feedback::error(msg));
                AppCommand::None
            }
        };

        match follow_up {
            AppCommand::None if command.changes_tree() => AppCommand::ReloadTree(self.root.clone()),
            other => other,
        }
    }

    fn apply_success(&mut self, command: &ExplorerCommand) -> AppCommand {
        match command {
            ExplorerCommand::Open { url, new_tab } => {
                self.editor.open(url.clone(), *new_tab);
                AppCommand::LoadPreview(url.clone())
            }
            ExplorerCommand::Compare { left, right } => {
                self.editor.comparison = Some((left.clone(), right.clone()));
                AppCommand::None
            }
            ExplorerCommand::AssignWorkspaceRoot(url) => {
                self.root = url.clone();
                self.tree = TreeModel::new(NodeIdentity::folder(url.clone(), Vec::new()));
                self.cursor = 0;
                self.scroll_offset = 0;
                AppCommand::ReloadTree(url.clone())
            }
            ExplorerCommand::CopyToClipboard(text) => {
                self.set_status(Feedback::info(format!("Copied {text}")));
                AppCommand::None
            }
            ExplorerCommand::Rename { url, new_name } => {
                if let Some(parent) = url.parent() {
                    self.pending_focus = Some(parent.join(new_name));
                }
                self.forget(url);
                AppCommand::None
            }
            ExplorerCommand::Copy { destination, .. } => {
                self.tree.reveal(destination);
                self.pending_focus = Some(destination.clone());
                AppCommand::None
            }
            ExplorerCommand::Delete(url) => {
                self.forget(url);
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    // -- keys --

    fn handle_key(&mut self, key: KeyEvent) -> AppCommand {
        // Ctrl+C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppCommand::Quit;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::ContextMenu => self.handle_menu_key(key),
            Mode::Rename => self.handle_rename_key(key),
            Mode::FolderPicker => self.handle_picker_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> AppCommand {
        if let KeyCode::Char(c @ '1'..='4') = key.code {
            let idx = c as usize - '1' as usize;
            return self.select_tab(SidebarTab::ALL[idx]);
        }

        match key.code {
            KeyCode::Char('q') => return AppCommand::Quit,
            KeyCode::Tab => {
                let idx = SidebarTab::ALL
                    .iter()
                    .position(|tab| *tab == self.tab)
                    .unwrap_or(0);
                return self.select_tab(SidebarTab::ALL[(idx + 1) % SidebarTab::ALL.len()]);
            }
            _ => {}
        }

        if self.tab != SidebarTab::Explorer {
            return AppCommand::None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor_down(1);
                AppCommand::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor_up(1);
                AppCommand::None
            }
            KeyCode::Char('l') | KeyCode::Right => match self.selected_row().cloned() {
                Some(row) if row.is_folder && !row.expanded => {
                    self.toggle_folder(&row.url).unwrap_or(AppCommand::None)
                }
                _ => AppCommand::None,
            },
            KeyCode::Char('h') | KeyCode::Left => {
                self.collapse_or_climb();
                AppCommand::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_url().cloned() {
                Some(url) => self.activate(&url),
                None => AppCommand::None,
            },
            KeyCode::Char('o') => self.run_action(MenuAction::OpenInNewTab),
            KeyCode::Char('r') | KeyCode::F(2) => self.run_action(MenuAction::Rename),
            KeyCode::Char('m') => {
                self.open_menu();
                AppCommand::None
            }
            KeyCode::Char('.') => {
                self.show_hidden = !self.show_hidden;
                AppCommand::ReloadTree(self.root.clone())
            }
            KeyCode::F(5) => AppCommand::ReloadTree(self.root.clone()),
            _ => AppCommand::None,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppCommand {
        let Some(menu) = &mut self.menu else {
            self.mode = Mode::Normal;
            return AppCommand::None;
        };

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if menu.cursor + 1 < menu.actions.len() {
                    menu.cursor += 1;
                }
                AppCommand::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                menu.cursor = menu.cursor.saturating_sub(1);
                AppCommand::None
            }
            KeyCode::Enter => self.choose_menu_item(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => {
                self.dismiss_menu();
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn handle_rename_key(&mut self, key: KeyEvent) -> AppCommand {
        let Some(url) = self.tree.renaming().cloned() else {
            self.mode = Mode::Normal;
            return AppCommand::None;
        };
        let Some(cell) = self.tree.cell_mut(&url) else {
            self.mode = Mode::Normal;
            return AppCommand::None;
        };
        let rename = cell.rename_mut();

        match key.code {
            KeyCode::Esc => {
                rename.cancel();
                self.mode = Mode::Normal;
                AppCommand::None
            }
            KeyCode::Enter => {
                let command = rename.commit();
                self.mode = Mode::Normal;
                command.map_or(AppCommand::None, AppCommand::Execute)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                rename.clear_draft();
                AppCommand::None
            }
            KeyCode::Backspace if rename.focus() == FocusState::Focused => {
                rename.backspace();
                AppCommand::None
            }
            KeyCode::Char(c)
                if rename.focus() == FocusState::Focused
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                rename.insert_char(c);
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Char('c') => self.copy_into_picked_folder(),
            KeyCode::Esc => {
                self.close_picker();
                AppCommand::None
            }
            _ => {
                // Pass other keys to the file explorer for navigation
                if let Some(picker) = &mut self.picker {
                    let event = Event::Key(key);
                    let _ = picker.explorer.handle(&event);
                }
                AppCommand::None
            }
        }
    }

    // -- mouse --

    fn handle_mouse(&mut self, mouse: MouseEvent) -> AppCommand {
        match self.mode {
            Mode::Normal => self.handle_normal_mouse(mouse),
            Mode::ContextMenu => self.handle_menu_mouse(mouse),
            Mode::Rename => self.handle_rename_mouse(mouse),
            Mode::FolderPicker => self.handle_picker_mouse(mouse),
        }
    }

    fn handle_normal_mouse(&mut self, mouse: MouseEvent) -> AppCommand {
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.on_sidebar_border(pos) {
                    self.panel.begin_gesture();
                    self.gesture = Gesture::Resizing {
                        origin: mouse.column,
                    };
                } else if self.tab == SidebarTab::Explorer
                    && let Some(idx) = self.row_at(pos)
                {
                    self.cursor = idx;
                    if let Some(url) = self.selected_url().cloned() {
                        self.gesture = Gesture::Pressed { url };
                    }
                }
                AppCommand::None
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if self.tab == SidebarTab::Explorer
                    && let Some(idx) = self.row_at(pos)
                {
                    self.cursor = idx;
                    self.open_menu();
                }
                AppCommand::None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.handle_drag_motion(mouse);
                AppCommand::None
            }
            MouseEventKind::Up(MouseButton::Left) => self.handle_release(pos),
            MouseEventKind::ScrollDown => {
                if self.layout_geometry.tree_inner.contains(pos) {
                    self.move_cursor_down(3);
                }
                AppCommand::None
            }
            MouseEventKind::ScrollUp => {
                if self.layout_geometry.tree_inner.contains(pos) {
                    self.move_cursor_up(3);
                }
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn handle_drag_motion(&mut self, mouse: MouseEvent) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Resizing { origin } => {
                self.panel
                    .update_gesture(f64::from(mouse.column) - f64::from(origin));
                self.gesture = Gesture::Resizing { origin };
            }
            Gesture::Pressed { url } => {
                // Jitter within the pressed row is still a click.
                let pos = Position::new(mouse.column, mouse.row);
                if self.url_at(pos) == Some(&url) {
                    self.gesture = Gesture::Pressed { url };
                    return;
                }
                let payload = self.tree.cell_mut(&url).and_then(|cell| cell.begin_drag());
                if let Some(payload) = payload {
                    self.gesture = Gesture::Dragging {
                        source: url,
                        payload,
                    };
                }
            }
            other => self.gesture = other,
        }
    }

    fn handle_release(&mut self, pos: Position) -> AppCommand {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => AppCommand::None,
            Gesture::Resizing { .. } => {
                let geometry = self.panel_config.geometry(self.layout_geometry.frame.width);
                match self.panel.end_gesture(&geometry) {
                    Some(width) => AppCommand::SaveWidth(width),
                    None => AppCommand::None,
                }
            }
            Gesture::Pressed { url } => {
                if self.url_at(pos) == Some(&url) {
                    self.activate(&url)
                } else {
                    AppCommand::None
                }
            }
            Gesture::Dragging { source, payload } => {
                if let Some(cell) = self.tree.cell_mut(&source) {
                    cell.end_drag();
                }
                self.drop_at(pos, payload)
            }
        }
    }

    fn drop_at(&mut self, pos: Position, payload: DragPayload) -> AppCommand {
        let Some(target) = self
            .row_at(pos)
            .and_then(|idx| self.tree.row(idx))
            .filter(|row| row.is_folder)
            .map(|row| row.url.clone())
        else {
            // Released outside any folder: nothing happens.
            return AppCommand::None;
        };
        let Some(cell) = self.tree.cell(&target) else {
            return AppCommand::None;
        };

        let outcome = cell.accept_drop(&[payload]);
        if !outcome.handled() {
            if let Some(skip) = outcome.skipped.first() {
                self.set_status(Feedback::warning(describe_skip(skip)));
            }
            return AppCommand::None;
        }
        AppCommand::ExecuteAll(outcome.commands)
    }

    fn handle_menu_mouse(&mut self, mouse: MouseEvent) -> AppCommand {
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(overlay) = self.layout_geometry.overlay else {
                    return AppCommand::None;
                };
                if !overlay.contains(pos) {
                    // Click outside: close overlay.
                    self.dismiss_menu();
                    return AppCommand::None;
                }
                // Map click to option index (accounting for border).
                let relative_row = mouse.row.saturating_sub(overlay.y + 1) as usize;
                if let Some(menu) = &mut self.menu
                    && relative_row < menu.actions.len()
                {
                    menu.cursor = relative_row;
                    return self.choose_menu_item();
                }
                AppCommand::None
            }
            MouseEventKind::ScrollDown => {
                if let Some(menu) = &mut self.menu
                    && menu.cursor + 1 < menu.actions.len()
                {
                    menu.cursor += 1;
                }
                AppCommand::None
            }
            MouseEventKind::ScrollUp => {
                if let Some(menu) = &mut self.menu {
                    menu.cursor = menu.cursor.saturating_sub(1);
                }
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn handle_rename_mouse(&mut self, mouse: MouseEvent) -> AppCommand {
        match mouse.kind {
            MouseEventKind::Down(_) => {
                // Clicking anywhere takes focus away from the field.
                if let Some(url) = self.tree.renaming().cloned()
                    && let Some(cell) = self.tree.cell_mut(&url)
                {
                    cell.rename_mut().cancel();
                }
                self.mode = Mode::Normal;
                self.handle_normal_mouse(mouse)
            }
            _ => AppCommand::None,
        }
    }

    fn handle_picker_mouse(&mut self, mouse: MouseEvent) -> AppCommand {
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = self.is_double_click(mouse.column, mouse.row);

                if let Some(overlay) = self.layout_geometry.overlay {
                    if !overlay.contains(pos) {
                        // Click outside: close the picker.
                        self.close_picker();
                    } else if let Some(list_inner) = self.layout_geometry.picker_list_inner
                        && list_inner.contains(pos)
                    {
                        self.handle_picker_click(mouse.row, list_inner);

                        // Double-click: navigate into folder if it's a directory.
                        if is_double
                            && let Some(picker) = &mut self.picker
                            && picker.explorer.current().is_dir()
                        {
                            let _ = picker.explorer.handle(Input::Right);
                        }
                    }
                }
                AppCommand::None
            }
            MouseEventKind::ScrollDown => {
                if let Some(picker) = &mut self.picker {
                    let _ = picker.explorer.handle(Input::PageDown);
                }
                AppCommand::None
            }
            MouseEventKind::ScrollUp => {
                if let Some(picker) = &mut self.picker {
                    let _ = picker.explorer.handle(Input::PageUp);
                }
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn handle_picker_click(&mut self, row: u16, list_inner: Rect) {
        let Some(picker) = &mut self.picker else {
            return;
        };

        let files_count = picker.explorer.files().len();
        if files_count == 0 {
            return;
        }

        let visible_height = list_inner.height as usize;
        let selected_idx = picker.explorer.selected_idx();

        // The list only scrolls when the selection leaves the viewport, so
        // estimate the offset from where the selection sits.
        let scroll_offset = if files_count <= visible_height || selected_idx < visible_height {
            0
        } else if selected_idx >= files_count.saturating_sub(visible_height) {
            files_count.saturating_sub(visible_height)
        } else {
            selected_idx.saturating_sub(visible_height - 1)
        };

        let relative_row = (row.saturating_sub(list_inner.y)) as usize;
        let target_idx = scroll_offset + relative_row;
        if target_idx < files_count {
            picker.explorer.set_selected_idx(target_idx);
        }
    }

    /// Check if a click at (col, row) is a double-click based on timing and position.
    fn is_double_click(&mut self, col: u16, row: u16) -> bool {
        let now = Instant::now();
        let is_double = if let (Some(last_time), Some((last_col, last_row))) =
            (self.last_click_time, self.last_click_pos)
        {
            let elapsed = now.duration_since(last_time).as_millis();
            elapsed < DOUBLE_CLICK_THRESHOLD_MS && col == last_col && row == last_row
        } else {
            false
        };

        if is_double {
            self.last_click_time = None;
            self.last_click_pos = None;
        } else {
            self.last_click_time = Some(now);
            self.last_click_pos = Some((col, row));
        }

        is_double
    }

    // -- tree interaction --

    /// Drop an entry that is gone so the next reload does not list it.
    fn forget(&mut self, url: &Locator) {
        self.tree.forget(url);
        self.cursor = self.cursor.min(self.tree.len().saturating_sub(1));
    }

    /// Expand or collapse a folder. Expanding lists it again.
    fn toggle_folder(&mut self, url: &Locator) -> Option<AppCommand> {
        if !self.tree.toggle(url) {
            return None;
        }
        Some(if self.tree.is_expanded(url) {
            AppCommand::ListFolders(vec![url.clone()])
        } else {
            AppCommand::None
        })
    }

    /// A tap on a row: folders toggle, files open in the current tab.
    fn activate(&mut self, url: &Locator) -> AppCommand {
        if let Some(command) = self.toggle_folder(url) {
            return command;
        }
        match self.tree.cell(url).and_then(|cell| cell.open()) {
            Some(command) => AppCommand::Execute(command),
            None => AppCommand::None,
        }
    }

    fn collapse_or_climb(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.is_folder && row.expanded && row.depth > 0 {
            self.tree.toggle(&row.url);
        } else if let Some(parent) = row.url.parent()
            && let Some(idx) = self.tree.index_of(&parent)
        {
            self.cursor = idx;
            self.ensure_cursor_visible();
        }
    }

    fn select_tab(&mut self, tab: SidebarTab) -> AppCommand {
        if self.tab == tab {
            return AppCommand::None;
        }
        self.tab = tab;
        AppCommand::SaveTab(tab)
    }

    fn open_menu(&mut self) {
        let Some(node) = self.selected_node() else {
            return;
        };
        let actions = available_actions(node, &self.ctx.compare);
        self.menu = Some(ContextMenu {
            target: node.url().clone(),
            actions,
            cursor: 0,
        });
        self.mode = Mode::ContextMenu;
    }

    /// Close the menu and report the dismissal, which completes any rename
    /// the menu started.
    fn dismiss_menu(&mut self) {
        self.menu = None;
        if self.mode == Mode::ContextMenu {
            self.mode = Mode::Normal;
        }
        if let Some(url) = self.tree.renaming().cloned()
            && let Some(cell) = self.tree.cell_mut(&url)
            && cell.rename_mut().overlay_dismissed()
        {
            self.mode = Mode::Rename;
        }
    }

    fn choose_menu_item(&mut self) -> AppCommand {
        let Some(menu) = &self.menu else {
            return AppCommand::None;
        };
        let Some(action) = menu.actions.get(menu.cursor).copied() else {
            return AppCommand::None;
        };
        let target = menu.target.clone();

        let command = self.apply_menu_action(action, &target);
        self.dismiss_menu();
        command
    }

    /// Run an action on the cursor node without going through the menu.
    fn run_action(&mut self, action: MenuAction) -> AppCommand {
        let Some(url) = self.selected_url().cloned() else {
            return AppCommand::None;
        };
        let command = self.apply_menu_action(action, &url);
        // No overlay was involved, so focus can be taken right away.
        self.dismiss_menu();
        command
    }

    fn apply_menu_action(&mut self, action: MenuAction, url: &Locator) -> AppCommand {
        let Some(node) = self.tree.node(url).cloned() else {
            return AppCommand::None;
        };

        match dispatch(action, &node, &mut self.ctx) {
            MenuOutcome::Command(command) => AppCommand::Execute(command),
            MenuOutcome::BeginRename => {
                if let Some(cell) = self.tree.cell_mut(url) {
                    cell.rename_mut().begin_rename();
                }
                AppCommand::None
            }
            MenuOutcome::PickFolder => {
                self.open_picker(&node);
                AppCommand::None
            }
            MenuOutcome::Nothing => {
                if action == MenuAction::SelectForCompare {
                    self.set_status(Feedback::info(format!(
                        "Selected {} for compare",
                        node.name()
                    )));
                }
                AppCommand::None
            }
        }
    }

    fn open_picker(&mut self, node: &NodeIdentity) {
        let theme = Theme::default().add_default_title();
        match FileExplorer::with_theme(theme) {
            Ok(mut explorer) => {
                // Start next to the node when it is on this machine.
                if let Some(dir) = node
                    .url()
                    .parent()
                    .and_then(|parent| parent.to_path())
                    .filter(|dir| dir.is_dir())
                {
                    let _ = explorer.set_cwd(dir);
                }
                self.picker = Some(FolderPicker {
                    source: node.url().clone(),
                    explorer,
                });
                self.mode = Mode::FolderPicker;
            }
            Err(e) => {
                self.set_status(Feedback::error(format!("Failed to open folder picker: {e}")));
            }
        }
    }

    fn close_picker(&mut self) {
        self.picker = None;
        self.mode = Mode::Normal;
    }

    fn copy_into_picked_folder(&mut self) -> AppCommand {
        let Some(picker) = &self.picker else {
            return AppCommand::None;
        };
        let folder = match Locator::from_path(picker.explorer.cwd()) {
            Ok(folder) => folder,
            Err(e) => {
                self.set_status(Feedback::error(format!("Cannot copy there: {e}")));
                return AppCommand::None;
            }
        };
        let source = picker.source.clone();
        self.close_picker();

        match self.tree.node(&source) {
            Some(node) => AppCommand::Execute(copy_into_folder(node, &folder)),
            None => AppCommand::None,
        }
    }

    // -- geometry helpers --

    fn on_sidebar_border(&self, pos: Position) -> bool {
        let sidebar = self.layout_geometry.sidebar;
        self.layout_geometry.sidebar_border() == Some(pos.x)
            && pos.y >= sidebar.y
            && pos.y < sidebar.y + sidebar.height
    }

    fn url_at(&self, pos: Position) -> Option<&Locator> {
        self.row_at(pos)
            .and_then(|idx| self.tree.row(idx))
            .map(|row| &row.url)
    }

    fn row_at(&self, pos: Position) -> Option<usize> {
        let inner = self.layout_geometry.tree_inner;
        if !inner.contains(pos) {
            return None;
        }
        let idx = self.scroll_offset + (pos.y - inner.y) as usize;
        (idx < self.tree.len()).then_some(idx)
    }

    fn move_cursor_down(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.tree.len().saturating_sub(1));
        self.ensure_cursor_visible();
    }

    fn move_cursor_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let height = self.layout_geometry.tree_inner.height as usize;
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }

    fn set_status(&mut self, feedback: Feedback) {
        self.status_message = Some(StatusMessage {
            feedback,
            ticks_remaining: STATUS_TICKS,
        });
    }
}

fn describe_skip(skip: &explorer::DropSkip) -> String {
    match skip {
        explorer::DropSkip::Unresolved(raw) => format!("Cannot drop {raw}"),
        explorer::DropSkip::IntoOwnSubtree(source) => {
            format!("Cannot copy {} into itself", source.display_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};
    use explorer::test_support::{loc, sample_workspace};

    use super::*;

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn ctrl_key_event(c: char) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse_event(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key_event(KeyCode::Char(c)));
        }
    }

    /// 120x40 terminal, 32-cell sidebar; tree rows start at y=2.
    fn geometry() -> LayoutGeometry {
        LayoutGeometry {
            frame: Rect::new(0, 0, 120, 40),
            sidebar: Rect::new(0, 1, 32, 38),
            tree_inner: Rect::new(1, 2, 30, 36),
            editor: Rect::new(32, 1, 88, 38),
            overlay: None,
            picker_list_inner: None,
        }
    }

    fn create_app() -> App {
        let mut app = App::new(
            sample_workspace(),
            PanelState::default(),
            PanelConfig::default(),
        );
        app.set_layout(geometry());
        app
    }

    fn select(app: &mut App, url: &str) {
        app.cursor = app.tree.index_of(&loc(url)).unwrap();
    }

    fn open_menu_and_choose(app: &mut App, action: MenuAction) -> AppCommand {
        app.handle_event(key_event(KeyCode::Char('m')));
        let idx = app
            .menu
            .as_ref()
            .unwrap()
            .actions
            .iter()
            .position(|a| *a == action)
            .unwrap();
        app.menu.as_mut().unwrap().cursor = idx;
        app.handle_event(key_event(KeyCode::Enter))
    }

    // --- Construction ---

    #[test]
    fn starts_on_root_with_default_width() {
        let app = create_app();
        assert_eq!(app.root, loc("/proj"));
        assert_eq!(app.cursor, 0);
        assert_eq!(app.panel.committed_width(), 32.0);
        assert_eq!(app.tab, SidebarTab::Explorer);
    }

    #[test]
    fn restores_persisted_panel_state() {
        let state = PanelState {
            sidebar_width: Some(50.0),
            sidebar_tab: SidebarTab::Search,
        };
        let app = App::new(sample_workspace(), state, PanelConfig::default());
        assert_eq!(app.panel.committed_width(), 50.0);
        assert_eq!(app.tab, SidebarTab::Search);
        assert_eq!(app.sidebar_width_for(120), 50);
    }

    // --- Navigation ---

    #[test]
    fn enter_toggles_folder() {
        let mut app = create_app();
        select(&mut app, "/proj/src");
        let cmd = app.handle_event(key_event(KeyCode::Enter));
        assert!(matches!(cmd, AppCommand::ListFolders(ref folders) if *folders == vec![loc("/proj/src")]));
        assert!(app.tree.index_of(&loc("/proj/src/a.txt")).is_some());

        let cmd = app.handle_event(key_event(KeyCode::Enter));
        assert!(matches!(cmd, AppCommand::None));
        assert!(app.tree.index_of(&loc("/proj/src/a.txt")).is_none());
    }

    #[test]
    fn expanding_unlisted_folder_lists_it() {
        let root = NodeIdentity::folder(
            loc("/proj"),
            vec![NodeIdentity::folder(loc("/proj/src"), vec![])],
        );
        let mut app = App::new(root, PanelState::default(), PanelConfig::default());
        app.set_layout(geometry());
        select(&mut app, "/proj/src");

        let cmd = app.handle_event(key_event(KeyCode::Right));
        assert!(matches!(cmd, AppCommand::ListFolders(ref folders) if *folders == vec![loc("/proj/src")]));
        assert_eq!(app.tree.len(), 2);

        app.handle_action(Action::FolderListed {
            folder: loc("/proj/src"),
            result: Ok(vec![NodeIdentity::file(loc("/proj/src/a.txt"))]),
        });
        assert_eq!(app.tree.index_of(&loc("/proj/src/a.txt")), Some(2));
        assert_eq!(app.selected_url(), Some(&loc("/proj/src")));
    }

    #[test]
    fn failed_folder_listing_collapses_it() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        app.handle_action(Action::FolderListed {
            folder: loc("/proj/src"),
            result: Err("permission denied".into()),
        });
        assert!(!app.tree.is_expanded(&loc("/proj/src")));
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.feedback.message(), "Could not list src: permission denied");
    }

    #[test]
    fn enter_on_file_opens_in_current_tab() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        let cmd = app.handle_event(key_event(KeyCode::Enter));
        match cmd {
            AppCommand::Execute(ExplorerCommand::Open { url, new_tab }) => {
                assert_eq!(url, loc("/proj/README.md"));
                assert!(!new_tab);
            }
            other => panic!("expected open, got {other:?}"),
        }
    }

    #[test]
    fn o_opens_in_new_tab() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        let cmd = app.handle_event(key_event(KeyCode::Char('o')));
        assert!(matches!(
            cmd,
            AppCommand::Execute(ExplorerCommand::Open { new_tab: true, .. })
        ));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = create_app();
        app.handle_event(key_event(KeyCode::Char('k')));
        assert_eq!(app.cursor, 0);
        for _ in 0..10 {
            app.handle_event(key_event(KeyCode::Char('j')));
        }
        assert_eq!(app.cursor, app.tree.len() - 1);
    }

    #[test]
    fn left_climbs_to_parent() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        select(&mut app, "/proj/src/a.txt");
        app.handle_event(key_event(KeyCode::Left));
        assert_eq!(app.selected_url(), Some(&loc("/proj/src")));
        app.handle_event(key_event(KeyCode::Left));
        assert!(!app.tree.is_expanded(&loc("/proj/src")));
    }

    #[test]
    fn q_quits() {
        let mut app = create_app();
        assert!(matches!(
            app.handle_event(key_event(KeyCode::Char('q'))),
            AppCommand::Quit
        ));
        assert!(matches!(app.handle_event(ctrl_key_event('c')), AppCommand::Quit));
    }

    // --- Tabs ---

    #[test]
    fn number_keys_switch_and_persist_tab() {
        let mut app = create_app();
        let cmd = app.handle_event(key_event(KeyCode::Char('3')));
        assert!(matches!(cmd, AppCommand::SaveTab(SidebarTab::SourceControl)));
        assert_eq!(app.tab, SidebarTab::SourceControl);

        // Same tab again writes nothing.
        let cmd = app.handle_event(key_event(KeyCode::Char('3')));
        assert!(matches!(cmd, AppCommand::None));
    }

    #[test]
    fn tree_keys_inactive_outside_explorer_tab() {
        let mut app = create_app();
        app.handle_event(key_event(KeyCode::Char('2')));
        app.handle_event(key_event(KeyCode::Char('j')));
        assert_eq!(app.cursor, 0);
        app.handle_event(key_event(KeyCode::Char('m')));
        assert_eq!(app.mode, Mode::Normal);
    }

    // --- Context menu ---

    #[test]
    fn menu_lists_actions_for_node_kind() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        app.handle_event(key_event(KeyCode::Char('m')));
        assert_eq!(app.mode, Mode::ContextMenu);
        let menu = app.menu.as_ref().unwrap();
        assert_eq!(menu.actions[0], MenuAction::OpenInNewTab);
        assert!(!menu.actions.contains(&MenuAction::NewFile));
    }

    #[test]
    fn esc_closes_menu() {
        let mut app = create_app();
        app.handle_event(key_event(KeyCode::Char('m')));
        app.handle_event(key_event(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.menu.is_none());
    }

    #[test]
    fn menu_command_is_executed() {
        let mut app = create_app();
        let cmd = open_menu_and_choose(&mut app, MenuAction::NewFolder);
        assert!(matches!(
            cmd,
            AppCommand::Execute(ExplorerCommand::CreateFolder(ref url)) if *url == loc("/proj")
        ));
        assert!(app.menu.is_none());
    }

    #[test]
    fn select_for_compare_then_compare() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        select(&mut app, "/proj/README.md");
        open_menu_and_choose(&mut app, MenuAction::SelectForCompare);
        assert_eq!(app.ctx.compare.get(), Some(&loc("/proj/README.md")));

        select(&mut app, "/proj/src/a.txt");
        let cmd = open_menu_and_choose(&mut app, MenuAction::CompareWithSelected);
        assert!(matches!(
            cmd,
            AppCommand::Execute(ExplorerCommand::Compare { .. })
        ));
    }

    #[test]
    fn copy_relative_path_without_editor_does_nothing() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        let cmd = open_menu_and_choose(&mut app, MenuAction::CopyRelativePath);
        assert!(matches!(cmd, AppCommand::None));
        assert!(app.status_message.is_none());
    }

    // --- Rename ---

    #[test]
    fn rename_from_menu_scenario() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        select(&mut app, "/proj/src/a.txt");

        open_menu_and_choose(&mut app, MenuAction::Rename);
        assert_eq!(app.mode, Mode::Rename);
        let cell = app.tree.cell(&loc("/proj/src/a.txt")).unwrap();
        assert_eq!(cell.rename().focus(), FocusState::Focused);
        assert!(cell.rename().has_full_selection());

        type_text(&mut app, "b.txt");
        let cmd = app.handle_event(key_event(KeyCode::Enter));
        match cmd {
            AppCommand::Execute(ExplorerCommand::Rename { url, new_name }) => {
                assert_eq!(url, loc("/proj/src/a.txt"));
                assert_eq!(new_name, "b.txt");
            }
            other => panic!("expected rename, got {other:?}"),
        }
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn rename_unchanged_issues_nothing() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        app.handle_event(key_event(KeyCode::Char('r')));
        let cmd = app.handle_event(key_event(KeyCode::Enter));
        assert!(matches!(cmd, AppCommand::None));
    }

    #[test]
    fn esc_cancels_rename() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        app.handle_event(key_event(KeyCode::Char('r')));
        type_text(&mut app, "x");
        app.handle_event(key_event(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.tree.renaming(), None);
    }

    #[test]
    fn ctrl_u_clears_draft() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        app.handle_event(key_event(KeyCode::Char('r')));
        app.handle_event(ctrl_key_event('u'));
        let cell = app.tree.cell(&loc("/proj/README.md")).unwrap();
        assert_eq!(cell.rename().draft(), Some(""));
        assert_eq!(app.mode, Mode::Rename);
    }

    #[test]
    fn click_elsewhere_cancels_rename() {
        let mut app = create_app();
        select(&mut app, "/proj/README.md");
        app.handle_event(key_event(KeyCode::Char('r')));
        app.handle_event(mouse_event(
            MouseEventKind::Down(MouseButton::Left),
            5,
            2,
        ));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.tree.renaming(), None);
        assert_eq!(app.cursor, 0);
    }

    // --- Drag and drop ---

    #[test]
    fn dragging_file_onto_root_copies_it() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        // Rows: proj y=2, src y=3, a.txt y=4, README.md y=5.

        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 4));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 6, 3));
        assert_eq!(app.drag_source(), Some(&loc("/proj/src/a.txt")));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 6, 2));
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 6, 2));

        match cmd {
            AppCommand::ExecuteAll(commands) => assert_eq!(
                commands,
                vec![ExplorerCommand::Copy {
                    source: loc("/proj/src/a.txt"),
                    destination: loc("/proj/a.txt"),
                }]
            ),
            other => panic!("expected copy, got {other:?}"),
        }
        assert_eq!(app.drag_source(), None);
    }

    #[test]
    fn drop_onto_file_is_a_no_op() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 3));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 6, 4));
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 6, 4));
        assert!(matches!(cmd, AppCommand::None));
    }

    #[test]
    fn folder_dropped_back_onto_itself_reports_skip() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 3));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 6, 2));
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 6, 3));
        assert!(matches!(cmd, AppCommand::None));
        assert!(app.status_message.as_ref().unwrap().feedback.is_warning());
    }

    #[test]
    fn drop_into_current_parent_still_issues_copy() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        // Rows: proj y=2, src y=3, a.txt y=4, README.md y=5.

        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 4));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 6, 5));
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 6, 3));

        match cmd {
            AppCommand::ExecuteAll(commands) => assert_eq!(
                commands,
                vec![ExplorerCommand::Copy {
                    source: loc("/proj/src/a.txt"),
                    destination: loc("/proj/src/a.txt"),
                }]
            ),
            other => panic!("expected copy, got {other:?}"),
        }
        assert!(app.status_message.is_none());
    }

    #[test]
    fn jitter_within_pressed_row_is_a_click() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 3));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 7, 3));
        assert_eq!(app.drag_source(), None);

        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 7, 3));
        assert!(matches!(cmd, AppCommand::ListFolders(ref folders) if *folders == vec![loc("/proj/src")]));
        assert!(app.tree.is_expanded(&loc("/proj/src")));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn click_without_drag_activates_row() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 6, 4));
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 6, 4));
        assert!(matches!(
            cmd,
            AppCommand::Execute(ExplorerCommand::Open { new_tab: false, .. })
        ));
    }

    #[test]
    fn right_click_opens_menu_on_row() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Right), 6, 3));
        assert_eq!(app.mode, Mode::ContextMenu);
        assert_eq!(app.menu.as_ref().unwrap().target, loc("/proj/src"));
    }

    // --- Resize ---

    #[test]
    fn border_drag_resizes_and_persists() {
        let mut app = create_app();
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 31, 10));
        assert!(app.is_resizing());
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 41, 10));
        assert_eq!(app.sidebar_width_for(120), 42);

        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 41, 10));
        assert!(matches!(cmd, AppCommand::SaveWidth(w) if w == 42.0));
        assert_eq!(app.panel.committed_width(), 42.0);
    }

    #[test]
    fn under_drag_snaps_back_to_default() {
        let mut app = create_app();
        app.panel = PanelResizer::new(PanelLimits::default(), 40.0);
        app.handle_event(mouse_event(MouseEventKind::Down(MouseButton::Left), 31, 10));
        app.handle_event(mouse_event(MouseEventKind::Drag(MouseButton::Left), 1, 10));
        // Raw width 10 is clamped live, then snaps back on release.
        assert_eq!(app.sidebar_width_for(120), 24);
        let cmd = app.handle_event(mouse_event(MouseEventKind::Up(MouseButton::Left), 1, 10));
        assert!(matches!(cmd, AppCommand::SaveWidth(w) if w == 32.0));
    }

    // --- Actions ---

    #[test]
    fn successful_open_updates_editor_and_loads_preview() {
        let mut app = create_app();
        let cmd = app.handle_action(Action::Executed {
            command: ExplorerCommand::Open {
                url: loc("/proj/README.md"),
                new_tab: false,
            },
            outcome: Ok(None),
            active_editor: Some(loc("/proj/README.md")),
        });
        assert!(matches!(cmd, AppCommand::LoadPreview(ref url) if *url == loc("/proj/README.md")));
        assert_eq!(app.editor.active_file(), Some(&loc("/proj/README.md")));
        assert_eq!(app.ctx.active_editor, Some(loc("/proj/README.md")));

        app.handle_action(Action::PreviewLoaded(
            loc("/proj/README.md"),
            Ok(vec!["# Hello".into()]),
        ));
        assert!(matches!(app.editor.preview, Some(Ok(ref lines)) if lines.len() == 1));
    }

    #[test]
    fn active_editor_follows_editor_host() {
        let mut app = create_app();
        app.handle_action(Action::Executed {
            command: ExplorerCommand::Open {
                url: loc("/proj/README.md"),
                new_tab: false,
            },
            outcome: Ok(None),
            active_editor: Some(loc("/proj/src/a.txt")),
        });
        assert_eq!(app.ctx.active_editor, Some(loc("/proj/src/a.txt")));

        select(&mut app, "/proj/README.md");
        let cmd = open_menu_and_choose(&mut app, MenuAction::CopyRelativePath);
        assert!(matches!(
            cmd,
            AppCommand::Execute(ExplorerCommand::CopyToClipboard(ref path)) if path == "../README.md"
        ));
    }

    #[test]
    fn new_tab_keeps_previous_tab() {
        let mut pane = EditorPane::default();
        pane.open(loc("/proj/a"), false);
        pane.open(loc("/proj/b"), false);
        assert_eq!(pane.tabs, vec![loc("/proj/b")]);
        pane.open(loc("/proj/c"), true);
        assert_eq!(pane.tabs, vec![loc("/proj/b"), loc("/proj/c")]);
        pane.open(loc("/proj/b"), false);
        assert_eq!(pane.active, Some(0));
    }

    #[test]
    fn failed_command_shows_error_and_refreshes() {
        let mut app = create_app();
        let cmd = app.handle_action(Action::Executed {
            command: ExplorerCommand::Delete(loc("/proj/README.md")),
            outcome: Err("permission denied".into()),
            active_editor: None,
        });
        assert!(matches!(cmd, AppCommand::ReloadTree(_)));
        let status = app.status_message.as_ref().unwrap();
        assert!(status.feedback.is_error());
        assert_eq!(status.feedback.message(), "permission denied");
    }

    #[test]
    fn rename_success_focuses_new_name_after_reload() {
        let mut app = create_app();
        app.handle_action(Action::Executed {
            command: ExplorerCommand::Rename {
                url: loc("/proj/README.md"),
                new_name: "NOTES.md".into(),
            },
            outcome: Ok(Some(Feedback::info("Renamed"))),
            active_editor: None,
        });

        assert!(app.tree.node(&loc("/proj/README.md")).is_none());

        app.handle_action(Action::FolderListed {
            folder: loc("/proj"),
            result: Ok(vec![
                NodeIdentity::folder(loc("/proj/src"), vec![]),
                NodeIdentity::file(loc("/proj/NOTES.md")),
            ]),
        });
        assert_eq!(app.selected_url(), Some(&loc("/proj/NOTES.md")));
    }

    #[test]
    fn copy_success_reveals_destination_folder() {
        let mut app = create_app();
        let cmd = app.handle_action(Action::Executed {
            command: ExplorerCommand::Copy {
                source: loc("/proj/README.md"),
                destination: loc("/proj/src/README.md"),
            },
            outcome: Ok(None),
            active_editor: None,
        });
        assert!(matches!(cmd, AppCommand::ReloadTree(_)));
        assert!(app.tree.is_expanded(&loc("/proj/src")));
        assert_eq!(app.tree.open_folders(), vec![loc("/proj"), loc("/proj/src")]);

        app.handle_action(Action::FolderListed {
            folder: loc("/proj/src"),
            result: Ok(vec![
                NodeIdentity::file(loc("/proj/src/a.txt")),
                NodeIdentity::file(loc("/proj/src/README.md")),
            ]),
        });
        assert_eq!(app.selected_url(), Some(&loc("/proj/src/README.md")));
    }

    #[test]
    fn delete_success_forgets_entry_before_reload() {
        let mut app = create_app();
        app.tree.toggle(&loc("/proj/src"));
        let cmd = app.handle_action(Action::Executed {
            command: ExplorerCommand::Delete(loc("/proj/src")),
            outcome: Ok(None),
            active_editor: None,
        });
        assert!(matches!(cmd, AppCommand::ReloadTree(_)));
        assert_eq!(app.tree.open_folders(), vec![loc("/proj")]);
        assert!(app.tree.index_of(&loc("/proj/src/a.txt")).is_none());
    }

    #[test]
    fn assign_root_reloads_new_root() {
        let mut app = create_app();
        let cmd = app.handle_action(Action::Executed {
            command: ExplorerCommand::AssignWorkspaceRoot(loc("/proj/src")),
            outcome: Ok(None),
            active_editor: None,
        });
        assert!(matches!(cmd, AppCommand::ReloadTree(ref url) if *url == loc("/proj/src")));
        assert_eq!(app.root, loc("/proj/src"));
        assert_eq!(app.tree.open_folders(), vec![loc("/proj/src")]);
        assert_eq!(app.tree.len(), 1);
    }

    #[test]
    fn persist_failure_is_a_warning() {
        let mut app = create_app();
        app.handle_action(Action::Persisted(Err("disk full".into())));
        assert!(app.status_message.as_ref().unwrap().feedback.is_warning());
    }

    // --- Status ---

    #[test]
    fn status_message_expires_after_ticks() {
        let mut app = create_app();
        app.handle_action(Action::FolderListed {
            folder: loc("/proj"),
            result: Err("gone".into()),
        });
        assert!(app.status_message.is_some());
        for _ in 0..=STATUS_TICKS {
            app.tick();
        }
        assert!(app.status_message.is_none());
    }
}
