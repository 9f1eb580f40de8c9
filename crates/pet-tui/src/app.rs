//! App: component-based event loop.
//!
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries terminal events in from a blocking reader task.
//! - The event loop draws a frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use pet_core::{config::UiConfig, ExplorerScreen, RenderPatch, Selection};

use crate::{
    action::Action,
    app_state::{AppState, CatalogSource},
    component::Component,
    components::{detail::Detail, explorer_list::ExplorerList, help_overlay::HelpOverlay},
    theme::{C_ACCENT, C_BG, C_MUTED, C_SECONDARY},
    widgets::{
        status_bar::{self, Mode},
        toast::ToastManager,
    },
};

/// Messages flowing into the event loop.
#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
}

pub struct App {
    state: AppState,
    explorer: ExplorerList,
    detail: Detail,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    tick: Duration,
    should_quit: bool,
    /// Last drawn rect of the explorer pane, for mouse hit-testing.
    list_area: Rect,
}

impl App {
    pub fn new(
        screen: ExplorerScreen,
        initial_patch: RenderPatch,
        catalog_source: CatalogSource,
        log_path: PathBuf,
        ui: &UiConfig,
        start_collapsed: bool,
    ) -> Self {
        let mut state = AppState::new(screen, catalog_source, log_path);
        state.show_keys = ui.show_keys;
        state.set_log(format!(
            "loaded {} rows from {}",
            state.screen.model().len(),
            state.catalog_source.label()
        ));

        let mut explorer = ExplorerList::new();
        explorer.apply_patches(std::slice::from_ref(&initial_patch), &state);
        if start_collapsed {
            explorer.collapse_all(&state);
        }

        Self {
            state,
            explorer,
            detail: Detail::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            tick: Duration::from_millis(ui.tick_ms.max(10)),
            should_quit: false,
            list_area: Rect::default(),
        }
    }

    /// Queue a warning toast shown once the UI is up.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.state.set_log(&message);
        self.toast.warning(message);
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("pet explorer exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard/mouse events ────────────────────────────
        // Polls with a timeout so the task notices when the loop has gone.
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });
        drop(tx);

        // Toast expiry + component maintenance
        let mut ui_tick = tokio::time::interval(self.tick);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => {
                    let Some(AppMessage::Event(ev)) = msg else {
                        break;
                    };
                    needs_redraw = self.handle_event(ev);
                    // Drain whatever queued up while we were busy
                    while let Ok(AppMessage::Event(ev)) = rx.try_recv() {
                        needs_redraw |= self.handle_event(ev);
                    }
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.explorer.tick(s));
                        all.extend(self.detail.tick(s));
                        all.extend(self.help_overlay.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, ev: Event) -> bool {
        let actions = match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Redraw at the new size.
            Event::Resize(_, _) => return true,
            _ => return false,
        };
        for action in actions {
            self.dispatch(action);
        }
        true
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        // The detail popup is modal: q closes it rather than quitting.
        if self.detail.is_open() {
            return self.detail.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Esc => return vec![Action::Deselect],
            _ => {}
        }

        self.explorer.handle_key(key, &self.state)
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant || self.detail.is_open() || self.help_overlay.visible {
            return vec![];
        }
        if hit(self.list_area, event.column, event.row) {
            return self.explorer.handle_mouse(event, self.list_area, &self.state);
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first so their view state is current when
        // the App reacts to it.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.explorer.on_action(&action, s));
            out.extend(self.detail.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
        self.sync_mode();
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::Select(row) => match self.state.screen.select(row.as_ref()) {
                Selection::Stale => self.dispatch(Action::Deselect),
                Selection::Header(id) => self.dispatch(Action::ToggleCollapse(id)),
                Selection::OpenDetail(request) => self.dispatch(Action::OpenDetail(request)),
            },
            Action::OpenDetail(request) => {
                self.state.set_log(format!("viewing {}", request.pet.name));
            }
            Action::PetAdopted(pet) => {
                let outcome = self.state.screen.on_pet_adopted(pet.clone());
                self.explorer.apply_patches(&outcome.patches, &self.state);
                if outcome.newly_adopted {
                    self.toast.success(format!("Adopted {}", pet.name));
                    self.state.set_log(format!("adopted {}", pet.name));
                } else {
                    self.toast.info(format!("{} is already yours", pet.name));
                    self.state.set_log(format!("{} adopted again", pet.name));
                }
            }
            Action::ToggleKeys => {
                self.state.show_keys = !self.state.show_keys;
            }
            Action::Quit => {
                self.should_quit = true;
            }
            // Handled by the components in `dispatch`
            Action::ToggleCollapse(_)
            | Action::Deselect
            | Action::CloseDetail
            | Action::ToggleHelp => {}
        }
    }

    fn sync_mode(&mut self) {
        self.state.mode = if self.help_overlay.visible {
            Mode::Help
        } else if self.detail.is_open() {
            Mode::Detail
        } else {
            Mode::Browse
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let keys_h = if self.state.show_keys { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        self.draw_title(frame, outer[0]);

        let modal = self.detail.is_open() || self.help_overlay.visible;
        self.list_area = outer[1];
        self.explorer.draw(frame, outer[1], !modal, &self.state);

        status_bar::draw_separator(frame, outer[2]);
        status_bar::draw_log_bar(
            frame,
            outer[3],
            self.state.last_log.as_deref(),
            self.state.adopted_count(),
        );
        if self.state.show_keys {
            status_bar::draw_keys_bar(frame, outer[4], self.state.mode);
        }

        if self.detail.is_open() {
            self.detail.draw(frame, area, true, &self.state);
        }
        if self.help_overlay.visible {
            self.help_overlay.draw(frame, area, true, &self.state);
        }

        // Toasts are the topmost layer
        self.toast.draw(frame, area);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let clock = chrono::Local::now().format("%H:%M").to_string();
        let line = Line::from(vec![
            Span::styled(
                " pet explorer",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", self.state.catalog_source.label()),
                Style::default().fg(C_MUTED),
            ),
            Span::styled(format!("  {clock}"), Style::default().fg(C_SECONDARY)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_core::{AdoptedListPolicy, Category, ListLayout, Pet, PetCatalog, Section};

    fn app() -> App {
        let catalog = PetCatalog::from_pets([
            Pet::new("Rex", 3, "rex", Category::Dogs),
            Pet::new("Milo", 2, "milo", Category::Cats),
        ]);
        let (screen, patch) =
            ExplorerScreen::load(&catalog, ListLayout::default(), AdoptedListPolicy::default());
        App::new(
            screen,
            patch,
            CatalogSource::BuiltIn,
            PathBuf::from("test.log"),
            &UiConfig::default(),
            false,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        let actions = app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        for action in actions {
            app.dispatch(action);
        }
    }

    fn move_to(app: &mut App, title: &str) {
        let id = app
            .state
            .screen
            .model()
            .current_items()
            .into_iter()
            .find(|i| i.title() == title)
            .map(|i| i.id());
        assert!(app.explorer.list.select_where(|row| row.item_id() == id));
    }

    #[test]
    fn select_adopt_close_flow() {
        let mut app = app();
        move_to(&mut app, "Rex");

        press(&mut app, KeyCode::Enter);
        assert!(app.detail.is_open());
        assert_eq!(app.state.mode, Mode::Detail);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.adopted_count(), 1);
        assert_eq!(app.state.screen.model().items_in(Section::Adopted).len(), 1);

        // q closes the popup, it does not quit
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.detail.is_open());
        assert!(!app.should_quit);
        assert_eq!(app.state.mode, Mode::Browse);

        // Reopening reports the pet as adopted, so adopt is disabled.
        move_to(&mut app, "Rex");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.screen.model().items_in(Section::Adopted).len(), 1);
    }

    #[test]
    fn header_selection_toggles_collapse() {
        let mut app = app();
        move_to(&mut app, "Dogs");
        let rows = app.explorer.list.len();
        press(&mut app, KeyCode::Enter);
        assert!(!app.detail.is_open());
        assert_eq!(app.explorer.list.len(), rows - 1);
    }

    #[test]
    fn help_and_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.help_overlay.visible);
        assert_eq!(app.state.mode, Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.help_overlay.visible);

        press(&mut app, KeyCode::Char('K'));
        assert!(!app.state.show_keys);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_overlay_ignores_unmapped_keys() {
        let mut app = app();
        let cursor = app.explorer.list.selected;
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(app.help_overlay.visible);
        assert_eq!(app.explorer.list.selected, cursor);

        press(&mut app, KeyCode::Char('?'));
        assert!(!app.help_overlay.visible);
        assert_eq!(app.state.mode, Mode::Browse);
    }

    #[test]
    fn resize_requests_redraw_only() {
        let mut app = app();
        assert!(app.handle_event(Event::Resize(120, 40)));
        assert!(!app.should_quit);
        assert_eq!(app.state.mode, Mode::Browse);
    }
}
