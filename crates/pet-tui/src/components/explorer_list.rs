//! ExplorerList component: both sections of the pet list in one pane.

use std::collections::HashSet;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use pet_core::{Appearance, Item, ItemId, ItemKind, Pet, RenderPatch, Section};
use tracing::debug;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{
        style_adopted_row, style_default, style_header, style_muted, style_secondary,
        style_selected_focused, C_ACCENT, C_ADOPTED, C_AGE, C_MUTED, C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        row_cache::RowCache,
        scrollable_list::ScrollableList,
    },
};

const PAGE: usize = 10;

/// One visible line of the pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Section caption, grouped appearance only.
    Caption(usize),
    /// Blank line between sections, grouped appearance only.
    Spacer(usize),
    /// Placeholder for a section with no rows.
    Empty(usize),
    Item { section: usize, id: ItemId },
}

impl Row {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Row::Item { id, .. } => Some(*id),
            _ => None,
        }
    }
}

pub struct ExplorerList {
    pub list: ScrollableList<Row>,
    collapsed: HashSet<ItemId>,
    cache: RowCache,
    /// Row whose detail screen is open.
    activated: Option<ItemId>,
    list_state: ListState,
    page: usize,
}

impl ExplorerList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            collapsed: HashSet::new(),
            cache: RowCache::new(),
            activated: None,
            list_state: ListState::default(),
            page: PAGE,
        }
    }

    /// Collapse every Available header. Used when the config asks the list to
    /// start folded.
    pub fn collapse_all(&mut self, state: &AppState) {
        if !state.screen.layout().collapsible_headers {
            return;
        }
        for item in state.screen.model().items_in(Section::Available) {
            if item.is_header() {
                self.collapsed.insert(item.id());
            }
        }
        self.cache.clear();
        self.sync_rows(state);
    }

    pub fn is_collapsed(&self, id: &ItemId) -> bool {
        self.collapsed.contains(id)
    }

    /// Drop stale cached rows and rebuild the visible row order.
    ///
    /// A patch names only the rows the model touched. Adopted styling depends
    /// on the pet rather than the row, so every other row holding a touched
    /// pet is dropped from the cache as well.
    pub fn apply_patches(&mut self, patches: &[RenderPatch], state: &AppState) {
        let model = state.screen.model();
        let mut touched: Vec<&Pet> = Vec::new();
        for patch in patches {
            if patch.is_empty() {
                continue;
            }
            self.cache.apply_patch(patch);
            touched.extend(
                patch
                    .dirty_ids()
                    .filter_map(|id| model.item(id))
                    .filter_map(Item::as_pet),
            );
        }
        if !touched.is_empty() {
            for item in model.current_items() {
                if item.as_pet().is_some_and(|pet| touched.contains(&pet)) {
                    self.cache.invalidate(&item.id());
                }
            }
        }
        self.sync_rows(state);
        debug!(
            rows = self.list.len(),
            cached = self.cache.len(),
            builds = self.cache.builds(),
            revision = self.cache.revision(),
            "explorer rows synced"
        );
    }

    pub fn toggle_collapse(&mut self, id: ItemId, state: &AppState) {
        if !state.screen.layout().collapsible_headers {
            return;
        }
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
        // The disclosure glyph lives in the cached header row.
        self.cache.invalidate(&id);
        self.sync_rows(state);
    }

    /// Recompute visible rows from the model, keeping the cursor on its row.
    pub fn sync_rows(&mut self, state: &AppState) {
        let grouped = state.screen.layout().appearance == Appearance::Grouped;
        let model = state.screen.model();
        let mut rows = Vec::new();

        for (index, section) in model.sections().into_iter().enumerate() {
            if grouped {
                if index > 0 {
                    rows.push(Row::Spacer(index));
                }
                rows.push(Row::Caption(index));
            }
            let items = model.visible_items(section, &self.collapsed);
            if items.is_empty() && grouped {
                rows.push(Row::Empty(index));
            }
            rows.extend(items.into_iter().map(|item| Row::Item {
                section: index,
                id: item.id(),
            }));
        }

        self.list.set_items_keyed(rows, Row::clone);
    }

    fn selected_id(&self) -> Option<ItemId> {
        self.list.selected_item().and_then(Row::item_id)
    }

    /// Header that owns the row under the cursor, or the row itself if it is
    /// a header.
    fn enclosing_header(&self, state: &AppState) -> Option<ItemId> {
        let id = self.selected_id()?;
        let model = state.screen.model();
        if model.item(&id).is_some_and(Item::is_header) {
            return Some(id);
        }
        model
            .current_items()
            .into_iter()
            .filter(|item| item.is_header())
            .find(|header| model.children_of(&header.id()).iter().any(|c| c.id() == id))
            .map(Item::id)
    }

    fn select_current(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(row) => vec![Action::Select(row.item_id())],
            None => vec![],
        }
    }
}

impl Default for ExplorerList {
    fn default() -> Self {
        Self::new()
    }
}

fn build_row(row: &Row, collapsed: &HashSet<ItemId>, state: &AppState) -> Line<'static> {
    match row {
        Row::Caption(index) => match Section::from_index(*index) {
            Some(section) => Line::from(Span::styled(
                format!(" {}", section.title().to_uppercase()),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            None => Line::default(),
        },
        Row::Spacer(_) => Line::default(),
        Row::Empty(index) => match Section::from_index(*index) {
            Some(Section::Adopted) => Line::from(Span::styled("   no pets adopted yet", style_muted())),
            _ => Line::from(Span::styled("   nothing here", style_muted())),
        },
        Row::Item { section, id } => {
            let Some(item) = state.screen.model().item(id) else {
                return Line::default();
            };
            match Section::from_index(*section) {
                Some(section) => render_item(item, section, collapsed.contains(id), state),
                None => Line::default(),
            }
        }
    }
}

fn render_item(item: &Item, section: Section, collapsed: bool, state: &AppState) -> Line<'static> {
    match (item.kind(), section) {
        (ItemKind::Header { title }, _) => {
            let glyph = if !state.screen.layout().collapsible_headers {
                " "
            } else if collapsed {
                "▸"
            } else {
                "▾"
            };
            let count = state.screen.model().children_of(&item.id()).len();
            Line::from(vec![
                Span::styled(format!(" {glyph} "), style_secondary()),
                Span::styled(title.clone(), style_header()),
                Span::styled(format!("  {count}"), style_muted()),
            ])
        }
        (ItemKind::Pet { pet, .. }, Section::Adopted) => Line::from(vec![
            Span::styled("   ♥ ", Style::default().fg(C_ADOPTED)),
            Span::styled(format!("Your pet: {}", pet.name), style_default()),
            Span::styled(format!("  {}", pet.age_label()), Style::default().fg(C_AGE)),
        ]),
        (ItemKind::Pet { pet, .. }, Section::Available) => {
            let line = Line::from(vec![
                Span::raw("     "),
                Span::styled(pet.name.clone(), style_default()),
                Span::styled(format!("  {}", pet.age_label()), Style::default().fg(C_AGE)),
            ]);
            if state.is_adopted(pet) {
                line.style(style_adopted_row())
            } else {
                line
            }
        }
    }
}

impl Component for ExplorerList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(self.page),
            KeyCode::PageDown => self.list.select_down(self.page),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => return self.select_current(),
            KeyCode::Char('l') | KeyCode::Right => {
                // On a header, right only unfolds; an open header stays open.
                if let Some(id) = self
                    .selected_id()
                    .filter(|id| state.screen.model().item(id).is_some_and(Item::is_header))
                {
                    if self.is_collapsed(&id) {
                        return vec![Action::ToggleCollapse(id)];
                    }
                    return vec![];
                }
                return self.select_current();
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self
                    .selected_id()
                    .filter(|id| state.screen.model().item(id).is_some_and(Item::is_header))
                {
                    return vec![Action::ToggleCollapse(id)];
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if let Some(header) = self.enclosing_header(state) {
                    if self.selected_id() == Some(header) {
                        if !self.is_collapsed(&header) {
                            return vec![Action::ToggleCollapse(header)];
                        }
                    } else {
                        self.list.select_where(|row| row.item_id() == Some(header));
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(3),
            MouseEventKind::ScrollDown => self.list.select_down(3),
            MouseEventKind::Down(MouseButton::Left) => {
                if event.row <= area.y || event.row >= area.y + area.height.saturating_sub(1) {
                    return vec![];
                }
                let rel_row = (event.row - area.y - 1) as usize;
                if self.list.handle_click(rel_row) {
                    return self.select_current();
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::ToggleCollapse(id) => self.toggle_collapse(*id, state),
            Action::OpenDetail(_) => self.activated = self.selected_id(),
            Action::Deselect | Action::CloseDetail => self.activated = None,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let adopted = state.adopted_count();
        let badge_text = format!("{adopted} ADOPTED");
        let badge = (adopted > 0).then(|| Badge {
            text: &badge_text,
            color: C_ADOPTED,
        });
        let block = pane_chrome("pets", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  catalog is empty", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let content_h = inner.height as usize;
        self.page = content_h.max(1);
        self.list.ensure_visible(content_h);

        let visible: Vec<(usize, Row)> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .map(|(i, row)| (i, row.clone()))
            .collect();

        let mut items = Vec::with_capacity(visible.len());
        let mut sel_in_view = None;
        for (view_row, (index, row)) in visible.iter().enumerate() {
            let line = match row {
                Row::Item { id, .. } => {
                    let collapsed = &self.collapsed;
                    self.cache
                        .get_or_build(*id, || build_row(row, collapsed, state))
                }
                _ => build_row(row, &self.collapsed, state),
            };
            let is_selected = *index == self.list.selected;
            let is_activated = row.item_id().is_some() && row.item_id() == self.activated;
            if is_selected {
                sel_in_view = Some(view_row);
            }
            let style = if is_selected && focused {
                style_selected_focused()
            } else if is_selected || is_activated {
                Style::default().bg(C_SELECTION_BG)
            } else {
                Style::default()
            };
            items.push(ListItem::new(line).style(style));
        }

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");
        self.list_state.select(sel_in_view);
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }
}
