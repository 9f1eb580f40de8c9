//! Detail component: popup describing one pet, with the adopt action.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use pet_core::{DetailRequest, Pet};

use super::centered_rect;
use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ADOPTED, C_AGE, C_MUTED, C_POPUP_BG, C_PRIMARY, C_SECONDARY, C_TOAST_WARNING},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct Detail {
    request: Option<DetailRequest>,
    /// Set once the adopt action fired during this visit.
    adopted_this_visit: bool,
}

impl Detail {
    pub fn new() -> Self {
        Self {
            request: None,
            adopted_this_visit: false,
        }
    }

    pub fn open(&mut self, request: DetailRequest) {
        debug!(pet = %request.pet.name, adopted = request.is_adopted, "detail opened");
        self.request = Some(request);
        self.adopted_this_visit = false;
    }

    pub fn close(&mut self) {
        self.request = None;
        self.adopted_this_visit = false;
    }

    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    pub fn pet(&self) -> Option<&Pet> {
        self.request.as_ref().map(|r| &r.pet)
    }

    /// A pet that was already adopted when the screen opened cannot be adopted
    /// again, and each visit adopts at most once.
    pub fn can_adopt(&self) -> bool {
        self.request
            .as_ref()
            .is_some_and(|r| !r.is_adopted && !self.adopted_this_visit)
    }

    fn shows_adopted(&self) -> bool {
        self.request
            .as_ref()
            .is_some_and(|r| r.is_adopted || self.adopted_this_visit)
    }
}

impl Default for Detail {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Detail {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.is_open() {
            return vec![];
        }
        match key.code {
            KeyCode::Char('a') | KeyCode::Enter => {
                if !self.can_adopt() {
                    return vec![];
                }
                self.adopted_this_visit = true;
                match self.pet() {
                    Some(pet) => vec![Action::PetAdopted(pet.clone())],
                    None => vec![],
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => vec![Action::CloseDetail],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenDetail(request) => self.open(request.clone()),
            Action::CloseDetail => self.close(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let Some(request) = &self.request else {
            return;
        };
        let pet = &request.pet;
        let popup = centered_rect(50, 11, area);

        let badge = self.shows_adopted().then_some(Badge {
            text: "ADOPTED",
            color: C_ADOPTED,
        });
        let block = pane_chrome(&pet.name, true, badge).style(Style::default().bg(C_POPUP_BG));

        let image = if pet.image.is_empty() {
            "none".to_string()
        } else {
            pet.image.clone()
        };
        let status = if self.shows_adopted() {
            Line::from(Span::styled(
                format!(" {} is part of your family", pet.name),
                Style::default().fg(C_ADOPTED).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled(" press ", Style::default().fg(C_MUTED)),
                Span::styled(
                    "a",
                    Style::default()
                        .fg(C_TOAST_WARNING)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to adopt", Style::default().fg(C_MUTED)),
            ])
        };

        let lines = vec![
            Line::from(""),
            field("name", pet.name.clone(), Style::default().fg(C_PRIMARY)),
            field("age", pet.age_label(), Style::default().fg(C_AGE)),
            field(
                "category",
                pet.category.display_name().to_string(),
                Style::default().fg(C_SECONDARY),
            ),
            field("image", image, Style::default().fg(C_MUTED)),
            Line::from(""),
            status,
            Line::from(""),
            Line::from(Span::styled(" esc to close", Style::default().fg(C_MUTED))),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn field(label: &'static str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<10}", label), Style::default().fg(C_MUTED)),
        Span::styled(value, style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::CatalogSource;
    use pet_core::{AdoptedListPolicy, Category, ExplorerScreen, ListLayout, PetCatalog};
    use ratatui::crossterm::event::KeyModifiers;
    use std::path::PathBuf;

    fn state() -> AppState {
        let (screen, _) = ExplorerScreen::load(
            &PetCatalog::default(),
            ListLayout::default(),
            AdoptedListPolicy::default(),
        );
        AppState::new(screen, CatalogSource::BuiltIn, PathBuf::from("test.log"))
    }

    fn rex() -> Pet {
        Pet::new("Rex", 3, "rex", Category::Dogs)
    }

    fn press(detail: &mut Detail, c: char, state: &AppState) -> Vec<Action> {
        detail.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), state)
    }

    #[test]
    fn adopts_once_per_visit() {
        let state = state();
        let mut detail = Detail::new();
        detail.open(DetailRequest {
            pet: rex(),
            is_adopted: false,
        });

        assert_eq!(press(&mut detail, 'a', &state), vec![Action::PetAdopted(rex())]);
        assert!(press(&mut detail, 'a', &state).is_empty());
        assert!(!detail.can_adopt());
    }

    #[test]
    fn already_adopted_pet_cannot_be_adopted() {
        let state = state();
        let mut detail = Detail::new();
        detail.open(DetailRequest {
            pet: rex(),
            is_adopted: true,
        });
        assert!(press(&mut detail, 'a', &state).is_empty());
    }

    #[test]
    fn reopening_resets_the_visit() {
        let state = state();
        let mut detail = Detail::new();
        let request = DetailRequest {
            pet: rex(),
            is_adopted: false,
        };
        detail.on_action(&Action::OpenDetail(request.clone()), &state);
        press(&mut detail, 'a', &state);
        detail.on_action(&Action::CloseDetail, &state);
        assert!(!detail.is_open());

        detail.on_action(&Action::OpenDetail(request), &state);
        assert!(detail.can_adopt());
    }

    #[test]
    fn escape_closes() {
        let state = state();
        let mut detail = Detail::new();
        detail.open(DetailRequest {
            pet: rex(),
            is_adopted: false,
        });
        let actions = detail.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &state);
        assert_eq!(actions, vec![Action::CloseDetail]);
    }
}
