//! Explorer screen controller.
//!
//! Owns the list model and the adoption set for as long as the screen lives,
//! resolves row selections and handles the detail screen's adoption callback.
//! Rendering is left to the front end, which applies the returned patches.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adoption::AdoptionSet;
use crate::catalog::PetCatalog;
use crate::item::{Item, ItemId};
use crate::list_model::{HierarchicalListModel, PatchScope, RenderPatch, Section};
use crate::pet::Pet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Section captions and spacing between sections.
    #[default]
    Grouped,
    Plain,
}

/// Declarative layout handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    pub appearance: Appearance,
    pub collapsible_headers: bool,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            appearance: Appearance::Grouped,
            collapsible_headers: true,
        }
    }
}

/// What happens to the Adopted list when an already adopted pet is adopted
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdoptedListPolicy {
    #[default]
    AppendAlways,
    Dedupe,
}

/// Arguments the detail screen is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub pet: Pet,
    pub is_adopted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The row no longer maps to an item; the caller should deselect it.
    Stale,
    Header(ItemId),
    OpenDetail(DetailRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionOutcome {
    /// `false` when the pet was already in the adoption set.
    pub newly_adopted: bool,
    /// The Adopted row created for this callback, if any.
    pub adopted_item: Option<ItemId>,
    /// The Available row that was reloaded, if any.
    pub reloaded_item: Option<ItemId>,
    pub patches: Vec<RenderPatch>,
}

#[derive(Debug)]
pub struct ExplorerScreen {
    model: HierarchicalListModel,
    adoptions: AdoptionSet,
    layout: ListLayout,
    policy: AdoptedListPolicy,
}

impl ExplorerScreen {
    /// Run the start-up protocol: layout, sections, Available tree.
    /// Returns the screen and the initial patch.
    pub fn load(
        catalog: &PetCatalog,
        layout: ListLayout,
        policy: AdoptedListPolicy,
    ) -> (Self, RenderPatch) {
        let mut model = HierarchicalListModel::new();
        model.initialize_sections(&Section::ALL);

        let categories: Vec<(Item, Vec<Item>)> = catalog
            .categories()
            .map(|(category, pets)| {
                let header = Item::header(category.display_name());
                let children = pets.iter().cloned().map(Item::for_pet).collect();
                (header, children)
            })
            .collect();

        // Freshly generated headers and pet items always satisfy the model's
        // shape rules.
        let patch = match model.build_available(categories) {
            Ok(patch) => patch,
            Err(e) => {
                warn!("initial build rejected: {}", e);
                RenderPatch::empty(PatchScope::All, model.revision())
            }
        };
        info!(
            rows = model.len(),
            ?layout,
            ?policy,
            "explorer loaded"
        );

        let screen = Self {
            model,
            adoptions: AdoptionSet::new(),
            layout,
            policy,
        };
        (screen, patch)
    }

    pub fn model(&self) -> &HierarchicalListModel {
        &self.model
    }

    pub fn adoptions(&self) -> &AdoptionSet {
        &self.adoptions
    }

    pub fn layout(&self) -> ListLayout {
        self.layout
    }

    pub fn policy(&self) -> AdoptedListPolicy {
        self.policy
    }

    pub fn is_adopted(&self, pet: &Pet) -> bool {
        self.adoptions.contains(pet)
    }

    /// Resolve a selected row. `None` stands for a row with no backing item.
    pub fn select(&self, row: Option<&ItemId>) -> Selection {
        let Some(item) = row.and_then(|id| self.model.item(id)) else {
            debug!("selection did not resolve to an item");
            return Selection::Stale;
        };
        match item.as_pet() {
            None => Selection::Header(item.id()),
            Some(pet) => Selection::OpenDetail(DetailRequest {
                pet: pet.clone(),
                is_adopted: self.adoptions.contains(pet),
            }),
        }
    }

    /// Adoption callback from the detail screen.
    pub fn on_pet_adopted(&mut self, pet: Pet) -> AdoptionOutcome {
        let newly_adopted = self.adoptions.insert(pet.clone());
        let mut patches = Vec::new();

        let already_listed = self
            .model
            .items_in(Section::Adopted)
            .iter()
            .any(|item| item.as_pet() == Some(&pet));
        let skip_append = self.policy == AdoptedListPolicy::Dedupe && already_listed;

        let mut adopted_item = None;
        if !skip_append {
            let item = Item::for_pet(pet.clone());
            let id = item.id();
            match self.model.append_to_adopted(item) {
                Ok(patch) => {
                    adopted_item = Some(id);
                    patches.push(patch);
                }
                Err(e) => warn!("could not append {} to adopted: {}", pet.name, e),
            }
        }

        let reloaded_item = self
            .model
            .current_items()
            .into_iter()
            .find(|item| item.as_pet() == Some(&pet))
            .map(Item::id);
        if let Some(id) = reloaded_item {
            patches.push(self.model.reload_item(&id));
        }

        info!(
            pet = %pet.name,
            newly_adopted,
            appended = adopted_item.is_some(),
            "pet adopted"
        );

        AdoptionOutcome {
            newly_adopted,
            adopted_item,
            reloaded_item,
            patches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::Category;

    fn two_pet_catalog() -> PetCatalog {
        PetCatalog::from_pets([
            Pet::new("Rex", 3, "rex", Category::Dogs),
            Pet::new("Milo", 2, "milo", Category::Cats),
        ])
    }

    fn find(screen: &ExplorerScreen, title: &str) -> ItemId {
        screen
            .model()
            .items_in(Section::Available)
            .into_iter()
            .find(|i| i.title() == title)
            .map(Item::id)
            .unwrap()
    }

    #[test]
    fn header_selection_is_not_actionable() {
        let (screen, _) = ExplorerScreen::load(
            &two_pet_catalog(),
            ListLayout::default(),
            AdoptedListPolicy::default(),
        );
        let dogs = find(&screen, "Dogs");
        assert_eq!(screen.select(Some(&dogs)), Selection::Header(dogs));
    }

    #[test]
    fn stale_selection() {
        let (screen, _) = ExplorerScreen::load(
            &two_pet_catalog(),
            ListLayout::default(),
            AdoptedListPolicy::default(),
        );
        assert_eq!(screen.select(None), Selection::Stale);
        let stranger = Item::header("gone").id();
        assert_eq!(screen.select(Some(&stranger)), Selection::Stale);
    }

    #[test]
    fn dedupe_policy_keeps_one_adopted_row() {
        let (mut screen, _) = ExplorerScreen::load(
            &two_pet_catalog(),
            ListLayout::default(),
            AdoptedListPolicy::Dedupe,
        );
        let rex = Pet::new("Rex", 3, "rex", Category::Dogs);

        let first = screen.on_pet_adopted(rex.clone());
        let second = screen.on_pet_adopted(rex);

        assert!(first.adopted_item.is_some());
        assert!(second.adopted_item.is_none());
        assert!(!second.newly_adopted);
        assert_eq!(second.reloaded_item, first.reloaded_item);
        assert_eq!(screen.model().items_in(Section::Adopted).len(), 1);
    }

    #[test]
    fn unknown_pet_reloads_its_adopted_row() {
        let (mut screen, _) = ExplorerScreen::load(
            &two_pet_catalog(),
            ListLayout::default(),
            AdoptedListPolicy::default(),
        );
        let stray = Pet::new("Stray", 9, "", Category::Reptiles);
        let outcome = screen.on_pet_adopted(stray.clone());

        // The only match is the new Adopted row itself.
        assert_eq!(outcome.reloaded_item, outcome.adopted_item);
        assert!(screen.is_adopted(&stray));
    }
}
