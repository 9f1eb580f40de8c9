//! End-to-end behaviour of the explorer controller: build, select, adopt.

use std::collections::HashSet;

use pet_core::{
    AdoptedListPolicy, Category, DetailRequest, ExplorerScreen, Item, ItemId, ListLayout,
    PatchScope, Pet, PetCatalog, Section, Selection,
};

fn rex() -> Pet {
    Pet::new("Rex", 3, "rex", Category::Dogs)
}

fn milo() -> Pet {
    Pet::new("Milo", 2, "milo", Category::Cats)
}

fn load(catalog: &PetCatalog) -> ExplorerScreen {
    ExplorerScreen::load(catalog, ListLayout::default(), AdoptedListPolicy::default()).0
}

fn available_id(screen: &ExplorerScreen, pet: &Pet) -> ItemId {
    screen
        .model()
        .items_in(Section::Available)
        .into_iter()
        .find(|item| item.as_pet() == Some(pet))
        .map(Item::id)
        .expect("pet listed under Available")
}

/// Available-row highlight rule used by the renderer.
fn highlighted(screen: &ExplorerScreen, id: &ItemId) -> bool {
    screen
        .model()
        .item(id)
        .and_then(Item::as_pet)
        .is_some_and(|pet| screen.is_adopted(pet))
}

#[test]
fn build_keeps_catalog_order() {
    let catalog = PetCatalog::default();
    let (screen, patch) =
        ExplorerScreen::load(&catalog, ListLayout::default(), AdoptedListPolicy::default());

    let mut expected = Vec::new();
    for (category, pets) in catalog.categories() {
        expected.push(category.display_name().to_string());
        expected.extend(pets.iter().map(|p| p.name.clone()));
    }
    let titles: Vec<String> = screen
        .model()
        .items_in(Section::Available)
        .iter()
        .map(|i| i.title().to_string())
        .collect();

    assert_eq!(titles, expected);
    assert_eq!(patch.scope, PatchScope::Section(Section::Available));
    assert_eq!(patch.inserted.len(), expected.len());
    assert!(screen.model().items_in(Section::Adopted).is_empty());
}

#[test]
fn two_category_scenario() {
    let catalog = PetCatalog::from_pets([rex(), milo()]);
    let mut screen = load(&catalog);

    let titles: Vec<&str> = screen
        .model()
        .items_in(Section::Available)
        .into_iter()
        .map(Item::title)
        .collect();
    // Every category gets a header, empty ones included.
    assert_eq!(&titles[..4], &["Dogs", "Rex", "Cats", "Milo"]);
    assert!(titles[4..].iter().all(|t| ["Birds", "Rabbits", "Reptiles"].contains(t)));
    assert!(screen.model().items_in(Section::Adopted).is_empty());

    let rex_row = available_id(&screen, &rex());
    assert_eq!(
        screen.select(Some(&rex_row)),
        Selection::OpenDetail(DetailRequest {
            pet: rex(),
            is_adopted: false
        })
    );
    assert!(!highlighted(&screen, &rex_row));

    let outcome = screen.on_pet_adopted(rex());
    assert!(outcome.newly_adopted);
    assert_eq!(outcome.reloaded_item, Some(rex_row));
    assert_eq!(screen.adoptions().len(), 1);
    assert!(screen.is_adopted(&rex()));

    let adopted = screen.model().items_in(Section::Adopted);
    assert_eq!(adopted.len(), 1);
    assert_eq!(adopted[0].as_pet(), Some(&rex()));
    assert_eq!(Some(adopted[0].id()), outcome.adopted_item);
    assert!(highlighted(&screen, &rex_row));

    // The second selection of Rex reports the adoption.
    assert_eq!(
        screen.select(Some(&rex_row)),
        Selection::OpenDetail(DetailRequest {
            pet: rex(),
            is_adopted: true
        })
    );
}

#[test]
fn other_pets_unaffected_by_earlier_adoption() {
    let mut screen = load(&PetCatalog::from_pets([rex(), milo()]));
    let milo_row = available_id(&screen, &milo());

    let _ = screen.select(Some(&milo_row));
    screen.on_pet_adopted(rex());

    assert_eq!(
        screen.select(Some(&milo_row)),
        Selection::OpenDetail(DetailRequest {
            pet: milo(),
            is_adopted: false
        })
    );
    assert!(!highlighted(&screen, &milo_row));
}

#[test]
fn adopting_twice_appends_distinct_rows() {
    let mut screen = load(&PetCatalog::from_pets([rex(), milo()]));

    let first = screen.on_pet_adopted(rex());
    let second = screen.on_pet_adopted(rex());

    assert!(first.newly_adopted);
    assert!(!second.newly_adopted);
    assert_eq!(screen.adoptions().len(), 1);

    let adopted = screen.model().items_in(Section::Adopted);
    assert_eq!(adopted.len(), 2);
    assert_ne!(adopted[0].id(), adopted[1].id());
    let distinct: HashSet<&Item> = adopted.iter().copied().collect();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn dedupe_policy_from_config() {
    let config: pet_core::config::Config = toml::from_str("[explorer]\ndedupe_adopted = true\n")
        .expect("valid config");
    let (mut screen, _) = ExplorerScreen::load(
        &PetCatalog::from_pets([rex()]),
        config.explorer.layout(),
        config.explorer.policy(),
    );

    screen.on_pet_adopted(rex());
    screen.on_pet_adopted(rex());
    assert_eq!(screen.model().items_in(Section::Adopted).len(), 1);
}

#[test]
fn adoption_patches_touch_only_affected_rows() {
    let mut screen = load(&PetCatalog::from_pets([rex(), milo()]));
    let rex_row = available_id(&screen, &rex());
    let milo_row = available_id(&screen, &milo());

    let outcome = screen.on_pet_adopted(rex());
    assert_eq!(outcome.patches.len(), 2);

    let append = &outcome.patches[0];
    assert_eq!(append.scope, PatchScope::Section(Section::Adopted));
    assert_eq!(append.inserted.len(), 1);
    assert!(append.removed.is_empty() && append.moved.is_empty());

    let reload = &outcome.patches[1];
    assert_eq!(reload.scope, PatchScope::Section(Section::Available));
    assert_eq!(reload.reloaded, vec![rex_row]);
    assert!(reload.inserted.is_empty());

    for patch in &outcome.patches {
        assert!(!patch.touches(&milo_row));
    }
}

#[test]
fn rows_from_another_screen_are_stale() {
    let catalog = PetCatalog::default();
    let screen = load(&catalog);
    let other = load(&catalog);

    for item in other.model().current_items() {
        assert!(!screen.model().contains(&item.id()));
        assert_eq!(screen.select(Some(&item.id())), Selection::Stale);
    }
}
