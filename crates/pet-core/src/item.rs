//! List items: the unit the explorer list is built from.

use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::pet::Pet;

/// Identity of a list item. Generated once per constructed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First group is enough to tell rows apart in logs.
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    Header { title: String },
    Pet { title: String, pet: Pet },
}

/// A row of the explorer list: either a category header or a pet.
///
/// Equality and hashing go through [`ItemId`] only, so two items built from
/// the same title and pet stay distinct entries in sets and maps. Clones keep
/// the identity of the original.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
}

impl Item {
    pub fn header(title: impl Into<String>) -> Self {
        Self {
            id: ItemId::fresh(),
            kind: ItemKind::Header {
                title: title.into(),
            },
        }
    }

    pub fn pet(pet: Pet, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::fresh(),
            kind: ItemKind::Pet {
                title: title.into(),
                pet,
            },
        }
    }

    /// Pet item titled with the pet's name.
    pub fn for_pet(pet: Pet) -> Self {
        let title = pet.name.clone();
        Self::pet(pet, title)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn title(&self) -> &str {
        match &self.kind {
            ItemKind::Header { title } | ItemKind::Pet { title, .. } => title,
        }
    }

    pub fn as_pet(&self) -> Option<&Pet> {
        match &self.kind {
            ItemKind::Header { .. } => None,
            ItemKind::Pet { pet, .. } => Some(pet),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self.kind, ItemKind::Header { .. })
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::Category;
    use std::collections::HashSet;

    fn rex() -> Pet {
        Pet::new("Rex", 3, "rex", Category::Dogs)
    }

    #[test]
    fn identical_content_still_distinct() {
        let a = Item::for_pet(rex());
        let b = Item::for_pet(rex());
        assert_eq!(a.title(), b.title());
        assert_eq!(a.as_pet(), b.as_pet());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);

        let set: HashSet<Item> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn clone_keeps_identity() {
        let a = Item::header("Dogs");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn headers_have_no_pet() {
        let h = Item::header("Cats");
        assert!(h.is_header());
        assert!(h.as_pet().is_none());
        assert_eq!(h.title(), "Cats");

        let p = Item::for_pet(rex());
        assert!(!p.is_header());
        assert_eq!(p.title(), "Rex");
    }

    #[test]
    fn short_display() {
        let id = Item::header("x").id();
        assert_eq!(id.to_string().len(), 8);
    }
}
