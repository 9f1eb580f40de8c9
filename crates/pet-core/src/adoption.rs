use std::collections::HashSet;

use crate::pet::Pet;

/// Pets adopted during this session. Membership only grows.
#[derive(Debug, Clone, Default)]
pub struct AdoptionSet {
    pets: HashSet<Pet>,
}

impl AdoptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the pet was not adopted before.
    pub fn insert(&mut self, pet: Pet) -> bool {
        self.pets.insert(pet)
    }

    pub fn contains(&self, pet: &Pet) -> bool {
        self.pets.contains(pet)
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> + '_ {
        self.pets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::Category;

    #[test]
    fn insert_is_idempotent() {
        let mut set = AdoptionSet::new();
        let rex = Pet::new("Rex", 3, "rex", Category::Dogs);
        assert!(set.insert(rex.clone()));
        assert!(!set.insert(rex.clone()));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&rex));
    }
}
