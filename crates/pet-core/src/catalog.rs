//! Pet catalog: categories in display order, each with its ordered pets.
//!
//! The catalog is either the built-in one or a TOML file of `[[pets]]`
//! tables:
//!
//! ```toml
//! [[pets]]
//! name = "Rex"
//! age = 3
//! image = "rex"
//! category = "dogs"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::CatalogError;
use crate::pet::{Category, Pet};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    pets: Vec<Pet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetCatalog {
    pets: HashMap<Category, Vec<Pet>>,
}

impl PetCatalog {
    /// Group pets by category, keeping their relative order.
    pub fn from_pets(pets: impl IntoIterator<Item = Pet>) -> Self {
        let mut grouped: HashMap<Category, Vec<Pet>> = HashMap::new();
        for pet in pets {
            grouped.entry(pet.category).or_default().push(pet);
        }
        Self { pets: grouped }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let catalog = Self::from_pets(file.pets);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            "loaded catalog {} ({} pets)",
            path.display(),
            catalog.pet_count()
        );
        Ok(catalog)
    }

    /// All categories in display order, including those without pets.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[Pet])> + '_ {
        Category::ALL
            .iter()
            .map(move |c| (*c, self.pets_in(*c)))
    }

    pub fn pets_in(&self, category: Category) -> &[Pet] {
        self.pets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pet_count(&self) -> usize {
        self.pets.values().map(Vec::len).sum()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (category, pets) in self.categories() {
            if let Some(index) = pets.iter().position(|p| p.name.trim().is_empty()) {
                return Err(CatalogError::EmptyName { category, index });
            }
        }
        Ok(())
    }
}

impl Default for PetCatalog {
    fn default() -> Self {
        use Category::*;
        Self::from_pets([
            Pet::new("Rex", 3, "rex", Dogs),
            Pet::new("Bella", 5, "bella", Dogs),
            Pet::new("Charlie", 1, "charlie", Dogs),
            Pet::new("Milo", 2, "milo", Cats),
            Pet::new("Luna", 4, "luna", Cats),
            Pet::new("Oliver", 7, "oliver", Cats),
            Pet::new("Kiwi", 1, "kiwi", Birds),
            Pet::new("Sunny", 2, "sunny", Birds),
            Pet::new("Thumper", 3, "thumper", Rabbits),
            Pet::new("Clover", 2, "clover", Rabbits),
            Pet::new("Spike", 6, "spike", Reptiles),
        ])
    }
}
