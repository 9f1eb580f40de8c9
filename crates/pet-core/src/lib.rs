//! Model and controller for the pet explorer: catalog, list items, the
//! hierarchical list model with its render patches, the adoption set and the
//! explorer screen that ties them together.

pub mod adoption;
pub mod catalog;
pub mod config;
pub mod error;
pub mod explorer;
pub mod item;
pub mod list_model;
pub mod pet;
pub mod platform;

pub use adoption::AdoptionSet;
pub use catalog::PetCatalog;
pub use error::{CatalogError, ModelError};
pub use explorer::{
    AdoptedListPolicy, AdoptionOutcome, Appearance, DetailRequest, ExplorerScreen, ListLayout,
    Selection,
};
pub use item::{Item, ItemId, ItemKind};
pub use list_model::{HierarchicalListModel, PatchScope, RenderPatch, Section};
pub use pet::{Category, Pet};
