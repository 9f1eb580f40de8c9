//! Action enum: user intents and internal events.

use pet_core::{DetailRequest, ItemId, Pet};

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Explorer ─────────────────────────────────────────────────────────────
    /// Row chosen by key or click. `None` means the row had no backing item.
    Select(Option<ItemId>),
    ToggleCollapse(ItemId),
    Deselect,
    OpenDetail(DetailRequest),
    CloseDetail,
    PetAdopted(Pet),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
