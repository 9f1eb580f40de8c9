//! Rendered rows keyed by item identity. A render patch drops only the rows it
//! touches, so every other row is reused as-is on the next draw.

use std::collections::HashMap;

use pet_core::{ItemId, RenderPatch};
use ratatui::text::Line;

#[derive(Default)]
pub struct RowCache {
    rows: HashMap<ItemId, Line<'static>>,
    builds: usize,
    revision: u64,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached row for `id`, building it on a miss.
    pub fn get_or_build(&mut self, id: ItemId, build: impl FnOnce() -> Line<'static>) -> Line<'static> {
        if let Some(line) = self.rows.get(&id) {
            return line.clone();
        }
        let line = build();
        self.builds += 1;
        self.rows.insert(id, line.clone());
        line
    }

    pub fn apply_patch(&mut self, patch: &RenderPatch) {
        for id in patch.dirty_ids() {
            self.rows.remove(id);
        }
        self.revision = self.revision.max(patch.revision);
    }

    pub fn invalidate(&mut self, id: &ItemId) {
        self.rows.remove(id);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of rows built since creation.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Highest model revision seen in an applied patch.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
