//! Hierarchical list model: sections -> top-level nodes -> children.
//!
//! Every mutation ends with an apply step that reconciles the section's rows
//! against the row order applied last time, keyed by [`ItemId`]. The resulting
//! [`RenderPatch`] names exactly the rows a renderer has to touch.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::ModelError;
use crate::item::{Item, ItemId};

/// Fixed, ordered list sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Available,
    Adopted,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Available, Section::Adopted];

    pub fn index(self) -> usize {
        match self {
            Self::Available => 0,
            Self::Adopted => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Adopted => "Adopted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchScope {
    All,
    Section(Section),
}

/// Rows changed by one apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPatch {
    pub scope: PatchScope,
    /// Model revision after the apply.
    pub revision: u64,
    /// New rows with their position inside the section.
    pub inserted: Vec<(ItemId, usize)>,
    pub removed: Vec<ItemId>,
    /// Retained rows whose relative order changed.
    pub moved: Vec<ItemId>,
    /// Rows explicitly marked for re-render.
    pub reloaded: Vec<ItemId>,
}

impl RenderPatch {
    pub(crate) fn empty(scope: PatchScope, revision: u64) -> Self {
        Self {
            scope,
            revision,
            inserted: Vec::new(),
            removed: Vec::new(),
            moved: Vec::new(),
            reloaded: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && self.reloaded.is_empty()
    }

    pub fn touches(&self, id: &ItemId) -> bool {
        self.inserted.iter().any(|(i, _)| i == id)
            || self.removed.contains(id)
            || self.moved.contains(id)
            || self.reloaded.contains(id)
    }

    /// Every id whose rendered row is stale after this patch.
    pub fn dirty_ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.inserted
            .iter()
            .map(|(id, _)| id)
            .chain(self.removed.iter())
            .chain(self.moved.iter())
            .chain(self.reloaded.iter())
    }
}

#[derive(Debug, Clone)]
struct Node {
    item: Item,
    children: Vec<Item>,
}

#[derive(Debug)]
struct SectionState {
    section: Section,
    nodes: Vec<Node>,
    /// Row order as of the last apply.
    applied: Vec<ItemId>,
}

impl SectionState {
    fn rows(&self) -> impl Iterator<Item = &Item> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| std::iter::once(&node.item).chain(node.children.iter()))
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.rows().any(|item| item.id() == *id)
    }
}

#[derive(Debug, Default)]
pub struct HierarchicalListModel {
    sections: Vec<SectionState>,
    revision: u64,
}

impl HierarchicalListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish the section list. Replaces any previous sections and items.
    pub fn initialize_sections(&mut self, sections: &[Section]) {
        let mut seen = HashSet::new();
        self.sections = sections
            .iter()
            .copied()
            .filter(|s| seen.insert(*s))
            .map(|section| SectionState {
                section,
                nodes: Vec::new(),
                applied: Vec::new(),
            })
            .collect();
        self.revision += 1;
    }

    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(|s| s.section).collect()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append every header as a top-level node of `Available`, with its
    /// children under it, and apply once.
    pub fn build_available(
        &mut self,
        categories: Vec<(Item, Vec<Item>)>,
    ) -> Result<RenderPatch, ModelError> {
        let mut incoming = HashSet::new();
        for (header, children) in &categories {
            if !header.is_header() {
                return Err(ModelError::NotAHeader(header.id()));
            }
            self.check_new(header, &mut incoming)?;
            for child in children {
                if child.is_header() {
                    return Err(ModelError::NestedHeader(child.id()));
                }
                self.check_new(child, &mut incoming)?;
            }
        }

        let Some(state) = self.section_mut(Section::Available) else {
            return Ok(RenderPatch::empty(
                PatchScope::Section(Section::Available),
                self.revision,
            ));
        };
        state.nodes.extend(
            categories
                .into_iter()
                .map(|(item, children)| Node { item, children }),
        );
        Ok(self.apply(Section::Available, Vec::new()))
    }

    /// Append one pet item to the end of `Adopted`. The apply is limited to
    /// that section.
    pub fn append_to_adopted(&mut self, item: Item) -> Result<RenderPatch, ModelError> {
        if item.is_header() {
            return Err(ModelError::NestedHeader(item.id()));
        }
        self.check_new(&item, &mut HashSet::new())?;

        let Some(state) = self.section_mut(Section::Adopted) else {
            return Ok(RenderPatch::empty(
                PatchScope::Section(Section::Adopted),
                self.revision,
            ));
        };
        state.nodes.push(Node {
            item,
            children: Vec::new(),
        });
        Ok(self.apply(Section::Adopted, Vec::new()))
    }

    /// Mark a present item for re-render. Unknown ids yield an empty patch
    /// and leave the model untouched.
    pub fn reload_item(&mut self, id: &ItemId) -> RenderPatch {
        match self.section_of(id) {
            Some(section) => self.apply(section, vec![*id]),
            None => {
                debug!(item = %id, "reload of unknown item ignored");
                RenderPatch::empty(PatchScope::All, self.revision)
            }
        }
    }

    /// All items across sections in rendering order.
    pub fn current_items(&self) -> Vec<&Item> {
        self.sections.iter().flat_map(|s| s.rows()).collect()
    }

    pub fn items_in(&self, section: Section) -> Vec<&Item> {
        self.section(section)
            .map(|s| s.rows().collect())
            .unwrap_or_default()
    }

    /// Rows of `section` with the children of `collapsed` headers left out.
    pub fn visible_items(&self, section: Section, collapsed: &HashSet<ItemId>) -> Vec<&Item> {
        let Some(state) = self.section(section) else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for node in &state.nodes {
            rows.push(&node.item);
            if !collapsed.contains(&node.item.id()) {
                rows.extend(node.children.iter());
            }
        }
        rows
    }

    pub fn children_of(&self, id: &ItemId) -> Vec<&Item> {
        self.sections
            .iter()
            .flat_map(|s| s.nodes.iter())
            .find(|node| node.item.id() == *id)
            .map(|node| node.children.iter().collect())
            .unwrap_or_default()
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.sections
            .iter()
            .flat_map(|s| s.rows())
            .find(|item| item.id() == *id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }

    pub fn section_of(&self, id: &ItemId) -> Option<Section> {
        self.sections
            .iter()
            .find(|s| s.contains(id))
            .map(|s| s.section)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.rows().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn section(&self, section: Section) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.section == section)
    }

    fn section_mut(&mut self, section: Section) -> Option<&mut SectionState> {
        self.sections.iter_mut().find(|s| s.section == section)
    }

    fn check_new(&self, item: &Item, incoming: &mut HashSet<ItemId>) -> Result<(), ModelError> {
        if self.contains(&item.id()) || !incoming.insert(item.id()) {
            return Err(ModelError::Duplicate(item.id()));
        }
        Ok(())
    }

    fn apply(&mut self, section: Section, reloaded: Vec<ItemId>) -> RenderPatch {
        self.revision += 1;
        let revision = self.revision;
        let Some(state) = self.section_mut(section) else {
            return RenderPatch::empty(PatchScope::Section(section), revision);
        };

        let current: Vec<ItemId> = state.rows().map(Item::id).collect();
        let diff = reconcile(&state.applied, &current);
        state.applied = current;

        let patch = RenderPatch {
            scope: PatchScope::Section(section),
            revision,
            inserted: diff.inserted,
            removed: diff.removed,
            moved: diff.moved,
            reloaded,
        };
        debug!(
            section = section.title(),
            revision,
            inserted = patch.inserted.len(),
            removed = patch.removed.len(),
            moved = patch.moved.len(),
            reloaded = patch.reloaded.len(),
            "applied list update"
        );
        patch
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Reconciliation {
    pub inserted: Vec<(ItemId, usize)>,
    pub removed: Vec<ItemId>,
    pub moved: Vec<ItemId>,
}

/// Keyed diff between two row orders. Rows kept in a longest increasing run
/// of their old positions are left alone; the other retained rows are moves.
pub(crate) fn reconcile(old: &[ItemId], new: &[ItemId]) -> Reconciliation {
    let old_pos: HashMap<ItemId, usize> = old.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let new_set: HashSet<ItemId> = new.iter().copied().collect();

    let removed = old.iter().filter(|id| !new_set.contains(id)).copied().collect();

    let mut inserted = Vec::new();
    let mut retained: Vec<(ItemId, usize)> = Vec::new();
    for (index, id) in new.iter().enumerate() {
        match old_pos.get(id) {
            Some(&pos) => retained.push((*id, pos)),
            None => inserted.push((*id, index)),
        }
    }

    let positions: Vec<usize> = retained.iter().map(|(_, pos)| *pos).collect();
    let stable: HashSet<usize> = longest_increasing_run(&positions).into_iter().collect();
    let moved = retained
        .iter()
        .enumerate()
        .filter(|(i, _)| !stable.contains(i))
        .map(|(_, (id, _))| *id)
        .collect();

    Reconciliation {
        inserted,
        removed,
        moved,
    }
}

/// Indices (into `values`) of one longest strictly increasing subsequence.
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    // tails[k] = index of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &v) in values.iter().enumerate() {
        let k = tails.partition_point(|&t| values[t] < v);
        if k > 0 {
            prev[i] = Some(tails[k - 1]);
        }
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        run.push(i);
        cursor = prev[i];
    }
    run.reverse();
    run
}
