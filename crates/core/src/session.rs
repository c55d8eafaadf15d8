// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::generate::define_floors;
use crate::preview::{BuildingTree, project};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use towerdef_domain::{
    Block, BlockName, FloorDefinitionKey, FloorRangeSelection, PendingDefinitions,
};

/// Keys of floor definitions already saved in this session.
///
/// The set only grows. A key in the set is never generated again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSet {
    keys: BTreeSet<FloorDefinitionKey>,
}

impl PersistedSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Checks whether a key was saved.
    #[must_use]
    pub fn contains(&self, key: &FloorDefinitionKey) -> bool {
        self.keys.contains(key)
    }

    /// Records saved keys.
    pub fn extend<I: IntoIterator<Item = FloorDefinitionKey>>(&mut self, keys: I) {
        self.keys.extend(keys);
    }

    /// Returns the number of saved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns whether nothing was saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over saved keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &FloorDefinitionKey> {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a PersistedSet {
    type Item = &'a FloorDefinitionKey;
    type IntoIter = std::collections::btree_set::Iter<'a, FloorDefinitionKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// The tower a definition session works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerContext {
    /// Backend tower identifier.
    pub tower_id: i64,
    /// Tower name, when known.
    pub tower_name: Option<String>,
    /// The tower's blocks with their floor counts.
    pub blocks: Vec<Block>,
}

impl TowerContext {
    /// Returns the total number of floors across all blocks.
    #[must_use]
    pub fn expected_floor_count(&self) -> usize {
        self.blocks.iter().map(|b| b.floor_count as usize).sum()
    }

    /// Returns the block with the given name.
    #[must_use]
    pub fn block(&self, name: &BlockName) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.name == name)
    }
}

/// Result of a define action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefineOutcome {
    /// How many definitions were added to the pending map.
    pub added: usize,
    /// Size of the pending map afterwards.
    pub pending: usize,
}

/// Progress after a save was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveProgress {
    /// Keys saved so far in this session.
    pub persisted: usize,
    /// Total floors of the tower.
    pub expected: usize,
    /// True only for the save that first brought `persisted` to `expected`.
    pub completed_now: bool,
}

/// Session-scoped state of the floor definition step.
///
/// Owns the form selection, the pending definitions and the set of keys
/// already saved. Independent sessions share nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSession {
    tower: TowerContext,
    selection: FloorRangeSelection,
    pending: PendingDefinitions,
    persisted: PersistedSet,
    completion_signalled: bool,
}

impl DefinitionSession {
    /// Starts a session with an empty selection, nothing pending and nothing saved.
    #[must_use]
    pub fn new(tower: TowerContext) -> Self {
        Self {
            tower,
            selection: FloorRangeSelection::default(),
            pending: PendingDefinitions::new(),
            persisted: PersistedSet::new(),
            completion_signalled: false,
        }
    }

    /// Returns the tower context.
    #[must_use]
    pub const fn tower(&self) -> &TowerContext {
        &self.tower
    }

    /// Returns the current form selection.
    #[must_use]
    pub const fn selection(&self) -> &FloorRangeSelection {
        &self.selection
    }

    /// Replaces the form selection.
    pub fn set_selection(&mut self, selection: FloorRangeSelection) {
        self.selection = selection;
    }

    /// Applies a floor pick made on the building diagram.
    ///
    /// Only the range and the blocks change; every other form field is kept.
    pub fn select_floors(&mut self, from: u32, to: u32, blocks: BTreeSet<BlockName>) {
        self.selection.from = from;
        self.selection.to = to;
        self.selection.blocks = blocks;
    }

    /// Returns the pending definitions.
    #[must_use]
    pub const fn pending(&self) -> &PendingDefinitions {
        &self.pending
    }

    /// Returns the saved keys.
    #[must_use]
    pub const fn persisted(&self) -> &PersistedSet {
        &self.persisted
    }

    /// Validates the current selection and adds its definitions to the pending map.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection fails validation. The pending map is
    /// left unchanged in that case.
    pub fn define(&mut self) -> Result<DefineOutcome, CoreError> {
        let before: usize = self.pending.len();
        let generated: PendingDefinitions = define_floors(
            &self.selection,
            &self.tower.blocks,
            &self.pending,
            &self.persisted,
        )?;
        self.pending = generated;
        Ok(DefineOutcome {
            added: self.pending.len() - before,
            pending: self.pending.len(),
        })
    }

    /// Drops every pending definition.
    pub fn clear_preview(&mut self) {
        self.pending.clear();
    }

    /// Projects the pending definitions onto the tower skeleton.
    #[must_use]
    pub fn preview(&self) -> BuildingTree {
        let skeleton: BuildingTree =
            BuildingTree::skeleton(self.tower.tower_name.as_deref(), &self.tower.blocks);
        project(&self.pending, &skeleton)
    }

    /// Returns the total number of floors across the tower's blocks.
    #[must_use]
    pub fn expected_floor_count(&self) -> usize {
        self.tower.expected_floor_count()
    }

    /// Returns whether every floor of the tower has been saved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let expected: usize = self.expected_floor_count();
        expected > 0 && self.persisted.len() >= expected
    }

    /// Records a successful save.
    ///
    /// The saved keys join the persisted set, the pending map is cleared and
    /// the range fields of the form are reset.
    pub fn record_saved<I: IntoIterator<Item = FloorDefinitionKey>>(
        &mut self,
        keys: I,
    ) -> SaveProgress {
        self.persisted.extend(keys);
        self.pending.clear();
        self.selection.reset_range();

        let persisted: usize = self.persisted.len();
        let expected: usize = self.expected_floor_count();
        let completed_now: bool =
            !self.completion_signalled && expected > 0 && persisted >= expected;
        if completed_now {
            self.completion_signalled = true;
        }

        SaveProgress {
            persisted,
            expected,
            completed_now,
        }
    }
}
