// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Building preview projection.
//!
//! The preview tree drives the on-screen building diagram. It is derived from
//! the pending definitions and is never submitted to the backend.

use serde::{Deserialize, Serialize};
use towerdef_domain::{
    Block, BlockName, FloorDefinition, FloorDefinitionKey, FloorType, FloorUnits,
    PendingDefinitions, build_unit_code, display_number,
};

/// Color given to every unit of a freshly defined floor.
pub const DEFINED_UNIT_COLOR: &str = "#4caf50";

/// Preview status of a unit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewUnitStatus {
    /// The unit belongs to a floor defined in this session.
    Defined,
}

/// A unit drawn on a floor of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitNode {
    /// Synthetic identifier, unique within the tree.
    pub id: String,
    /// The number shown on the unit.
    pub number: String,
    /// Fill color.
    pub color: String,
    /// Preview status.
    pub status: PreviewUnitStatus,
}

/// A floor of a block in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorNode {
    /// Synthetic identifier.
    pub id: String,
    /// The absolute floor number.
    pub number: u32,
    /// Units on the floor.
    pub units: Vec<UnitNode>,
    /// Floor code, once defined.
    pub floor_code: Option<String>,
    /// Floor type, once defined.
    pub floor_type: Option<FloorType>,
    /// Whether the floor has a definition.
    pub is_defined: bool,
    /// Whether the floor can be picked from the diagram.
    pub is_selectable: bool,
}

/// A block of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    /// Backend block identifier.
    pub id: i64,
    /// The block name.
    pub name: BlockName,
    /// Floors, sorted by number.
    pub floors: Vec<FloorNode>,
}

/// The whole tower as drawn in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingTree {
    /// The tower name, used in generated unit codes when requested.
    pub tower_name: Option<String>,
    /// The tower's blocks.
    pub blocks: Vec<BlockNode>,
}

impl BuildingTree {
    /// Builds a tree with every floor of every block present but undefined.
    #[must_use]
    pub fn skeleton(tower_name: Option<&str>, blocks: &[Block]) -> Self {
        Self {
            tower_name: tower_name.map(ToString::to_string),
            blocks: blocks
                .iter()
                .map(|block| BlockNode {
                    id: block.id,
                    name: block.name.clone(),
                    floors: (1..=block.floor_count)
                        .map(|number| FloorNode {
                            id: FloorDefinitionKey::new(block.name.clone(), number).to_string(),
                            number,
                            units: Vec::new(),
                            floor_code: None,
                            floor_type: None,
                            is_defined: false,
                            is_selectable: true,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Returns the block node with the given name.
    #[must_use]
    pub fn block(&self, name: &BlockName) -> Option<&BlockNode> {
        self.blocks.iter().find(|b| &b.name == name)
    }
}

impl BlockNode {
    /// Returns the floor node with the given number.
    #[must_use]
    pub fn floor(&self, number: u32) -> Option<&FloorNode> {
        self.floors.iter().find(|f| f.number == number)
    }
}

/// Projects definitions onto an existing building tree.
///
/// Each definition becomes a defined floor node on its block. A node with the
/// same floor number is replaced, otherwise the node is appended; floors are
/// then sorted ascending. Definitions for blocks absent from the tree are
/// ignored.
#[must_use]
pub fn project(definitions: &PendingDefinitions, tree: &BuildingTree) -> BuildingTree {
    let mut projected: BuildingTree = tree.clone();
    let tower_name: Option<&str> = tree.tower_name.as_deref();

    for block in &mut projected.blocks {
        let name: BlockName = block.name.clone();
        for (key, definition) in definitions.iter().filter(|(k, _)| k.block() == &name) {
            let node: FloorNode = floor_node(key, definition, tower_name);
            match block.floors.iter().position(|f| f.number == node.number) {
                Some(index) => block.floors[index] = node,
                None => block.floors.push(node),
            }
        }
        block.floors.sort_by_key(|f| f.number);
    }

    projected
}

fn floor_node(
    key: &FloorDefinitionKey,
    definition: &FloorDefinition,
    tower_name: Option<&str>,
) -> FloorNode {
    let floor_id: String = key.to_string();
    let numbers: Vec<String> = match &definition.units {
        FloorUnits::UnitsDefinition(template) => (0..template.count)
            .map(|i| {
                let unit_number: u32 = template.start_number.saturating_add(i);
                let code: String = build_unit_code(
                    tower_name,
                    &definition.floor_code,
                    unit_number,
                    template.naming,
                );
                display_number(template.unit_type, unit_number, &code)
            })
            .collect(),
        FloorUnits::MixedUnits(units) => units.iter().map(|u| u.code.clone()).collect(),
    };

    let units: Vec<UnitNode> = numbers
        .into_iter()
        .enumerate()
        .map(|(i, number)| UnitNode {
            id: format!("{floor_id}-unit-{}", i + 1),
            number,
            color: DEFINED_UNIT_COLOR.to_string(),
            status: PreviewUnitStatus::Defined,
        })
        .collect();

    FloorNode {
        id: floor_id,
        number: definition.floor_number,
        units,
        floor_code: Some(definition.floor_code.clone()),
        floor_type: Some(definition.floor_type),
        is_defined: true,
        is_selectable: true,
    }
}
