// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TowerContext;
use towerdef_domain::{
    Block, BlockName, FloorDefinitionKey, FloorRangeSelection, FloorType, MixedUnit, UnitType,
};

pub fn create_test_blocks() -> Vec<Block> {
    vec![Block::new(11, "A", 10), Block::new(12, "B", 6)]
}

pub fn create_test_tower() -> TowerContext {
    TowerContext {
        tower_id: 7,
        tower_name: Some(String::from("T1")),
        blocks: create_test_blocks(),
    }
}

pub fn key(block: &str, floor: u32) -> FloorDefinitionKey {
    FloorDefinitionKey::new(BlockName::new(block), floor)
}

pub fn create_regular_selection(blocks: &[&str], from: u32, to: u32) -> FloorRangeSelection {
    FloorRangeSelection {
        from,
        to,
        blocks: blocks.iter().map(|b| BlockName::new(b)).collect(),
        floor_type: FloorType::Regular,
        code_prefix: String::from("F"),
        unit_type: Some(UnitType::Apartment),
        units_count: 3,
        start_number: 1,
        ..FloorRangeSelection::default()
    }
}

pub fn create_mixed_selection(blocks: &[&str], from: u32, to: u32) -> FloorRangeSelection {
    FloorRangeSelection {
        from,
        to,
        blocks: blocks.iter().map(|b| BlockName::new(b)).collect(),
        floor_type: FloorType::Mixed,
        code_prefix: String::from("M"),
        unit_type: None,
        mixed_units: vec![
            MixedUnit::new(UnitType::Shop, "S1"),
            MixedUnit::new(UnitType::Office, "O1"),
        ],
        ..FloorRangeSelection::default()
    }
}
