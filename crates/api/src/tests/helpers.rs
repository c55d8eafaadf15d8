// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;
use towerdef::{DefinitionSession, TowerContext};
use towerdef_domain::{
    Block, BlockName, FloorRangeSelection, FloorType, MixedUnit, PendingDefinitions, UnitType,
};

use crate::{
    CreateFloorsResponse, CreatedFloor, FloorDto, FloorId, FloorService, ServiceError, UnitDto,
    WizardHooks,
};

pub fn create_test_tower() -> TowerContext {
    TowerContext {
        tower_id: 7,
        tower_name: Some(String::from("T1")),
        blocks: vec![Block::new(11, "A", 3), Block::new(12, "B", 2)],
    }
}

pub fn create_test_session() -> DefinitionSession {
    DefinitionSession::new(create_test_tower())
}

pub fn create_regular_selection(blocks: &[&str], from: u32, to: u32) -> FloorRangeSelection {
    FloorRangeSelection {
        from,
        to,
        blocks: blocks.iter().map(|b| BlockName::new(b)).collect(),
        floor_type: FloorType::Regular,
        code_prefix: String::from("F"),
        unit_type: Some(UnitType::Apartment),
        units_count: 2,
        start_number: 1,
        ..FloorRangeSelection::default()
    }
}

pub fn create_mixed_selection(
    blocks: &[&str],
    from: u32,
    to: u32,
    codes: &[&str],
) -> FloorRangeSelection {
    FloorRangeSelection {
        from,
        to,
        blocks: blocks.iter().map(|b| BlockName::new(b)).collect(),
        floor_type: FloorType::Mixed,
        code_prefix: String::from("M"),
        unit_type: None,
        mixed_units: codes
            .iter()
            .map(|code| MixedUnit::new(UnitType::Shop, code))
            .collect(),
        ..FloorRangeSelection::default()
    }
}

/// Shape of the rows returned by [`FakeFloorService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowShape {
    #[default]
    Canonical,
    LegacyWithoutBlock,
    IdWithoutBlock,
}

/// Backend double that records every call and assigns floor ids from 100.
#[derive(Debug, Default)]
pub struct FakeFloorService {
    pub shape: RowShape,
    pub fail_floors: bool,
    pub fail_units: bool,
    pub floor_calls: Mutex<Vec<Vec<FloorDto>>>,
    pub unit_calls: Mutex<Vec<Vec<UnitDto>>>,
}

impl FakeFloorService {
    pub fn floor_call_count(&self) -> usize {
        self.floor_calls.lock().unwrap().len()
    }

    pub fn unit_call_count(&self) -> usize {
        self.unit_calls.lock().unwrap().len()
    }

    pub fn last_units(&self) -> Vec<UnitDto> {
        self.unit_calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl FloorService for FakeFloorService {
    async fn create_multiple_floors(
        &self,
        floors: &[FloorDto],
    ) -> Result<CreateFloorsResponse, ServiceError> {
        self.floor_calls.lock().unwrap().push(floors.to_vec());
        if self.fail_floors {
            return Err(ServiceError::Rejected {
                status: 500,
                message: String::from("boom"),
            });
        }
        let block_floors: Vec<CreatedFloor> = floors
            .iter()
            .zip(100..)
            .map(|(floor, id)| match self.shape {
                RowShape::Canonical => {
                    CreatedFloor::new(id, Some(floor.block_id), floor.floor_number)
                }
                RowShape::LegacyWithoutBlock => CreatedFloor {
                    id: FloorId::BlockFloorId(id),
                    tower_block_id: None,
                    floor_number: floor.floor_number,
                },
                RowShape::IdWithoutBlock => CreatedFloor::new(id, None, floor.floor_number),
            })
            .collect();
        Ok(CreateFloorsResponse { block_floors })
    }

    async fn create_multiple_units(&self, units: &[UnitDto]) -> Result<(), ServiceError> {
        self.unit_calls.lock().unwrap().push(units.to_vec());
        if self.fail_units {
            return Err(ServiceError::Request(String::from("connection reset")));
        }
        Ok(())
    }
}

/// Hooks that count notifications.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub changes: Vec<usize>,
    pub completions: usize,
}

impl WizardHooks for RecordingHooks {
    fn definitions_changed(&mut self, definitions: &PendingDefinitions) {
        self.changes.push(definitions.len());
    }

    fn all_floors_persisted(&mut self) {
        self.completions += 1;
    }
}
