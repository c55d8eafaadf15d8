// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission records and backend response schema.

use serde::{Deserialize, Serialize};
use towerdef_domain::{FloorDefinitionKey, FloorType, UnitStatus, UnitType};

/// Unit number pattern stored on every created floor.
pub const UNIT_NUMBER_PATTERN: &str = "A##01";

/// Placeholder floor id carried by units until the floor is created.
pub const UNRESOLVED_BLOCK_FLOOR_ID: i64 = 0;

/// A floor row sent to the bulk floor creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FloorDto {
    /// The tower the floor belongs to.
    pub tower_id: i64,
    /// The block the floor belongs to.
    pub block_id: i64,
    /// The absolute floor number.
    pub floor_number: u32,
    /// The derived floor code.
    pub floor_code: String,
    /// Arabic display name.
    pub arabic_name: String,
    /// English display name.
    pub english_name: String,
    /// The floor type.
    pub floor_type: FloorType,
    /// Number of units submitted for this floor.
    pub units_count: u32,
    /// Unit number pattern.
    pub unit_number_pattern: String,
    /// Whether the floor has shared facilities.
    pub has_shared_facilities: bool,
    /// Number of elevators.
    pub elevators_count: u32,
    /// Number of staircases.
    pub staircases_count: u32,
    /// Whether the floor has an emergency exit.
    pub has_emergency_exit: bool,
    /// Whether the floor is active.
    pub is_active: bool,
}

/// A unit row sent to the bulk unit creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    /// The created floor's id; [`UNRESOLVED_BLOCK_FLOOR_ID`] until reconciled.
    pub block_floor_id: i64,
    /// The block the unit belongs to.
    pub block_id: i64,
    /// The tower the unit belongs to.
    pub tower_id: i64,
    /// The absolute floor number.
    pub floor_number: u32,
    /// The persisted unit number.
    pub unit_number: String,
    /// The unit type.
    pub unit_type: UnitType,
    /// Sales status.
    pub status: UnitStatus,
    /// Whether the unit is active.
    pub is_active: bool,
}

/// Both record lists of one save, plus the keys they were built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    /// Floors, in key order.
    pub floors: Vec<FloorDto>,
    /// Units, grouped by floor in key order.
    pub units: Vec<UnitDto>,
    /// Keys of the definitions that produced a floor row.
    pub keys: Vec<FloorDefinitionKey>,
}

/// Identifier of a created floor, under whichever name the backend used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorId {
    /// Current name.
    #[serde(rename = "id")]
    Id(i64),
    /// Older name.
    #[serde(rename = "blockFloorId")]
    BlockFloorId(i64),
}

/// One row of the create-floors response.
///
/// The id arrives as `id` or `blockFloorId`, the floor number as
/// `floorNumber` or `FloorNumber`, and `towerBlockId` may be missing. Every
/// combination is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFloor {
    /// Server-assigned floor id.
    #[serde(flatten)]
    pub id: FloorId,
    /// The block the floor was created in, when echoed back.
    #[serde(
        rename = "towerBlockId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tower_block_id: Option<i64>,
    /// The absolute floor number.
    #[serde(rename = "floorNumber", alias = "FloorNumber")]
    pub floor_number: u32,
}

/// Body of the create-floors response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFloorsResponse {
    /// Created floors, in request order.
    #[serde(default)]
    pub block_floors: Vec<CreatedFloor>,
}

/// A created floor with every identifier known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFloor {
    /// Server-assigned floor id.
    pub block_floor_id: i64,
    /// The block the floor belongs to.
    pub block_id: i64,
    /// The absolute floor number.
    pub floor_number: u32,
}

impl CreatedFloor {
    /// Creates a row carrying the current id name.
    #[must_use]
    pub const fn new(id: i64, tower_block_id: Option<i64>, floor_number: u32) -> Self {
        Self {
            id: FloorId::Id(id),
            tower_block_id,
            floor_number,
        }
    }

    /// Returns the server-assigned id, whichever name it came under.
    #[must_use]
    pub const fn block_floor_id(&self) -> i64 {
        match self.id {
            FloorId::Id(id) | FloorId::BlockFloorId(id) => id,
        }
    }

    /// Resolves the row into a [`ResolvedFloor`].
    ///
    /// `request_block_id` is the block id of the request row at the same
    /// position, used when the row does not echo its block.
    #[must_use]
    pub fn resolve(&self, request_block_id: Option<i64>) -> Option<ResolvedFloor> {
        let block_floor_id: i64 = self.block_floor_id();
        self.tower_block_id
            .or(request_block_id)
            .map(|block_id| ResolvedFloor {
                block_floor_id,
                block_id,
                floor_number: self.floor_number,
            })
    }
}

/// Outcome of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    /// Floors submitted.
    pub floors_created: usize,
    /// Units submitted.
    pub units_created: usize,
    /// Keys saved so far in the session.
    pub persisted: usize,
    /// Total floors of the tower.
    pub expected: usize,
    /// Whether this save completed the tower.
    pub completed: bool,
}
