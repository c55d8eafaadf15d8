// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{BlockName, FloorDefinitionKey};

/// A selected block whose floor count is lower than the requested range end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOverflow {
    /// The offending block.
    pub block: BlockName,
    /// The block's known floor count.
    pub floor_count: u32,
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No block was selected for the floor range.
    NoBlocksSelected,
    /// The range starts below the first floor.
    FloorRangeStartsBelowFirstFloor,
    /// The range start is after the range end.
    InvalidFloorRange {
        /// The requested first floor.
        from: u32,
        /// The requested last floor.
        to: u32,
    },
    /// A templated floor type was chosen without a unit type.
    UnitTypeRequired,
    /// A selected block is not part of the tower.
    BlockNotFound(BlockName),
    /// The range end exceeds the floor count of one or more selected blocks.
    FloorRangeExceedsBlocks {
        /// The requested last floor.
        to: u32,
        /// Every block that is too short for the range.
        blocks: Vec<BlockOverflow>,
    },
    /// One or more manual floors have a unit without a code.
    MissingUnitCodes {
        /// The floors holding blank unit codes.
        keys: Vec<FloorDefinitionKey>,
    },
    /// A floor definition key could not be parsed.
    InvalidDefinitionKey(String),
    /// Floor type string is not recognized.
    InvalidFloorType(String),
    /// Unit type string is not recognized.
    InvalidUnitType(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoBlocksSelected => write!(f, "At least one block must be selected"),
            Self::FloorRangeStartsBelowFirstFloor => {
                write!(f, "Invalid floor range: floors are numbered from 1")
            }
            Self::InvalidFloorRange { from, to } => {
                write!(
                    f,
                    "Invalid floor range: from ({from}) must not be greater than to ({to})"
                )
            }
            Self::UnitTypeRequired => write!(f, "A unit type must be selected for this floor type"),
            Self::BlockNotFound(block) => write!(f, "Block '{block}' not found"),
            Self::FloorRangeExceedsBlocks { to, blocks } => {
                let listed: Vec<String> = blocks
                    .iter()
                    .map(|b| format!("{} ({} floors)", b.block, b.floor_count))
                    .collect();
                write!(
                    f,
                    "Floor {to} exceeds the floor count of: {}",
                    listed.join(", ")
                )
            }
            Self::MissingUnitCodes { keys } => {
                let listed: Vec<String> = keys.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "Select units and enter a code for each unit on: {}",
                    listed.join(", ")
                )
            }
            Self::InvalidDefinitionKey(key) => write!(f, "Invalid floor definition key: '{key}'"),
            Self::InvalidFloorType(msg) => write!(f, "Invalid floor type: {msg}"),
            Self::InvalidUnitType(msg) => write!(f, "Invalid unit type: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
