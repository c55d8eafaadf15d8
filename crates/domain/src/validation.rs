// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{BlockOverflow, DomainError};
use crate::types::{Block, FloorDefinitionKey, FloorRangeSelection, PendingDefinitions};

/// Validates a floor range selection before any definition is generated.
///
/// The checks run in a fixed order and the first failure is returned. A
/// failure means nothing may be generated for the selection; generation is
/// never partially applied per block.
///
/// # Arguments
///
/// * `selection` - The form selection
/// * `blocks` - Every block of the tower, with known floor counts
///
/// # Errors
///
/// Returns an error if:
/// - No block is selected
/// - `from` is 0
/// - `from` is greater than `to`
/// - The floor type is templated and no unit type is chosen
/// - A selected block is not part of the tower
/// - `to` exceeds the floor count of any selected block (all offenders are listed)
pub fn validate_selection(
    selection: &FloorRangeSelection,
    blocks: &[Block],
) -> Result<(), DomainError> {
    if selection.blocks.is_empty() {
        return Err(DomainError::NoBlocksSelected);
    }

    if selection.from == 0 {
        return Err(DomainError::FloorRangeStartsBelowFirstFloor);
    }

    if selection.from > selection.to {
        return Err(DomainError::InvalidFloorRange {
            from: selection.from,
            to: selection.to,
        });
    }

    if !selection.floor_type.uses_manual_units() && selection.unit_type.is_none() {
        return Err(DomainError::UnitTypeRequired);
    }

    let mut overflows: Vec<BlockOverflow> = Vec::new();
    for name in &selection.blocks {
        let block: &Block = blocks
            .iter()
            .find(|b| &b.name == name)
            .ok_or_else(|| DomainError::BlockNotFound(name.clone()))?;
        if selection.to > block.floor_count {
            overflows.push(BlockOverflow {
                block: block.name.clone(),
                floor_count: block.floor_count,
            });
        }
    }

    if !overflows.is_empty() {
        return Err(DomainError::FloorRangeExceedsBlocks {
            to: selection.to,
            blocks: overflows,
        });
    }

    Ok(())
}

/// Validates that every manually entered unit has a code.
///
/// Applies to floors whose type uses manual units. A single blank code blocks
/// the whole save.
///
/// # Errors
///
/// Returns `DomainError::MissingUnitCodes` listing every floor with at least
/// one unit whose trimmed code is empty.
pub fn validate_manual_unit_codes(definitions: &PendingDefinitions) -> Result<(), DomainError> {
    let keys: Vec<FloorDefinitionKey> = definitions
        .iter()
        .filter(|(_, def)| def.floor_type.uses_manual_units())
        .filter(|(_, def)| {
            def.mixed_units()
                .is_some_and(|units| units.iter().any(crate::MixedUnit::has_blank_code))
        })
        .map(|(key, _)| key.clone())
        .collect();

    if keys.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingUnitCodes { keys })
    }
}
