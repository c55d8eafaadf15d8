// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::session::PersistedSet;
use towerdef_domain::{
    Block, FloorDefinition, FloorDefinitionKey, FloorRangeSelection, FloorUnits,
    PendingDefinitions, RangePosition, UnitsTemplate, derive_floor_code,
    validate_selection,
};

/// Generates floor definitions for a range selection.
///
/// Floors are visited from `selection.from` to `selection.to` inclusive and,
/// for each floor, every selected block in name order. A floor is skipped when:
///
/// - it lies above the block's floor count
/// - its key is already in `persisted`
/// - its key is already present in `existing`; in-memory entries are kept as they are
/// - the floor type uses a unit template and `selection.unit_type` is `None`
///
/// This function does not validate the selection. Callers run
/// [`validate_selection`] first, or use [`define_floors`].
///
/// # Arguments
///
/// * `selection` - The form selection
/// * `blocks` - Every block of the tower, with known floor counts
/// * `existing` - Definitions already pending in memory
/// * `persisted` - Keys saved earlier in this session
/// * `code_prefix_start_number` - Base number for non-regular, non-ground floor codes
///
/// # Returns
///
/// A copy of `existing` extended with the newly generated definitions.
#[must_use]
pub fn generate(
    selection: &FloorRangeSelection,
    blocks: &[Block],
    existing: &PendingDefinitions,
    persisted: &PersistedSet,
    code_prefix_start_number: u32,
) -> PendingDefinitions {
    let mut definitions: PendingDefinitions = existing.clone();

    for floor_number in selection.from..=selection.to {
        let position: RangePosition = RangePosition::within(selection.from, floor_number);

        for name in &selection.blocks {
            let Some(block) = blocks.iter().find(|b| &b.name == name) else {
                continue;
            };
            if floor_number > block.floor_count {
                continue;
            }

            let key: FloorDefinitionKey = FloorDefinitionKey::new(name.clone(), floor_number);
            if persisted.contains(&key) || definitions.contains_key(&key) {
                continue;
            }

            let Some(definition) = build_definition(selection, position, code_prefix_start_number)
            else {
                continue;
            };
            definitions.insert(key, definition);
        }
    }

    definitions
}

/// Validates the selection and generates definitions in one step.
///
/// This is the "define floors" action: either the whole selection is
/// accepted, or nothing is generated.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the selection fails validation.
pub fn define_floors(
    selection: &FloorRangeSelection,
    blocks: &[Block],
    existing: &PendingDefinitions,
    persisted: &PersistedSet,
) -> Result<PendingDefinitions, CoreError> {
    validate_selection(selection, blocks)?;
    Ok(generate(
        selection,
        blocks,
        existing,
        persisted,
        selection.code_prefix_start_number,
    ))
}

fn build_definition(
    selection: &FloorRangeSelection,
    position: RangePosition,
    code_prefix_start_number: u32,
) -> Option<FloorDefinition> {
    let floor_code: String = derive_floor_code(
        selection.floor_type,
        &selection.code_prefix,
        position,
        code_prefix_start_number,
    );

    let units: FloorUnits = if selection.floor_type.uses_manual_units() {
        FloorUnits::MixedUnits(selection.mixed_units.clone())
    } else {
        FloorUnits::UnitsDefinition(UnitsTemplate {
            unit_type: selection.unit_type?,
            count: selection.units_count,
            start_number: selection.start_number,
            code_prefix: selection.code_prefix.clone(),
            naming: selection.unit_naming,
        })
    };

    Some(FloorDefinition {
        floor_code,
        arabic_name: FloorDefinition::arabic_name_for(position.floor_number),
        english_name: FloorDefinition::english_name_for(position.floor_number),
        floor_number: position.floor_number,
        floor_type: selection.floor_type,
        units,
    })
}
