// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Saving pending floor definitions to the backend.

use crate::error::{ApiError, translate_domain_error};
use crate::hooks::WizardHooks;
use crate::request_response::{
    CreateFloorsResponse, FloorDto, ResolvedFloor, SaveReport, SubmissionPayload,
    UNIT_NUMBER_PATTERN, UNRESOLVED_BLOCK_FLOOR_ID, UnitDto,
};
use crate::service::FloorService;
use towerdef::{DefinitionSession, SaveProgress};
use towerdef_domain::{
    Block, FloorDefinition, FloorDefinitionKey, FloorUnits, PendingDefinitions, UnitStatus,
    UnitType, pad_unit_number, validate_manual_unit_codes,
};
use tracing::{debug, error, info, warn};

/// Builds the floor and unit rows for a save.
///
/// Manual floors produce one unit per entered unit, numbered with the entered
/// code. Templated floors produce `count` units numbered with the padded
/// sequence number only; the tower name and floor code shown in the preview
/// are not part of the persisted number. Definitions whose block is unknown
/// are skipped.
///
/// # Arguments
///
/// * `definitions` - The pending definitions
/// * `blocks` - The tower's blocks, used to resolve block ids
/// * `tower_id` - The tower identifier
///
/// # Errors
///
/// Returns an error if a manual floor has a unit without a code. No rows are
/// built in that case.
pub fn build_submission_payload(
    definitions: &PendingDefinitions,
    blocks: &[Block],
    tower_id: i64,
) -> Result<SubmissionPayload, ApiError> {
    validate_manual_unit_codes(definitions).map_err(translate_domain_error)?;

    let mut payload: SubmissionPayload = SubmissionPayload::default();
    for (key, definition) in definitions {
        let Some(block) = blocks.iter().find(|b| &b.name == key.block()) else {
            warn!(key = %key, "Skipping definition for unknown block");
            continue;
        };

        let units: Vec<UnitDto> = unit_rows(definition, block.id, tower_id, key.floor_number());
        payload.floors.push(floor_row(
            definition,
            block.id,
            tower_id,
            key.floor_number(),
            units.len(),
        ));
        payload.units.extend(units);
        payload.keys.push(key.clone());
    }

    Ok(payload)
}

fn floor_row(
    definition: &FloorDefinition,
    block_id: i64,
    tower_id: i64,
    floor_number: u32,
    units_count: usize,
) -> FloorDto {
    FloorDto {
        tower_id,
        block_id,
        floor_number,
        floor_code: definition.floor_code.clone(),
        arabic_name: definition.arabic_name.clone(),
        english_name: definition.english_name.clone(),
        floor_type: definition.floor_type,
        units_count: u32::try_from(units_count).unwrap_or(u32::MAX),
        unit_number_pattern: String::from(UNIT_NUMBER_PATTERN),
        has_shared_facilities: false,
        elevators_count: 0,
        staircases_count: 1,
        has_emergency_exit: false,
        is_active: true,
    }
}

fn unit_rows(
    definition: &FloorDefinition,
    block_id: i64,
    tower_id: i64,
    floor_number: u32,
) -> Vec<UnitDto> {
    let unit = |unit_number: String, unit_type: UnitType| UnitDto {
        block_floor_id: UNRESOLVED_BLOCK_FLOOR_ID,
        block_id,
        tower_id,
        floor_number,
        unit_number,
        unit_type,
        status: UnitStatus::Available,
        is_active: true,
    };

    match &definition.units {
        FloorUnits::MixedUnits(entries) => entries
            .iter()
            .map(|entry| unit(entry.code.clone(), entry.unit_type))
            .collect(),
        FloorUnits::UnitsDefinition(template) => (0..template.count)
            .map(|i| {
                unit(
                    pad_unit_number(template.start_number.saturating_add(i)),
                    template.unit_type,
                )
            })
            .collect(),
    }
}

/// Resolves the rows of a create-floors response.
///
/// Response rows are matched to request rows by position, which supplies the
/// block id for legacy rows that do not echo it. Rows that cannot be resolved
/// are dropped.
#[must_use]
pub fn resolve_created_floors(
    response: &CreateFloorsResponse,
    submitted: &[FloorDto],
) -> Vec<ResolvedFloor> {
    response
        .block_floors
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let request_block_id: Option<i64> = submitted.get(index).map(|f| f.block_id);
            let resolved: Option<ResolvedFloor> = row.resolve(request_block_id);
            if resolved.is_none() {
                warn!(index, ?row, "Created floor could not be matched to a block");
            }
            resolved
        })
        .collect()
}

/// Patches the floor id of every unit whose block and floor number match a
/// created floor.
///
/// Returns how many units were patched.
pub fn reconcile_unit_floor_ids(units: &mut [UnitDto], floors: &[ResolvedFloor]) -> usize {
    let mut patched: usize = 0;
    for floor in floors {
        for unit in units
            .iter_mut()
            .filter(|u| u.block_id == floor.block_id && u.floor_number == floor.floor_number)
        {
            unit.block_floor_id = floor.block_floor_id;
            patched += 1;
        }
        debug!(
            block_id = floor.block_id,
            floor_number = floor.floor_number,
            block_floor_id = floor.block_floor_id,
            "Resolved created floor"
        );
    }
    patched
}

/// Saves every pending definition of the session.
///
/// Floors are created first; the units are then patched with the returned
/// floor ids and created in a second call, skipped when there are no units.
/// On success the saved keys join the session's persisted set, the pending
/// map is cleared, and the hooks are notified. The completion hook fires
/// once, on the save that brings the persisted count to the tower's total.
///
/// # Errors
///
/// Returns an error if:
/// - There is nothing pending
/// - A manual floor has a unit without a code (no service call is made)
/// - Either service call fails
///
/// On error the session is left exactly as it was, so the save can be retried.
pub async fn save_definitions<S, H>(
    session: &mut DefinitionSession,
    service: &S,
    hooks: &mut H,
) -> Result<SaveReport, ApiError>
where
    S: FloorService + Sync,
    H: WizardHooks + Send,
{
    if session.pending().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("definitions"),
            message: String::from("There are no floor definitions to save"),
        });
    }

    let tower_id: i64 = session.tower().tower_id;
    let mut payload: SubmissionPayload =
        build_submission_payload(session.pending(), &session.tower().blocks, tower_id)
            .inspect_err(|e| warn!(tower_id, error = %e, "Save blocked by validation"))?;

    info!(
        tower_id,
        floors = payload.floors.len(),
        units = payload.units.len(),
        "Creating floors"
    );
    let response: CreateFloorsResponse = service
        .create_multiple_floors(&payload.floors)
        .await
        .inspect_err(|e| error!(tower_id, error = %e, "Floor creation failed"))?;

    let resolved: Vec<ResolvedFloor> = resolve_created_floors(&response, &payload.floors);
    let patched: usize = reconcile_unit_floor_ids(&mut payload.units, &resolved);
    if patched < payload.units.len() {
        warn!(
            tower_id,
            unresolved = payload.units.len() - patched,
            "Some units have no created floor"
        );
    }

    if !payload.units.is_empty() {
        service
            .create_multiple_units(&payload.units)
            .await
            .inspect_err(|e| error!(tower_id, error = %e, "Unit creation failed"))?;
    }

    let keys: Vec<FloorDefinitionKey> = std::mem::take(&mut payload.keys);
    let progress: SaveProgress = session.record_saved(keys);
    hooks.definitions_changed(session.pending());
    if progress.completed_now {
        info!(tower_id, floors = progress.expected, "All tower floors saved");
        hooks.all_floors_persisted();
    }

    info!(
        tower_id,
        persisted = progress.persisted,
        expected = progress.expected,
        "Saved floor definitions"
    );

    Ok(SaveReport {
        floors_created: payload.floors.len(),
        units_created: payload.units.len(),
        persisted: progress.persisted,
        expected: progress.expected,
        completed: progress.completed_now,
    })
}
