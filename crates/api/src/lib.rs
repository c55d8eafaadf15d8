// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod hooks;
mod request_response;
mod service;
mod submit;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use towerdef::{DefineOutcome, DefinitionSession};
use towerdef_domain::BlockName;
use tracing::{info, warn};

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use hooks::{NoopHooks, WizardHooks};
pub use request_response::{
    CreateFloorsResponse, CreatedFloor, FloorDto, FloorId, ResolvedFloor, SaveReport,
    SubmissionPayload, UNIT_NUMBER_PATTERN, UNRESOLVED_BLOCK_FLOOR_ID, UnitDto,
};
pub use service::{FloorService, ServiceError, parse_create_floors_response};
pub use submit::{
    build_submission_payload, reconcile_unit_floor_ids, resolve_created_floors, save_definitions,
};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Runs the "define floors" action on a session.
///
/// The current selection is validated and its definitions are added to the
/// pending map. The hooks are told about the new pending map.
///
/// # Errors
///
/// Returns an error if the selection fails validation. Nothing is generated
/// and the hooks are not called in that case.
pub fn define_floors<H: WizardHooks>(
    session: &mut DefinitionSession,
    hooks: &mut H,
) -> ApiResult<DefineOutcome> {
    let tower_id: i64 = session.tower().tower_id;
    let outcome: DefineOutcome = session.define().map_err(|e| {
        warn!(tower_id, error = %e, "Floor definition rejected");
        translate_core_error(e)
    })?;

    info!(
        tower_id,
        added = outcome.added,
        pending = outcome.pending,
        "Defined floors"
    );
    hooks.definitions_changed(session.pending());
    Ok(outcome)
}

/// Drops every pending definition of a session and notifies the hooks.
pub fn clear_preview<H: WizardHooks>(session: &mut DefinitionSession, hooks: &mut H) {
    session.clear_preview();
    info!(tower_id = session.tower().tower_id, "Cleared floor preview");
    hooks.definitions_changed(session.pending());
}

/// Applies a floor pick made on the building diagram.
///
/// # Errors
///
/// Returns an error if a picked block is not part of the session's tower.
pub fn select_floors(
    session: &mut DefinitionSession,
    from: u32,
    to: u32,
    blocks: BTreeSet<BlockName>,
) -> ApiResult<()> {
    if let Some(unknown) = blocks.iter().find(|b| session.tower().block(b).is_none()) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Block"),
            message: format!("Block '{unknown}' is not part of this tower"),
        });
    }
    session.select_floors(from, to, blocks);
    Ok(())
}
