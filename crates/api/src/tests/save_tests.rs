// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use towerdef::{DefineOutcome, DefinitionSession};
use towerdef_domain::{FloorRangeSelection, PendingDefinitions};

use crate::tests::helpers::{
    FakeFloorService, RecordingHooks, RowShape, create_mixed_selection, create_regular_selection,
    create_test_session,
};
use crate::{ApiError, NoopHooks, SaveReport, UnitDto, save_definitions};

fn define(session: &mut DefinitionSession, selection: FloorRangeSelection) {
    session.set_selection(selection);
    session.define().unwrap();
}

#[tokio::test]
async fn test_save_creates_floors_then_units() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["A", "B"], 1, 1));
    let service: FakeFloorService = FakeFloorService::default();
    let mut hooks: RecordingHooks = RecordingHooks::default();

    let report: SaveReport = save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap();

    assert_eq!(report.floors_created, 2);
    assert_eq!(report.units_created, 4);
    assert_eq!(report.persisted, 2);
    assert_eq!(report.expected, 5);
    assert!(!report.completed);
    assert_eq!(service.floor_call_count(), 1);
    assert_eq!(service.unit_call_count(), 1);

    let units: Vec<UnitDto> = service.last_units();
    assert!(
        units
            .iter()
            .filter(|u| u.block_id == 11)
            .all(|u| u.block_floor_id == 100)
    );
    assert!(
        units
            .iter()
            .filter(|u| u.block_id == 12)
            .all(|u| u.block_floor_id == 101)
    );
}

#[tokio::test]
async fn test_save_resets_session_state() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["A"], 2, 3));
    let service: FakeFloorService = FakeFloorService::default();
    let mut hooks: RecordingHooks = RecordingHooks::default();

    save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap();

    assert!(session.pending().is_empty());
    assert_eq!(session.persisted().len(), 2);
    assert_eq!(session.selection().from, 1);
    assert_eq!(session.selection().to, 1);
    assert_eq!(session.selection().code_prefix, "F");
    assert_eq!(hooks.changes, vec![0]);
}

#[tokio::test]
async fn test_save_reconciles_legacy_rows_by_position() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["A", "B"], 2, 2));
    let service: FakeFloorService = FakeFloorService {
        shape: RowShape::LegacyWithoutBlock,
        ..FakeFloorService::default()
    };

    save_definitions(&mut session, &service, &mut NoopHooks)
        .await
        .unwrap();

    let units: Vec<UnitDto> = service.last_units();
    assert_eq!(units.len(), 4);
    assert!(units.iter().all(|u| u.block_floor_id != 0));
    assert!(
        units
            .iter()
            .filter(|u| u.block_id == 12)
            .all(|u| u.block_floor_id == 101)
    );
}

#[tokio::test]
async fn test_save_accepts_rows_with_id_but_no_block() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["A", "B"], 1, 1));
    let service: FakeFloorService = FakeFloorService {
        shape: RowShape::IdWithoutBlock,
        ..FakeFloorService::default()
    };

    let report: SaveReport = save_definitions(&mut session, &service, &mut NoopHooks)
        .await
        .unwrap();

    assert_eq!(report.floors_created, 2);
    assert_eq!(session.persisted().len(), 2);
    let units: Vec<UnitDto> = service.last_units();
    assert!(
        units
            .iter()
            .filter(|u| u.block_id == 11)
            .all(|u| u.block_floor_id == 100)
    );
    assert!(
        units
            .iter()
            .filter(|u| u.block_id == 12)
            .all(|u| u.block_floor_id == 101)
    );
}

#[tokio::test]
async fn test_blank_unit_code_makes_no_service_call() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_mixed_selection(&["A"], 1, 1, &["S-1", ""]));
    let service: FakeFloorService = FakeFloorService::default();
    let mut hooks: RecordingHooks = RecordingHooks::default();

    let err: ApiError = save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "select_units"
    ));
    assert_eq!(service.floor_call_count(), 0);
    assert_eq!(service.unit_call_count(), 0);
    assert_eq!(session.pending().len(), 1);
    assert!(hooks.changes.is_empty());
}

#[tokio::test]
async fn test_save_without_pending_is_rejected() {
    let mut session: DefinitionSession = create_test_session();
    let service: FakeFloorService = FakeFloorService::default();

    let err: ApiError = save_definitions(&mut session, &service, &mut NoopHooks)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "definitions"
    ));
    assert_eq!(service.floor_call_count(), 0);
}

#[tokio::test]
async fn test_floor_failure_leaves_session_untouched() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["A"], 1, 2));
    let before: PendingDefinitions = session.pending().clone();
    let service: FakeFloorService = FakeFloorService {
        fail_floors: true,
        ..FakeFloorService::default()
    };
    let mut hooks: RecordingHooks = RecordingHooks::default();

    let err: ApiError = save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Service { .. }));
    assert_eq!(session.pending(), &before);
    assert!(session.persisted().is_empty());
    assert_eq!(service.unit_call_count(), 0);
    assert!(hooks.changes.is_empty());
}

#[tokio::test]
async fn test_unit_failure_leaves_session_untouched() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_regular_selection(&["B"], 1, 2));
    let service: FakeFloorService = FakeFloorService {
        fail_units: true,
        ..FakeFloorService::default()
    };

    let err: ApiError = save_definitions(&mut session, &service, &mut NoopHooks)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Service { .. }));
    assert_eq!(session.pending().len(), 2);
    assert!(session.persisted().is_empty());
    assert_eq!(session.selection().to, 2);
}

#[tokio::test]
async fn test_units_call_skipped_when_no_units() {
    let mut session: DefinitionSession = create_test_session();
    define(&mut session, create_mixed_selection(&["A"], 1, 1, &[]));
    let service: FakeFloorService = FakeFloorService::default();

    let report: SaveReport = save_definitions(&mut session, &service, &mut NoopHooks)
        .await
        .unwrap();

    assert_eq!(report.floors_created, 1);
    assert_eq!(report.units_created, 0);
    assert_eq!(service.floor_call_count(), 1);
    assert_eq!(service.unit_call_count(), 0);
}

#[tokio::test]
async fn test_completion_fires_once_when_every_floor_is_saved() {
    let mut session: DefinitionSession = create_test_session();
    let service: FakeFloorService = FakeFloorService::default();
    let mut hooks: RecordingHooks = RecordingHooks::default();

    define(&mut session, create_regular_selection(&["A", "B"], 1, 2));
    let first: SaveReport = save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap();
    assert!(!first.completed);
    assert_eq!(hooks.completions, 0);

    define(&mut session, create_regular_selection(&["A"], 3, 3));
    let second: SaveReport = save_definitions(&mut session, &service, &mut hooks)
        .await
        .unwrap();
    assert!(second.completed);
    assert_eq!(second.persisted, 5);
    assert_eq!(hooks.completions, 1);
    assert!(session.is_complete());

    session.set_selection(create_regular_selection(&["A"], 1, 3));
    let outcome: DefineOutcome = session.define().unwrap();
    assert_eq!(outcome.added, 0);
}
