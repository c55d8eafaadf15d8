// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory stand-in for the floor and unit backend.
//!
//! Floors and units are kept in process memory and receive sequential ids.
//! Create-floors responses are rendered to JSON and parsed back, so the same
//! row shapes a remote backend would send flow through the reconciliation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use towerdef_api::{
    CreateFloorsResponse, FloorDto, FloorService, ServiceError, UnitDto,
    parse_create_floors_response,
};
use tracing::{debug, info};

/// Row shape used when answering a create-floors call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResponseShape {
    /// `{id, towerBlockId, floorNumber}`
    #[default]
    Canonical,
    /// `{blockFloorId, FloorNumber}` without the block id.
    Legacy,
}

/// A floor stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFloor {
    /// Assigned floor id.
    pub id: i64,
    /// The submitted row.
    pub floor: FloorDto,
}

/// A unit stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUnit {
    /// Assigned unit id.
    pub id: i64,
    /// The submitted row.
    pub unit: UnitDto,
}

#[derive(Debug, Default)]
struct Store {
    floors: Vec<StoredFloor>,
    units: Vec<StoredUnit>,
    next_floor_id: i64,
    next_unit_id: i64,
}

/// Shared in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFloorService {
    store: Arc<Mutex<Store>>,
    shape: ResponseShape,
}

impl InMemoryFloorService {
    /// Creates an empty backend answering in the given row shape.
    #[must_use]
    pub fn new(shape: ResponseShape) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            shape,
        }
    }

    /// Returns every stored floor.
    pub async fn floors(&self) -> Vec<StoredFloor> {
        self.store.lock().await.floors.clone()
    }

    /// Returns every stored unit.
    pub async fn units(&self) -> Vec<StoredUnit> {
        self.store.lock().await.units.clone()
    }

    fn render_row(&self, id: i64, floor: &FloorDto) -> Value {
        match self.shape {
            ResponseShape::Canonical => json!({
                "id": id,
                "towerBlockId": floor.block_id,
                "floorNumber": floor.floor_number,
            }),
            ResponseShape::Legacy => json!({
                "blockFloorId": id,
                "FloorNumber": floor.floor_number,
            }),
        }
    }
}

impl FloorService for InMemoryFloorService {
    async fn create_multiple_floors(
        &self,
        floors: &[FloorDto],
    ) -> Result<CreateFloorsResponse, ServiceError> {
        let mut store = self.store.lock().await;
        let mut rows: Vec<Value> = Vec::with_capacity(floors.len());
        for floor in floors {
            store.next_floor_id += 1;
            let id: i64 = store.next_floor_id;
            rows.push(self.render_row(id, floor));
            store.floors.push(StoredFloor {
                id,
                floor: floor.clone(),
            });
        }
        drop(store);

        info!(count = floors.len(), shape = ?self.shape, "Backend created floors");
        let body: String = json!({ "blockFloors": rows }).to_string();
        debug!(%body, "Backend create-floors response");
        parse_create_floors_response(&body)
    }

    async fn create_multiple_units(&self, units: &[UnitDto]) -> Result<(), ServiceError> {
        let mut store = self.store.lock().await;
        let orphan: Option<&UnitDto> = units.iter().find(|u| {
            u.block_floor_id != 0 && !store.floors.iter().any(|f| f.id == u.block_floor_id)
        });
        if let Some(orphan) = orphan {
            return Err(ServiceError::Rejected {
                status: 422,
                message: format!("Unknown block floor id {}", orphan.block_floor_id),
            });
        }

        for unit in units {
            store.next_unit_id += 1;
            let id: i64 = store.next_unit_id;
            store.units.push(StoredUnit {
                id,
                unit: unit.clone(),
            });
        }
        drop(store);

        info!(count = units.len(), "Backend created units");
        Ok(())
    }
}
