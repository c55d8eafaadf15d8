// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contract with the backend that stores floors and units.

use crate::request_response::{CreateFloorsResponse, FloorDto, UnitDto};
use std::future::Future;

/// Failures reported by a [`FloorService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Request(String),
    /// The backend answered with an error.
    #[error("backend rejected the request ({status}): {message}")]
    Rejected {
        /// Status code returned by the backend.
        status: u16,
        /// Message returned by the backend.
        message: String,
    },
    /// The backend answered with a body that does not match the schema.
    #[error("unexpected response body: {0}")]
    InvalidResponse(String),
}

/// Bulk creation endpoints of the backend.
///
/// Partial success is server-defined; any error aborts the whole save.
pub trait FloorService {
    /// Creates floors in bulk and returns their server-assigned identifiers.
    fn create_multiple_floors(
        &self,
        floors: &[FloorDto],
    ) -> impl Future<Output = Result<CreateFloorsResponse, ServiceError>> + Send;

    /// Creates units in bulk.
    fn create_multiple_units(
        &self,
        units: &[UnitDto],
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Parses a create-floors response body.
///
/// # Errors
///
/// Returns `ServiceError::InvalidResponse` if the body matches neither
/// accepted row shape.
pub fn parse_create_floors_response(body: &str) -> Result<CreateFloorsResponse, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}
