// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::service::ServiceError;
use towerdef::CoreError;
use towerdef_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant is meant to end up as a user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The backend service failed. Nothing was recorded locally.
    Service {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Service { message } => write!(f, "Service error: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::NoBlocksSelected => ApiError::InvalidInput {
            field: String::from("blocks"),
            message: err.to_string(),
        },
        DomainError::FloorRangeStartsBelowFirstFloor | DomainError::InvalidFloorRange { .. } => {
            ApiError::InvalidInput {
                field: String::from("from"),
                message: err.to_string(),
            }
        }
        DomainError::UnitTypeRequired => ApiError::InvalidInput {
            field: String::from("unit_type"),
            message: err.to_string(),
        },
        DomainError::BlockNotFound(block) => ApiError::ResourceNotFound {
            resource_type: String::from("Block"),
            message: format!("Block '{block}' is not part of this tower"),
        },
        DomainError::FloorRangeExceedsBlocks { .. } => ApiError::DomainRuleViolation {
            rule: String::from("floor_range_within_blocks"),
            message: err.to_string(),
        },
        DomainError::MissingUnitCodes { .. } => ApiError::DomainRuleViolation {
            rule: String::from("select_units"),
            message: err.to_string(),
        },
        DomainError::InvalidDefinitionKey(key) => ApiError::Internal {
            message: format!("Malformed floor definition key '{key}'"),
        },
        DomainError::InvalidFloorType(msg) => ApiError::InvalidInput {
            field: String::from("floor_type"),
            message: msg,
        },
        DomainError::InvalidUnitType(msg) => ApiError::InvalidInput {
            field: String::from("unit_type"),
            message: msg,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
