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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod code;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use code::{
    RangePosition, build_unit_code, derive_floor_code, display_number, is_numeric_prefix,
    pad_unit_number,
};
pub use error::{BlockOverflow, DomainError};
pub use types::{
    Block, BlockName, FloorDefinition, FloorDefinitionKey, FloorRangeSelection, FloorType,
    FloorUnits, MixedUnit, PendingDefinitions, UnitNamingOptions, UnitStatus, UnitType,
    UnitsTemplate,
};
pub use validation::{validate_manual_unit_codes, validate_selection};
