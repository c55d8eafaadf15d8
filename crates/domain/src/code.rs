// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Floor code and unit code derivation.

use crate::types::{FloorType, UnitNamingOptions, UnitType};

/// Where a floor sits, both absolutely and within the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePosition {
    /// The absolute floor number.
    pub floor_number: u32,
    /// The 1-based position of the floor within the requested range.
    pub sequence: u32,
}

impl RangePosition {
    /// Computes the position of `floor_number` in a range starting at `range_start`.
    ///
    /// `floor_number` must not be below `range_start`.
    #[must_use]
    pub const fn within(range_start: u32, floor_number: u32) -> Self {
        Self {
            floor_number,
            sequence: floor_number.saturating_sub(range_start) + 1,
        }
    }
}

/// Returns whether the prefix is non-empty and made only of ASCII digits.
#[must_use]
pub fn is_numeric_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Derives the floor code for one floor.
///
/// Rules, first match wins:
///
/// | floor type | prefix | code |
/// |---|---|---|
/// | `Regular` | all digits | `prefix + sequence - 1` as a number |
/// | `Regular` | anything else | `prefix` followed by the absolute floor number |
/// | `Ground` | any | `prefix` |
/// | others | any | `prefix` followed by `start_number + sequence - 1` |
///
/// The second rule uses the absolute floor number while every other rule
/// uses the position within the range.
///
/// # Arguments
///
/// * `floor_type` - The floor type chosen in the form
/// * `prefix` - The floor code prefix
/// * `position` - The floor's absolute number and range position
/// * `code_prefix_start_number` - Base number for non-regular, non-ground floors
#[must_use]
pub fn derive_floor_code(
    floor_type: FloorType,
    prefix: &str,
    position: RangePosition,
    code_prefix_start_number: u32,
) -> String {
    let offset: u64 = u64::from(position.sequence) - 1;
    match floor_type {
        FloorType::Regular => {
            let numeric: Option<u64> = if is_numeric_prefix(prefix) {
                prefix
                    .parse::<u64>()
                    .ok()
                    .and_then(|base| base.checked_add(offset))
            } else {
                None
            };
            numeric.map_or_else(
                || format!("{prefix}{}", position.floor_number),
                |code| code.to_string(),
            )
        }
        FloorType::Ground => prefix.to_string(),
        _ => format!("{prefix}{}", u64::from(code_prefix_start_number) + offset),
    }
}

/// Zero-pads a unit number to at least two digits.
#[must_use]
pub fn pad_unit_number(unit_number: u32) -> String {
    format!("{unit_number:02}")
}

/// Builds the display code of a generated unit.
///
/// Enabled parts are joined with `-` in the order tower name, floor code,
/// unit number. The tower name is skipped when it is not known.
#[must_use]
pub fn build_unit_code(
    tower_name: Option<&str>,
    floor_code: &str,
    unit_number: u32,
    naming: UnitNamingOptions,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    let tower: Option<&str> = tower_name.filter(|n| naming.include_tower_name && !n.is_empty());
    if let Some(name) = tower {
        parts.push(name.to_string());
    }
    if naming.include_floor_code {
        parts.push(floor_code.to_string());
    }
    if naming.include_unit_number {
        parts.push(pad_unit_number(unit_number));
    }
    parts.join("-")
}

/// Returns the number shown on a generated unit in the building preview.
///
/// Apartments show their padded number alone; every other type shows the
/// full unit code.
#[must_use]
pub fn display_number(unit_type: UnitType, unit_number: u32, unit_code: &str) -> String {
    match unit_type {
        UnitType::Apartment => pad_unit_number(unit_number),
        _ => unit_code.to_string(),
    }
}
