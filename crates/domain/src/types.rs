// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Classification of a floor within a block.
///
/// The floor type decides both how the floor code is derived and whether the
/// floor's units come from a template or are entered one by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum FloorType {
    /// A typical residential floor.
    #[default]
    Regular,
    /// The ground floor.
    Ground,
    /// A mezzanine between two regular floors.
    Mezzanine,
    /// A parking level.
    Parking,
    /// A service or technical floor.
    Service,
    /// An office floor.
    Office,
    /// A commercial or retail floor.
    Commercial,
    /// A floor mixing several unit kinds.
    Mixed,
    /// A basement level.
    Basement,
    /// The roof level.
    Roof,
}

impl FloorType {
    /// Returns the canonical string representation of this floor type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Ground => "Ground",
            Self::Mezzanine => "Mezzanine",
            Self::Parking => "Parking",
            Self::Service => "Service",
            Self::Office => "Office",
            Self::Commercial => "Commercial",
            Self::Mixed => "Mixed",
            Self::Basement => "Basement",
            Self::Roof => "Roof",
        }
    }

    /// Returns whether units on this floor are entered manually, one code per
    /// unit, instead of being generated from a count and start number.
    #[must_use]
    pub const fn uses_manual_units(&self) -> bool {
        matches!(self, Self::Mixed | Self::Ground | Self::Service)
    }
}

impl FromStr for FloorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" => Ok(Self::Regular),
            "Ground" => Ok(Self::Ground),
            "Mezzanine" => Ok(Self::Mezzanine),
            "Parking" => Ok(Self::Parking),
            "Service" => Ok(Self::Service),
            "Office" => Ok(Self::Office),
            "Commercial" => Ok(Self::Commercial),
            "Mixed" => Ok(Self::Mixed),
            "Basement" => Ok(Self::Basement),
            "Roof" => Ok(Self::Roof),
            _ => Err(DomainError::InvalidFloorType(s.to_string())),
        }
    }
}

impl std::fmt::Display for FloorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a unit placed on a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// A residential apartment.
    Apartment,
    /// An office unit.
    Office,
    /// A shop or retail unit.
    Shop,
    /// A studio.
    Studio,
    /// A two-level unit.
    Duplex,
    /// A top-floor unit.
    Penthouse,
    /// A storage room.
    Storage,
}

impl UnitType {
    /// Returns the canonical string representation of this unit type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Office => "office",
            Self::Shop => "shop",
            Self::Studio => "studio",
            Self::Duplex => "duplex",
            Self::Penthouse => "penthouse",
            Self::Storage => "storage",
        }
    }
}

impl FromStr for UnitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apartment" => Ok(Self::Apartment),
            "office" => Ok(Self::Office),
            "shop" => Ok(Self::Shop),
            "studio" => Ok(Self::Studio),
            "duplex" => Ok(Self::Duplex),
            "penthouse" => Ok(Self::Penthouse),
            "storage" => Ok(Self::Storage),
            _ => Err(DomainError::InvalidUnitType(s.to_string())),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sales status of a unit as known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitStatus {
    /// Open for sale or rent. Every generated unit starts here.
    #[default]
    Available,
    /// Held for a prospective buyer.
    Reserved,
    /// Sold.
    Sold,
}

/// Name of a block within a tower.
///
/// Block names are the join key between the form selection, the definition
/// keys, and the block ids known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockName(String);

impl BlockName {
    /// Creates a new `BlockName`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Returns the block name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A block of a tower, with the floor count established by earlier wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// The backend identifier of the block.
    pub id: i64,
    /// The block name.
    pub name: BlockName,
    /// The total number of floors in the block.
    pub floor_count: u32,
}

impl Block {
    /// Creates a new `Block`.
    #[must_use]
    pub fn new(id: i64, name: &str, floor_count: u32) -> Self {
        Self {
            id,
            name: BlockName::new(name),
            floor_count,
        }
    }
}

/// Identifies one floor of one block.
///
/// The textual form `"<block>-floor-<n>"` is used both as a map key and as an
/// idempotency token for floors that were already saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorDefinitionKey {
    block: BlockName,
    floor_number: u32,
}

const KEY_SEPARATOR: &str = "-floor-";

impl FloorDefinitionKey {
    /// Creates a new key for the given block and floor number.
    #[must_use]
    pub const fn new(block: BlockName, floor_number: u32) -> Self {
        Self {
            block,
            floor_number,
        }
    }

    /// Returns the block this key belongs to.
    #[must_use]
    pub const fn block(&self) -> &BlockName {
        &self.block
    }

    /// Returns the absolute floor number.
    #[must_use]
    pub const fn floor_number(&self) -> u32 {
        self.floor_number
    }
}

impl std::fmt::Display for FloorDefinitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.block, self.floor_number)
    }
}

impl FromStr for FloorDefinitionKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Block names may themselves contain the separator, the floor number never does.
        let (block, number) = s
            .rsplit_once(KEY_SEPARATOR)
            .ok_or_else(|| DomainError::InvalidDefinitionKey(s.to_string()))?;
        if block.is_empty() {
            return Err(DomainError::InvalidDefinitionKey(s.to_string()));
        }
        let floor_number: u32 = number
            .parse()
            .map_err(|_| DomainError::InvalidDefinitionKey(s.to_string()))?;
        Ok(Self::new(BlockName::new(block), floor_number))
    }
}

impl Serialize for FloorDefinitionKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FloorDefinitionKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Which parts make up a generated unit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitNamingOptions {
    /// Prefix the code with the tower name, when the tower name is known.
    pub include_tower_name: bool,
    /// Include the floor code.
    pub include_floor_code: bool,
    /// Include the zero-padded unit number.
    pub include_unit_number: bool,
}

impl Default for UnitNamingOptions {
    fn default() -> Self {
        Self {
            include_tower_name: false,
            include_floor_code: true,
            include_unit_number: true,
        }
    }
}

/// Template used to generate the units of a regular floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitsTemplate {
    /// The kind of every generated unit.
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// How many units to generate.
    pub count: u32,
    /// The number given to the first unit.
    pub start_number: u32,
    /// The code prefix chosen in the form.
    pub code_prefix: String,
    /// Preview naming flags.
    #[serde(flatten)]
    pub naming: UnitNamingOptions,
}

/// A manually entered unit on a mixed, ground or service floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedUnit {
    /// The kind of unit.
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// The unit code, entered verbatim by the user.
    pub code: String,
}

impl MixedUnit {
    /// Creates a new `MixedUnit`.
    #[must_use]
    pub fn new(unit_type: UnitType, code: &str) -> Self {
        Self {
            unit_type,
            code: code.to_string(),
        }
    }

    /// Returns whether the code is empty once surrounding whitespace is removed.
    #[must_use]
    pub fn has_blank_code(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// The units of a floor: either templated or entered one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FloorUnits {
    /// Units generated from a template.
    UnitsDefinition(UnitsTemplate),
    /// Units entered manually.
    MixedUnits(Vec<MixedUnit>),
}

/// Generated metadata for one floor of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDefinition {
    /// The derived floor code.
    pub floor_code: String,
    /// Arabic display name.
    pub arabic_name: String,
    /// English display name.
    pub english_name: String,
    /// The absolute floor number.
    pub floor_number: u32,
    /// The floor type.
    pub floor_type: FloorType,
    /// The floor's units.
    #[serde(flatten)]
    pub units: FloorUnits,
}

impl FloorDefinition {
    /// Returns the Arabic display name for a floor number.
    #[must_use]
    pub fn arabic_name_for(floor_number: u32) -> String {
        format!("الطابق {floor_number}")
    }

    /// Returns the English display name for a floor number.
    #[must_use]
    pub fn english_name_for(floor_number: u32) -> String {
        format!("Floor {floor_number}")
    }

    /// Returns the manually entered units, if this floor uses them.
    #[must_use]
    pub fn mixed_units(&self) -> Option<&[MixedUnit]> {
        match &self.units {
            FloorUnits::MixedUnits(units) => Some(units),
            FloorUnits::UnitsDefinition(_) => None,
        }
    }

    /// Returns the number of units this floor will hold.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        match &self.units {
            FloorUnits::UnitsDefinition(template) => template.count as usize,
            FloorUnits::MixedUnits(units) => units.len(),
        }
    }
}

/// Definitions generated in memory but not yet saved, keyed by floor.
pub type PendingDefinitions = BTreeMap<FloorDefinitionKey, FloorDefinition>;

/// The user's choices in the floor definition form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FloorRangeSelection {
    /// First floor of the range, inclusive.
    pub from: u32,
    /// Last floor of the range, inclusive.
    pub to: u32,
    /// Blocks the range applies to.
    pub blocks: BTreeSet<BlockName>,
    /// Floor type given to every floor in the range.
    pub floor_type: FloorType,
    /// Floor code prefix.
    pub code_prefix: String,
    /// Unit type for templated floors.
    pub unit_type: Option<UnitType>,
    /// Units per templated floor.
    pub units_count: u32,
    /// First unit number on a templated floor.
    pub start_number: u32,
    /// Manually entered units for mixed, ground and service floors.
    pub mixed_units: Vec<MixedUnit>,
    /// Preview naming flags for templated units.
    pub unit_naming: UnitNamingOptions,
    /// Base number appended to the prefix for non-regular, non-ground floors.
    pub code_prefix_start_number: u32,
}

impl Default for FloorRangeSelection {
    fn default() -> Self {
        Self {
            from: 1,
            to: 1,
            blocks: BTreeSet::new(),
            floor_type: FloorType::Regular,
            code_prefix: String::new(),
            unit_type: None,
            units_count: 4,
            start_number: 1,
            mixed_units: Vec::new(),
            unit_naming: UnitNamingOptions::default(),
            code_prefix_start_number: 1,
        }
    }
}

impl FloorRangeSelection {
    /// Resets the range and manual unit fields after a successful save.
    ///
    /// Block, type, prefix and template choices are kept so the next range can
    /// be defined with the same settings.
    pub fn reset_range(&mut self) {
        self.from = 1;
        self.to = 1;
        self.mixed_units.clear();
    }
}
