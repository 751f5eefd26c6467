use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{AttributeKind, EntityId, UnitSystem};

/// Square kilometers in one square mile.
pub const SQ_KM_PER_SQ_MILE: f64 = 2.589988;

/// Whether an entity is a sovereign country or a US state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "US state")]
    UsState,
}

impl EntityKind {
    /// The unit the area of this kind of entity is recorded in.
    #[must_use]
    pub fn native_area_unit(self) -> &'static str {
        match self {
            EntityKind::Country => "square kilometers",
            EntityKind::UsState => "square miles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Country => f.write_str("country"),
            EntityKind::UsState => f.write_str("US state"),
        }
    }
}

/// Land area in the unit it was recorded in.
///
/// Conversion happens when reading, the stored value is never rewritten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Area {
    SquareKilometers(f64),
    SquareMiles(f64),
}

impl Area {
    /// `value` in the unit `kind` records its area in.
    #[must_use]
    pub fn recorded(kind: EntityKind, value: f64) -> Self {
        match kind {
            EntityKind::Country => Area::SquareKilometers(value),
            EntityKind::UsState => Area::SquareMiles(value),
        }
    }

    /// Value in the unit `units` displays area in.
    #[must_use]
    pub fn in_units(self, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Imperial => self.square_miles(),
            UnitSystem::Metric => self.square_kilometers(),
        }
    }

    #[must_use]
    pub fn square_miles(self) -> f64 {
        match self {
            Area::SquareKilometers(km) => km / SQ_KM_PER_SQ_MILE,
            Area::SquareMiles(mi) => mi,
        }
    }

    #[must_use]
    pub fn square_kilometers(self) -> f64 {
        match self {
            Area::SquareKilometers(km) => km,
            Area::SquareMiles(mi) => mi * SQ_KM_PER_SQ_MILE,
        }
    }

    #[must_use]
    pub fn native_value(self) -> f64 {
        match self {
            Area::SquareKilometers(v) | Area::SquareMiles(v) => v,
        }
    }

    fn matches(self, kind: EntityKind) -> bool {
        matches!(
            (self, kind),
            (Area::SquareKilometers(_), EntityKind::Country)
                | (Area::SquareMiles(_), EntityKind::UsState)
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EntityError {
    #[error("entity name cannot be empty")]
    EmptyName,

    #[error("flag code cannot be empty")]
    EmptyFlagCode,

    #[error("{field} must be a finite, non-negative number")]
    InvalidNumber { field: &'static str },

    #[error("area of a {kind} must be recorded in {}", .kind.native_area_unit())]
    AreaUnitMismatch { kind: EntityKind },
}

/// A country or US state with the attributes the quiz compares.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationEntity {
    id: EntityId,
    kind: EntityKind,
    name: String,
    flag_code: String,
    population: u64,
    gdp: f64,
    area: Area,
}

impl LocationEntity {
    /// Build a validated entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityError` if the name or flag code is blank, GDP or area is negative
    /// or non-finite, or the area is not recorded in the native unit of `kind`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        name: impl Into<String>,
        flag_code: impl Into<String>,
        population: u64,
        gdp: f64,
        area: Area,
    ) -> Result<Self, EntityError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(EntityError::EmptyName);
        }
        let flag_code = flag_code.into().trim().to_string();
        if flag_code.is_empty() {
            return Err(EntityError::EmptyFlagCode);
        }
        if !is_non_negative(gdp) {
            return Err(EntityError::InvalidNumber { field: "gdp" });
        }
        if !is_non_negative(area.native_value()) {
            return Err(EntityError::InvalidNumber { field: "area" });
        }
        if !area.matches(kind) {
            return Err(EntityError::AreaUnitMismatch { kind });
        }

        Ok(Self {
            id,
            kind,
            name,
            flag_code,
            population,
            gdp,
            area,
        })
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Bare name as recorded, e.g. "Texas".
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown to players. US states carry a "(US state)" marker.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.kind {
            EntityKind::Country => self.name.clone(),
            EntityKind::UsState => format!("{} (US state)", self.name),
        }
    }

    #[must_use]
    pub fn flag_code(&self) -> &str {
        &self.flag_code
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Nominal GDP for 2022 in US dollars.
    #[must_use]
    pub fn gdp(&self) -> f64 {
        self.gdp
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Raw value of `attribute` in its recorded unit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn native_value(&self, attribute: AttributeKind) -> f64 {
        match attribute {
            AttributeKind::Population => self.population as f64,
            AttributeKind::Gdp => self.gdp,
            AttributeKind::Area => self.area.native_value(),
        }
    }

    /// Value of `attribute` on a scale shared by every entity (area in square miles).
    #[must_use]
    pub fn comparable_value(&self, attribute: AttributeKind) -> f64 {
        match attribute {
            AttributeKind::Area => self.area.square_miles(),
            other => self.native_value(other),
        }
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
