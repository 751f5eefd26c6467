//! The read-only location table the quiz draws its entities from.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Area, EntityError, EntityId, EntityKind, LocationEntity};

const BUILTIN_LOCATIONS: &str = include_str!("../data/locations.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("malformed location table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("location table is empty")]
    Empty,

    #[error("duplicate entity id {0}")]
    DuplicateId(EntityId),

    #[error("entity {id} is missing {field}")]
    MissingField { id: EntityId, field: &'static str },

    #[error("entity {id} is invalid: {source}")]
    InvalidEntity {
        id: EntityId,
        #[source]
        source: EntityError,
    },

    #[error("unknown entity id {0}")]
    UnknownEntity(EntityId),
}

/// One row of the authored JSON table.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    id: EntityId,
    #[serde(rename = "type")]
    kind: EntityKind,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    state_name: Option<String>,
    flag_code: String,
    population: u64,
    gdp_nominal_2022: f64,
    #[serde(default)]
    area_sq_km: Option<f64>,
    #[serde(default)]
    area_sq_miles: Option<f64>,
}

impl LocationRecord {
    fn into_entity(self) -> Result<LocationEntity, DatasetError> {
        let id = self.id;
        let (name, area) = match self.kind {
            EntityKind::Country => (
                self.country_name.ok_or(DatasetError::MissingField {
                    id,
                    field: "country_name",
                })?,
                Area::SquareKilometers(self.area_sq_km.ok_or(DatasetError::MissingField {
                    id,
                    field: "area_sq_km",
                })?),
            ),
            EntityKind::UsState => (
                self.state_name.ok_or(DatasetError::MissingField {
                    id,
                    field: "state_name",
                })?,
                Area::SquareMiles(self.area_sq_miles.ok_or(DatasetError::MissingField {
                    id,
                    field: "area_sq_miles",
                })?),
            ),
        };

        LocationEntity::new(
            id,
            self.kind,
            name,
            self.flag_code,
            self.population,
            self.gdp_nominal_2022,
            area,
        )
        .map_err(|source| DatasetError::InvalidEntity { id, source })
    }
}

/// Entities keyed by id, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct LocationDataset {
    entities: Vec<LocationEntity>,
    index: HashMap<EntityId, usize>,
}

impl LocationDataset {
    /// Load the table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the bundled table fails validation.
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_json(BUILTIN_LOCATIONS)
    }

    /// Parse a table of location records.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` for malformed JSON, and the validation errors of
    /// [`LocationDataset::from_entities`] otherwise.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<LocationRecord> = serde_json::from_str(json)?;
        let entities = records
            .into_iter()
            .map(LocationRecord::into_entity)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entities(entities)
    }

    /// # Errors
    ///
    /// Returns `DatasetError::Empty` for an empty list and `DatasetError::DuplicateId`
    /// when two entities share an id.
    pub fn from_entities(entities: Vec<LocationEntity>) -> Result<Self, DatasetError> {
        if entities.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (pos, entity) in entities.iter().enumerate() {
            if index.insert(entity.id(), pos).is_some() {
                return Err(DatasetError::DuplicateId(entity.id()));
            }
        }

        Ok(Self { entities, index })
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&LocationEntity> {
        self.index.get(&id).map(|&pos| &self.entities[pos])
    }

    /// # Errors
    ///
    /// Returns `DatasetError::UnknownEntity` if no entity has this id.
    pub fn entity(&self, id: EntityId) -> Result<&LocationEntity, DatasetError> {
        self.get(id).ok_or(DatasetError::UnknownEntity(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationEntity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeKind;

    #[test]
    fn builtin_table_loads() {
        let dataset = LocationDataset::builtin().unwrap();
        assert_eq!(dataset.len(), 37);

        let texas = dataset.entity(EntityId::new(27)).unwrap();
        assert_eq!(texas.kind(), EntityKind::UsState);
        assert_eq!(texas.display_name(), "Texas (US state)");
        assert_eq!(texas.area(), Area::SquareMiles(268_596.0));
    }

    #[test]
    fn unknown_id_is_reported() {
        let dataset = LocationDataset::builtin().unwrap();
        assert!(dataset.get(EntityId::new(999)).is_none());
        assert!(matches!(
            dataset.entity(EntityId::new(999)),
            Err(DatasetError::UnknownEntity(id)) if id == EntityId::new(999)
        ));
    }

    #[test]
    fn country_needs_square_kilometers() {
        let json = r#"[{ "id": 1, "type": "country", "country_name": "Atlantis",
            "flag_code": "at", "population": 10, "gdp_nominal_2022": 5, "area_sq_miles": 3 }]"#;
        let err = LocationDataset::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingField {
                field: "area_sq_km",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            { "id": 3, "type": "US state", "state_name": "Ohio", "flag_code": "us-oh",
              "population": 1, "gdp_nominal_2022": 1, "area_sq_miles": 1 },
            { "id": 3, "type": "US state", "state_name": "Iowa", "flag_code": "us-ia",
              "population": 1, "gdp_nominal_2022": 1, "area_sq_miles": 1 }
        ]"#;
        let err = LocationDataset::from_json(json).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId(id) if id == EntityId::new(3)));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            LocationDataset::from_json("[]"),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn stored_area_is_never_converted() {
        let dataset = LocationDataset::builtin().unwrap();
        let canada = dataset.entity(EntityId::new(10)).unwrap();
        assert_eq!(canada.native_value(AttributeKind::Area), 9_984_670.0);
        assert!(canada.comparable_value(AttributeKind::Area) < 9_984_670.0);
    }
}
