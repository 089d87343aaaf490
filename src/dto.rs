//! Transfer representations and their conversions.
//!
//! Three view shapes exist per resource: the read view returned to consumers,
//! the creation view accepted by POST, and the update view accepted by PUT
//! and patched by PATCH. Conversions are written out by hand so the field
//! correspondence stays visible: `name` and `description` map 1:1 in both
//! directions, `id` and `cityId` only ever flow entity-to-read-view.

use serde::{Deserialize, Serialize};

use crate::domain::{City, PointOfInterest};

/// Read view of a city including its points of interest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestResponse>,
}

/// Read view of a city without children. A separate shape rather than an
/// empty list, so the listing response doesn't carry a misleading field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Creation view: no identifiers, those are assigned by the store.
/// `name` is optional here so a missing field reaches validation and comes
/// back as a violation instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreation {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Update view: the mutable fields only. Also the base document that patch
/// operations are applied to, hence the `Serialize`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn city_to_response(city: &City) -> CityResponse {
    CityResponse {
        id: city.id,
        name: city.name.clone(),
        description: city.description.clone(),
        number_of_points_of_interest: city.points_of_interest.len(),
        points_of_interest: city
            .points_of_interest
            .iter()
            .map(point_of_interest_to_response)
            .collect(),
    }
}

pub fn city_to_summary(city: &City) -> CitySummary {
    CitySummary {
        id: city.id,
        name: city.name.clone(),
        description: city.description.clone(),
    }
}

pub fn point_of_interest_to_response(poi: &PointOfInterest) -> PointOfInterestResponse {
    PointOfInterestResponse {
        id: poi.id,
        name: poi.name.clone(),
        description: poi.description.clone(),
    }
}

/// Builds the entity a creation view describes. The id stays 0 until the
/// commit assigns a real one.
pub fn creation_to_point_of_interest(
    dto: &PointOfInterestForCreation,
    city_id: i32,
) -> PointOfInterest {
    PointOfInterest {
        id: 0,
        name: dto.name.clone().unwrap_or_default(),
        description: dto.description.clone(),
        city_id,
    }
}

pub fn point_of_interest_to_update(poi: &PointOfInterest) -> PointOfInterestForUpdate {
    PointOfInterestForUpdate {
        name: Some(poi.name.clone()),
        description: poi.description.clone(),
    }
}

/// Copies a validated update view back onto the live entity. Identifiers are
/// untouched; only the mutable fields move.
pub fn apply_update(update: &PointOfInterestForUpdate, poi: &mut PointOfInterest) {
    poi.name = update.name.clone().unwrap_or_default();
    poi.description = update.description.clone();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(id: i32, city_id: i32) -> PointOfInterest {
        PointOfInterest {
            id,
            name: "Central Park".to_string(),
            description: Some("The most visited urban park in the United States.".to_string()),
            city_id,
        }
    }

    #[test]
    fn test_city_with_unloaded_children_maps_to_empty_list() {
        let city = City {
            id: 1,
            name: "New York City".to_string(),
            description: Some("The one with that big park.".to_string()),
            points_of_interest: Vec::new(),
        };

        let response = city_to_response(&city);
        assert_eq!(response.number_of_points_of_interest, 0);
        assert!(response.points_of_interest.is_empty());
    }

    #[test]
    fn test_update_view_round_trip_preserves_fields() {
        let mut entity = poi(1, 1);
        let view = point_of_interest_to_update(&entity);
        assert_eq!(view.name.as_deref(), Some("Central Park"));

        let edited = PointOfInterestForUpdate {
            name: Some("Sheep Meadow".to_string()),
            description: None,
        };
        apply_update(&edited, &mut entity);

        assert_eq!(entity.name, "Sheep Meadow");
        assert_eq!(entity.description, None);
        // Identifiers never move through the update view.
        assert_eq!(entity.id, 1);
        assert_eq!(entity.city_id, 1);
    }

    #[test]
    fn test_creation_view_never_carries_an_id() {
        let dto = PointOfInterestForCreation {
            name: Some("Pier 62".to_string()),
            description: None,
        };
        let entity = creation_to_point_of_interest(&dto, 3);
        assert_eq!(entity.id, 0);
        assert_eq!(entity.city_id, 3);
    }
}
