use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::dto;
use crate::dto::CitySummary;
use crate::error::{AppError, AppResult};
use crate::repository::CityInfoRepository;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCityQuery {
    #[serde(default)]
    pub include_points_of_interest: bool,
}

/// List all cities, without their points of interest.
pub async fn list_cities<R: CityInfoRepository>(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CitySummary>>> {
    let repo = R::from_state(&state);
    let cities = repo.cities().await?;
    Ok(Json(cities.iter().map(dto::city_to_summary).collect()))
}

/// A single city, with or without its points of interest. The two cases
/// return different shapes: the summary omits the children field entirely.
pub async fn get_city<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
    Query(query): Query<GetCityQuery>,
) -> AppResult<Response> {
    let repo = R::from_state(&state);
    let city = repo
        .city(city_id, query.include_points_of_interest)
        .await?
        .ok_or(AppError::NotFound)?;

    if query.include_points_of_interest {
        Ok(Json(dto::city_to_response(&city)).into_response())
    } else {
        Ok(Json(dto::city_to_summary(&city)).into_response())
    }
}
