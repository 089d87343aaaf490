use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::dto;
use crate::dto::{PointOfInterestForCreation, PointOfInterestForUpdate, PointOfInterestResponse};
use crate::error::{AppError, AppResult};
use crate::patch::{self, PatchOperation};
use crate::repository::{CityInfoRepository, RepoError};
use crate::validation::validate_point_of_interest;
use crate::AppState;

/// An unexpected backend fault on a read path: logged with the causing city
/// id, surfaced as the generic 500.
fn unhandled_fault(city_id: i32, err: RepoError) -> AppError {
    tracing::error!(
        city_id,
        error = %err,
        "exception while getting points of interest"
    );
    AppError::Internal(err.to_string())
}

fn persistence_failure() -> AppError {
    AppError::Internal("failed to persist staged changes".to_string())
}

pub async fn list_points_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
) -> AppResult<Json<Vec<PointOfInterestResponse>>> {
    let repo = R::from_state(&state);

    if !repo
        .city_exists(city_id)
        .await
        .map_err(|e| unhandled_fault(city_id, e))?
    {
        tracing::info!(city_id, "city not found when accessing points of interest");
        return Err(AppError::NotFound);
    }

    let points_of_interest = repo
        .points_of_interest_for_city(city_id)
        .await
        .map_err(|e| unhandled_fault(city_id, e))?;

    Ok(Json(
        points_of_interest
            .iter()
            .map(dto::point_of_interest_to_response)
            .collect(),
    ))
}

pub async fn get_point_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path((city_id, point_of_interest_id)): Path<(i32, i32)>,
) -> AppResult<Json<PointOfInterestResponse>> {
    let repo = R::from_state(&state);

    if !repo.city_exists(city_id).await? {
        tracing::info!(city_id, "city not found when accessing points of interest");
        return Err(AppError::NotFound);
    }

    let point_of_interest = repo
        .point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(dto::point_of_interest_to_response(&point_of_interest)))
}

/// POST: validate, attach to the city, commit, answer 201 with a Location
/// header pointing at the new resource.
pub async fn create_point_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
    WithRejection(Json(body), _): WithRejection<Json<PointOfInterestForCreation>, AppError>,
) -> AppResult<Response> {
    let violations = validate_point_of_interest(body.name.as_deref(), body.description.as_deref());
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let mut repo = R::from_state(&state);
    if !repo.city_exists(city_id).await? {
        return Err(AppError::NotFound);
    }

    let draft = dto::creation_to_point_of_interest(&body, city_id);
    repo.add_point_of_interest_for_city(city_id, draft);

    let mut created = repo.save().await.ok_or_else(persistence_failure)?;
    let created = created.pop().ok_or_else(persistence_failure)?;

    let location = format!(
        "{}/{}/pointsofinterest/{}",
        R::BASE_PATH,
        city_id,
        created.id
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto::point_of_interest_to_response(&created)),
    )
        .into_response())
}

/// PUT: full replacement of the mutable fields. The cross-field rule runs
/// here exactly as it does for POST and PATCH.
pub async fn update_point_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path((city_id, point_of_interest_id)): Path<(i32, i32)>,
    WithRejection(Json(body), _): WithRejection<Json<PointOfInterestForUpdate>, AppError>,
) -> AppResult<StatusCode> {
    let violations = validate_point_of_interest(body.name.as_deref(), body.description.as_deref());
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let mut repo = R::from_state(&state);
    if !repo.city_exists(city_id).await? {
        return Err(AppError::NotFound);
    }

    let mut entity = repo
        .point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or(AppError::NotFound)?;

    dto::apply_update(&body, &mut entity);
    repo.update_point_of_interest(entity);

    repo.save().await.ok_or_else(persistence_failure)?;

    // The consumer already has the representation it sent.
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH: apply an ordered sequence of edit operations to the update view
/// of the stored entity, validate the result, write it back.
pub async fn partially_update_point_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path((city_id, point_of_interest_id)): Path<(i32, i32)>,
    WithRejection(Json(operations), _): WithRejection<Json<Vec<PatchOperation>>, AppError>,
) -> AppResult<StatusCode> {
    let mut repo = R::from_state(&state);

    if !repo.city_exists(city_id).await? {
        return Err(AppError::NotFound);
    }

    let mut entity = repo
        .point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or(AppError::NotFound)?;

    // All-or-nothing: a failing operation anywhere in the sequence rejects
    // the request and the entity keeps its stored values.
    let base = dto::point_of_interest_to_update(&entity);
    let patched =
        patch::apply(&operations, &base).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let violations =
        validate_point_of_interest(patched.name.as_deref(), patched.description.as_deref());
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    dto::apply_update(&patched, &mut entity);
    repo.update_point_of_interest(entity);

    repo.save().await.ok_or_else(persistence_failure)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE: remove, commit, then fire the best-effort notification.
pub async fn delete_point_of_interest<R: CityInfoRepository>(
    State(state): State<AppState>,
    Path((city_id, point_of_interest_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    let mut repo = R::from_state(&state);

    if !repo.city_exists(city_id).await? {
        return Err(AppError::NotFound);
    }

    let entity = repo
        .point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or(AppError::NotFound)?;

    repo.delete_point_of_interest(entity.clone());
    repo.save().await.ok_or_else(persistence_failure)?;

    state.mailer.send(
        "Point of interest deleted.",
        &format!(
            "Point of interest {} with id {} was deleted.",
            entity.name, entity.id
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}
