//! The persistence surface handlers talk to.
//!
//! One trait, two interchangeable backends: [`DbRepository`] over the
//! durable SeaORM store and [`MemoryRepository`] over the injected demo
//! store. Handlers are generic over this trait, so validation and the
//! patch protocol behave identically no matter which store a route tree is
//! wired to.

pub mod database;
pub mod memory;

pub use database::DbRepository;
pub use memory::{MemoryRepository, MemoryStore};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{City, PointOfInterest};
use crate::error::AppError;
use crate::AppState;

/// Read-path failure inside a backend. Carries enough for the log; the
/// consumer only ever sees the generic 500.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RepoError(String);

impl From<sea_orm::DbErr> for RepoError {
    fn from(err: sea_orm::DbErr) -> Self {
        RepoError(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[async_trait]
pub trait CityInfoRepository: Send {
    /// Route prefix this backend is mounted under, used for Location
    /// headers on creation.
    const BASE_PATH: &'static str;

    /// A request-scoped repository over the backend held in `state`.
    fn from_state(state: &AppState) -> Self
    where
        Self: Sized;

    async fn city_exists(&self, city_id: i32) -> Result<bool, RepoError>;

    /// All cities ordered by name, children not loaded.
    async fn cities(&self) -> Result<Vec<City>, RepoError>;

    /// A single city. When `include_points_of_interest` is false the
    /// children are not traversed at all and the returned collection is
    /// empty whatever the city owns.
    async fn city(
        &self,
        city_id: i32,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, RepoError>;

    async fn points_of_interest_for_city(
        &self,
        city_id: i32,
    ) -> Result<Vec<PointOfInterest>, RepoError>;

    /// Lookup scoped by city: an id that exists under a different city
    /// yields `None`.
    async fn point_of_interest_for_city(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, RepoError>;

    /// Stages a new point of interest for `city_id`. Id assignment is the
    /// commit's job; the draft's id is ignored.
    fn add_point_of_interest_for_city(&mut self, city_id: i32, point_of_interest: PointOfInterest);

    /// Stages new field values for an existing point of interest.
    fn update_point_of_interest(&mut self, point_of_interest: PointOfInterest);

    /// Stages a removal.
    fn delete_point_of_interest(&mut self, point_of_interest: PointOfInterest);

    /// Commits every staged change as one unit. `Some` carries the points
    /// of interest created by this commit, ids filled in; `None` means the
    /// commit failed as a whole and nothing was persisted.
    async fn save(&mut self) -> Option<Vec<PointOfInterest>>;
}
