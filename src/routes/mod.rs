use axum::{routing::get, Router};

use crate::handlers::{cities, points_of_interest};
use crate::repository::{CityInfoRepository, DbRepository, MemoryRepository};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // The same route tree twice: durable backend under /api/cities, the
    // in-memory demo backend under /api/demo/cities. Separate data
    // universes, identical behavior.
    Router::new()
        .nest("/api/cities", city_routes::<DbRepository>())
        .nest("/api/demo/cities", city_routes::<MemoryRepository>())
        .with_state(state)
}

fn city_routes<R: CityInfoRepository + 'static>() -> Router<AppState> {
    Router::new()
        .route("/", get(cities::list_cities::<R>))
        .route("/{city_id}", get(cities::get_city::<R>))
        .route(
            "/{city_id}/pointsofinterest",
            get(points_of_interest::list_points_of_interest::<R>)
                .post(points_of_interest::create_point_of_interest::<R>),
        )
        .route(
            "/{city_id}/pointsofinterest/{point_of_interest_id}",
            get(points_of_interest::get_point_of_interest::<R>)
                .put(points_of_interest::update_point_of_interest::<R>)
                .patch(points_of_interest::partially_update_point_of_interest::<R>)
                .delete(points_of_interest::delete_point_of_interest::<R>),
        )
}
