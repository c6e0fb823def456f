//! `/cars` endpoints: route → repository call → status code.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};

use carhub_core::{Car, CarId};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/cars/doors/:doors", get(find_by_doors))
        .route("/cars/:id", get(find_one).delete(delete_one))
        .route("/cars", get(find_all).post(create).put(update))
        .route("/cars/", delete(delete_all))
}

pub async fn find_by_doors(
    Extension(services): Extension<Arc<AppServices>>,
    Path(doors): Path<i32>,
) -> axum::response::Response {
    tracing::info!(doors, "REST request to find cars by door count");

    match services.cars().find_by_doors(doors).await {
        Ok(cars) => (StatusCode::OK, Json(cars)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn find_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<CarId>,
) -> axum::response::Response {
    tracing::info!(%id, "REST request to find one car");

    match services.cars().find_by_id(id).await {
        Ok(Some(car)) => (StatusCode::OK, Json(car)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn find_all(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    tracing::info!("REST request to find all cars");

    match services.cars().find_all().await {
        Ok(cars) => (StatusCode::OK, Json(cars)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(car): Json<Car>,
) -> axum::response::Response {
    tracing::info!("REST request to create new car");

    if let Err(e) = car.ensure_new() {
        tracing::warn!("trying to create a new car with an existing id: {e}");
        return errors::domain_error_to_response(e);
    }

    save(&services, car).await
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Json(car): Json<Car>,
) -> axum::response::Response {
    tracing::info!("REST request to update an existing car");

    if let Err(e) = car.ensure_persisted() {
        tracing::warn!("trying to update a car without id: {e}");
        return errors::domain_error_to_response(e);
    }

    save(&services, car).await
}

pub async fn delete_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<CarId>,
) -> axum::response::Response {
    tracing::info!(%id, "REST request to delete an existing car");

    match services.cars().delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_all(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    tracing::info!("REST request to delete all cars");

    match services.cars().delete_all().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

async fn save(services: &AppServices, car: Car) -> axum::response::Response {
    match services.cars().save(car).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
