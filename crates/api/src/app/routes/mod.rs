use axum::Router;

pub mod cars;
pub mod system;

/// Router for everything mounted under `/api`.
pub fn router() -> Router {
    Router::new().merge(cars::router())
}
