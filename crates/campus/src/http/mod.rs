//! HTTP transport
//!
//! JSON over HTTP using `axum`. Handlers only translate between the wire and
//! the services; every failure is rendered by [`ApiError`].

mod course;
mod error;
mod person;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use campus_core::{CourseService, PersonService};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorBody, INVALID_JSON};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub persons: Arc<PersonService>,
    pub courses: Arc<CourseService>,
}

impl AppState {
    pub fn new(persons: PersonService, courses: CourseService) -> Self {
        Self {
            persons: Arc::new(persons),
            courses: Arc::new(courses),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, health_route: bool) -> Router {
    let api = Router::new()
        .route("/person", get(person::list).post(person::create))
        .route(
            "/person/:guid",
            get(person::show).put(person::update).delete(person::delete),
        )
        .route("/course", get(course::list).post(course::create))
        .route(
            "/course/:guid",
            get(course::show).put(course::update).delete(course::delete),
        );

    let api = if health_route {
        api.route("/health-check", get(health))
    } else {
        api
    };

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
