use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use campus_core::{Course, CourseInput};

use super::{ApiError, AppState};

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(state.courses.get_all(params).await?))
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.courses.get_one_by_guid(&guid).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let Json(input) = payload?;
    let course = state.courses.create(input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<Json<Course>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.courses.update(&guid, input).await?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    state.courses.delete(&guid).await?;
    Ok(Json("OK"))
}
