use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use campus_core::{Person, PersonInput};

use super::{ApiError, AppState};

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.persons.get_all(params).await?))
}

pub(super) async fn show(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<Person>, ApiError> {
    Ok(Json(state.persons.get_one_by_guid(&guid).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let Json(input) = payload?;
    let person = state.persons.create(input).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    payload: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.persons.update(&guid, input).await?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    state.persons.delete(&guid).await?;
    Ok(Json("OK"))
}
