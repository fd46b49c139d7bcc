use axum::{extract::State, http::StatusCode, Json};

use super::{json_body, path_id, Body, IdPath};
use crate::http::errors::ApiError;
use crate::http::state::AppState;
use crate::schema::{self, ClassOut};

pub(crate) async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassOut>>, ApiError> {
    let rosters = state.blocking(|store| Ok(store.list_classes()?)).await?;
    Ok(Json(schema::dump_many(&rosters)))
}

pub(crate) async fn create_class(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<ClassOut>), ApiError> {
    let new = schema::class_input(&json_body(body)?)?;
    let roster = state
        .blocking(move |store| Ok(store.create_class(&new)?))
        .await?;
    tracing::info!(class_id = roster.class.id, "class created");
    Ok((StatusCode::CREATED, Json(ClassOut::from(&roster))))
}

pub(crate) async fn get_class(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<ClassOut>, ApiError> {
    let id = path_id(id)?;
    let roster = state.blocking(move |store| Ok(store.get_class(id)?)).await?;
    Ok(Json(ClassOut::from(&roster)))
}

pub(crate) async fn patch_class(
    State(state): State<AppState>,
    id: IdPath,
    body: Body,
) -> Result<Json<ClassOut>, ApiError> {
    let id = path_id(id)?;
    let patch = schema::class_patch(&json_body(body)?)?;
    if patch.is_empty() {
        tracing::debug!(class_id = id, "patch carries no fields");
    }
    let roster = state
        .blocking(move |store| Ok(store.update_class(id, &patch)?))
        .await?;
    tracing::info!(class_id = id, "class updated");
    Ok(Json(ClassOut::from(&roster)))
}

pub(crate) async fn delete_class(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state
        .blocking(move |store| Ok(store.delete_class(id)?))
        .await?;
    tracing::info!(class_id = id, "class deleted with its students and attendance");
    Ok(StatusCode::NO_CONTENT)
}
