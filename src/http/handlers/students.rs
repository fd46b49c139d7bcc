use axum::{extract::State, http::StatusCode, Json};

use super::{json_body, path_id, Body, IdPath};
use crate::http::errors::ApiError;
use crate::http::state::AppState;
use crate::schema::{self, StudentOut};

pub(crate) async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentOut>>, ApiError> {
    let students = state.blocking(|store| Ok(store.list_students()?)).await?;
    Ok(Json(schema::dump_many(&students)))
}

pub(crate) async fn create_student(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<StudentOut>), ApiError> {
    let new = schema::student_input(&json_body(body)?)?;
    let student = state
        .blocking(move |store| {
            store.get_class(new.class_id)?;
            Ok(store.create_student(&new)?)
        })
        .await?;
    tracing::info!(
        student_id = student.id,
        class_id = student.in_class.id,
        "student created"
    );
    Ok((StatusCode::CREATED, Json(StudentOut::from(&student))))
}

pub(crate) async fn get_student(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<StudentOut>, ApiError> {
    let id = path_id(id)?;
    let student = state.blocking(move |store| Ok(store.get_student(id)?)).await?;
    Ok(Json(StudentOut::from(&student)))
}

pub(crate) async fn patch_student(
    State(state): State<AppState>,
    id: IdPath,
    body: Body,
) -> Result<Json<StudentOut>, ApiError> {
    let id = path_id(id)?;
    let patch = schema::student_patch(&json_body(body)?)?;
    if patch.is_empty() {
        tracing::debug!(student_id = id, "patch carries no fields");
    }
    let student = state
        .blocking(move |store| {
            store.get_student(id)?;
            if let Some(class_id) = patch.class_id {
                store.get_class(class_id)?;
            }
            Ok(store.update_student(id, &patch)?)
        })
        .await?;
    tracing::info!(
        student_id = id,
        class_id = student.in_class.id,
        "student updated"
    );
    Ok(Json(StudentOut::from(&student)))
}

pub(crate) async fn delete_student(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state
        .blocking(move |store| Ok(store.delete_student(id)?))
        .await?;
    tracing::info!(student_id = id, "student deleted with their attendance");
    Ok(StatusCode::NO_CONTENT)
}
