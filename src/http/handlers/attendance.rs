use axum::{extract::State, http::StatusCode, Json};

use super::{json_body, path_id, Body, IdPath};
use crate::http::errors::ApiError;
use crate::http::state::AppState;
use crate::schema::{self, AttendanceOut};

pub const ATTENDANCE_EXISTS: &str = "Attendance already created";

pub(crate) async fn list_attendance(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceOut>>, ApiError> {
    let rows = state.blocking(|store| Ok(store.list_attendance()?)).await?;
    Ok(Json(schema::dump_many(&rows)))
}

pub(crate) async fn create_attendance(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<AttendanceOut>), ApiError> {
    let new = schema::attendance_input(&json_body(body)?)?;
    let row = state
        .blocking(move |store| {
            store.get_student(new.student_id)?;
            match store.create_attendance(&new) {
                Ok(row) => Ok(row),
                Err(err) if err.is_unique_violation() => {
                    tracing::warn!(
                        student_id = new.student_id,
                        date = %new.date,
                        "attendance already recorded for this day"
                    );
                    Err(ApiError::conflict(ATTENDANCE_EXISTS))
                }
                Err(err) => Err(err.into()),
            }
        })
        .await?;
    tracing::info!(
        attendance_id = row.id,
        student_id = row.student.id,
        date = %row.date,
        present = row.present,
        "attendance recorded"
    );
    Ok((StatusCode::CREATED, Json(AttendanceOut::from(&row))))
}

pub(crate) async fn get_attendance(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<AttendanceOut>, ApiError> {
    let id = path_id(id)?;
    let row = state
        .blocking(move |store| Ok(store.get_attendance(id)?))
        .await?;
    Ok(Json(AttendanceOut::from(&row)))
}

pub(crate) async fn patch_attendance(
    State(state): State<AppState>,
    id: IdPath,
    body: Body,
) -> Result<Json<AttendanceOut>, ApiError> {
    let id = path_id(id)?;
    let patch = schema::attendance_patch(&json_body(body)?)?;
    if patch.is_empty() {
        tracing::debug!(attendance_id = id, "patch carries no fields");
    }
    let row = state
        .blocking(move |store| Ok(store.update_attendance(id, &patch)?))
        .await?;
    tracing::info!(attendance_id = id, present = row.present, "attendance updated");
    Ok(Json(AttendanceOut::from(&row)))
}

pub(crate) async fn delete_attendance(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state
        .blocking(move |store| Ok(store.delete_attendance(id)?))
        .await?;
    tracing::info!(attendance_id = id, "attendance deleted");
    Ok(StatusCode::NO_CONTENT)
}
