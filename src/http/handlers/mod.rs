pub(crate) mod attendance;
pub(crate) mod classes;
pub(crate) mod students;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::Uri;
use axum::Json;
use serde_json::Value;

use crate::http::errors::ApiError;
use crate::schema::ValidationError;

pub(crate) type IdPath = Result<Path<i64>, PathRejection>;
pub(crate) type Body = Result<Json<Value>, JsonRejection>;

/// Non-integer ids never match a row, so they read as missing.
pub(crate) fn path_id(path: IdPath) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::not_found(rejection.body_text()))
}

pub(crate) fn json_body(body: Body) -> Result<Value, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| ValidationError::body(rejection.body_text()).into())
}

pub(crate) async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
