//! RFC9457-style API error wrapper.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::schema::ValidationError;
use crate::store::StoreError;

pub(crate) const PROBLEM_BAD_REQUEST: &str = "/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "/problems/not-found";
pub(crate) const PROBLEM_CONFLICT: &str = "/problems/conflict";
pub(crate) const PROBLEM_INTERNAL: &str = "/problems/internal";

/// Problem document returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    pub pointer: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub(crate) status: StatusCode,
    kind: &'static str,
    title: &'static str,
    detail: Option<String>,
    invalid_params: Option<Vec<ProblemInvalidParam>>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            invalid_params: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn with_invalid_params(mut self, params: Vec<ProblemInvalidParam>) -> Self {
        self.invalid_params = Some(params);
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    pub(crate) fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, PROBLEM_CONFLICT, "conflict").with_detail(detail)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let params = err
            .errors
            .iter()
            .map(|e| ProblemInvalidParam {
                pointer: format!("/{}", e.field),
                message: e.message.clone(),
            })
            .collect();
        Self::bad_request(err.to_string()).with_invalid_params(params)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::not_found(err.to_string()),
            StoreError::ConstraintViolation { .. } => Self::conflict(err.to_string()),
            StoreError::Database(ref source) => {
                tracing::error!(error = %source, "database operation failed");
                Self::internal(err.to_string())
            }
            StoreError::Poisoned => {
                tracing::error!("store lock poisoned");
                Self::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            invalid_params: self.invalid_params,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Constraint, Entity};

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found = ApiError::from(StoreError::NotFound {
            entity: Entity::Class,
            id: 999,
        });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.detail.as_deref(), Some("class 999 not found"));

        let conflict = ApiError::from(StoreError::ConstraintViolation {
            constraint: Constraint::ForeignKey,
            message: "FOREIGN KEY constraint failed".into(),
        });
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let internal = ApiError::from(StoreError::Poisoned);
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_carry_field_pointers() {
        let err = crate::schema::class_input(&serde_json::json!({})).expect_err("blank");
        let api = ApiError::from(err);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let params = api.invalid_params.expect("params");
        assert_eq!(params[0].pointer, "/name");
        assert_eq!(params[0].message, crate::schema::NOT_PROVIDED);
    }
}
