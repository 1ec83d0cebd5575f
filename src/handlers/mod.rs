pub mod feed;
pub mod health;
pub mod microposts;
pub mod relationships;
pub mod sessions;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, error, warn};

use crate::schemas::{ErrorResponse, ValidationErrorResponse};

/// 404 guard for routes scoped under a user: resolve the path user or
/// fail with NotFound.
pub(crate) async fn require_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<(), DomainError> {
    match model::entities::user::Entity::find_by_id(user_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound("user")),
    }
}

/// Map a domain error onto the wire: validation failures carry every
/// (field, message) pair as a 422, missing targets are 404, everything
/// else is a 500 with an opaque body.
pub(crate) fn error_response(context: &'static str, error: DomainError) -> Response {
    match error {
        DomainError::Validation(errors) => {
            debug!("{} rejected: {}", context, errors);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse::from(errors)),
            )
                .into_response()
        }
        DomainError::NotFound(what) => {
            warn!("{}: {} not found", context, what);
            StatusCode::NOT_FOUND.into_response()
        }
        error => {
            error!("{} failed: {}", context, error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Internal server error while handling {}", context),
                    code: "INTERNAL_ERROR".to_string(),
                    success: false,
                }),
            )
                .into_response()
        }
    }
}
