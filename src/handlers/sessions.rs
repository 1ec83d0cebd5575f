use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Email address (case-insensitive)
    pub email: String,
    /// Password to check against the stored digest
    pub password: String,
}

/// Log a user in
///
/// Verifies the password against the stored digest and returns the user.
/// Cookie issuance is the caller's concern; this endpoint only answers
/// the credential question.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_session function");
    debug!("Authenticating user with email: {}", request.email);

    match domain::user::authenticate(&state.db, &request.email, &request.password).await {
        Ok(Some(user_model)) => {
            info!("User {} authenticated successfully", user_model.id);
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "Logged in successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            // Deliberately the same answer for unknown email and wrong
            // password.
            warn!("Authentication failed for email: {}", request.email);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid email or password".to_string(),
                    code: "INVALID_CREDENTIALS".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to authenticate user: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while authenticating".to_string(),
                    code: "INTERNAL_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
