use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};
use chrono::{DateTime, Utc};
use model::entities::micropost;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};
use utoipa::ToSchema;

use crate::handlers::error_response;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ValidationErrorResponse};

/// Request body for creating a micropost
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateMicropostRequest {
    /// Post body (maximum 140 characters)
    pub content: String,
}

/// Micropost response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MicropostResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<micropost::Model> for MicropostResponse {
    fn from(model: micropost::Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

/// Create a micropost for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/microposts",
    tag = "microposts",
    params(
        ("user_id" = i32, Path, description = "Author's user ID"),
    ),
    request_body = CreateMicropostRequest,
    responses(
        (status = 201, description = "Micropost created successfully", body = ApiResponse<MicropostResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_micropost(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateMicropostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MicropostResponse>>), Response> {
    trace!("Entering create_micropost function for user_id: {}", user_id);

    if let Err(e) = super::require_user(&state.db, user_id).await {
        return Err(error_response("create_micropost", e));
    }

    match domain::micropost::create(&state.db, user_id, &request.content).await {
        Ok(post) => {
            info!("Micropost {} created for user {}", post.id, user_id);
            let response = ApiResponse {
                data: MicropostResponse::from(post),
                message: "Micropost created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => Err(error_response("create_micropost", e)),
    }
}

/// Get a user's own microposts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/microposts",
    tag = "microposts",
    params(
        ("user_id" = i32, Path, description = "Author's user ID"),
    ),
    responses(
        (status = 200, description = "Microposts retrieved successfully", body = ApiResponse<Vec<MicropostResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_microposts(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MicropostResponse>>>, Response> {
    trace!("Entering get_user_microposts function for user_id: {}", user_id);

    if let Err(e) = super::require_user(&state.db, user_id).await {
        return Err(error_response("get_user_microposts", e));
    }

    match domain::micropost::of_user(&state.db, user_id).await {
        Ok(posts) => {
            let response = ApiResponse {
                data: posts.into_iter().map(MicropostResponse::from).collect(),
                message: "Microposts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("get_user_microposts", e)),
    }
}

/// Delete a micropost
#[utoipa::path(
    delete,
    path = "/api/v1/microposts/{micropost_id}",
    tag = "microposts",
    params(
        ("micropost_id" = i32, Path, description = "Micropost ID"),
    ),
    responses(
        (status = 200, description = "Micropost deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Micropost not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_micropost(
    Path(micropost_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, Response> {
    trace!("Entering delete_micropost function for id: {}", micropost_id);

    match domain::micropost::destroy(&state.db, micropost_id).await {
        Ok(()) => {
            info!("Micropost {} deleted", micropost_id);
            let response = ApiResponse {
                data: format!("Micropost {} deleted", micropost_id),
                message: "Micropost deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("delete_micropost", e)),
    }
}
