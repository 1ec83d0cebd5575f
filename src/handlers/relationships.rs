use axum::{
    extract::{Path, State},
    response::{Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};
use utoipa::ToSchema;

use crate::handlers::users::UserResponse;
use crate::handlers::{error_response, require_user};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ValidationErrorResponse};

/// Whether the directed follow edge exists
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowStatusResponse {
    pub following: bool,
}

/// Follow a user
///
/// Repeating the call is fine: the edge is created at most once.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/following/{other_id}",
    tag = "relationships",
    params(
        ("user_id" = i32, Path, description = "Follower's user ID"),
        ("other_id" = i32, Path, description = "User to follow"),
    ),
    responses(
        (status = 200, description = "Following", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn follow_user(
    Path((user_id, other_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, Response> {
    trace!("Entering follow_user function: {} -> {}", user_id, other_id);

    for id in [user_id, other_id] {
        if let Err(e) = require_user(&state.db, id).await {
            return Err(error_response("follow_user", e));
        }
    }

    match domain::follow::follow(&state.db, user_id, other_id).await {
        Ok(()) => {
            info!("User {} now follows user {}", user_id, other_id);
            let response = ApiResponse {
                data: format!("User {} follows user {}", user_id, other_id),
                message: "Following".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("follow_user", e)),
    }
}

/// Unfollow a user
///
/// Removing an absent edge succeeds without an error.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/following/{other_id}",
    tag = "relationships",
    params(
        ("user_id" = i32, Path, description = "Follower's user ID"),
        ("other_id" = i32, Path, description = "User to unfollow"),
    ),
    responses(
        (status = 200, description = "No longer following", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn unfollow_user(
    Path((user_id, other_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, Response> {
    trace!("Entering unfollow_user function: {} -> {}", user_id, other_id);

    for id in [user_id, other_id] {
        if let Err(e) = require_user(&state.db, id).await {
            return Err(error_response("unfollow_user", e));
        }
    }

    match domain::follow::unfollow(&state.db, user_id, other_id).await {
        Ok(()) => {
            info!("User {} no longer follows user {}", user_id, other_id);
            let response = ApiResponse {
                data: format!("User {} no longer follows user {}", user_id, other_id),
                message: "No longer following".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("unfollow_user", e)),
    }
}

/// Check whether one user follows another
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/following/{other_id}",
    tag = "relationships",
    params(
        ("user_id" = i32, Path, description = "Follower's user ID"),
        ("other_id" = i32, Path, description = "Possibly followed user"),
    ),
    responses(
        (status = 200, description = "Follow status", body = ApiResponse<FollowStatusResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_following_status(
    Path((user_id, other_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FollowStatusResponse>>, Response> {
    trace!(
        "Entering get_following_status function: {} -> {}",
        user_id,
        other_id
    );

    for id in [user_id, other_id] {
        if let Err(e) = require_user(&state.db, id).await {
            return Err(error_response("get_following_status", e));
        }
    }

    match domain::follow::following(&state.db, user_id, other_id).await {
        Ok(following) => {
            let response = ApiResponse {
                data: FollowStatusResponse { following },
                message: "Follow status retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("get_following_status", e)),
    }
}

/// List the users someone follows
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/following",
    tag = "relationships",
    params(
        ("user_id" = i32, Path, description = "Follower's user ID"),
    ),
    responses(
        (status = 200, description = "Followees retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_following(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, Response> {
    trace!("Entering get_following function for user_id: {}", user_id);

    if let Err(e) = require_user(&state.db, user_id).await {
        return Err(error_response("get_following", e));
    }

    match domain::follow::followees_of(&state.db, user_id).await {
        Ok(users) => {
            let response = ApiResponse {
                data: users.into_iter().map(UserResponse::from).collect(),
                message: "Followees retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("get_following", e)),
    }
}

/// List the users following someone
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/followers",
    tag = "relationships",
    params(
        ("user_id" = i32, Path, description = "Followed user's ID"),
    ),
    responses(
        (status = 200, description = "Followers retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_followers(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, Response> {
    trace!("Entering get_followers function for user_id: {}", user_id);

    if let Err(e) = require_user(&state.db, user_id).await {
        return Err(error_response("get_followers", e));
    }

    match domain::follow::followers_of(&state.db, user_id).await {
        Ok(users) => {
            let response = ApiResponse {
                data: users.into_iter().map(UserResponse::from).collect(),
                message: "Followers retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("get_followers", e)),
    }
}
