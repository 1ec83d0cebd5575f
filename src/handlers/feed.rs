use axum::{
    extract::{Path, State},
    response::{Json, Response},
};
use tracing::{debug, instrument, trace};

use crate::handlers::microposts::MicropostResponse;
use crate::handlers::{error_response, require_user};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Get a user's feed
///
/// The feed is the user's own posts plus those of everyone they follow,
/// newest first, composed at query time from the follow graph. A user
/// with no posts and no followees gets an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/feed",
    tag = "feed",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Feed retrieved successfully", body = ApiResponse<Vec<MicropostResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_feed(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MicropostResponse>>>, Response> {
    trace!("Entering get_feed function for user_id: {}", user_id);

    if let Err(e) = require_user(&state.db, user_id).await {
        return Err(error_response("get_feed", e));
    }

    match domain::feed::feed(&state.db, user_id).await {
        Ok(posts) => {
            debug!("Feed for user {} has {} posts", user_id, posts.len());
            let response = ApiResponse {
                data: posts.into_iter().map(MicropostResponse::from).collect(),
                message: "Feed retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("get_feed", e)),
    }
}
