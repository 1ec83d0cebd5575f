use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};
use chrono::{DateTime, Utc};
use domain::user::{NewUser, UserChanges};
use model::entities::user;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::handlers::error_response;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ValidationErrorResponse};

/// Request body for signing a user up
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name
    pub name: String,
    /// Email address (unique, case-insensitive)
    pub email: String,
    /// Password (minimum 6 characters); only its digest is stored
    pub password: String,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Display name
    pub name: Option<String>,
    /// Email address (unique, case-insensitive)
    pub email: Option<String>,
    /// New password; validated only when present
    pub password: Option<String>,
}

/// User response model. Credential digests never leave the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

/// Sign a new user up
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), Response> {
    trace!("Entering create_user function");
    debug!("Creating user with email: {}", request.email);

    let attrs = NewUser {
        name: request.name,
        email: request.email,
        password: request.password,
    };

    match domain::user::create(&state.db, attrs).await {
        Ok(user_model) => {
            info!(
                "User created successfully with ID: {}, email: {}",
                user_model.id, user_model.email
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => Err(error_response("create_user", e)),
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, StatusCode> {
    trace!("Entering get_users function");

    match user::Entity::find().all(&state.db).await {
        Ok(users) => {
            debug!("Retrieved {} users from database", users.len());
            let user_responses: Vec<UserResponse> =
                users.into_iter().map(UserResponse::from).collect();

            let response = ApiResponse {
                data: user_responses,
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, StatusCode> {
    trace!("Entering get_user function for user_id: {}", user_id);

    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => {
            debug!(
                "Successfully retrieved user with ID: {}, email: {}",
                user_model.id, user_model.email
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, Response> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let changes = UserChanges {
        name: request.name,
        email: request.email,
        password: request.password,
    };

    match domain::user::update(&state.db, user_id, changes).await {
        Ok(updated_user) => {
            info!("User with ID {} updated successfully", user_id);
            let response = ApiResponse {
                data: UserResponse::from(updated_user),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("update_user", e)),
    }
}

/// Delete a user
///
/// The user's microposts and follow edges go with them, atomically.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, Response> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    match domain::user::destroy(&state.db, user_id).await {
        Ok(()) => {
            info!("User with ID {} deleted successfully", user_id);
            let response = ApiResponse {
                data: format!("User {} deleted", user_id),
                message: "User deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response("delete_user", e)),
    }
}
