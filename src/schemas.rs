use domain::validate::ValidationErrors;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::microposts::{CreateMicropostRequest, MicropostResponse};
use crate::handlers::relationships::FollowStatusResponse;
use crate::handlers::sessions::CreateSessionRequest;
use crate::handlers::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// A single field violation in a rejected request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationIssue {
    /// The rejected field
    pub field: String,
    /// Why it was rejected
    pub message: String,
}

/// Validation failure response: every violation found, not just the first
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// All (field, reason) pairs collected in the validation pass
    pub errors: Vec<ValidationIssue>,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            errors: errors
                .0
                .into_iter()
                .map(|violation| ValidationIssue {
                    field: violation.field.to_string(),
                    message: violation.message.to_string(),
                })
                .collect(),
            code: "VALIDATION_FAILED".to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::sessions::create_session,
        crate::handlers::microposts::create_micropost,
        crate::handlers::microposts::get_user_microposts,
        crate::handlers::microposts::delete_micropost,
        crate::handlers::feed::get_feed,
        crate::handlers::relationships::follow_user,
        crate::handlers::relationships::unfollow_user,
        crate::handlers::relationships::get_following_status,
        crate::handlers::relationships::get_following,
        crate::handlers::relationships::get_followers,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<MicropostResponse>,
            ApiResponse<Vec<MicropostResponse>>,
            ApiResponse<FollowStatusResponse>,
            ApiResponse<String>,
            CreateUserRequest,
            UpdateUserRequest,
            CreateSessionRequest,
            CreateMicropostRequest,
            UserResponse,
            MicropostResponse,
            FollowStatusResponse,
            ErrorResponse,
            ValidationIssue,
            ValidationErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User account endpoints"),
        (name = "sessions", description = "Authentication endpoints"),
        (name = "microposts", description = "Micropost endpoints"),
        (name = "feed", description = "Personalized feed endpoints"),
        (name = "relationships", description = "Follow graph endpoints"),
    ),
    info(
        title = "Microblog API",
        description = "A micro-blogging service: users, microposts, follow relationships and a personalized feed",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
