use crate::handlers::{
    feed::get_feed,
    health::health_check,
    microposts::{create_micropost, delete_micropost, get_user_microposts},
    relationships::{
        follow_user, get_followers, get_following, get_following_status, unfollow_user,
    },
    sessions::create_session,
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Authentication
        .route("/api/v1/sessions", post(create_session))
        // Micropost routes
        .route("/api/v1/users/:user_id/microposts", post(create_micropost))
        .route("/api/v1/users/:user_id/microposts", get(get_user_microposts))
        .route("/api/v1/microposts/:micropost_id", delete(delete_micropost))
        // Feed
        .route("/api/v1/users/:user_id/feed", get(get_feed))
        // Follow graph routes
        .route(
            "/api/v1/users/:user_id/following/:other_id",
            post(follow_user),
        )
        .route(
            "/api/v1/users/:user_id/following/:other_id",
            delete(unfollow_user),
        )
        .route(
            "/api/v1/users/:user_id/following/:other_id",
            get(get_following_status),
        )
        .route("/api/v1/users/:user_id/following", get(get_following))
        .route("/api/v1/users/:user_id/followers", get(get_followers))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process-global and clashes with the test
    // harness running many apps in one process, so metrics exist only in
    // real builds.
    #[cfg(not(test))]
    let router = {
        use axum_prometheus::PrometheusMetricLayer;

        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
