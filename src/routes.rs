use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{self, SecurityConfig};
use crate::handlers::{protected, public, service};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        // Service
        .route("/", get(service::root_get))
        .route("/health", get(service::health_get))
        // Public
        .merge(auth_public_routes())
        .merge(user_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(&config::config().security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/forgot-password", post(auth::forgot_password_post))
        .route("/api/auth/security-answer", post(auth::security_answer_post))
        .route("/api/auth/reset-password", post(auth::reset_password_post))
}

fn user_public_routes() -> Router<AppState> {
    use public::users;

    Router::new()
        .route("/api/users/:user_id", get(users::user_get))
        .route("/api/users/:user_id/followers", get(users::followers_get))
        .route("/api/users/:user_id/following", get(users::following_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        // Only routes registered above get the token check
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami_get))
        .route("/api/auth/details", put(auth::details_put))
        .route("/api/auth/password", put(auth::password_put))
        .route("/api/auth/security-qa", put(auth::security_qa_put))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/users/:user_id/blocked", get(users::blocked_get))
        .route(
            "/api/users/:user_id/follow/:follower_id",
            post(users::follow_post).delete(users::unfollow_delete),
        )
        .route(
            "/api/users/:user_id/block/:blocked_user_id",
            post(users::block_post).delete(users::unblock_delete),
        )
}

fn post_routes() -> Router<AppState> {
    use protected::{comments, posts, subtasks, tasks};

    Router::new()
        .route("/api/posts", post(posts::post_create))
        .route("/api/posts/:post_id", get(posts::post_get))
        .route("/api/posts/:post_id/upvote", post(posts::upvote_post))
        .route("/api/posts/:post_id/downvote", post(posts::downvote_post))
        .route("/api/tasks", post(tasks::task_post))
        .route("/api/subtasks", post(subtasks::subtask_post))
        .route("/api/subtasks/:subtask_id/progress", patch(subtasks::progress_patch))
        .route("/api/comments", post(comments::comment_post))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION])
}
