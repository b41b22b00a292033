use crate::handlers;
use crate::middleware::auth::{attach_viewer, require_auth};
use axum::{middleware, routing, Router};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router {
    let public_read = public_read_routes().layer(middleware::from_fn(attach_viewer));
    let protected = protected_routes().layer(middleware::from_fn(require_auth));

    auth_routes().merge(public_read).merge(protected)
}

/// Auth routes: register, login, logout.
fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login))
        .route("/auth/logout", routing::post(handlers::logout))
}

/// Public reads. A valid token, when present, identifies the viewer.
fn public_read_routes() -> Router {
    Router::new()
        .route("/stats", routing::get(handlers::stats::get_stats))
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        .route(
            "/categories/{id}",
            routing::get(handlers::category::get_category),
        )
        .route(
            "/categories/{id}/threads",
            routing::get(handlers::category::list_category_threads),
        )
        // Threads
        .route(
            "/threads/recent",
            routing::get(handlers::thread::recent_threads),
        )
        .route("/threads/{id}", routing::get(handlers::thread::get_thread))
        .route(
            "/threads/{id}/posts",
            routing::get(handlers::thread::thread_posts),
        )
        // Users
        .route("/users/{id}", routing::get(handlers::user::get_user))
}

/// Protected routes: every write, plus the caller's own account.
fn protected_routes() -> Router {
    Router::new()
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/profile", routing::put(handlers::update_profile))
        .route(
            "/categories",
            routing::post(handlers::category::create_category),
        )
        .route("/threads", routing::post(handlers::thread::create_thread))
        .route("/posts", routing::post(handlers::post::create_post))
        .route("/votes", routing::post(handlers::vote::cast_vote))
}
