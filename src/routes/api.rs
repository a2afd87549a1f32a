use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// API Router Module
///
/// The role, user and post resources. Reads declare no required permissions
/// and are open to anonymous callers; every mutation names the permission its
/// handler demands from the authorization service (`role.create`,
/// `user.create`, `post.create`, `post.update`, `post.delete`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET  /api/roles         — open listing.
        // POST /api/roles         — requires role.create.
        .route(
            "/api/roles",
            get(handlers::get_roles).post(handlers::create_role),
        )
        // GET /api/roles/{id} — open detail view.
        .route("/api/roles/{id}", get(handlers::get_role))
        // POST /api/users — requires user.create; hashes the new credential.
        .route("/api/users", post(handlers::create_user))
        // GET  /api/posts         — open listing.
        // POST /api/posts         — requires post.create.
        .route(
            "/api/posts",
            get(handlers::get_posts).post(handlers::create_post),
        )
        // GET    /api/posts/{id}  — open detail view.
        // PUT    /api/posts/{id}  — requires post.update.
        // DELETE /api/posts/{id}  — requires post.delete.
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}
