use crate::{
    AppState,
    auth::AuthError,
    models::{
        CreatePostRequest, CreateRoleRequest, CreateUserRequest, LoginRequest, LogoutRequest,
        Post, Role, TokenResponse, UpdatePostRequest, User,
    },
    security,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

// --- Auth Handlers ---

/// login
///
/// [Public Route] Exchanges a username/password pair for a signed bearer
/// token and records the matching active session. Unknown usernames and
/// wrong passwords both produce the same uniform 401.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Not authorized")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// logout
///
/// [Public Route] Ends the session recorded for the submitted token. A token
/// with no matching session is still a 200: the caller cannot probe which
/// tokens exist.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = LogoutRequest,
    responses((status = 200, description = "Session ended"))
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<StatusCode, AuthError> {
    state.auth.logout(&payload.token).await?;
    Ok(StatusCode::OK)
}

// --- Role Handlers ---

/// get_roles
///
/// [Open Route] Lists all roles. Declares no required permissions.
#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, description = "Roles", body = [Role]))
)]
pub async fn get_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AuthError> {
    let roles = state.repo.get_roles().await?;
    Ok(Json(roles))
}

/// get_role
///
/// [Open Route] Retrieves a single role by id.
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AuthError> {
    match state.repo.get_role(id).await? {
        Some(role) => Ok(Json(role).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// create_role
///
/// [Protected Route] Creates a role. Requires the `role.create` permission.
#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = Role),
        (status = 401, description = "Not authorized")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<Json<Role>, AuthError> {
    state
        .auth
        .check_authorization(&headers, &["role.create"])
        .await?;

    let role = Role {
        id: Uuid::new_v4(),
        name: payload.name,
        permissions: payload.permissions,
    };

    let role = state.repo.insert_role(role).await?;
    Ok(Json(role))
}

// --- User Handlers ---

/// create_user
///
/// [Protected Route] Creates an account. Requires the `user.create`
/// permission.
///
/// The incoming password is hashed before storage unless it already carries
/// the bcrypt digest signature, in which case it is stored as-is rather than
/// hashed twice. A hashing failure aborts the request; an account is never
/// stored with an unusable credential.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 401, description = "Not authorized")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>, AuthError> {
    state
        .auth
        .check_authorization(&headers, &["user.create"])
        .await?;

    let password_hash = if security::looks_like_digest(&payload.password) {
        payload.password
    } else {
        security::hash_password(&payload.password)?
    };

    let user = User {
        id: Uuid::new_v4(),
        role_id: payload.role_id,
        name: payload.name,
        username: payload.username,
        password_hash,
    };

    let user = state.repo.insert_user(user).await?;
    Ok(Json(user))
}

// --- Post Handlers ---

/// get_posts
///
/// [Open Route] Lists all posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "Posts", body = [Post]))
)]
pub async fn get_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AuthError> {
    let posts = state.repo.get_posts().await?;
    Ok(Json(posts))
}

/// get_post
///
/// [Open Route] Retrieves a single post by id.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AuthError> {
    match state.repo.get_post(id).await? {
        Some(post) => Ok(Json(post).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// create_post
///
/// [Protected Route] Creates a post. Requires the `post.create` permission.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 401, description = "Not authorized")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, AuthError> {
    state
        .auth
        .check_authorization(&headers, &["post.create"])
        .await?;

    let post = Post {
        id: Uuid::new_v4(),
        user_id: payload.user_id,
        title: payload.title,
        body: payload.body,
        created_at: Utc::now(),
    };

    let post = state.repo.insert_post(post).await?;
    Ok(Json(post))
}

/// update_post
///
/// [Protected Route] Partially updates a post. Requires the `post.update`
/// permission.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Response, AuthError> {
    state
        .auth
        .check_authorization(&headers, &["post.update"])
        .await?;

    match state.repo.update_post(id, payload.title, payload.body).await? {
        Some(post) => Ok(Json(post).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// delete_post
///
/// [Protected Route] Deletes a post. Requires the `post.delete` permission.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AuthError> {
    state
        .auth
        .check_authorization(&headers, &["post.delete"])
        .await?;

    if state.repo.delete_post(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
