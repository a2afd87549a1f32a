use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// A named bundle of permissions from the `roles` table. Authorization reads
/// roles through the repository and never mutates them; the permission set is
/// the authority consulted on every protected request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    /// Atomic capability strings such as `"post.create"`.
    pub permissions: Vec<String>,
}

/// User
///
/// An account record from the `users` table. The password is held only as a
/// bcrypt digest and never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    // FK to roles.id: the role evaluated for this account's requests.
    pub role_id: Uuid,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Post
///
/// A blog post record from the `posts` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Post {
    pub id: Uuid,
    // FK to users.id (Author).
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Session
///
/// One record per issued login, from the `sessions` table. The row tracks
/// whether a previously issued token is still honorable, independent of the
/// token's own cryptographic expiry. Created by login, flipped inactive by
/// logout, never physically deleted here — retention is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Session {
    /// The bearer credential handed to the client; unique lookup key.
    pub token: String,
    pub created_at: DateTime<Utc>,
    /// True from creation until explicit logout.
    pub active: bool,
}

/// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// LogoutRequest
///
/// Input payload for POST /api/auth/logout: the token whose session ends.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LogoutRequest {
    pub token: String,
}

/// CreateRoleRequest
///
/// Input payload for POST /api/roles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateRoleRequest {
    pub name: String,
    pub permissions: Vec<String>,
}

/// CreateUserRequest
///
/// Input payload for POST /api/users. The password field accepts either a
/// plaintext password (hashed before storage) or an existing bcrypt digest,
/// which is stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role_id: Uuid,
}

/// CreatePostRequest
///
/// Input payload for POST /api/posts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreatePostRequest {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
}

/// UpdatePostRequest
///
/// Partial update payload for PUT /api/posts/{id}. Only fields present in the
/// JSON payload are written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// --- Response Schemas (Output) ---

/// TokenResponse
///
/// Output schema for a successful login: the signed bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct TokenResponse {
    pub token: String,
}
