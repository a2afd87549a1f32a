use crate::models::{Post, Role, Session, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;

/// StoreError
///
/// Infrastructure failure in the persistence layer. Kept distinct from
/// authorization rejections so that handlers never report "store unreachable"
/// as "credential invalid".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. Handlers and
/// the authorization service interact with the data layer through this trait
/// without knowing the concrete implementation (Postgres, in-memory, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
///
/// Row absence is modeled as `Ok(None)`/`Ok(false)`; `Err` always means the
/// store itself failed.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Role Lookup ---
    // Read-only from the authorization path's perspective.
    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, StoreError>;
    async fn get_roles(&self) -> Result<Vec<Role>, StoreError>;
    async fn insert_role(&self, role: Role) -> Result<Role, StoreError>;

    // --- Users ---
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    // --- Session Persistence ---
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;
    // Returns the number of rows matched, so a caller can tell "nothing to
    // stop" apart from a successful flip without treating it as an error.
    async fn set_session_active(&self, token: &str, active: bool) -> Result<u64, StoreError>;
    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    // --- Posts ---
    async fn get_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    async fn insert_post(&self, post: Post) -> Result<Post, StoreError>;
    // Partial update via COALESCE; None leaves the column untouched.
    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<Post>, StoreError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL database. Schema provisioning (migrations, seeding) lives
/// outside this service.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn get_roles(&self) -> Result<Vec<Role>, StoreError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions FROM roles ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn insert_role(&self, role: Role) -> Result<Role, StoreError> {
        let inserted = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, permissions) VALUES ($1, $2, $3) \
             RETURNING id, name, permissions",
        )
        .bind(role.id)
        .bind(role.name)
        .bind(role.permissions)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, role_id, name, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, role_id, name, username, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, role_id, name, username, password_hash",
        )
        .bind(user.id)
        .bind(user.role_id)
        .bind(user.name)
        .bind(user.username)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO sessions (token, created_at, active) VALUES ($1, $2, $3)")
            .bind(&session.token)
            .bind(session.created_at)
            .bind(session.active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_session_active(&self, token: &str, active: bool) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE sessions SET active = $1 WHERE token = $2")
            .bind(active)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, created_at, active FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn get_posts(&self) -> Result<Vec<Post>, StoreError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, user_id, title, body, created_at FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, user_id, title, body, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        let inserted = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, user_id, title, body, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, title, body, created_at",
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(post.title)
        .bind(post.body)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<Post>, StoreError> {
        let updated = sqlx::query_as::<_, Post>(
            "UPDATE posts \
             SET title = COALESCE($2, title), body = COALESCE($3, body) \
             WHERE id = $1 \
             RETURNING id, user_id, title, body, created_at",
        )
        .bind(id)
        .bind(title)
        .bind(body)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// --- In-Memory Implementation (Tests and Local Experimentation) ---

#[derive(Default)]
struct MemoryTables {
    roles: Vec<Role>,
    users: Vec<User>,
    sessions: Vec<Session>,
    posts: Vec<Post>,
}

/// MemoryRepository
///
/// An in-memory implementation of `Repository`, used by the test suite to
/// exercise the authorization flow without a database. Behaves like the
/// Postgres implementation for the operations above: absent rows are `None`,
/// session updates report how many rows matched.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<MemoryTables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn get_roles(&self) -> Result<Vec<Role>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.roles.clone())
    }

    async fn insert_role(&self, role: Role) -> Result<Role, StoreError> {
        let mut tables = self.tables.write().unwrap();
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().unwrap();
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut tables = self.tables.write().unwrap();
        tables.sessions.push(session.clone());
        Ok(())
    }

    async fn set_session_active(&self, token: &str, active: bool) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let mut matched = 0;
        for session in tables.sessions.iter_mut().filter(|s| s.token == token) {
            session.active = active;
            matched += 1;
        }
        Ok(matched)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.sessions.iter().find(|s| s.token == token).cloned())
    }

    async fn get_posts(&self) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables.read().unwrap();
        let mut posts = tables.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().unwrap();
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<Post>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            post.title = title;
        }
        if let Some(body) = body {
            post.body = body;
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }
}
