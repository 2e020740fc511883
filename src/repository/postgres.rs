use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction, postgres::PgRow};

use super::{
    AlbumScope, CommentScope, NamedScope, PhotoScope, PostScope, ResourceStore, StoreError,
    StoreResult, TodoScope, UserStore,
};
use crate::{
    models::{
        Album, AlbumRequest, Category, Comment, CommentDraft, NameRequest, NewUser, Photo,
        PhotoRequest, Post, PostRequest, Tag, Todo, TodoRequest, User, UserUpdate,
    },
    pagination::PageRequest,
    policy::Role,
};

/// PostgresRepository
///
/// The sqlx-backed implementation of every store contract. One pool, one struct;
/// `main` hands the same repository to each slot of `AppState`.
///
/// All listings alias the primary table as `r` so sort columns can be pushed from
/// the whitelist in `SortField` without string interpolation of user input.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

/// A column filter applied to both the count and the page query.
type Filter = Option<(&'static str, i64)>;

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: Filter) {
        if let Some((column, value)) = filter {
            builder.push(" WHERE ");
            builder.push(column);
            builder.push(" = ");
            builder.push_bind(value);
        }
    }

    async fn count_rows(&self, from: &str, filter: Filter) -> StoreResult<i64> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) ");
        builder.push(from);
        Self::push_filter(&mut builder, filter);
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// fetch_page
    ///
    /// Runs the count and the bounded slice query for one listing. Rows are ordered by the
    /// requested sort with `id` as a tie-breaker so pages never overlap.
    async fn fetch_page<R>(
        &self,
        select: &str,
        from: &str,
        filter: Filter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<R>, i64)>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let total = self.count_rows(from, filter).await?;

        let direction = page.sort.direction.as_sql();
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(select);
        builder.push(" ");
        builder.push(from);
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY r.");
        builder.push(page.sort.field.column());
        builder.push(" ");
        builder.push(direction);
        builder.push(", r.id ");
        builder.push(direction);
        builder.push(" LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder.build_query_as::<R>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    async fn delete_row(&self, table: &'static str, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes the rows of `table` (aliased `r`) matching `filter`.
    async fn delete_rows(&self, table: &'static str, filter: Filter) -> StoreResult<u64> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("DELETE FROM ");
        builder.push(table);
        builder.push(" r");
        Self::push_filter(&mut builder, filter);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_post(&self, id: i64) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!("{POST_SELECT} FROM posts r WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    /// Replaces the tag links of a post inside the caller's transaction.
    async fn replace_post_tags(
        tx: &mut Transaction<'_, Postgres>,
        post_id: i64,
        tags: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id) SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tags)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

const POST_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.category_id, r.title, r.body,
           ARRAY(SELECT pt.tag_id FROM post_tags pt
                 WHERE pt.post_id = r.id ORDER BY pt.tag_id) AS tags,
           r.created_at, r.updated_at"#;

const COMMENT_SELECT: &str =
    "SELECT r.id, r.post_id, r.user_id, r.body, r.created_at, r.updated_at";
const NAMED_SELECT: &str = "SELECT r.id, r.user_id, r.name, r.created_at, r.updated_at";
const ALBUM_SELECT: &str = "SELECT r.id, r.user_id, r.title, r.created_at, r.updated_at";
const PHOTO_SELECT: &str = "SELECT r.id, r.user_id, r.album_id, r.title, r.url, \
    r.thumbnail_url, r.created_at, r.updated_at";
const TODO_SELECT: &str =
    "SELECT r.id, r.user_id, r.title, r.completed, r.created_at, r.updated_at";

// --- POSTS ---

fn post_from(scope: PostScope) -> (&'static str, Filter) {
    match scope {
        PostScope::All => ("FROM posts r", None),
        PostScope::Author(user_id) => ("FROM posts r", Some(("r.user_id", user_id))),
        PostScope::Category(category_id) => ("FROM posts r", Some(("r.category_id", category_id))),
        PostScope::Tag(tag_id) => (
            "FROM posts r JOIN post_tags f ON f.post_id = r.id",
            Some(("f.tag_id", tag_id)),
        ),
    }
}

#[async_trait]
impl ResourceStore<Post> for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>> {
        self.find_post(id).await
    }

    /// Inserts the post and its tag links atomically.
    async fn insert(&self, owner_id: i64, draft: PostRequest) -> StoreResult<Post> {
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (user_id, category_id, title, body) VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(owner_id)
        .bind(draft.category_id)
        .bind(&draft.title)
        .bind(&draft.body)
        .fetch_one(&mut *tx)
        .await?;
        Self::replace_post_tags(&mut tx, id, &draft.tags).await?;
        tx.commit().await?;

        self.find_post(id)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("post {id} vanished after insert")))
    }

    async fn update(&self, id: i64, draft: PostRequest) -> StoreResult<Option<Post>> {
        let mut tx = self.pool.begin().await?;
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET title = $2, body = $3, category_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(draft.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Nothing to update: dropping the transaction rolls it back.
        if updated.is_none() {
            return Ok(None);
        }
        Self::replace_post_tags(&mut tx, id, &draft.tags).await?;
        tx.commit().await?;
        self.find_post(id).await
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("posts", id).await
    }

    async fn delete_where(&self, scope: PostScope) -> StoreResult<u64> {
        if let PostScope::Tag(tag_id) = scope {
            let result = sqlx::query(
                "DELETE FROM posts WHERE id IN (SELECT post_id FROM post_tags WHERE tag_id = $1)",
            )
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
            return Ok(result.rows_affected());
        }
        let (_, filter) = post_from(scope);
        self.delete_rows("posts", filter).await
    }

    async fn count(&self, scope: PostScope) -> StoreResult<i64> {
        let (from, filter) = post_from(scope);
        self.count_rows(from, filter).await
    }

    async fn find_page(
        &self,
        scope: PostScope,
        page: &PageRequest,
    ) -> StoreResult<(Vec<Post>, i64)> {
        let (from, filter) = post_from(scope);
        self.fetch_page(POST_SELECT, from, filter, page).await
    }
}

// --- COMMENTS ---

fn comment_filter(scope: CommentScope) -> Filter {
    match scope {
        CommentScope::Post(post_id) => Some(("r.post_id", post_id)),
        CommentScope::Author(user_id) => Some(("r.user_id", user_id)),
    }
}

#[async_trait]
impl ResourceStore<Comment> for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} FROM comments r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn insert(&self, owner_id: i64, draft: CommentDraft) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, body) VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, body, created_at, updated_at
            "#,
        )
        .bind(draft.post_id)
        .bind(owner_id)
        .bind(&draft.body)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn update(&self, id: i64, draft: CommentDraft) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET body = $2, updated_at = NOW() WHERE id = $1
            RETURNING id, post_id, user_id, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.body)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("comments", id).await
    }

    async fn delete_where(&self, scope: CommentScope) -> StoreResult<u64> {
        self.delete_rows("comments", comment_filter(scope)).await
    }

    async fn count(&self, scope: CommentScope) -> StoreResult<i64> {
        self.count_rows("FROM comments r", comment_filter(scope)).await
    }

    async fn find_page(
        &self,
        scope: CommentScope,
        page: &PageRequest,
    ) -> StoreResult<(Vec<Comment>, i64)> {
        self.fetch_page(COMMENT_SELECT, "FROM comments r", comment_filter(scope), page)
            .await
    }
}

// --- CATEGORIES & TAGS ---

fn named_filter(scope: NamedScope) -> Filter {
    match scope {
        NamedScope::All => None,
        NamedScope::Owner(user_id) => Some(("r.user_id", user_id)),
    }
}

/// Categories and tags share a shape; only the table differs.
macro_rules! named_store {
    ($ty:ty, $table:literal) => {
        #[async_trait]
        impl ResourceStore<$ty> for PostgresRepository {
            async fn find_by_id(&self, id: i64) -> StoreResult<Option<$ty>> {
                let row = sqlx::query_as::<_, $ty>(&format!(
                    "{NAMED_SELECT} FROM {} r WHERE r.id = $1",
                    $table
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
                Ok(row)
            }

            async fn insert(&self, owner_id: i64, draft: NameRequest) -> StoreResult<$ty> {
                let row = sqlx::query_as::<_, $ty>(concat!(
                    "INSERT INTO ",
                    $table,
                    " (user_id, name) VALUES ($1, $2)",
                    " RETURNING id, user_id, name, created_at, updated_at"
                ))
                .bind(owner_id)
                .bind(&draft.name)
                .fetch_one(&self.pool)
                .await?;
                Ok(row)
            }

            async fn update(&self, id: i64, draft: NameRequest) -> StoreResult<Option<$ty>> {
                let row = sqlx::query_as::<_, $ty>(concat!(
                    "UPDATE ",
                    $table,
                    " SET name = $2, updated_at = NOW() WHERE id = $1",
                    " RETURNING id, user_id, name, created_at, updated_at"
                ))
                .bind(id)
                .bind(&draft.name)
                .fetch_optional(&self.pool)
                .await?;
                Ok(row)
            }

            async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
                self.delete_row($table, id).await
            }

            async fn delete_where(&self, scope: NamedScope) -> StoreResult<u64> {
                self.delete_rows($table, named_filter(scope)).await
            }

            async fn count(&self, scope: NamedScope) -> StoreResult<i64> {
                self.count_rows(concat!("FROM ", $table, " r"), named_filter(scope))
                    .await
            }

            async fn find_page(
                &self,
                scope: NamedScope,
                page: &PageRequest,
            ) -> StoreResult<(Vec<$ty>, i64)> {
                let from = concat!("FROM ", $table, " r");
                self.fetch_page(NAMED_SELECT, from, named_filter(scope), page)
                    .await
            }
        }
    };
}

named_store!(Category, "categories");
named_store!(Tag, "tags");

// --- ALBUMS ---

fn album_filter(scope: AlbumScope) -> Filter {
    match scope {
        AlbumScope::All => None,
        AlbumScope::Owner(user_id) => Some(("r.user_id", user_id)),
    }
}

#[async_trait]
impl ResourceStore<Album> for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Album>> {
        let album = sqlx::query_as::<_, Album>(&format!(
            "{ALBUM_SELECT} FROM albums r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(album)
    }

    async fn insert(&self, owner_id: i64, draft: AlbumRequest) -> StoreResult<Album> {
        let album = sqlx::query_as::<_, Album>(
            "INSERT INTO albums (user_id, title) VALUES ($1, $2) \
             RETURNING id, user_id, title, created_at, updated_at",
        )
        .bind(owner_id)
        .bind(&draft.title)
        .fetch_one(&self.pool)
        .await?;
        Ok(album)
    }

    async fn update(&self, id: i64, draft: AlbumRequest) -> StoreResult<Option<Album>> {
        let album = sqlx::query_as::<_, Album>(
            "UPDATE albums SET title = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, user_id, title, created_at, updated_at",
        )
        .bind(id)
        .bind(&draft.title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(album)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("albums", id).await
    }

    async fn delete_where(&self, scope: AlbumScope) -> StoreResult<u64> {
        self.delete_rows("albums", album_filter(scope)).await
    }

    async fn count(&self, scope: AlbumScope) -> StoreResult<i64> {
        self.count_rows("FROM albums r", album_filter(scope)).await
    }

    async fn find_page(
        &self,
        scope: AlbumScope,
        page: &PageRequest,
    ) -> StoreResult<(Vec<Album>, i64)> {
        self.fetch_page(ALBUM_SELECT, "FROM albums r", album_filter(scope), page)
            .await
    }
}

// --- PHOTOS ---

fn photo_filter(scope: PhotoScope) -> Filter {
    match scope {
        PhotoScope::All => None,
        PhotoScope::Album(album_id) => Some(("r.album_id", album_id)),
        PhotoScope::Owner(user_id) => Some(("r.user_id", user_id)),
    }
}

#[async_trait]
impl ResourceStore<Photo> for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>(&format!(
            "{PHOTO_SELECT} FROM photos r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(photo)
    }

    async fn insert(&self, owner_id: i64, draft: PhotoRequest) -> StoreResult<Photo> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (user_id, album_id, title, url, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, album_id, title, url, thumbnail_url, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(draft.album_id)
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(&draft.thumbnail_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(photo)
    }

    async fn update(&self, id: i64, draft: PhotoRequest) -> StoreResult<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET album_id = $2, title = $3, url = $4, thumbnail_url = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, album_id, title, url, thumbnail_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(draft.album_id)
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(&draft.thumbnail_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(photo)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("photos", id).await
    }

    async fn delete_where(&self, scope: PhotoScope) -> StoreResult<u64> {
        self.delete_rows("photos", photo_filter(scope)).await
    }

    async fn count(&self, scope: PhotoScope) -> StoreResult<i64> {
        self.count_rows("FROM photos r", photo_filter(scope)).await
    }

    async fn find_page(
        &self,
        scope: PhotoScope,
        page: &PageRequest,
    ) -> StoreResult<(Vec<Photo>, i64)> {
        self.fetch_page(PHOTO_SELECT, "FROM photos r", photo_filter(scope), page)
            .await
    }
}

// --- TODOS ---

fn todo_filter(scope: TodoScope) -> Filter {
    match scope {
        TodoScope::Owner(user_id) => Some(("r.user_id", user_id)),
    }
}

#[async_trait]
impl ResourceStore<Todo> for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!("{TODO_SELECT} FROM todos r WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn insert(&self, owner_id: i64, draft: TodoRequest) -> StoreResult<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, title, completed) VALUES ($1, $2, $3)
            RETURNING id, user_id, title, completed, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&draft.title)
        .bind(draft.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update(&self, id: i64, draft: TodoRequest) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos SET title = $2, completed = $3, updated_at = NOW() WHERE id = $1
            RETURNING id, user_id, title, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(draft.completed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("todos", id).await
    }

    async fn delete_where(&self, scope: TodoScope) -> StoreResult<u64> {
        self.delete_rows("todos", todo_filter(scope)).await
    }

    async fn count(&self, scope: TodoScope) -> StoreResult<i64> {
        self.count_rows("FROM todos r", todo_filter(scope)).await
    }

    async fn find_page(
        &self,
        scope: TodoScope,
        page: &PageRequest,
    ) -> StoreResult<(Vec<Todo>, i64)> {
        self.fetch_page(TODO_SELECT, "FROM todos r", todo_filter(scope), page)
            .await
    }
}

// --- USERS ---

/// Raw `users` row. Roles are stored as text and parsed into the closed `Role` enum
/// on the way out.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let mut roles = row
            .roles
            .iter()
            .map(|name| name.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {e}", row.id)))?;
        roles.sort();
        roles.dedup();

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            roles,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, roles, created_at";

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}

fn into_user(row: Option<UserRow>) -> StoreResult<Option<User>> {
    row.map(User::try_from).transpose()
}

#[async_trait]
impl UserStore for PostgresRepository {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(role_names(&[Role::User]))
        .fetch_one(&self.pool)
        .await?;
        User::try_from(row)
    }

    /// Uses `COALESCE` so only the provided fields are written.
    async fn update(&self, id: i64, update: UserUpdate) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.email)
        .bind(update.first_name)
        .bind(update.last_name)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn set_roles(&self, id: i64, roles: Vec<Role>) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET roles = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role_names(&roles))
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.delete_row("users", id).await
    }
}
