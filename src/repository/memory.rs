use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use super::{
    AlbumScope, CommentScope, NamedScope, PhotoScope, PostScope, Resource, ResourceStore,
    StoreResult, TodoScope, UserStore,
};
use crate::{
    models::{
        Album, AlbumRequest, Category, Comment, CommentDraft, NameRequest, NewUser, Photo,
        PhotoRequest, Post, PostRequest, Tag, Todo, TodoRequest, User, UserUpdate,
    },
    pagination::{PageRequest, SortDirection, SortField},
    policy::Role,
};

/// MemoryRecord
///
/// How an in-memory row is built from a draft, rewritten by one, and matched
/// against a listing scope.
pub trait MemoryRecord: Resource {
    fn create(id: i64, owner_id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;
    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);
    fn in_scope(&self, scope: &Self::Scope) -> bool;
    fn created_at(&self) -> DateTime<Utc>;
}

struct Table<R> {
    next_id: i64,
    rows: BTreeMap<i64, R>,
    writes: usize,
}

/// MemoryStore
///
/// A mutex-guarded `ResourceStore` with the same contract as the Postgres adapter,
/// used by the test suites to exercise orchestrators without a database.
///
/// `writes()` counts inserted, updated and deleted rows, which lets tests assert
/// that a denied or refused request never touched the store.
///
/// Each store holds a single table, so it cannot refuse a delete the way the
/// Postgres foreign keys do. Parent deletes go through [`super::relations`], which
/// applies the same rules to either adapter.
pub struct MemoryStore<R> {
    table: Mutex<Table<R>>,
}

impl<R: MemoryRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<R: MemoryRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows; new ids continue after the largest seeded id.
    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Self {
        let rows: BTreeMap<i64, R> = rows.into_iter().map(|row| (row.id(), row)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max + 1);
        Self {
            table: Mutex::new(Table {
                next_id,
                rows,
                writes: 0,
            }),
        }
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Table<R>> {
        // A panic in another test thread must not cascade into this one.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn compare<R: MemoryRecord>(a: &R, b: &R, field: SortField) -> std::cmp::Ordering {
    match field {
        SortField::CreatedAt => a
            .created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id())),
    }
}

#[async_trait]
impl<R: MemoryRecord> ResourceStore<R> for MemoryStore<R> {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<R>> {
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn insert(&self, owner_id: i64, draft: R::Draft) -> StoreResult<R> {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        let row = R::create(id, owner_id, draft, Utc::now());
        table.rows.insert(id, row.clone());
        table.writes += 1;
        Ok(row)
    }

    async fn update(&self, id: i64, draft: R::Draft) -> StoreResult<Option<R>> {
        let mut table = self.lock();
        let updated = table.rows.get_mut(&id).map(|row| {
            row.apply(draft, Utc::now());
            row.clone()
        });
        if updated.is_some() {
            table.writes += 1;
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let mut table = self.lock();
        let removed = table.rows.remove(&id).is_some();
        if removed {
            table.writes += 1;
        }
        Ok(removed)
    }

    async fn delete_where(&self, scope: R::Scope) -> StoreResult<u64> {
        let mut table = self.lock();
        let before = table.rows.len();
        table.rows.retain(|_, row| !row.in_scope(&scope));
        let removed = before - table.rows.len();
        table.writes += removed;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn count(&self, scope: R::Scope) -> StoreResult<i64> {
        let table = self.lock();
        let total = table.rows.values().filter(|row| row.in_scope(&scope)).count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn find_page(&self, scope: R::Scope, page: &PageRequest) -> StoreResult<(Vec<R>, i64)> {
        let table = self.lock();
        let mut matching: Vec<&R> = table
            .rows
            .values()
            .filter(|row| row.in_scope(&scope))
            .collect();
        matching.sort_by(|a, b| {
            let ordering = compare(*a, *b, page.sort.field);
            match page.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(0);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((content, total))
    }
}

// --- Record Mappings ---

impl MemoryRecord for Post {
    fn create(id: i64, owner_id: i64, draft: PostRequest, now: DateTime<Utc>) -> Self {
        let mut tags = draft.tags;
        tags.sort_unstable();
        tags.dedup();
        Post {
            id,
            user_id: owner_id,
            category_id: draft.category_id,
            title: draft.title,
            body: draft.body,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: PostRequest, now: DateTime<Utc>) {
        let mut tags = draft.tags;
        tags.sort_unstable();
        tags.dedup();
        self.category_id = draft.category_id;
        self.title = draft.title;
        self.body = draft.body;
        self.tags = tags;
        self.updated_at = now;
    }

    fn in_scope(&self, scope: &PostScope) -> bool {
        match *scope {
            PostScope::All => true,
            PostScope::Author(user_id) => self.user_id == user_id,
            PostScope::Category(category_id) => self.category_id == category_id,
            PostScope::Tag(tag_id) => self.tags.contains(&tag_id),
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl MemoryRecord for Comment {
    fn create(id: i64, owner_id: i64, draft: CommentDraft, now: DateTime<Utc>) -> Self {
        Comment {
            id,
            post_id: draft.post_id,
            user_id: owner_id,
            body: draft.body,
            created_at: now,
            updated_at: now,
        }
    }

    // The parent post is fixed; only the body is rewritten.
    fn apply(&mut self, draft: CommentDraft, now: DateTime<Utc>) {
        self.body = draft.body;
        self.updated_at = now;
    }

    fn in_scope(&self, scope: &CommentScope) -> bool {
        match *scope {
            CommentScope::Post(post_id) => self.post_id == post_id,
            CommentScope::Author(user_id) => self.user_id == user_id,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

macro_rules! named_record {
    ($ty:ident) => {
        impl MemoryRecord for $ty {
            fn create(id: i64, owner_id: i64, draft: NameRequest, now: DateTime<Utc>) -> Self {
                $ty {
                    id,
                    user_id: owner_id,
                    name: draft.name,
                    created_at: now,
                    updated_at: now,
                }
            }

            fn apply(&mut self, draft: NameRequest, now: DateTime<Utc>) {
                self.name = draft.name;
                self.updated_at = now;
            }

            fn in_scope(&self, scope: &NamedScope) -> bool {
                match *scope {
                    NamedScope::All => true,
                    NamedScope::Owner(user_id) => self.user_id == user_id,
                }
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

named_record!(Category);
named_record!(Tag);

impl MemoryRecord for Album {
    fn create(id: i64, owner_id: i64, draft: AlbumRequest, now: DateTime<Utc>) -> Self {
        Album {
            id,
            user_id: owner_id,
            title: draft.title,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: AlbumRequest, now: DateTime<Utc>) {
        self.title = draft.title;
        self.updated_at = now;
    }

    fn in_scope(&self, scope: &AlbumScope) -> bool {
        match *scope {
            AlbumScope::All => true,
            AlbumScope::Owner(user_id) => self.user_id == user_id,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl MemoryRecord for Photo {
    fn create(id: i64, owner_id: i64, draft: PhotoRequest, now: DateTime<Utc>) -> Self {
        Photo {
            id,
            user_id: owner_id,
            album_id: draft.album_id,
            title: draft.title,
            url: draft.url,
            thumbnail_url: draft.thumbnail_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: PhotoRequest, now: DateTime<Utc>) {
        self.album_id = draft.album_id;
        self.title = draft.title;
        self.url = draft.url;
        self.thumbnail_url = draft.thumbnail_url;
        self.updated_at = now;
    }

    fn in_scope(&self, scope: &PhotoScope) -> bool {
        match *scope {
            PhotoScope::All => true,
            PhotoScope::Album(album_id) => self.album_id == album_id,
            PhotoScope::Owner(user_id) => self.user_id == user_id,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl MemoryRecord for Todo {
    fn create(id: i64, owner_id: i64, draft: TodoRequest, now: DateTime<Utc>) -> Self {
        Todo {
            id,
            user_id: owner_id,
            title: draft.title,
            completed: draft.completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: TodoRequest, now: DateTime<Utc>) {
        self.title = draft.title;
        self.completed = draft.completed;
        self.updated_at = now;
    }

    fn in_scope(&self, scope: &TodoScope) -> bool {
        match *scope {
            TodoScope::Owner(user_id) => self.user_id == user_id,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// --- Users ---

/// MemoryUserStore
///
/// In-memory `UserStore`. Usernames and emails are expected to be unique; the
/// orchestrator checks availability before inserting, as it does with Postgres.
pub struct MemoryUserStore {
    users: Mutex<(i64, BTreeMap<i64, User>)>,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::with_users(Vec::new())
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users: BTreeMap<i64, User> = users.into_iter().map(|user| (user.id, user)).collect();
        let next_id = users.keys().next_back().map_or(1, |max| max + 1);
        Self {
            users: Mutex::new((next_id, users)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, (i64, BTreeMap<i64, User>)> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.lock().1.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .lock()
            .1
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self.lock().1.values().any(|user| user.username == username))
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.lock().1.values().any(|user| user.email == email))
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<User> {
        let mut guard = self.lock();
        let (next_id, users) = &mut *guard;
        let user = User {
            id: *next_id,
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            roles: vec![Role::User],
            created_at: Utc::now(),
        };
        *next_id += 1;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, update: UserUpdate) -> StoreResult<Option<User>> {
        Ok(self.lock().1.get_mut(&id).map(|user| {
            if let Some(email) = update.email {
                user.email = email;
            }
            if let Some(first_name) = update.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = update.last_name {
                user.last_name = last_name;
            }
            user.clone()
        }))
    }

    async fn set_roles(&self, id: i64, mut roles: Vec<Role>) -> StoreResult<Option<User>> {
        roles.sort();
        roles.dedup();
        Ok(self.lock().1.get_mut(&id).map(|user| {
            user.roles = roles;
            user.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.lock().1.remove(&id).is_some())
    }
}
