//! Deletes that reach past a single row.
//!
//! Stores never cascade (the Postgres schema uses `ON DELETE RESTRICT` between
//! resources), so every delete that has dependents goes through here and behaves
//! the same over either adapter:
//!
//! - a post is removed together with its comments, an album with its photos;
//! - a category or tag that any post still uses is refused with
//!   [`StoreError::Referenced`];
//! - an account is removed together with everything it owns, unless one of its
//!   categories or tags is used by someone else's post.
//!
//! Callers are expected to have authorized the delete of the parent row already.

use std::collections::HashMap;

use super::{
    AlbumScope, CommentScope, NamedScope, PhotoScope, PostScope, Resource, ResourceStore,
    StoreError, StoreResult, TodoScope, UserStore,
};
use crate::{
    models::{Album, Category, Comment, Photo, Post, Tag, Todo},
    pagination::{PageRequest, Sort},
};

/// Page size used when walking a scope to the end.
const SWEEP_SIZE: i64 = 100;

/// Reads every row in `scope`, oldest first.
pub async fn collect_all<R: Resource>(
    store: &dyn ResourceStore<R>,
    scope: R::Scope,
) -> StoreResult<Vec<R>> {
    let mut rows = Vec::new();
    let mut page = 0;
    loop {
        let request = PageRequest::new(page, SWEEP_SIZE, Sort::OLDEST_FIRST);
        let (content, _) = store.find_page(scope.clone(), &request).await?;
        let exhausted = i64::try_from(content.len()).unwrap_or(i64::MAX) < SWEEP_SIZE;
        rows.extend(content);
        if exhausted {
            return Ok(rows);
        }
        page += 1;
    }
}

pub async fn delete_post(
    posts: &dyn ResourceStore<Post>,
    comments: &dyn ResourceStore<Comment>,
    id: i64,
) -> StoreResult<bool> {
    let removed = comments.delete_where(CommentScope::Post(id)).await?;
    tracing::debug!(post_id = id, comments = removed, "comments removed with post");
    posts.delete_by_id(id).await
}

pub async fn delete_album(
    albums: &dyn ResourceStore<Album>,
    photos: &dyn ResourceStore<Photo>,
    id: i64,
) -> StoreResult<bool> {
    let removed = photos.delete_where(PhotoScope::Album(id)).await?;
    tracing::debug!(album_id = id, photos = removed, "photos removed with album");
    albums.delete_by_id(id).await
}

pub async fn delete_category(
    categories: &dyn ResourceStore<Category>,
    posts: &dyn ResourceStore<Post>,
    id: i64,
) -> StoreResult<bool> {
    let in_use = posts.count(PostScope::Category(id)).await?;
    if in_use > 0 {
        return Err(still_used("Category", id, in_use));
    }
    categories.delete_by_id(id).await
}

pub async fn delete_tag(
    tags: &dyn ResourceStore<Tag>,
    posts: &dyn ResourceStore<Post>,
    id: i64,
) -> StoreResult<bool> {
    let in_use = posts.count(PostScope::Tag(id)).await?;
    if in_use > 0 {
        return Err(still_used("Tag", id, in_use));
    }
    tags.delete_by_id(id).await
}

fn still_used(resource: &str, id: i64, posts: i64) -> StoreError {
    StoreError::Referenced(format!(
        "{resource} with id {id} is still used by {posts} post(s)"
    ))
}

/// Every store an account's content can live in.
pub struct AccountStores<'a> {
    pub users: &'a dyn UserStore,
    pub posts: &'a dyn ResourceStore<Post>,
    pub comments: &'a dyn ResourceStore<Comment>,
    pub categories: &'a dyn ResourceStore<Category>,
    pub tags: &'a dyn ResourceStore<Tag>,
    pub albums: &'a dyn ResourceStore<Album>,
    pub photos: &'a dyn ResourceStore<Photo>,
    pub todos: &'a dyn ResourceStore<Todo>,
}

/// delete_account
///
/// Removes a user and everything they own. All checks run before the first
/// write: a category or tag of theirs that is still used by another user's post
/// refuses the whole operation.
///
/// Returns `false` when the user did not exist.
pub async fn delete_account(stores: &AccountStores<'_>, user_id: i64) -> StoreResult<bool> {
    let own_posts = collect_all(stores.posts, PostScope::Author(user_id)).await?;

    let mut own_by_category: HashMap<i64, i64> = HashMap::new();
    let mut own_by_tag: HashMap<i64, i64> = HashMap::new();
    for post in &own_posts {
        *own_by_category.entry(post.category_id).or_default() += 1;
        for tag_id in &post.tags {
            *own_by_tag.entry(*tag_id).or_default() += 1;
        }
    }

    for category in collect_all(stores.categories, NamedScope::Owner(user_id)).await? {
        let total = stores.posts.count(PostScope::Category(category.id)).await?;
        let foreign = total - own_by_category.get(&category.id).copied().unwrap_or(0);
        if foreign > 0 {
            return Err(still_used("Category", category.id, foreign));
        }
    }
    for tag in collect_all(stores.tags, NamedScope::Owner(user_id)).await? {
        let total = stores.posts.count(PostScope::Tag(tag.id)).await?;
        let foreign = total - own_by_tag.get(&tag.id).copied().unwrap_or(0);
        if foreign > 0 {
            return Err(still_used("Tag", tag.id, foreign));
        }
    }

    stores
        .comments
        .delete_where(CommentScope::Author(user_id))
        .await?;
    for post in &own_posts {
        delete_post(stores.posts, stores.comments, post.id).await?;
    }
    for album in collect_all(stores.albums, AlbumScope::Owner(user_id)).await? {
        delete_album(stores.albums, stores.photos, album.id).await?;
    }
    stores.photos.delete_where(PhotoScope::Owner(user_id)).await?;
    stores.todos.delete_where(TodoScope::Owner(user_id)).await?;
    stores
        .categories
        .delete_where(NamedScope::Owner(user_id))
        .await?;
    stores.tags.delete_where(NamedScope::Owner(user_id)).await?;

    let deleted = stores.users.delete_by_id(user_id).await?;
    tracing::info!(user_id, posts = own_posts.len(), "account content removed");
    Ok(deleted)
}
