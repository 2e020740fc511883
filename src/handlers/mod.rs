//! Resource orchestrators.
//!
//! Every resource module follows the same template for guarded mutations:
//! fetch by id (missing → `NotFound`), then `policy::authorize` (deny → `Forbidden`),
//! then mutate. Existence is always checked before authorization, so a caller
//! learns that a resource is missing before learning they may not touch it.
//! Listings go through [`list_page`], which validates the page request and wraps
//! the store's slice in a [`PagedEnvelope`]. Deletes of rows that others depend on
//! authorize first and then hand over to `repository::relations`.

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    pagination::{PageQuery, PageRequest, PagedEnvelope, Sort},
    policy::{Capability, Identity, OwnedResource, authorize_resource},
    repository::{Resource, ResourceStore},
};

pub mod albums;
pub mod categories;
pub mod comments;
pub mod photos;
pub mod posts;
pub mod tags;
pub mod todos;
pub mod users;

/// Loads a resource or fails with `NotFound`.
pub async fn fetch<R: Resource>(store: &dyn ResourceStore<R>, id: i64) -> AppResult<R> {
    store.find_by_id(id).await?.ok_or_else(|| {
        tracing::debug!(resource = R::NAME, id, "resource not found");
        AppError::not_found(R::NAME, id)
    })
}

/// ensure_allowed
///
/// Turns a policy decision into a `Result`. A deny is logged and becomes `Forbidden`.
pub fn ensure_allowed<R: OwnedResource + ?Sized>(
    identity: &Identity,
    resource: &R,
    capability: Capability,
    resource_name: &str,
) -> AppResult<()> {
    if authorize_resource(identity, resource, capability).is_allowed() {
        return Ok(());
    }
    tracing::warn!(
        user_id = identity.id(),
        resource = resource_name,
        resource_id = resource.id(),
        owner_id = resource.owner_id(),
        ?capability,
        "authorization denied"
    );
    Err(AppError::forbidden())
}

/// Fetches a resource and checks `capability` on it, in that order.
pub async fn fetch_authorized<R: Resource>(
    store: &dyn ResourceStore<R>,
    identity: &Identity,
    id: i64,
    capability: Capability,
) -> AppResult<R> {
    let resource = fetch(store, id).await?;
    ensure_allowed(identity, &resource, capability, R::NAME)?;
    Ok(resource)
}

/// Replaces a resource the caller may edit. A row that vanishes between the fetch
/// and the write is reported as `NotFound`.
pub async fn update_guarded<R: Resource>(
    store: &dyn ResourceStore<R>,
    identity: &Identity,
    id: i64,
    draft: R::Draft,
) -> AppResult<R> {
    fetch_authorized(store, identity, id, Capability::Edit).await?;
    write_update(store, identity, id, draft).await
}

/// The write half of [`update_guarded`], for orchestrators that run extra checks
/// between authorization and the write. Callers must have authorized `Edit` already.
pub async fn write_update<R: Resource>(
    store: &dyn ResourceStore<R>,
    identity: &Identity,
    id: i64,
    draft: R::Draft,
) -> AppResult<R> {
    let updated = store
        .update(id, draft)
        .await?
        .ok_or_else(|| AppError::not_found(R::NAME, id))?;
    tracing::info!(resource = R::NAME, id, user_id = identity.id(), "resource updated");
    Ok(updated)
}

/// Deletes a resource the caller may delete. Nothing is written when the policy denies.
pub async fn delete_guarded<R: Resource>(
    store: &dyn ResourceStore<R>,
    identity: &Identity,
    id: i64,
) -> AppResult<()> {
    fetch_authorized(store, identity, id, Capability::Delete).await?;
    let removed = store.delete_by_id(id).await?;
    confirm_deleted::<R>(removed, identity, id)
}

/// A row that vanished between the authorization and the delete reads as `NotFound`.
pub fn confirm_deleted<R: Resource>(removed: bool, identity: &Identity, id: i64) -> AppResult<()> {
    if !removed {
        return Err(AppError::not_found(R::NAME, id));
    }
    tracing::info!(resource = R::NAME, id, user_id = identity.id(), "resource deleted");
    Ok(())
}

/// list_page
///
/// Resolves `page`/`size` defaults, validates them, fetches the slice and assembles the envelope.
pub async fn list_page<R: Resource>(
    store: &dyn ResourceStore<R>,
    scope: R::Scope,
    query: PageQuery,
    sort: Sort,
    config: &AppConfig,
) -> AppResult<PagedEnvelope<R>> {
    let request = PageRequest::from_query(query, config.default_page_size, sort);
    let request = config.paginator().validate(request)?;
    let (content, total_elements) = store.find_page(scope, &request).await?;
    Ok(PagedEnvelope::assemble(
        content,
        request.page,
        request.size,
        total_elements,
    ))
}

/// Gate for admin-only actions that have no owning resource.
pub fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.is_admin() {
        return Ok(());
    }
    tracing::warn!(user_id = identity.id(), "admin-only action denied");
    Err(AppError::forbidden())
}

/// Shorthand for the `{success, message}` body returned after a delete.
pub(crate) fn deleted_message(resource: &str) -> crate::models::ApiMessage {
    crate::models::ApiMessage::ok(format!("You successfully deleted {}", resource.to_lowercase()))
}
