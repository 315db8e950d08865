use crate::error::CatalogResult;
use crate::query::{ListRequest, Page};
use crate::reaction::ReactionAction;
use crate::types::{Entry, EntryDraft, EntryId, EntryOwner, EntryPatch, UserId};
use async_trait::async_trait;

/// A vote result as reported back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteReceipt {
    pub entry: Entry,
    /// The caller's reaction after the vote; `None` means the vote removed
    /// a previous reaction.
    pub action: Option<ReactionAction>,
    /// Human-readable description of what the vote did.
    pub message: &'static str,
}

/// The catalog service contract consumed by the HTTP gateway.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Creates an entry owned by `owner` after validating the draft.
    async fn create_entry(&self, owner: &EntryOwner, draft: EntryDraft) -> CatalogResult<Entry>;

    /// Applies a patch to an entry the user owns.
    async fn update_entry(
        &self,
        user: UserId,
        id: EntryId,
        patch: EntryPatch,
    ) -> CatalogResult<Entry>;

    /// Deletes an entry the user owns.
    async fn delete_entry(&self, user: UserId, id: EntryId) -> CatalogResult<()>;

    /// Marks an entry the user owns as released into the community scope.
    async fn release_entry(&self, user: UserId, id: EntryId) -> CatalogResult<Entry>;

    /// Applies a like/dislike vote on behalf of an authenticated user.
    async fn vote(
        &self,
        user: UserId,
        id: EntryId,
        desired: ReactionAction,
    ) -> CatalogResult<VoteReceipt>;

    /// Reports the user's current reaction to an entry.
    async fn interaction(&self, user: UserId, id: EntryId)
        -> CatalogResult<Option<ReactionAction>>;

    /// Lists the user's own entries.
    async fn list_mine(&self, user: UserId, request: ListRequest) -> CatalogResult<Page<Entry>>;

    /// Lists released entries, community-wide.
    async fn list_community(&self, request: ListRequest) -> CatalogResult<Page<Entry>>;

    /// Searches across all entries regardless of release state.
    async fn search(&self, request: ListRequest) -> CatalogResult<Page<Entry>>;
}
