use crate::error::StoreResult;
use crate::query::{ListQuery, Page};
use crate::reaction::ReactionAction;
use crate::types::{Entry, EntryDraft, EntryId, EntryOwner, EntryPatch, UserId};
use async_trait::async_trait;

/// The result of applying one vote: the entry with its counters already
/// adjusted, and the caller's reaction after the vote.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub entry: Entry,
    pub action: Option<ReactionAction>,
}

/// The transactional relational store behind the catalog.
///
/// Implementations must apply [`apply_vote`](EntryStore::apply_vote) as a
/// single atomic unit: the ledger mutation and both counter deltas either
/// all land or none do, and concurrent votes on the same (user, entry)
/// pair serialize.
#[async_trait]
pub trait EntryStore: Send + Sync + 'static {
    /// Persists a new entry owned by `owner` and returns it with its
    /// store-assigned id and timestamps.
    async fn create(&self, owner: &EntryOwner, draft: EntryDraft) -> StoreResult<Entry>;

    /// Fetches an entry by id. Returns `None` if it does not exist.
    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>>;

    /// Applies a field-wise patch. Fails with `EntryNotFound` if the entry
    /// is gone.
    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Entry>;

    /// Deletes an entry and its ledger rows. Returns `true` if the entry
    /// existed.
    async fn delete(&self, id: EntryId) -> StoreResult<bool>;

    /// Executes a resolved listing query and returns one page plus its
    /// pagination metadata.
    async fn list(&self, query: &ListQuery) -> StoreResult<Page<Entry>>;

    /// Reports the user's current reaction to an entry. Fails with
    /// `EntryNotFound` if the entry does not exist.
    async fn reaction(
        &self,
        user_id: UserId,
        entry_id: EntryId,
    ) -> StoreResult<Option<ReactionAction>>;

    /// Applies one vote atomically: reads the ledger row, plans the
    /// transition, writes the ledger and both counters in one transaction.
    async fn apply_vote(
        &self,
        user_id: UserId,
        entry_id: EntryId,
        desired: ReactionAction,
    ) -> StoreResult<VoteOutcome>;
}
