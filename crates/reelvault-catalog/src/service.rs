use async_trait::async_trait;
use reelvault_core::{
    Catalog, CatalogError, CatalogResult, Entry, EntryDraft, EntryId, EntryOwner, EntryPatch,
    EntryStore, ListQuery, ListRequest, Page, ReactionAction, Scope, UserId, VoteReceipt,
};
use std::sync::Arc;

/// A concrete implementation of the [`Catalog`] trait.
///
/// The service validates input before touching the store, enforces the
/// ownership gate, and leaves vote atomicity to the store's transaction.
#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S: EntryStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Fetches an entry iff the user owns it.
    ///
    /// An absent entry and a foreign entry answer identically so callers
    /// cannot probe for existence.
    async fn require_owned(&self, user: UserId, id: EntryId) -> CatalogResult<Entry> {
        match self.store.get(id).await? {
            Some(entry) if entry.owner.id == user => Ok(entry),
            _ => Err(CatalogError::NotFound),
        }
    }
}

#[async_trait]
impl<S: EntryStore> Catalog for CatalogService<S> {
    async fn create_entry(&self, owner: &EntryOwner, draft: EntryDraft) -> CatalogResult<Entry> {
        draft.validate().map_err(CatalogError::Validation)?;
        Ok(self.store.create(owner, draft).await?)
    }

    async fn update_entry(
        &self,
        user: UserId,
        id: EntryId,
        patch: EntryPatch,
    ) -> CatalogResult<Entry> {
        patch.validate().map_err(CatalogError::Validation)?;
        self.require_owned(user, id).await?;
        Ok(self.store.update(id, patch).await?)
    }

    async fn delete_entry(&self, user: UserId, id: EntryId) -> CatalogResult<()> {
        self.require_owned(user, id).await?;
        self.store.delete(id).await?;
        Ok(())
    }

    async fn release_entry(&self, user: UserId, id: EntryId) -> CatalogResult<Entry> {
        self.require_owned(user, id).await?;
        Ok(self.store.update(id, EntryPatch::release()).await?)
    }

    async fn vote(
        &self,
        user: UserId,
        id: EntryId,
        desired: ReactionAction,
    ) -> CatalogResult<VoteReceipt> {
        // Voting needs authentication only; owners may vote on their own
        // entries.
        let outcome = self.store.apply_vote(user, id, desired).await?;
        Ok(VoteReceipt {
            message: receipt_message(desired, outcome.action),
            entry: outcome.entry,
            action: outcome.action,
        })
    }

    async fn interaction(
        &self,
        user: UserId,
        id: EntryId,
    ) -> CatalogResult<Option<ReactionAction>> {
        Ok(self.store.reaction(user, id).await?)
    }

    async fn list_mine(&self, user: UserId, request: ListRequest) -> CatalogResult<Page<Entry>> {
        let query = ListQuery::resolve(Scope::Mine(user), request);
        Ok(self.store.list(&query).await?)
    }

    async fn list_community(&self, request: ListRequest) -> CatalogResult<Page<Entry>> {
        let query = ListQuery::resolve(Scope::Community, request);
        Ok(self.store.list(&query).await?)
    }

    async fn search(&self, request: ListRequest) -> CatalogResult<Page<Entry>> {
        let query = ListQuery::resolve(Scope::All, request);
        Ok(self.store.list(&query).await?)
    }
}

fn receipt_message(desired: ReactionAction, resulting: Option<ReactionAction>) -> &'static str {
    match (desired, resulting) {
        (ReactionAction::Like, Some(_)) => "Entry liked successfully",
        (ReactionAction::Like, None) => "Like removed successfully",
        (ReactionAction::Dislike, Some(_)) => "Entry disliked successfully",
        (ReactionAction::Dislike, None) => "Dislike removed successfully",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::{EntryFilter, EntryKind, PageRequest};
    use reelvault_storage::InMemoryStore;

    fn service() -> CatalogService<InMemoryStore> {
        CatalogService::new(InMemoryStore::new())
    }

    fn owner(id: UserId) -> EntryOwner {
        EntryOwner {
            id,
            name: format!("user-{id}"),
        }
    }

    fn draft(title: &str) -> EntryDraft {
        EntryDraft {
            title: title.to_string(),
            kind: EntryKind::Movie,
            director: "Christopher Nolan".to_string(),
            budget: "$160M".to_string(),
            location: "Los Angeles".to_string(),
            duration: "148 min".to_string(),
            year_time: "2010".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn create_validates_before_store() {
        let service = service();
        let mut bad = draft("");
        bad.director = String::new();

        let err = service.create_entry(&owner(1), bad).await.unwrap_err();
        let CatalogError::Validation(details) = err else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 2);

        // Nothing was persisted.
        let page = service.list_mine(1, ListRequest::default()).await.unwrap();
        assert_eq!(page.info.total, 0);
    }

    #[tokio::test]
    async fn update_requires_ownership() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let patch = EntryPatch {
            title: Some("Stolen".to_string()),
            ..EntryPatch::default()
        };
        let err = service.update_entry(2, entry.id, patch).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));

        // Identical answer for an entry that does not exist at all.
        let err = service
            .update_entry(2, entry.id + 100, EntryPatch::release())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let err = service.delete_entry(2, entry.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));

        service.delete_entry(1, entry.id).await.unwrap();
        let err = service.delete_entry(1, entry.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn release_moves_entry_into_community_scope() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let community = service.list_community(ListRequest::default()).await.unwrap();
        assert_eq!(community.info.total, 0);

        let released = service.release_entry(1, entry.id).await.unwrap();
        assert!(released.is_released);

        let community = service.list_community(ListRequest::default()).await.unwrap();
        assert_eq!(community.info.total, 1);
    }

    #[tokio::test]
    async fn community_never_lists_unreleased_entries() {
        let service = service();
        for i in 0..3 {
            let entry = service
                .create_entry(&owner(1), draft(&format!("Entry {i}")))
                .await
                .unwrap();
            if i == 1 {
                service.release_entry(1, entry.id).await.unwrap();
            }
        }

        let community = service.list_community(ListRequest::default()).await.unwrap();
        assert_eq!(community.items.len(), 1);
        assert!(community.items.iter().all(|e| e.is_released));
    }

    #[tokio::test]
    async fn double_like_returns_to_baseline() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();
        let baseline = entry.likes;

        let receipt = service.vote(2, entry.id, ReactionAction::Like).await.unwrap();
        assert_eq!(receipt.action, Some(ReactionAction::Like));
        assert_eq!(receipt.message, "Entry liked successfully");
        assert_eq!(receipt.entry.likes, baseline + 1);

        let receipt = service.vote(2, entry.id, ReactionAction::Like).await.unwrap();
        assert_eq!(receipt.action, None);
        assert_eq!(receipt.message, "Like removed successfully");
        assert_eq!(receipt.entry.likes, baseline);

        assert_eq!(service.interaction(2, entry.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn like_then_dislike_flips_the_reaction() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        service.vote(2, entry.id, ReactionAction::Like).await.unwrap();
        let receipt = service
            .vote(2, entry.id, ReactionAction::Dislike)
            .await
            .unwrap();

        assert_eq!(receipt.action, Some(ReactionAction::Dislike));
        assert_eq!(receipt.message, "Entry disliked successfully");
        assert_eq!((receipt.entry.likes, receipt.entry.dislikes), (0, 1));
        assert_eq!(
            service.interaction(2, entry.id).await.unwrap(),
            Some(ReactionAction::Dislike)
        );
    }

    #[tokio::test]
    async fn counters_never_go_negative_over_long_sequences() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let votes = [
            ReactionAction::Like,
            ReactionAction::Like,
            ReactionAction::Dislike,
            ReactionAction::Dislike,
            ReactionAction::Dislike,
            ReactionAction::Like,
            ReactionAction::Dislike,
            ReactionAction::Like,
        ];
        for vote in votes {
            let receipt = service.vote(2, entry.id, vote).await.unwrap();
            // u64 counters cannot be negative; check lockstep instead.
            let expected_likes =
                u64::from(receipt.action == Some(ReactionAction::Like));
            let expected_dislikes =
                u64::from(receipt.action == Some(ReactionAction::Dislike));
            assert_eq!(receipt.entry.likes, expected_likes);
            assert_eq!(receipt.entry.dislikes, expected_dislikes);
        }
    }

    #[tokio::test]
    async fn owners_may_vote_on_their_own_entries() {
        let service = service();
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let receipt = service.vote(1, entry.id, ReactionAction::Like).await.unwrap();
        assert_eq!(receipt.entry.likes, 1);
    }

    #[tokio::test]
    async fn vote_on_missing_entry_is_not_found() {
        let service = service();
        let err = service.vote(1, 7, ReactionAction::Like).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));

        let err = service.interaction(1, 7).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn concurrent_likes_from_two_users_both_land() {
        let service = Arc::new(service());
        let entry = service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();
        let baseline = entry.likes;

        let a = {
            let service = Arc::clone(&service);
            let id = entry.id;
            tokio::spawn(async move { service.vote(2, id, ReactionAction::Like).await })
        };
        let b = {
            let service = Arc::clone(&service);
            let id = entry.id;
            tokio::spawn(async move { service.vote(3, id, ReactionAction::Like).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let page = service.list_mine(1, ListRequest::default()).await.unwrap();
        assert_eq!(page.items[0].likes, baseline + 2);
    }

    #[tokio::test]
    async fn search_spans_unreleased_entries() {
        let service = service();
        service
            .create_entry(&owner(1), draft("Inception"))
            .await
            .unwrap();

        let request = ListRequest {
            filter: EntryFilter {
                query: Some("inception".to_string()),
                ..EntryFilter::default()
            },
            ..ListRequest::default()
        };
        let page = service.search(request).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(!page.items[0].is_released);
    }

    #[tokio::test]
    async fn listing_pagination_metadata() {
        let service = service();
        for i in 0..25 {
            service
                .create_entry(&owner(1), draft(&format!("Entry {i:02}")))
                .await
                .unwrap();
        }

        let request = ListRequest {
            page: PageRequest::new(2, 10).unwrap(),
            ..ListRequest::default()
        };
        let page = service.list_mine(1, request).await.unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.info.total_pages, 3);
        assert!(page.info.has_next);
        assert!(page.info.has_prev);
    }
}
