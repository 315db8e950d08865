use async_trait::async_trait;
use jiff::Timestamp;
use reelvault_core::{
    Entry, EntryDraft, EntryFilter, EntryId, EntryOwner, EntryPatch, EntryStore, ListQuery, Page,
    PageInfo, ReactionAction, Scope, Sort, SortField, SortOrder, StoreError, StoreResult, UserId,
    VoteOutcome, VoteTransition,
};
use reelvault_core::reaction::LedgerOp;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    next_id: EntryId,
    entries: BTreeMap<EntryId, Entry>,
    ledger: HashMap<(UserId, EntryId), ReactionAction>,
}

/// In-memory implementation of the store contract.
///
/// A single mutex guards both the entry map and the reaction ledger: a
/// vote mutates a ledger row and an entry's counters as one unit, so the
/// two maps must move together. Lock hold times are short and nothing is
/// awaited under the lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-mutation; nothing to recover.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EntryStore for InMemoryStore {
    async fn create(&self, owner: &EntryOwner, draft: EntryDraft) -> StoreResult<Entry> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let now = Timestamp::now();

        let entry = Entry {
            id: inner.next_id,
            title: draft.title,
            kind: draft.kind,
            director: draft.director,
            budget: draft.budget,
            location: draft.location,
            duration: draft.duration,
            year_time: draft.year_time,
            image_url: draft.image_url,
            is_released: false,
            likes: 0,
            dislikes: 0,
            owner: owner.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>> {
        Ok(self.lock().entries.get(&id).cloned())
    }

    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Entry> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(StoreError::EntryNotFound(id))?;

        patch.apply_to(entry);
        entry.updated_at = Timestamp::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: EntryId) -> StoreResult<bool> {
        let mut inner = self.lock();
        let existed = inner.entries.remove(&id).is_some();
        if existed {
            inner.ledger.retain(|(_, entry_id), _| *entry_id != id);
        }
        Ok(existed)
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Page<Entry>> {
        let inner = self.lock();

        let mut items: Vec<Entry> = inner
            .entries
            .values()
            .filter(|entry| in_scope(entry, query.scope) && matches_filter(entry, &query.filter))
            .cloned()
            .collect();
        drop(inner);

        sort_entries(&mut items, query.sort);

        let total = items.len() as u64;
        let info = PageInfo::compute(query.page, total);
        let offset = query.page.offset() as usize;
        let items = if offset >= items.len() {
            Vec::new()
        } else {
            let end = (offset + query.page.limit() as usize).min(items.len());
            items[offset..end].to_vec()
        };

        Ok(Page { items, info })
    }

    async fn reaction(
        &self,
        user_id: UserId,
        entry_id: EntryId,
    ) -> StoreResult<Option<ReactionAction>> {
        let inner = self.lock();
        if !inner.entries.contains_key(&entry_id) {
            return Err(StoreError::EntryNotFound(entry_id));
        }
        Ok(inner.ledger.get(&(user_id, entry_id)).copied())
    }

    async fn apply_vote(
        &self,
        user_id: UserId,
        entry_id: EntryId,
        desired: ReactionAction,
    ) -> StoreResult<VoteOutcome> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let Some(entry) = inner.entries.get_mut(&entry_id) else {
            return Err(StoreError::EntryNotFound(entry_id));
        };

        let current = inner.ledger.get(&(user_id, entry_id)).copied();
        let transition = VoteTransition::plan(current, desired);
        let likes = apply_delta(entry_id, "likes", entry.likes, transition.like_delta)?;
        let dislikes = apply_delta(entry_id, "dislikes", entry.dislikes, transition.dislike_delta)?;

        // Deltas verified; commit the ledger row and counters together.
        match transition.op {
            LedgerOp::Insert | LedgerOp::Replace => {
                inner.ledger.insert((user_id, entry_id), desired);
            }
            LedgerOp::Remove => {
                inner.ledger.remove(&(user_id, entry_id));
            }
        }

        entry.likes = likes;
        entry.dislikes = dislikes;
        entry.updated_at = Timestamp::now();

        Ok(VoteOutcome {
            entry: entry.clone(),
            action: transition.resulting,
        })
    }
}

fn apply_delta(entry_id: EntryId, counter: &str, value: u64, delta: i64) -> StoreResult<u64> {
    let next = value as i64 + delta;
    u64::try_from(next).map_err(|_| {
        StoreError::Corruption(format!(
            "entry {entry_id}: {counter} counter would go negative ({value} {delta:+})"
        ))
    })
}

fn in_scope(entry: &Entry, scope: Scope) -> bool {
    match scope {
        Scope::Mine(user_id) => entry.owner.id == user_id,
        Scope::Community => entry.is_released,
        Scope::All => true,
    }
}

fn matches_filter(entry: &Entry, filter: &EntryFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !contains_ci(&entry.title, &needle)
            && !contains_ci(&entry.director, &needle)
            && !contains_ci(&entry.location, &needle)
        {
            return false;
        }
    }
    if let Some(query) = &filter.query {
        let needle = query.to_lowercase();
        if !contains_ci(&entry.title, &needle) && !contains_ci(&entry.director, &needle) {
            return false;
        }
    }
    if let Some(kind) = filter.kind {
        if entry.kind != kind {
            return false;
        }
    }
    if let Some(year) = &filter.year {
        if !entry.year_time.contains(year.as_str()) {
            return false;
        }
    }
    if let Some(director) = &filter.director {
        if !contains_ci(&entry.director, &director.to_lowercase()) {
            return false;
        }
    }
    true
}

fn contains_ci(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn sort_entries(items: &mut [Entry], sort: Sort) {
    items.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Director => a.director.cmp(&b.director),
            SortField::YearTime => a.year_time.cmp(&b.year_time),
            SortField::Likes => a.likes.cmp(&b.likes),
        };
        let ordering = match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        // Newest-first tie break keeps pages stable.
        ordering.then(b.id.cmp(&a.id))
    });
}
