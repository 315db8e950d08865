use async_trait::async_trait;
use jiff::Timestamp;
use reelvault_core::reaction::LedgerOp;
use reelvault_core::{
    Entry, EntryDraft, EntryFilter, EntryId, EntryKind, EntryOwner, EntryPatch, EntryStore,
    ListQuery, Page, PageInfo, ReactionAction, Scope, SortField, SortOrder, StoreError,
    StoreResult, UserId, VoteOutcome, VoteTransition,
};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

/// MySQL implementation of the store contract.
///
/// Votes run as one transaction: the entry row and the ledger row are
/// locked with `SELECT ... FOR UPDATE`, the transition is planned from the
/// locked ledger state, and the ledger mutation plus both counter writes
/// commit together. Concurrent votes on the same (user, entry) pair
/// therefore serialize on the row locks; a rollback leaves neither side
/// half-applied.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

const ENTRY_COLUMNS: &str = "e.id, e.title, e.kind, e.director, e.budget, e.location, \
     e.duration, e.year_time, e.image_url, e.is_released, e.likes, e.dislikes, \
     e.user_id, u.name AS owner_name, e.created_at, e.updated_at";

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_timestamp(field: &str, seconds: i64) -> StoreResult<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StoreError::InvalidData(format!("invalid {field} timestamp '{seconds}': {e}"))
    })
}

fn parse_kind(raw: &str) -> StoreResult<EntryKind> {
    raw.parse()
        .map_err(|()| StoreError::InvalidData(format!("invalid entry kind '{raw}'")))
}

fn parse_action(raw: &str) -> StoreResult<ReactionAction> {
    raw.parse()
        .map_err(|()| StoreError::InvalidData(format!("invalid reaction action '{raw}'")))
}

fn counter_from_row(entry_id: EntryId, field: &str, value: i64) -> StoreResult<u64> {
    u64::try_from(value).map_err(|_| {
        StoreError::Corruption(format!("entry {entry_id}: stored {field} is negative ({value})"))
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

fn entry_from_row(row: &MySqlRow) -> StoreResult<Entry> {
    let id: EntryId = row.try_get("id").map_err(map_sqlx_error)?;
    let kind_raw: String = row.try_get("kind").map_err(map_sqlx_error)?;
    let likes_raw: i64 = row.try_get("likes").map_err(map_sqlx_error)?;
    let dislikes_raw: i64 = row.try_get("dislikes").map_err(map_sqlx_error)?;
    let created_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_raw: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

    Ok(Entry {
        id,
        title: row.try_get("title").map_err(map_sqlx_error)?,
        kind: parse_kind(&kind_raw)?,
        director: row.try_get("director").map_err(map_sqlx_error)?,
        budget: row.try_get("budget").map_err(map_sqlx_error)?,
        location: row.try_get("location").map_err(map_sqlx_error)?,
        duration: row.try_get("duration").map_err(map_sqlx_error)?,
        year_time: row.try_get("year_time").map_err(map_sqlx_error)?,
        image_url: row.try_get("image_url").map_err(map_sqlx_error)?,
        is_released: row.try_get("is_released").map_err(map_sqlx_error)?,
        likes: counter_from_row(id, "likes", likes_raw)?,
        dislikes: counter_from_row(id, "dislikes", dislikes_raw)?,
        owner: EntryOwner {
            id: row.try_get("user_id").map_err(map_sqlx_error)?,
            name: row.try_get("owner_name").map_err(map_sqlx_error)?,
        },
        created_at: parse_timestamp("created_at", created_raw)?,
        updated_at: parse_timestamp("updated_at", updated_raw)?,
    })
}

async fn fetch_entry<'e, E>(executor: E, id: EntryId) -> StoreResult<Option<Entry>>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries e JOIN users u ON u.id = e.user_id \
         WHERE e.id = ? LIMIT 1"
    );
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.as_ref().map(entry_from_row).transpose()
}

/// A `%term%` LIKE pattern, lowercased, with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// As [`like_pattern`] but preserving case, for the free-text year field.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_conditions(qb: &mut QueryBuilder<'_, MySql>, query: &ListQuery) {
    qb.push("1 = 1");

    match query.scope {
        Scope::Mine(user_id) => {
            qb.push(" AND e.user_id = ").push_bind(user_id);
        }
        Scope::Community => {
            qb.push(" AND e.is_released = TRUE");
        }
        Scope::All => {}
    }

    push_filter(qb, &query.filter);
}

fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &EntryFilter) {
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (LOWER(e.title) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(e.director) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(e.location) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(query) = &filter.query {
        let pattern = like_pattern(query);
        qb.push(" AND (LOWER(e.title) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(e.director) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND e.kind = ").push_bind(kind.as_str());
    }
    if let Some(year) = &filter.year {
        qb.push(" AND e.year_time LIKE ").push_bind(contains_pattern(year));
    }
    if let Some(director) = &filter.director {
        qb.push(" AND LOWER(e.director) LIKE ")
            .push_bind(like_pattern(director));
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "e.created_at",
        SortField::Title => "e.title",
        SortField::Director => "e.director",
        SortField::YearTime => "e.year_time",
        SortField::Likes => "e.likes",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

#[async_trait]
impl EntryStore for MySqlStore {
    async fn create(&self, owner: &EntryOwner, draft: EntryDraft) -> StoreResult<Entry> {
        let now = now_unix_seconds();

        let result = sqlx::query(
            r#"
            INSERT INTO entries
                (title, kind, director, budget, location, duration, year_time,
                 image_url, is_released, likes, dislikes, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, FALSE, 0, 0, ?, ?, ?)
            "#,
        )
        .bind(&draft.title)
        .bind(draft.kind.as_str())
        .bind(&draft.director)
        .bind(&draft.budget)
        .bind(&draft.location)
        .bind(&draft.duration)
        .bind(&draft.year_time)
        .bind(&draft.image_url)
        .bind(owner.id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_id() as EntryId;
        fetch_entry(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::Operation(format!("entry {id} missing after insert")))
    }

    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>> {
        fetch_entry(&self.pool, id).await
    }

    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Entry> {
        let mut qb = QueryBuilder::<MySql>::new("UPDATE entries SET updated_at = ");
        qb.push_bind(now_unix_seconds());

        if let Some(title) = &patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(kind) = patch.kind {
            qb.push(", kind = ").push_bind(kind.as_str());
        }
        if let Some(director) = &patch.director {
            qb.push(", director = ").push_bind(director);
        }
        if let Some(budget) = &patch.budget {
            qb.push(", budget = ").push_bind(budget);
        }
        if let Some(location) = &patch.location {
            qb.push(", location = ").push_bind(location);
        }
        if let Some(duration) = &patch.duration {
            qb.push(", duration = ").push_bind(duration);
        }
        if let Some(year_time) = &patch.year_time {
            qb.push(", year_time = ").push_bind(year_time);
        }
        if let Some(image_url) = &patch.image_url {
            qb.push(", image_url = ").push_bind(image_url);
        }
        if let Some(is_released) = patch.is_released {
            qb.push(", is_released = ").push_bind(is_released);
        }
        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        fetch_entry(&self.pool, id)
            .await?
            .ok_or(StoreError::EntryNotFound(id))
    }

    async fn delete(&self, id: EntryId) -> StoreResult<bool> {
        // Ledger rows go with the entry via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Page<Entry>> {
        let mut count_qb =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM entries e WHERE ");
        push_conditions(&mut count_qb, query);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let total = u64::try_from(total).unwrap_or(0);

        let mut select_qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM entries e JOIN users u ON u.id = e.user_id WHERE "
        ));
        push_conditions(&mut select_qb, query);
        select_qb
            .push(" ORDER BY ")
            .push(sort_column(query.sort.field))
            .push(" ")
            .push(sort_direction(query.sort.order))
            .push(", e.id DESC LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let rows = select_qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let items = rows
            .iter()
            .map(entry_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Page {
            items,
            info: PageInfo::compute(query.page, total),
        })
    }

    async fn reaction(
        &self,
        user_id: UserId,
        entry_id: EntryId,
    ) -> StoreResult<Option<ReactionAction>> {
        let exists = sqlx::query("SELECT 1 FROM entries WHERE id = ? LIMIT 1")
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();
        if !exists {
            return Err(StoreError::EntryNotFound(entry_id));
        }

        let action: Option<String> =
            sqlx::query_scalar("SELECT action FROM reactions WHERE user_id = ? AND entry_id = ?")
                .bind(user_id)
                .bind(entry_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        action.as_deref().map(parse_action).transpose()
    }

    async fn apply_vote(
        &self,
        user_id: UserId,
        entry_id: EntryId,
        desired: ReactionAction,
    ) -> StoreResult<VoteOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Lock the entry row first, then the ledger row. Every vote takes
        // the locks in this order, so concurrent votes serialize instead
        // of deadlocking.
        let counters = sqlx::query("SELECT likes, dislikes FROM entries WHERE id = ? FOR UPDATE")
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        let Some(counters) = counters else {
            return Err(StoreError::EntryNotFound(entry_id));
        };
        let likes_raw: i64 = counters.try_get("likes").map_err(map_sqlx_error)?;
        let dislikes_raw: i64 = counters.try_get("dislikes").map_err(map_sqlx_error)?;

        let current: Option<String> = sqlx::query_scalar(
            "SELECT action FROM reactions WHERE user_id = ? AND entry_id = ? FOR UPDATE",
        )
        .bind(user_id)
        .bind(entry_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let current = current.as_deref().map(parse_action).transpose()?;

        let transition = VoteTransition::plan(current, desired);
        let now = now_unix_seconds();

        match transition.op {
            LedgerOp::Insert => {
                sqlx::query(
                    "INSERT INTO reactions (user_id, entry_id, action, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(user_id)
                .bind(entry_id)
                .bind(desired.as_str())
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            }
            LedgerOp::Remove => {
                sqlx::query("DELETE FROM reactions WHERE user_id = ? AND entry_id = ?")
                    .bind(user_id)
                    .bind(entry_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
            }
            LedgerOp::Replace => {
                sqlx::query(
                    "UPDATE reactions SET action = ?, updated_at = ? \
                     WHERE user_id = ? AND entry_id = ?",
                )
                .bind(desired.as_str())
                .bind(now)
                .bind(user_id)
                .bind(entry_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            }
        }

        let likes = likes_raw + transition.like_delta;
        let dislikes = dislikes_raw + transition.dislike_delta;
        if likes < 0 || dislikes < 0 {
            // Counters out of step with the ledger: corruption, not a user
            // error. Dropping the transaction rolls everything back.
            return Err(StoreError::Corruption(format!(
                "entry {entry_id}: counters would go negative (likes {likes}, dislikes {dislikes})"
            )));
        }

        sqlx::query("UPDATE entries SET likes = ?, dislikes = ?, updated_at = ? WHERE id = ?")
            .bind(likes)
            .bind(dislikes)
            .bind(now)
            .bind(entry_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let entry = fetch_entry(&mut *tx, entry_id)
            .await?
            .ok_or(StoreError::EntryNotFound(entry_id))?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(VoteOutcome {
            entry,
            action: transition.resulting,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_escape_metacharacters() {
        assert_eq!(like_pattern("Inception"), "%inception%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("2022"), "%2022%");
    }

    #[test]
    fn sort_columns_are_whitelisted() {
        assert_eq!(sort_column(SortField::CreatedAt), "e.created_at");
        assert_eq!(sort_column(SortField::Likes), "e.likes");
        assert_eq!(sort_direction(SortOrder::Asc), "ASC");
        assert_eq!(sort_direction(SortOrder::Desc), "DESC");
    }
}
