//! Core types and traits for the Reelvault catalog service.
//!
//! This crate provides the domain model, the reaction state machine,
//! query/pagination types, and the store and catalog contracts shared by
//! the storage backends and the HTTP gateway.

pub mod catalog;
pub mod error;
pub mod query;
pub mod reaction;
pub mod store;
pub mod types;

pub use catalog::{Catalog, VoteReceipt};
pub use error::{CatalogError, CatalogResult, FieldError, StoreError, StoreResult};
pub use query::{
    EntryFilter, ListQuery, ListRequest, Page, PageInfo, PageRequest, Scope, Sort, SortField,
    SortOrder, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use reaction::{LedgerOp, ReactionAction, VoteTransition};
pub use store::{EntryStore, VoteOutcome};
pub use types::{Entry, EntryDraft, EntryId, EntryKind, EntryOwner, EntryPatch, UserId};
