//! Catalog service implementation.
//!
//! This crate provides the [`Catalog`](reelvault_core::Catalog)
//! implementation: draft/patch validation, the ownership access gate,
//! and vote orchestration over an [`EntryStore`](reelvault_core::EntryStore).

pub mod service;

pub use service::CatalogService;
