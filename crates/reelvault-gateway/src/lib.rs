//! HTTP gateway for the Reelvault catalog service.
//!
//! Exposes the catalog over a JSON API: entry CRUD, release,
//! like/dislike voting, interaction readback, and the my/community/search
//! listings. Authentication is a bearer token minted by the external
//! credential service; this crate only verifies it.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
