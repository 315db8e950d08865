use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_entry_handler, delete_entry_handler, dislike_entry_handler, health_handler,
    interaction_handler, like_entry_handler, list_community_entries_handler,
    list_my_entries_handler, release_entry_handler, search_entries_handler, update_entry_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState, cors: CorsLayer) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/entries",
                Router::new()
                    .route("/", post(create_entry_handler))
                    .route("/my", get(list_my_entries_handler))
                    .route("/community", get(list_community_entries_handler))
                    .route("/search", get(search_entries_handler))
                    .route(
                        "/{id}",
                        put(update_entry_handler).delete(delete_entry_handler),
                    )
                    .route("/{id}/release", post(release_entry_handler))
                    .route("/{id}/like", post(like_entry_handler))
                    .route("/{id}/dislike", post(dislike_entry_handler))
                    .route("/{id}/interaction", get(interaction_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }
}
