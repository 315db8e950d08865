use crate::auth::AuthUser;
use crate::error::Result;
use crate::model::{parse_entry_id, EntryBody, InteractionBody, SuccessBody};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use reelvault_core::ReactionAction;

/// Shared body of the like and dislike endpoints; only the desired
/// action differs.
async fn vote(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
    desired: ReactionAction,
) -> Result<Json<SuccessBody<EntryBody>>> {
    let id = parse_entry_id(raw_id)?;
    let receipt = state.catalog().vote(user.id, id, desired).await?;
    Ok(Json(SuccessBody::with_message(
        EntryBody::from(receipt.entry),
        receipt.message,
    )))
}

pub async fn like_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<EntryBody>>> {
    vote(&state, &user, &id, ReactionAction::Like).await
}

pub async fn dislike_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<EntryBody>>> {
    vote(&state, &user, &id, ReactionAction::Dislike).await
}

pub async fn interaction_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<InteractionBody>>> {
    let id = parse_entry_id(&id)?;
    let action = state.catalog().interaction(user.id, id).await?;
    Ok(Json(SuccessBody::new(InteractionBody { action })))
}
