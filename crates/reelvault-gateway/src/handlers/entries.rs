use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::model::{
    parse_entry_id, CreateEntryBody, EntryBody, ListParams, MessageBody, PageBody, SearchParams,
    SuccessBody, UpdateEntryBody,
};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelvault_core::FieldError;

pub async fn create_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    body: std::result::Result<Json<CreateEntryBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessBody<EntryBody>>)> {
    let Json(body) = body.map_err(bad_json)?;
    let draft = body.into_draft()?;

    let entry = state.catalog().create_entry(&user.owner(), draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessBody::with_message(
            EntryBody::from(entry),
            "Entry created successfully",
        )),
    ))
}

pub async fn list_my_entries_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<PageBody>> {
    let request = params.into_request()?;
    let page = state.catalog().list_mine(user.id, request).await?;
    Ok(Json(PageBody::from_page(page)))
}

pub async fn list_community_entries_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageBody>> {
    let request = params.into_request()?;
    let page = state.catalog().list_community(request).await?;
    Ok(Json(PageBody::from_page(page)))
}

pub async fn search_entries_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PageBody>> {
    let request = params.into_request()?;
    let page = state.catalog().search(request).await?;
    Ok(Json(PageBody::from_page(page)))
}

pub async fn update_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateEntryBody>, JsonRejection>,
) -> Result<Json<SuccessBody<EntryBody>>> {
    let id = parse_entry_id(&id)?;
    let Json(body) = body.map_err(bad_json)?;
    let patch = body.into_patch()?;

    let entry = state.catalog().update_entry(user.id, id, patch).await?;

    Ok(Json(SuccessBody::with_message(
        EntryBody::from(entry),
        "Entry updated successfully",
    )))
}

pub async fn delete_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_entry_id(&id)?;
    state.catalog().delete_entry(user.id, id).await?;
    Ok(Json(MessageBody::new("Entry deleted successfully")))
}

pub async fn release_entry_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<EntryBody>>> {
    let id = parse_entry_id(&id)?;
    let entry = state.catalog().release_entry(user.id, id).await?;
    Ok(Json(SuccessBody::with_message(
        EntryBody::from(entry),
        "Entry released to community successfully",
    )))
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
}
