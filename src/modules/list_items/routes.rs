use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shelf_auth::CurrentUser;
use shelf_db::ListItemPatch;
use shelf_http::{AppError, JsonBody};

use super::models::{CreateListItem, DeleteOutcome, ListItemEnvelope, ListItemsEnvelope};
use super::service::ListItemService;

type ListItems = State<Arc<ListItemService>>;

pub(super) async fn list_list_items(
    State(service): ListItems,
    user: CurrentUser,
) -> Result<Json<ListItemsEnvelope>, AppError> {
    let list_items = service.list_list_items(&user).await?;
    Ok(Json(ListItemsEnvelope { list_items }))
}

pub(super) async fn create_list_item(
    State(service): ListItems,
    user: CurrentUser,
    JsonBody(body): JsonBody<CreateListItem>,
) -> Result<Json<ListItemEnvelope>, AppError> {
    let list_item = service
        .create_list_item(&user, body.book_id.as_deref())
        .await?;
    Ok(Json(ListItemEnvelope { list_item }))
}

pub(super) async fn get_list_item(
    State(service): ListItems,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ListItemEnvelope>, AppError> {
    let list_item = service.get_list_item(&user, &id).await?;
    Ok(Json(ListItemEnvelope { list_item }))
}

pub(super) async fn update_list_item(
    State(service): ListItems,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ListItemPatch>,
) -> Result<Json<ListItemEnvelope>, AppError> {
    let list_item = service.update_list_item(&user, &id, &patch).await?;
    Ok(Json(ListItemEnvelope { list_item }))
}

pub(super) async fn delete_list_item(
    State(service): ListItems,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    Ok(Json(service.delete_list_item(&user, &id).await?))
}
