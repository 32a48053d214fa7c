pub mod models;
mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use serde_json::json;

use shelf_auth::{authenticate, AuthService};
use shelf_kernel::{InitCtx, Module};

use service::ListItemService;

/// Reading-list module: every route requires a bearer token
pub struct ListItemsModule {
    auth: Arc<AuthService>,
    service: Arc<ListItemService>,
}

impl ListItemsModule {
    pub fn new(auth: Arc<AuthService>, service: Arc<ListItemService>) -> Self {
        Self { auth, service }
    }
}

#[async_trait]
impl Module for ListItemsModule {
    fn name(&self) -> &'static str {
        "list-items"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "list-items module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(routes::list_list_items).post(routes::create_list_item),
            )
            .route(
                "/{id}",
                get(routes::get_list_item)
                    .put(routes::update_list_item)
                    .delete(routes::delete_list_item),
            )
            .route_layer(from_fn_with_state(self.auth.clone(), authenticate))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let secured = json!([{ "bearerAuth": [] }]);
        let item = json!({
            "description": "List item with its book",
            "content": { "application/json": { "schema": {
                "type": "object",
                "properties": { "listItem": { "$ref": "#/components/schemas/ListItem" } }
            }}}
        });
        let message = json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/MessageError" } } }
        });
        let id_param = json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List the caller's list items",
                        "tags": ["List items"],
                        "security": secured,
                        "responses": { "200": { "description": "List items with their books" } }
                    },
                    "post": {
                        "summary": "Add a book to the caller's list",
                        "tags": ["List items"],
                        "security": secured,
                        "requestBody": { "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": { "bookId": { "type": "string" } },
                            "required": ["bookId"]
                        }}}},
                        "responses": {
                            "200": item,
                            "400": { "description": "Missing bookId or duplicate list item", "content": message["content"] }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Read a list item",
                        "tags": ["List items"],
                        "security": secured,
                        "parameters": id_param,
                        "responses": {
                            "200": item,
                            "403": { "description": "Owned by another user", "content": message["content"] },
                            "404": { "description": "No such list item", "content": message["content"] }
                        }
                    },
                    "put": {
                        "summary": "Update notes, rating or reading dates",
                        "tags": ["List items"],
                        "security": secured,
                        "parameters": id_param,
                        "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ListItemPatch" } } } },
                        "responses": { "200": item }
                    },
                    "delete": {
                        "summary": "Remove a list item",
                        "tags": ["List items"],
                        "security": secured,
                        "parameters": id_param,
                        "responses": { "200": { "description": "{\"success\": true}" } }
                    }
                }
            },
            "components": {
                "schemas": {
                    "ListItem": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "ownerId": { "type": "string" },
                            "bookId": { "type": "string" },
                            "rating": { "type": "integer", "description": "-1 when unrated" },
                            "notes": { "type": "string" },
                            "startDate": { "type": "integer", "description": "epoch milliseconds" },
                            "finishDate": { "type": ["integer", "null"] },
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["id", "ownerId", "bookId", "rating", "notes", "startDate"]
                    },
                    "ListItemPatch": {
                        "type": "object",
                        "properties": {
                            "notes": { "type": "string" },
                            "rating": { "type": "integer" },
                            "startDate": { "type": "integer" },
                            "finishDate": { "type": ["integer", "null"] }
                        }
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the list-items module
pub fn create_module(auth: Arc<AuthService>, service: Arc<ListItemService>) -> Arc<dyn Module> {
    Arc::new(ListItemsModule::new(auth, service))
}
