pub mod models;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{middleware::from_fn_with_state, routing::get, Router};

use shelf_auth::{authenticate, AuthService};
use shelf_db::BookStore;
use shelf_kernel::{InitCtx, Module};

/// Read-only catalogue lookups for signed-in users
pub struct BooksModule {
    auth: Arc<AuthService>,
    books: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(auth: Arc<AuthService>, books: Arc<dyn BookStore>) -> Self {
        Self { auth, books }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let catalogue_size = self.books.query("").await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            catalogue_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(routes::search_books))
            .route("/{id}", get(routes::get_book))
            .route_layer(from_fn_with_state(self.auth.clone(), authenticate))
            .with_state(self.books.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Search books by title or author",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [{ "name": "query", "in": "query", "required": false, "schema": { "type": "string" } }],
                        "responses": {
                            "200": {
                                "description": "Matching books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Read a book",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "book": { "$ref": "#/components/schemas/Book" } }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No such book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/MessageError" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Unique identifier for the book" },
                            "title": { "type": "string", "description": "Title of the book" },
                            "author": { "type": "string", "description": "Author of the book" },
                            "coverImageUrl": { "type": "string" },
                            "pageCount": { "type": "integer" },
                            "publisher": { "type": "string" },
                            "synopsis": { "type": "string" }
                        },
                        "required": ["id", "title", "author"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the books module
pub fn create_module(auth: Arc<AuthService>, books: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(auth, books))
}
