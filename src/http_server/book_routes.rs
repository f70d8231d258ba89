//! Book HTTP Routes
//!
//! JSON endpoints for the catalog, nested under `/api`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::catalog::{AuthorGroup, BookResponse, CatalogError, CatalogResult, YearGroup};

use super::errors::{CreatedResponse, MessageResponse};
use super::extract::BookPayload;
use super::state::CatalogState;

// ==================
// Request Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ==================
// Book Routes
// ==================

/// Create book routes
pub fn book_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route(
            "/books/:id",
            get(get_book_handler)
                .put(update_book_handler)
                .delete(delete_book_handler),
        )
        .route("/search", get(search_handler))
        .route("/authors", get(authors_handler))
        .route("/years", get(years_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_books_handler(
    State(state): State<Arc<CatalogState>>,
) -> CatalogResult<Json<Vec<BookResponse>>> {
    let books = state.run(|repo| repo.list_all()).await?;
    Ok(Json(books.iter().map(BookResponse::from).collect()))
}

async fn get_book_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<BookResponse>> {
    let book = state.run(move |repo| repo.get_by_id(&id)).await?;
    Ok(Json(BookResponse::from(&book)))
}

async fn create_book_handler(
    State(state): State<Arc<CatalogState>>,
    BookPayload(request): BookPayload,
) -> CatalogResult<(StatusCode, Json<CreatedResponse>)> {
    let book = match state.run(move |repo| repo.create(&request)).await {
        Ok(book) => book,
        Err(err) => {
            if matches!(err, CatalogError::DuplicateRecord) {
                state.metrics.increment_duplicates_rejected();
            }
            return Err(err);
        }
    };
    state.metrics.increment_books_created();

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Book created successfully".to_string(),
            id: book.id,
        }),
    ))
}

async fn update_book_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
    BookPayload(request): BookPayload,
) -> CatalogResult<Json<MessageResponse>> {
    state
        .run(move |repo| repo.update_from_request(&id, &request))
        .await?;
    state.metrics.increment_books_updated();

    Ok(Json(MessageResponse::new("Book updated successfully")))
}

async fn delete_book_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>> {
    state.run(move |repo| repo.delete_by_id(&id)).await?;
    state.metrics.increment_books_deleted();

    Ok(Json(MessageResponse::new("Book deleted successfully")))
}

async fn search_handler(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<SearchQuery>,
) -> CatalogResult<Json<Vec<BookResponse>>> {
    if query.q.trim().is_empty() {
        return Err(CatalogError::BadRequest(
            "Search query is required".to_string(),
        ));
    }

    state.metrics.increment_searches();
    let books = state.run(move |repo| repo.search(&query.q)).await?;
    Ok(Json(books.iter().map(BookResponse::from).collect()))
}

async fn authors_handler(
    State(state): State<Arc<CatalogState>>,
) -> CatalogResult<Json<Vec<AuthorGroup>>> {
    Ok(Json(state.run(|repo| repo.group_by_author()).await?))
}

async fn years_handler(
    State(state): State<Arc<CatalogState>>,
) -> CatalogResult<Json<Vec<YearGroup>>> {
    Ok(Json(state.run(|repo| repo.group_by_year()).await?))
}
