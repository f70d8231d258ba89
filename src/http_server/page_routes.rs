//! Page HTTP Routes
//!
//! Server-rendered HTML for the browser UI.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};

use crate::views::pages;

use super::book_routes::SearchQuery;
use super::errors::PageError;
use super::state::CatalogState;

type PageResult = Result<Html<String>, PageError>;

/// Create page routes
pub fn page_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/books", get(books_page))
        .route("/authors", get(authors_page))
        .route("/years", get(years_page))
        .route("/search", get(search_page))
        .route("/create", get(create_page))
        .with_state(state)
}

async fn index_page() -> Html<String> {
    Html(pages::index())
}

async fn books_page(State(state): State<Arc<CatalogState>>) -> PageResult {
    let books = state.run(|repo| repo.list_all()).await?;
    Ok(Html(pages::books(&books)))
}

async fn authors_page(State(state): State<Arc<CatalogState>>) -> PageResult {
    let groups = state.run(|repo| repo.group_by_author()).await?;
    Ok(Html(pages::authors(&groups)))
}

async fn years_page(State(state): State<Arc<CatalogState>>) -> PageResult {
    let groups = state.run(|repo| repo.group_by_year()).await?;
    Ok(Html(pages::years(&groups)))
}

/// Blank form without a query; form plus results with one
async fn search_page(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let q = query.q;
    if q.trim().is_empty() {
        return Ok(Html(pages::search("", None)));
    }

    state.metrics.increment_searches();
    let term = q.clone();
    let books = state.run(move |repo| repo.search(&term)).await?;
    Ok(Html(pages::search(&q, Some(&books))))
}

async fn create_page() -> Html<String> {
    Html(pages::create_form())
}
