//! # Bookstore HTTP Server Module
//!
//! Axum server exposing the catalog as JSON and as server-rendered pages.
//!
//! # Endpoints
//!
//! - `/health` - Health check (pings the store)
//! - `/api/books`, `/api/books/:id` - Book CRUD
//! - `/api/search`, `/api/authors`, `/api/years` - Queries
//! - `/`, `/books`, `/authors`, `/years`, `/search`, `/create` - HTML pages
//! - `/css/*` - Static stylesheets
//! - `/observability/*` - Metrics and health

pub mod book_routes;
pub mod config;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod observability_routes;
pub mod page_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{CreatedResponse, ErrorResponse, MessageResponse};
pub use server::{build_router, HttpServer};
pub use state::CatalogState;
