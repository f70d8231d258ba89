//! bookstore - A small bookstore catalog web service
//!
//! JSON and HTML endpoints over a document store of book records.

pub mod catalog;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod views;
