//! # Views
//!
//! Server-rendered HTML for the browser UI. Pages are plain strings built
//! from escaped fragments; every piece of record data passes through
//! `html::escape` before it reaches the output.

pub mod html;
pub mod pages;
