//! Core types and trait definitions for the Mushaf offline reader.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! (e.g. `mushaf-store-sqlite`) implement [`store::LocalStore`]; front-ends
//! drive them through [`library::Library`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bookmark;
pub mod catalog;
pub mod document;
pub mod error;
pub mod library;
pub mod preferences;
pub mod source;
pub mod store;

pub use error::{Error, Result};
