//! Core types and the relationship graph engine for Mutuals.
//!
//! No HTTP or database code lives here; the store, api, server and cli crates
//! all build on it.

// Trait methods spell out their `Send` futures; impls use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod directory;
pub mod edge;
pub mod email;
pub mod error;
pub mod graph;
pub mod memory;
pub mod recipients;
pub mod store;

pub use error::{Error, Result};
