#![warn(clippy::all, missing_docs)]

//! Core domain logic for the MyGameList terminal client.
//!
//! This crate hosts the data models, configuration handling, the HTTP
//! gateway against the game-collection REST backend, the request/state
//! adapter, and the catalog and form view models used by the terminal UI
//! and any future frontends.

pub mod api;
pub mod catalog;
pub mod config;
pub mod form;
pub mod models;
pub mod service;

pub use api::{ApiError, GameApi};
pub use catalog::{
    build_page, collection_stats, CatalogPage, CatalogState, CollectionStats, SortKey,
    StatusFilter, PAGE_SIZE,
};
pub use config::AppConfig;
pub use form::{FormSubmission, GameDraft};
pub use models::{CreateGameInput, Game};
pub use service::GameService;
