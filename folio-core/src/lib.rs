//! # folio-core
//!
//! Core library for the folio blog.
//!
//! This crate owns the article model: slug derivation, markdown rendering,
//! site configuration and the SQLite store with full-text search.

pub mod config;
pub mod markdown;
pub mod models;
pub mod slug;
pub mod store;

pub use config::{Config, ConfigError, SiteConfig};
pub use markdown::MarkdownProcessor;
pub use models::{Article, ArticleDraft, ArticleId, Order, ValidationErrors};
pub use slug::slugify;
pub use store::{ArticleStore, StoreError, StoreResult};
