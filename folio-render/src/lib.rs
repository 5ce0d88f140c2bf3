//! # folio-render
//!
//! Template rendering library for folio.
//!
//! This crate handles HTML and feed rendering using Askama.

pub mod templates;

pub use templates::{
    AboutTemplate, ArticleEntry, ArticleForm, ArticleTemplate, ContactTemplate, CreateTemplate,
    EditTemplate, FeedItem, FeedTemplate, IndexTemplate, PortfolioTemplate, SiteMeta,
};
