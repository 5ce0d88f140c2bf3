//! SQLite-backed article storage with full-text search.
//!
//! # Invariants
//! - `slug`, `content_html` and the `articles_fts` row are derived from the
//!   draft and written in the same transaction as the article row.
//! - `created_at` is written once on insert and never updated.
//! - Listing and search results are ordered by `created_at`, ties by id.

pub mod migrations;
pub mod search;

use crate::markdown::MarkdownProcessor;
use crate::models::{Article, ArticleDraft, ArticleId, Order, ValidationErrors};
use crate::slug::{is_reserved, slugify};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("article not found")]
    NotFound,

    #[error("an article with slug `{0}` already exists")]
    SlugConflict(String),

    #[error("title does not produce a usable slug")]
    EmptySlug,

    #[error("slug `{0}` is reserved for a site page")]
    ReservedSlug(String),

    #[error("invalid article: {0}")]
    Invalid(ValidationErrors),

    #[error("invalid search query `{query}`: {message}")]
    InvalidQuery { query: String, message: String },

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SELECT_ARTICLE: &str = "SELECT a.id, a.title, a.abstract, a.slug, a.content, a.content_html, a.created_at
     FROM articles AS a";

/// Fields computed from a draft before it is written.
struct Derived {
    slug: String,
    content_html: String,
}

/// Durable article storage over a single SQLite connection.
pub struct ArticleStore {
    conn: Mutex<Connection>,
    renderer: MarkdownProcessor,
}

impl ArticleStore {
    /// Open (or create) a database file and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();

        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        let store = Self::bootstrap(conn)?;

        info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "article store opened"
        );
        Ok(store)
    }

    /// Open a private in-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self::bootstrap(Connection::open_in_memory()?)?;
        debug!("in-memory article store opened");
        Ok(store)
    }

    fn bootstrap(mut conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrations::apply_migrations(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            renderer: MarkdownProcessor::new(),
        })
    }

    /// All articles ordered by timestamp.
    pub fn list(&self, order: Order) -> StoreResult<Vec<Article>> {
        let sql = format!(
            "{SELECT_ARTICLE} ORDER BY a.created_at {dir}, a.id {dir}",
            dir = order.sql()
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let articles = stmt
            .query_map([], article_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(articles)
    }

    /// Articles matching every term of `query`, ordered by timestamp.
    ///
    /// Blank queries match nothing.
    pub fn search(&self, query: &str, order: Order) -> StoreResult<Vec<Article>> {
        let Some(match_expr) = search::build_match_expression(query) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_ARTICLE}
             JOIN articles_fts ON articles_fts.rowid = a.id
             WHERE articles_fts MATCH ?1
             ORDER BY a.created_at {dir}, a.id {dir}",
            dir = order.sql()
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let articles = stmt
            .query_map([&match_expr], article_from_row)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|err| map_query_error(err, &match_expr))?;

        debug!(query, hits = articles.len(), "article search");
        Ok(articles)
    }

    pub fn get_by_slug(&self, slug: &str) -> StoreResult<Option<Article>> {
        let conn = self.conn.lock();
        fetch_one(&conn, "a.slug = ?1", &slug)
    }

    pub fn get(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        let conn = self.conn.lock();
        fetch_one(&conn, "a.id = ?1", &id.0)
    }

    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Insert a new article stamped with the current time.
    pub fn create(&self, draft: &ArticleDraft) -> StoreResult<Article> {
        let derived = self.derive(draft)?;
        let created_at = Utc::now().timestamp_micros();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO articles (title, abstract, slug, content, content_html, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.title,
                draft.abstract_text,
                derived.slug,
                draft.content,
                derived.content_html,
                created_at,
            ],
        )
        .map_err(|err| map_write_error(err, &derived.slug))?;
        let id = ArticleId(tx.last_insert_rowid());
        index_article(&tx, id, draft)?;
        let article = fetch_one(&tx, "a.id = ?1", &id.0)?.ok_or(StoreError::NotFound)?;
        tx.commit()?;

        info!(%id, slug = %article.slug, "article created");
        Ok(article)
    }

    /// Replace an article's title, abstract and content.
    ///
    /// Slug, HTML and search row are regenerated; id and timestamp are kept.
    pub fn update(&self, id: ArticleId, draft: &ArticleDraft) -> StoreResult<Article> {
        let derived = self.derive(draft)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let changed = tx
            .execute(
                "UPDATE articles
                 SET title = ?2, abstract = ?3, slug = ?4, content = ?5, content_html = ?6
                 WHERE id = ?1",
                params![
                    id.0,
                    draft.title,
                    draft.abstract_text,
                    derived.slug,
                    draft.content,
                    derived.content_html,
                ],
            )
            .map_err(|err| map_write_error(err, &derived.slug))?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        tx.execute("DELETE FROM articles_fts WHERE rowid = ?1", [id.0])?;
        index_article(&tx, id, draft)?;
        let article = fetch_one(&tx, "a.id = ?1", &id.0)?.ok_or(StoreError::NotFound)?;
        tx.commit()?;

        info!(%id, slug = %article.slug, "article updated");
        Ok(article)
    }

    /// Permanently remove an article and its search row.
    pub fn delete(&self, id: ArticleId) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let changed = tx.execute("DELETE FROM articles WHERE id = ?1", [id.0])?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        tx.execute("DELETE FROM articles_fts WHERE rowid = ?1", [id.0])?;
        tx.commit()?;

        info!(%id, "article deleted");
        Ok(())
    }

    fn derive(&self, draft: &ArticleDraft) -> StoreResult<Derived> {
        draft.validate().map_err(StoreError::Invalid)?;

        let slug = slugify(&draft.title);
        if slug.is_empty() {
            return Err(StoreError::EmptySlug);
        }
        if is_reserved(&slug) {
            return Err(StoreError::ReservedSlug(slug));
        }

        Ok(Derived {
            content_html: self.renderer.render(&draft.content),
            slug,
        })
    }
}

fn index_article(conn: &Connection, id: ArticleId, draft: &ArticleDraft) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO articles_fts (rowid, title, content, abstract) VALUES (?1, ?2, ?3, ?4)",
        params![id.0, draft.title, draft.content, draft.abstract_text],
    )?;
    Ok(())
}

fn fetch_one(
    conn: &Connection,
    predicate: &str,
    value: &dyn rusqlite::ToSql,
) -> StoreResult<Option<Article>> {
    let sql = format!("{SELECT_ARTICLE} WHERE {predicate}");
    let article = conn
        .query_row(&sql, [value], article_from_row)
        .optional()?;
    Ok(article)
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    let created_at: i64 = row.get(6)?;
    let timestamp = DateTime::<Utc>::from_timestamp_micros(created_at)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(6, created_at))?;

    Ok(Article {
        id: ArticleId(row.get(0)?),
        title: row.get(1)?,
        abstract_text: row.get(2)?,
        slug: row.get(3)?,
        content: row.get(4)?,
        content_html: row.get(5)?,
        timestamp,
    })
}

fn map_write_error(err: rusqlite::Error, slug: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::SlugConflict(slug.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

fn map_query_error(err: rusqlite::Error, query: &str) -> StoreError {
    if search::is_match_syntax_error(&err) {
        return StoreError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }
    StoreError::Sqlite(err)
}
