//! Route handlers.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use folio_core::{ArticleDraft, Order, StoreError, ValidationErrors};
use folio_render::{
    AboutTemplate, ArticleEntry, ArticleForm, ArticleTemplate, ContactTemplate, CreateTemplate,
    EditTemplate, FeedTemplate, IndexTemplate, PortfolioTemplate,
};
use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::{auth::Writer, error::AppError, server::AppState};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Search text and ordering, from the query string or the search form.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// Fields posted by the create and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub content: String,

    /// `update` (default) or `delete`; only read by the edit form
    #[serde(default)]
    pub action: Option<String>,
}

impl ArticleFormData {
    fn is_delete(&self) -> bool {
        self.action
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case("delete"))
    }

    fn into_draft(self) -> ArticleDraft {
        ArticleDraft::new(self.title.trim(), self.abstract_text, self.content)
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    list_articles(state, params).await
}

pub async fn search(
    State(state): State<AppState>,
    Form(params): Form<ListParams>,
) -> Result<Html<String>, AppError> {
    list_articles(state, params).await
}

async fn list_articles(state: AppState, params: ListParams) -> Result<Html<String>, AppError> {
    let order = Order::from_param(params.order.as_deref());
    let search = params.search.unwrap_or_default().trim().to_string();

    let query = search.clone();
    let result = state
        .with_store(move |store| {
            if query.is_empty() {
                store.list(order)
            } else {
                store.search(&query, order)
            }
        })
        .await?;

    // A query the index cannot parse simply matches nothing.
    let articles = match result {
        Err(StoreError::InvalidQuery { query, message }) => {
            debug!(%query, %message, "unusable search query");
            Vec::new()
        }
        other => other?,
    };

    let page = IndexTemplate {
        site: state.site_meta(),
        articles: articles.iter().map(ArticleEntry::from).collect(),
        search,
        order: order.as_str(),
    };
    Ok(Html(page.render()?))
}

pub async fn article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let article = state
        .with_store(move |store| store.get_by_slug(&slug))
        .await??
        .ok_or(AppError::NotFound)?;

    Ok(Html(ArticleTemplate::new(state.site_meta(), &article).render()?))
}

pub async fn create_form(
    _writer: Writer,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let page = CreateTemplate {
        site: state.site_meta(),
        form: ArticleForm::default(),
    };
    Ok(Html(page.render()?))
}

pub async fn create_submit(
    _writer: Writer,
    State(state): State<AppState>,
    Form(data): Form<ArticleFormData>,
) -> Result<Response, AppError> {
    let draft = data.into_draft();
    let attempt = draft.clone();

    match state.with_store(move |store| store.create(&attempt)).await? {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(err) => {
            let page = CreateTemplate {
                site: state.site_meta(),
                form: ArticleForm::new(draft, form_errors(err)?),
            };
            Ok(Html(page.render()?).into_response())
        }
    }
}

pub async fn edit_form(
    _writer: Writer,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let article = state
        .with_store(move |store| store.get_by_slug(&slug))
        .await??
        .ok_or(AppError::NotFound)?;

    let page = EditTemplate {
        site: state.site_meta(),
        form: ArticleForm::new(article.to_draft(), ValidationErrors::default()),
        action_url: location(&article.edit_url()),
        view_url: location(&article.url()),
    };
    Ok(Html(page.render()?))
}

pub async fn edit_submit(
    _writer: Writer,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(data): Form<ArticleFormData>,
) -> Result<Response, AppError> {
    let existing = state
        .with_store(move |store| store.get_by_slug(&slug))
        .await??
        .ok_or(AppError::NotFound)?;
    let id = existing.id;

    if data.is_delete() {
        state.with_store(move |store| store.delete(id)).await??;
        return Ok(Redirect::to("/").into_response());
    }

    let draft = data.into_draft();
    let attempt = draft.clone();

    match state
        .with_store(move |store| store.update(id, &attempt))
        .await?
    {
        Ok(updated) => Ok(Redirect::to(&location(&updated.url())).into_response()),
        Err(err) => {
            let page = EditTemplate {
                site: state.site_meta(),
                form: ArticleForm::new(draft, form_errors(err)?),
                action_url: location(&existing.edit_url()),
                view_url: location(&existing.url()),
            };
            Ok(Html(page.render()?).into_response())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewData {
    #[serde(default)]
    pub content: String,
}

/// Render draft markdown for the editor's live preview.
pub async fn preview(
    _writer: Writer,
    State(state): State<AppState>,
    Form(data): Form<PreviewData>,
) -> Result<Html<String>, AppError> {
    let renderer = state.renderer;
    let html = tokio::task::spawn_blocking(move || renderer.render(&data.content))
        .await
        .context("preview task failed")?;
    Ok(Html(html))
}

/// Turn store failures the author can fix into form errors.
fn form_errors(err: StoreError) -> Result<ValidationErrors, AppError> {
    match err {
        StoreError::Invalid(errors) => Ok(errors),
        StoreError::SlugConflict(slug) => Ok(ValidationErrors::title(format!(
            "An article at /{slug} already exists. Choose a different title."
        ))),
        StoreError::EmptySlug => Ok(ValidationErrors::title(
            "Title must contain at least one letter or digit.",
        )),
        StoreError::ReservedSlug(slug) => Ok(ValidationErrors::title(format!(
            "/{slug} is a site page. Choose a different title."
        ))),
        other => Err(other.into()),
    }
}

/// Percent-encode the non-ASCII bytes of a path so it is a valid header value.
fn location(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        if byte.is_ascii() && !byte.is_ascii_control() {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

pub async fn portfolio(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = PortfolioTemplate {
        site: state.site_meta(),
    };
    Ok(Html(page.render()?))
}

pub async fn about(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = AboutTemplate {
        site: state.site_meta(),
    };
    Ok(Html(page.render()?))
}

pub async fn contact(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = ContactTemplate {
        site: state.site_meta(),
    };
    Ok(Html(page.render()?))
}

pub async fn feed(State(state): State<AppState>) -> Result<Response, AppError> {
    let articles = state
        .with_store(|store| store.list(Order::Desc))
        .await??;
    let body = FeedTemplate::new(&state.site, &articles, &state.renderer).render()?;

    Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_encodes_non_ascii() {
        assert_eq!(location("/hello-world"), "/hello-world");
        assert_eq!(location("/café"), "/caf%C3%A9");
    }

    #[test]
    fn test_delete_action() {
        let data = ArticleFormData {
            action: Some("delete".into()),
            ..Default::default()
        };
        assert!(data.is_delete());
        assert!(!ArticleFormData::default().is_delete());
    }

    #[test]
    fn test_store_errors_become_title_errors() {
        let errors = form_errors(StoreError::SlugConflict("taken".into())).unwrap();
        assert_eq!(errors.title.len(), 1);
        assert!(errors.title[0].contains("/taken"));

        assert!(form_errors(StoreError::EmptySlug).is_ok());
        assert!(matches!(
            form_errors(StoreError::NotFound),
            Err(AppError::Store(StoreError::NotFound))
        ));
    }
}
