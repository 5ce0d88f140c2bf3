//! Askama template definitions.

use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::{Article, ArticleDraft, MarkdownProcessor, SiteConfig, ValidationErrors};

/// Site-wide values used by the page layout
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    pub year: i32,
}

impl SiteMeta {
    pub fn new(site: &SiteConfig, year: i32) -> Self {
        Self {
            title: site.title.clone(),
            author: site.author.clone(),
            description: site.description.clone(),
            year,
        }
    }
}

/// An article entry for display in lists
#[derive(Debug, Clone)]
pub struct ArticleEntry {
    pub url: String,
    pub title: String,
    pub abstract_text: String,
    pub date: String,
    pub datetime: String,
}

impl From<&Article> for ArticleEntry {
    fn from(article: &Article) -> Self {
        Self {
            url: article.url(),
            title: article.title.clone(),
            abstract_text: article.abstract_text.clone(),
            date: display_date(&article.timestamp),
            datetime: article.timestamp.to_rfc3339(),
        }
    }
}

fn display_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}

/// Listing / search results page
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub site: SiteMeta,
    pub articles: Vec<ArticleEntry>,

    // Echoed back into the search form
    pub search: String,
    pub order: &'static str,
}

/// Single article page
#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub site: SiteMeta,
    pub title: String,
    pub abstract_text: String,
    pub date: String,
    pub datetime: String,
    pub content_html: String,
    pub edit_url: String,
}

impl ArticleTemplate {
    pub fn new(site: SiteMeta, article: &Article) -> Self {
        Self {
            site,
            title: article.title.clone(),
            abstract_text: article.abstract_text.clone(),
            date: display_date(&article.timestamp),
            datetime: article.timestamp.to_rfc3339(),
            content_html: article.content_html.clone(),
            edit_url: article.edit_url(),
        }
    }
}

/// Submitted or pre-populated values of the article form
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub abstract_text: String,
    pub content: String,
    pub errors: ValidationErrors,
}

impl ArticleForm {
    pub fn new(draft: ArticleDraft, errors: ValidationErrors) -> Self {
        Self {
            title: draft.title,
            abstract_text: draft.abstract_text,
            content: draft.content,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub site: SiteMeta,
    pub form: ArticleForm,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub site: SiteMeta,
    pub form: ArticleForm,

    /// Where both the edit and the delete form post to
    pub action_url: String,
    pub view_url: String,
}

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub site: SiteMeta,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub site: SiteMeta,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub site: SiteMeta,
}

/// One `<item>` of the RSS feed
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

/// RSS 2.0 feed document
#[derive(Template)]
#[template(path = "feed.xml")]
pub struct FeedTemplate {
    pub site_title: String,
    pub site_link: String,
    pub site_description: String,
    pub last_build_date: Option<String>,
    pub items: Vec<FeedItem>,
}

impl FeedTemplate {
    /// Build the feed from articles already sorted newest first.
    pub fn new(site: &SiteConfig, articles: &[Article], renderer: &MarkdownProcessor) -> Self {
        let base = site.base_url();
        let items = articles
            .iter()
            .map(|article| FeedItem {
                title: article.title.clone(),
                link: format!("{}{}", base, article.url()),
                description: renderer.render_plain(&article.abstract_text),
                pub_date: article.timestamp.to_rfc2822(),
            })
            .collect();

        Self {
            site_title: site.title.clone(),
            site_link: format!("{}/", base),
            site_description: site.description.clone(),
            last_build_date: articles.first().map(|a| a.timestamp.to_rfc2822()),
            items,
        }
    }
}
