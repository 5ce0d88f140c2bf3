//! Article model, caller input and validation.

use chrono::{DateTime, Utc};
use std::fmt;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

const TITLE_LENGTH_MESSAGE: &str = "Field must be between 1 and 255 characters long.";
const REQUIRED_MESSAGE: &str = "This field is required.";
const CONTROL_CHAR_MESSAGE: &str = "Field must not contain control characters.";

/// Opaque article identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,

    /// Display title
    pub title: String,

    /// Short summary shown in listings and the feed
    pub abstract_text: String,

    /// URL slug derived from the title
    pub slug: String,

    /// Markdown source
    pub content: String,

    /// Rendered HTML of `content`
    pub content_html: String,

    /// Creation time; never changes
    pub timestamp: DateTime<Utc>,
}

impl Article {
    /// Public URL path for this article
    pub fn url(&self) -> String {
        format!("/{}", self.slug)
    }

    /// URL path of the edit form
    pub fn edit_url(&self) -> String {
        format!("/edit/{}", self.slug)
    }

    /// Editable fields as a draft, e.g. to pre-populate a form
    pub fn to_draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.clone(),
            abstract_text: self.abstract_text.clone(),
            content: self.content.clone(),
        }
    }
}

/// Timestamp ordering for listings and search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    /// Parse a request parameter. Anything other than `asc` sorts newest first.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("asc") => Order::Asc,
            _ => Order::Desc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }

    pub(crate) fn sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// The author-editable fields of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub abstract_text: String,
    pub content: String,
}

impl ArticleDraft {
    pub fn new(
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            content: content.into(),
        }
    }

    /// Check required fields and the title length.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > TITLE_MAX_CHARS {
            errors.title.push(TITLE_LENGTH_MESSAGE.to_string());
        }
        if self.title.chars().any(char::is_control) {
            errors.title.push(CONTROL_CHAR_MESSAGE.to_string());
        }
        if self.abstract_text.trim().is_empty() {
            errors.abstract_text.push(REQUIRED_MESSAGE.to_string());
        }
        if self.content.trim().is_empty() {
            errors.content.push(REQUIRED_MESSAGE.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field-level validation messages for an [`ArticleDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: Vec<String>,
    pub abstract_text: Vec<String>,
    pub content: Vec<String>,
}

impl ValidationErrors {
    /// A single error attached to the title field
    pub fn title(message: impl Into<String>) -> Self {
        Self {
            title: vec![message.into()],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.abstract_text.is_empty() && self.content.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("title", &self.title),
            ("abstract", &self.abstract_text),
            ("content", &self.content),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(name, messages)| format!("{}: {}", name, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft() {
        let draft = ArticleDraft::new("Title", "Summary", "Body");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let errors = ArticleDraft::new("", "  ", "\n").validate().unwrap_err();
        assert_eq!(errors.title.len(), 1);
        assert_eq!(errors.abstract_text, vec![REQUIRED_MESSAGE.to_string()]);
        assert_eq!(errors.content, vec![REQUIRED_MESSAGE.to_string()]);
        assert_eq!(
            errors.to_string(),
            format!(
                "title: {TITLE_LENGTH_MESSAGE}; abstract: {REQUIRED_MESSAGE}; content: {REQUIRED_MESSAGE}"
            )
        );
    }

    #[test]
    fn test_title_length_counts_characters() {
        let exact = "é".repeat(TITLE_MAX_CHARS);
        assert!(ArticleDraft::new(exact, "a", "c").validate().is_ok());

        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        let errors = ArticleDraft::new(long, "a", "c").validate().unwrap_err();
        assert!(!errors.title.is_empty());
        assert!(errors.content.is_empty());
    }

    #[test]
    fn test_control_characters_in_title() {
        for title in ["\0Hello", "Tab\there", "line\nbreak"] {
            let errors = ArticleDraft::new(title, "a", "c").validate().unwrap_err();
            assert_eq!(errors.title, vec![CONTROL_CHAR_MESSAGE.to_string()], "{title:?}");
        }
        assert!(ArticleDraft::new("Ünïcode — fine", "a", "c").validate().is_ok());
    }

    #[test]
    fn test_order_param() {
        assert_eq!(Order::from_param(Some("asc")), Order::Asc);
        assert_eq!(Order::from_param(Some(" ASC ")), Order::Asc);
        assert_eq!(Order::from_param(Some("desc")), Order::Desc);
        assert_eq!(Order::from_param(Some("sideways")), Order::Desc);
        assert_eq!(Order::from_param(None), Order::Desc);
    }
}
