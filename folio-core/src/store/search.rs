//! Translation of user search text into FTS5 match expressions.

/// Build an FTS5 expression requiring every term, each as a quoted prefix.
///
/// Quoting keeps user text from being parsed as FTS5 syntax. Control
/// characters separate terms, since FTS5 stops reading a string at NUL.
/// Returns `None` when the text holds no searchable term.
pub fn build_match_expression(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(escape_fts_term)
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" AND "))
    }
}

fn escape_fts_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"*")
}

/// Whether a SQLite error came from a malformed MATCH expression.
pub(crate) fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}
