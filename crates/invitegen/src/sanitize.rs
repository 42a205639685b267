//! Helpers for turning catalog names into ids/storage keys and for keeping
//! remote error bodies and URLs short enough for span attributes.

/// Maximum length for response bodies quoted in errors and logs.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Lowercases and collapses every non-alphanumeric run into a single `-`.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Truncates a remote error body on a char boundary.
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}

/// Drops the query string from a URL. Signed synthesis URLs carry
/// credentials in the query.
pub fn redact_url(url: &str) -> String {
    match url.find('?') {
        Some(pos) => format!("{}?…", &url[..pos]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Save the Date"), "save-the-date");
        assert_eq!(slugify("  Art   Deco "), "art-deco");
        assert_eq!(slugify("bar-mitzvah"), "bar-mitzvah");
        assert_eq!(slugify("Kids & Teens!"), "kids-teens");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(150);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() <= MAX_ERROR_BODY_LENGTH + "... (truncated)".len());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("https://blob.example/img.png?sig=secret&se=2025"),
            "https://blob.example/img.png?…"
        );
        assert_eq!(redact_url("https://blob.example/img.png"), "https://blob.example/img.png");
    }
}
