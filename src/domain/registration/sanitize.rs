//! Input sanitisation for submitted form values.

/// Strips markup and control characters, collapses whitespace, trims.
pub fn sanitize_text(raw: &str) -> String {
    collapse_whitespace(&strip_tags(raw))
}

/// Like [`sanitize_text`] but keeps line breaks.
pub fn sanitize_textarea(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let lines: Vec<String> = stripped
        .split('\n')
        .map(collapse_whitespace)
        .collect();
    lines.join("\n").trim().to_string()
}

/// Accepts only absolute http(s) URLs; anything else becomes empty.
pub fn sanitize_url(raw: &str) -> String {
    let url = sanitize_text(raw);
    let lower = url.to_ascii_lowercase();
    let has_scheme = lower.starts_with("http://") || lower.starts_with("https://");
    let host_present = url
        .split_once("://")
        .map(|(_, rest)| !rest.is_empty())
        .unwrap_or(false);
    if has_scheme && host_present && !url.contains(' ') && !url.contains('"') {
        url
    } else {
        String::new()
    }
}

/// Trims and lower-cases an email address.
pub fn sanitize_email(raw: &str) -> String {
    sanitize_text(raw).to_lowercase()
}

/// Checks the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && tld.len() >= 2
                && !domain.starts_with('.')
                && !domain.contains("..")
        }
        None => false,
    }
}

fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strips_tags_and_collapses_whitespace() {
        assert_eq!(sanitize_text("  Jane   <b>Doe</b>\n "), "Jane Doe");
        assert_eq!(sanitize_text("<script>alert(1)</script>Acme"), "alert(1)Acme");
    }

    #[test]
    fn text_drops_control_characters() {
        assert_eq!(sanitize_text("Ac\u{0007}me"), "Acme");
    }

    #[test]
    fn textarea_keeps_newlines() {
        assert_eq!(
            sanitize_textarea("We make  widgets.\r\n\r\nAnd <i>gadgets</i>. "),
            "We make widgets.\n\nAnd gadgets."
        );
    }

    #[test]
    fn url_requires_http_scheme() {
        assert_eq!(sanitize_url("https://acme.example"), "https://acme.example");
        assert_eq!(sanitize_url(" http://acme.example/about "), "http://acme.example/about");
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("acme.example"), "");
        assert_eq!(sanitize_url("https://"), "");
    }

    #[test]
    fn email_is_lower_cased() {
        assert_eq!(sanitize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@example"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a b@example.com"));
    }
}
