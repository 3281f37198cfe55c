// src/utils.rs

/// Escape text for HTML element content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `Some` only for strings with visible content.
pub fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// First character of a name, upper-cased, for the avatar placeholder.
pub fn initial_of(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Öne Çıkan"), "Öne Çıkan");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(&"x".to_string())), Some("x"));
        assert_eq!(non_blank(Some(&"  ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_initial_of() {
        assert_eq!(initial_of("fatma"), "F");
        assert_eq!(initial_of("  İlkay"), "İ");
        assert_eq!(initial_of(""), "");
    }
}
