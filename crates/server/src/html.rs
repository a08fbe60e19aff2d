use std::fmt;

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `Display` adapter so escaped text can go straight into `write!`.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_html(self.0))
    }
}

/// Escaped text with newlines turned into `<br>`.
pub fn escape_multiline(input: &str) -> String {
    escape_html(input)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// Only `http(s)`, `mailto:` and site-relative links survive; anything else
/// becomes `#`.
pub fn safe_href(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"));
    if allowed {
        escape_html(trimmed)
    } else {
        "#".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>'"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(format!("{}", Escaped("a<b")), "a&lt;b");
    }

    #[test]
    fn multiline_keeps_breaks() {
        assert_eq!(escape_multiline("a\r\nb\n<c>"), "a<br>b<br>&lt;c&gt;");
    }

    #[test]
    fn hrefs_are_filtered() {
        assert_eq!(safe_href("https://example.com/?a=1&b=2"), "https://example.com/?a=1&amp;b=2");
        assert_eq!(safe_href("/uploads/a.png"), "/uploads/a.png");
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("//evil.example"), "#");
    }
}
