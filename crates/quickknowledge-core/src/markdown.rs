//! Markdown rendering for answers.
//!
//! A full renderer is an external collaborator behind [`MarkdownRenderer`].
//! When none is available, [`FallbackRenderer`] covers what answers use
//! most: line breaks, `**bold**`, `` `inline code` `` and bare URLs.

use once_cell::sync::Lazy;
use regex::Regex;

pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, text: &str) -> String;
}

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("code pattern"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://[^\s<]+)").expect("url pattern"));

/// Substitution-based renderer used when no Markdown engine is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRenderer;

impl MarkdownRenderer for FallbackRenderer {
    fn render(&self, text: &str) -> String {
        let escaped = escape_html(text);
        let html = escaped.replace('\n', "<br>");
        let html = BOLD.replace_all(&html, "<strong>$1</strong>");
        let html = CODE.replace_all(&html, "<code>$1</code>");
        let html = URL.replace_all(&html, r#"<a href="$1" target="_blank">$1</a>"#);
        html.into_owned()
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_breaks_bold_and_code() {
        let out = FallbackRenderer.render("Use **IKEv2**\nserver `vpn.company.com`");
        assert_eq!(
            out,
            "Use <strong>IKEv2</strong><br>server <code>vpn.company.com</code>"
        );
    }

    #[test]
    fn links_bare_urls_without_eating_breaks() {
        let out = FallbackRenderer.render("see https://example.com/manual\nthanks");
        assert_eq!(
            out,
            r#"see <a href="https://example.com/manual" target="_blank">https://example.com/manual</a><br>thanks"#
        );
    }

    #[test]
    fn escapes_markup_in_source() {
        assert_eq!(FallbackRenderer.render("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    }
}
