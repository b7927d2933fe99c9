//! HTML sanitizer
//!
//! Rendered Markdown passes through here before it reaches the content
//! region. The policy is an allowlist: known-safe tags keep their
//! known-safe attributes, script-bearing elements disappear with their
//! contents, and anything unrecognized is stripped while its children
//! survive.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Tags allowed through, attributes filtered.
    static ref ALLOWED_TAGS: HashSet<&'static str> = [
        "a", "abbr", "b", "blockquote", "br", "code", "dd", "del", "div", "dl", "dt",
        "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
        "img", "input", "li", "ol", "p", "pre", "span", "strong", "sub", "sup",
        "table", "tbody", "td", "th", "thead", "tr", "ul",
    ]
    .into_iter()
    .collect();

    /// Tags removed together with everything inside them.
    static ref DROPPED_TAGS: HashSet<&'static str> =
        ["script", "style", "iframe", "object", "embed"].into_iter().collect();

    static ref ATTR: Regex =
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9:-]*)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s>/]+))?"#).unwrap();
}

/// Sanitize an HTML fragment.
///
/// The output contains no `<script>` elements, no inline event handlers,
/// and no `javascript:` URLs, regardless of what the source embedded.
pub fn sanitize(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let bytes = html.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(open) = html[pos..].find('<') else {
            out.push_str(&html[pos..]);
            break;
        };
        let open = pos + open;
        out.push_str(&html[pos..open]);

        let Some(close) = html[open..].find('>') else {
            // Dangling '<' at the end; escape it rather than emit raw.
            out.push_str("&lt;");
            pos = open + 1;
            continue;
        };
        let close = open + close;
        let tag = &html[open + 1..close];
        pos = close + 1;

        let (is_closing, rest) = match tag.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, tag),
        };
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if name.is_empty() {
            // Comments and malformed tags are dropped outright.
            continue;
        }

        if DROPPED_TAGS.contains(name.as_str()) {
            if !is_closing {
                // Swallow everything up to the matching close tag.
                let closer = format!("</{}", name);
                if let Some(end) = html[pos..].to_ascii_lowercase().find(&closer) {
                    let after = pos + end;
                    pos = match html[after..].find('>') {
                        Some(gt) => after + gt + 1,
                        None => html.len(),
                    };
                }
            }
            continue;
        }

        if !ALLOWED_TAGS.contains(name.as_str()) {
            // Unknown tag: drop the tag, keep its children.
            continue;
        }

        if is_closing {
            out.push_str(&format!("</{}>", name));
        } else {
            out.push_str(&rebuild_tag(&name, &rest[name.len()..]));
        }
    }

    out
}

/// Rebuild an allowed opening tag with only its safe attributes.
fn rebuild_tag(name: &str, attrs: &str) -> String {
    let self_closing = attrs.trim_end().ends_with('/');
    let mut tag = String::with_capacity(attrs.len() + name.len() + 2);
    tag.push('<');
    tag.push_str(name);

    for caps in ATTR.captures_iter(attrs) {
        let attr_name = caps[1].to_ascii_lowercase();
        if !attr_allowed(&attr_name) {
            continue;
        }
        match caps.get(2) {
            Some(value) => {
                if matches!(attr_name.as_str(), "href" | "src") && is_unsafe_url(value.as_str()) {
                    continue;
                }
                tag.push(' ');
                tag.push_str(&attr_name);
                tag.push('=');
                tag.push_str(value.as_str());
            }
            None => {
                tag.push(' ');
                tag.push_str(&attr_name);
            }
        }
    }

    if self_closing {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

fn attr_allowed(name: &str) -> bool {
    if name.starts_with("on") {
        return false;
    }
    // `style` stays: highlighted code blocks arrive as inline-styled spans.
    matches!(
        name,
        "href" | "src" | "alt" | "title" | "class" | "id" | "style" | "width" | "height"
            | "type" | "checked" | "disabled" | "align" | "colspan" | "rowspan"
            | "rel" | "target" | "loading"
    )
}

/// Reject URL schemes that execute code.
fn is_unsafe_url(value: &str) -> bool {
    let cleaned: String = value
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    cleaned.starts_with("javascript:")
        || cleaned.starts_with("vbscript:")
        || cleaned.starts_with("data:text/html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_script_and_contents() {
        let html = r#"<p>before</p><script>alert("x")</script><p>after</p>"#;
        let out = sanitize(html);
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("<p>before</p>"));
        assert!(out.contains("<p>after</p>"));
    }

    #[test]
    fn test_strips_event_handlers() {
        let html = r#"<img src="static/x.png" onerror="alert(1)" alt="x">"#;
        let out = sanitize(html);
        assert!(out.contains(r#"src="static/x.png""#));
        assert!(out.contains(r#"alt="x""#));
        assert!(!out.contains("onerror"));
    }

    #[test]
    fn test_blocks_javascript_urls() {
        let html = r#"<a href="javascript:alert(1)">click</a>"#;
        let out = sanitize(html);
        assert!(!out.contains("javascript:"));
        assert!(out.contains("click"));
    }

    #[test]
    fn test_blocks_obfuscated_javascript_url() {
        let html = "<a href=\"java\nscript:alert(1)\">x</a>";
        assert!(!sanitize(html).contains("script:alert"));
    }

    #[test]
    fn test_unknown_tag_keeps_children() {
        let out = sanitize("<custom-widget><em>kept</em></custom-widget>");
        assert_eq!(out, "<em>kept</em>");
    }

    #[test]
    fn test_allowed_markup_passes_through() {
        let html = r#"<h1>Title</h1><p>Some <strong>bold</strong> text.</p>"#;
        let out = sanitize(html);
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_drops_comments() {
        let out = sanitize("<p>a</p><!-- secret --><p>b</p>");
        assert!(!out.contains("secret"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("no markup here"), "no markup here");
    }
}
