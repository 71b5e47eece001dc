use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;
use regex::{Captures, Regex};

static ANCHOR_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<a\s[^>]*>").unwrap());
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\shref="([^"]*)""#).unwrap());
static TARGET_REL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\s(?:target|rel)="[^"]*""#).unwrap());

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "em", "b", "i", "del", "s",
    "code", "pre", "blockquote", "ul", "ol", "li", "a", "sup", "sub", "table", "thead", "tbody",
    "tr", "th", "td", "img",
];

fn cleaner() -> Builder<'static> {
    let tag_attributes = HashMap::from([
        (
            "a",
            HashSet::from([
                "href",
                "title",
                "target",
                "rel",
                "data-citation-id",
                "data-citation-number",
            ]),
        ),
        ("img", HashSet::from(["src", "alt", "title"])),
        ("ol", HashSet::from(["start"])),
    ]);

    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .generic_attributes(HashSet::new())
        .tag_attributes(tag_attributes)
        .allowed_classes(HashMap::from([("a", HashSet::from(["citation-page-link"]))]))
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .link_rel(None);
    builder
}

/// Strip every tag and attribute outside the allow-list.
///
/// Disallowed elements are removed, not escaped; `<script>`/`<style>`
/// lose their content too.
pub fn sanitize(html: &str) -> String {
    cleaner().clean(html).to_string()
}

/// Add `target="_blank" rel="noopener noreferrer"` to anchors pointing at http(s) URLs.
pub fn open_external_links_in_new_tab(html: &str) -> String {
    ANCHOR_OPEN_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let tag = &caps[0];
            let external = HREF_RE.captures(tag).is_some_and(|h| {
                let href = h[1].to_ascii_lowercase();
                href.starts_with("http://") || href.starts_with("https://")
            });
            if !external {
                return tag.to_string();
            }
            let stripped = TARGET_REL_RE.replace_all(tag, "");
            let body = stripped.trim_end_matches('>');
            format!(r#"{} target="_blank" rel="noopener noreferrer">"#, body)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_and_handlers() {
        let dirty = r#"<p onclick="steal()">hi<script>alert(1)</script><img src="x.png" onerror="boom()"></p>"#;
        let clean = sanitize(dirty);
        assert!(!clean.contains("script"));
        assert!(!clean.contains("alert"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("onerror"));
        assert!(clean.contains("<p>hi"));
    }

    #[test]
    fn test_keeps_citation_attributes() {
        let tag = r##"<sup><a href="#citation-ref-2" class="citation-page-link" data-citation-id="doc_4" data-citation-number="2">[2]</a></sup>"##;
        let clean = sanitize(tag);
        assert!(clean.contains("<sup>"));
        assert!(clean.contains(r##"href="#citation-ref-2""##));
        assert!(clean.contains(r#"class="citation-page-link""#));
        assert!(clean.contains(r#"data-citation-id="doc_4""#));
        assert!(clean.contains(r#"data-citation-number="2""#));
    }

    #[test]
    fn test_drops_unknown_tags_and_classes() {
        let clean = sanitize(r#"<div class="x"><a class="evil" href="javascript:alert(1)">x</a><iframe src="https://a"></iframe></div>"#);
        assert!(!clean.contains("<div"));
        assert!(!clean.contains("iframe"));
        assert!(!clean.contains("evil"));
        assert!(!clean.contains("javascript"));
    }

    #[test]
    fn test_external_links_get_target() {
        let html = r##"<a href="https://example.com">x</a> <a href="#citation-ref-1">[1]</a>"##;
        let out = open_external_links_in_new_tab(html);
        assert!(out.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">"#
        ));
        assert!(out.contains(r##"<a href="#citation-ref-1">"##));
    }

    #[test]
    fn test_external_links_no_duplicate_attributes() {
        let html = r#"<a href="http://example.com" target="_self" rel="opener">x</a>"#;
        let out = open_external_links_in_new_tab(html);
        assert_eq!(out.matches("target=").count(), 1);
        assert_eq!(out.matches("rel=").count(), 1);
        assert!(out.contains(r#"target="_blank""#));
    }
}
