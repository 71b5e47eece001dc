use std::borrow::Cow;
use std::sync::LazyLock;

use pulldown_cmark::{html, Event, Options, Parser};
use regex::{Captures, Regex};

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static URL_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bhttps?://\S+").unwrap());

/// Trim and collapse runs of three or more newlines to a single blank line.
pub fn clean_whitespace(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text.trim(), "\n\n").into_owned()
}

/// Strip `]` / `%5D` left glued to the end of URLs by upstream escaping.
pub fn repair_urls(text: &str) -> Cow<'_, str> {
    URL_TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        strip_trailing_brackets(&caps[0]).to_string()
    })
}

fn strip_trailing_brackets(mut url: &str) -> &str {
    loop {
        if let Some(rest) = url.strip_suffix(']') {
            url = rest;
            continue;
        }
        let cut = url.len().saturating_sub(3);
        match (url.get(cut..), url.get(..cut)) {
            (Some(tail), Some(rest)) if tail.eq_ignore_ascii_case("%5D") => url = rest,
            _ => return url,
        }
    }
}

/// Render markdown to HTML; single newlines become `<br />`.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("\n\n  a\n\n\n\n\nb\n\nc  \n"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_repair_urls_strips_brackets() {
        assert_eq!(
            repair_urls("see https://example.com/a]] now"),
            "see https://example.com/a now"
        );
        assert_eq!(
            repair_urls("see https://example.com/a%5D%5d and http://x.io/b]%5D"),
            "see https://example.com/a and http://x.io/b"
        );
    }

    #[test]
    fn test_repair_urls_leaves_other_text() {
        let text = "array[0] and [link](https://example.com/path)";
        assert_eq!(repair_urls(text), text);
    }

    #[test]
    fn test_single_newline_is_line_break() {
        let html = to_html("line one\nline two");
        assert!(html.contains("line one<br />"));
        assert!(html.contains("line two"));
    }

    #[test]
    fn test_lists_headings_emphasis_tables() {
        let html = to_html("# Title\n\n- **a**\n- *b*\n\n| x | y |\n| --- | --- |\n| 1 | 2 |\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<li><strong>a</strong></li>"));
        assert!(html.contains("<em>b</em>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>2</td>"));
    }
}
