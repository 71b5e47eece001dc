pub mod markup;
pub mod references;
pub mod sanitize;
pub mod table;

pub use references::{render_reference_list, to_plain_text};
pub use table::normalize_box_tables;

/// Turn extractor output into HTML that is safe to inject as-is.
///
/// Order matters: whitespace and URL cleanup, box tables, markdown,
/// sanitization, then external link targets on the already-clean HTML.
pub fn render_html(annotated: &str) -> String {
    let cleaned = markup::clean_whitespace(annotated);
    let repaired = markup::repair_urls(&cleaned);
    let tabled = table::normalize_box_tables(&repaired);
    let html = markup::to_html(&tabled);
    let safe = sanitize::sanitize(&html);
    sanitize::open_external_links_in_new_tab(&safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_cross_reference_tags() {
        let text = r##"Bolts are torqued to spec<sup><a href="#citation-ref-1" class="citation-page-link" data-citation-id="doc_2" data-citation-number="1">[1]</a></sup>."##;
        let html = render_html(text);
        assert!(html.contains("<sup><a "));
        assert!(html.contains(r#"data-citation-id="doc_2""#));
        assert!(html.contains(r#"data-citation-number="1""#));
        assert!(html.contains(r##"href="#citation-ref-1""##));
        assert!(!html.contains("target="));
    }

    #[test]
    fn test_render_never_emits_script_or_handlers() {
        let text = "Hi <script>alert('x')</script>\n\n<img src=x onerror=alert(1)>\n\n<a href=\"https://e.com\" onclick=\"x()\">e</a>";
        let html = render_html(text);
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(!html.contains("onclick"));
        assert!(html.contains(r#"target="_blank" rel="noopener noreferrer""#));
    }

    #[test]
    fn test_render_box_table_and_repaired_link() {
        let text = "Results:\n┌───┬───┐\n│ a │ b │\n├───┼───┤\n│ 1 │ 2 │\n└───┴───┘\n\n\n\nSee https://example.com/docs]";
        let html = render_html(text);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>2</td>"));
        assert!(!html.contains("docs]"));
        assert!(!html.contains('┌'));
    }
}
