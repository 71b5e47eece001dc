use crate::citations::{NumberedCitation, PageLabel};

/// Numbered reference entries that the inline `#citation-ref-N` links point at.
pub fn render_reference_list(citations: &[NumberedCitation]) -> String {
    if citations.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ol class=\"citation-references\">\n");
    for cite in citations {
        let page = cite
            .page_number
            .map(PageLabel::Number)
            .unwrap_or(PageLabel::NotAvailable);
        out.push_str(&format!(
            "<li id=\"citation-ref-{n}\" data-citation-id=\"{id}\"><span class=\"citation-number\">[{n}]</span> {file} <span class=\"citation-page\">p.{page}</span></li>\n",
            n = cite.number,
            id = ammonia::clean_text(&cite.citation_id),
            file = ammonia::clean_text(&cite.file_name),
            page = page,
        ));
    }
    out.push_str("</ol>");
    out
}

/// Terminal-friendly text for rendered HTML.
pub fn to_plain_text(html: &str, width: usize) -> String {
    html2text::from_read(html.as_bytes(), width).unwrap_or_else(|_| html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_list_entries() {
        let list = render_reference_list(&[
            NumberedCitation {
                number: 1,
                citation_id: "doc_3".to_string(),
                file_name: "a <b>.pdf".to_string(),
                page_number: Some(3),
            },
            NumberedCitation {
                number: 2,
                citation_id: "plain".to_string(),
                file_name: "notes.txt".to_string(),
                page_number: None,
            },
        ]);
        assert!(list.contains(r#"id="citation-ref-1""#));
        assert!(list.contains("p.3"));
        assert!(list.contains(r#"id="citation-ref-2""#));
        assert!(list.contains("p.N/A"));
        assert!(!list.contains("<b>"));
    }

    #[test]
    fn test_reference_list_empty() {
        assert_eq!(render_reference_list(&[]), "");
    }

    #[test]
    fn test_plain_text_drops_markup() {
        let text = to_plain_text("<p>Hello <strong>world</strong></p>", 80);
        assert!(text.contains("Hello"));
        assert!(!text.contains("<p>"));
    }
}
