use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::codec;
use super::types::{CitationId, CitationMap, DocumentCitation, NumberedCitation};

/// `(Source: <file>, Page(s): <pages>)` with any `[#id; id]` groups directly after it.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\(Source:\s*([^,\n]+),\s*Page(?:s|\(s\))?:\s*([^)\n]+)\)((?:\s*\[#[^\]\n]*\])*)",
    )
    .unwrap()
});

static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[#([^\]\n]*)\]").unwrap());

/// Result of one extraction pass over a message.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Message text with every marker replaced by cross-reference tags.
    pub text: String,
    /// Citations numbered for the first time during this pass, in number order.
    pub citations: Vec<NumberedCitation>,
    /// The prior map plus this pass's assignments.
    pub numbers: CitationMap,
}

/// Replace citation markers with numbered cross-reference tags.
///
/// Ids already present in `numbers` keep their number; new ids continue the
/// sequence. The text is scanned once, left to right; inserted tags are
/// never re-scanned.
pub fn extract(text: &str, numbers: CitationMap, sources: &[DocumentCitation]) -> Extraction {
    let mut numbers = numbers;
    let mut next = numbers.values().copied().max().unwrap_or(0).max(numbers.len() as u32);
    let mut citations = Vec::new();

    let replaced = MARKER_RE.replace_all(text, |caps: &Captures<'_>| {
        let file_name = caps[1].trim();
        let ids = marker_ids(file_name, &caps[2], caps.get(3).map(|m| m.as_str()), sources);

        let mut tags = String::new();
        for id in ids {
            let number = match numbers.get(&id) {
                Some(n) => *n,
                None => {
                    next += 1;
                    numbers.insert(id.clone(), next);
                    citations.push(NumberedCitation {
                        number: next,
                        citation_id: id.clone(),
                        file_name: file_name.to_string(),
                        page_number: codec::decode(&id).page_number,
                    });
                    next
                }
            };
            tags.push_str(&cross_reference_tag(&id, number));
        }
        tags
    });

    if !citations.is_empty() {
        debug!(
            assigned = citations.len(),
            total = numbers.len(),
            "citation numbers assigned"
        );
    }

    Extraction {
        text: replaced.into_owned(),
        citations,
        numbers,
    }
}

/// Resolve the ordered, de-duplicated citation ids for one marker.
fn marker_ids(
    file_name: &str,
    pages: &str,
    brackets: Option<&str>,
    sources: &[DocumentCitation],
) -> Vec<CitationId> {
    let mut ids: Vec<CitationId> = brackets
        .map(|section| {
            BRACKET_RE
                .captures_iter(section)
                .flat_map(|c| {
                    c[1].split([';', ','])
                        .map(|r| r.trim().trim_start_matches('#').trim().to_string())
                        .collect::<Vec<_>>()
                })
                .filter(|r| !r.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if ids.is_empty() {
        for page in pages.split(',').filter_map(leading_page) {
            let matched = sources.iter().find(|c| {
                c.file_name.as_deref().map(str::trim) == Some(file_name)
                    && (c.page_number == Some(page) || c.chunk_sequence == Some(page))
            });
            match matched.and_then(DocumentCitation::source_id) {
                Some(id) => ids.push(id.to_string()),
                None => ids.push(codec::encode(&sanitize_file_name(file_name), page)),
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    ids
}

/// Leading integer of a page token, so `"3-5"` cites page 3.
fn leading_page(token: &str) -> Option<i64> {
    let token = token.trim();
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Replace every non-alphanumeric character with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn cross_reference_tag(citation_id: &str, number: u32) -> String {
    format!(
        r##"<sup><a href="#citation-ref-{n}" class="citation-page-link" data-citation-id="{id}" data-citation-number="{n}">[{n}]</a></sup>"##,
        n = number,
        id = ammonia::clean_text(citation_id),
    )
}
