/// A citation id split into its document id and page/sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCitation {
    pub doc_id: String,
    pub page_number: Option<i64>,
}

/// Split a citation id on its last underscore.
///
/// Document ids may themselves contain underscores, so only the final
/// segment is treated as the page. Without an underscore, or with a
/// non-integer suffix, the page is `None`.
pub fn decode(citation_id: &str) -> DecodedCitation {
    match citation_id.rsplit_once('_') {
        Some((doc_id, page)) => DecodedCitation {
            doc_id: doc_id.to_string(),
            page_number: page.parse().ok(),
        },
        None => DecodedCitation {
            doc_id: citation_id.to_string(),
            page_number: None,
        },
    }
}

pub fn encode(doc_id: &str, page_number: i64) -> String {
    format!("{}_{}", doc_id, page_number)
}
