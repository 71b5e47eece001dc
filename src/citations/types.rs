use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical citation identifier: `<documentId>_<pageOrSequence>`.
pub type CitationId = String;

/// Citation number assignments for one message render pass.
pub type CitationMap = HashMap<CitationId, u32>;

/// A citation into a page or chunk of an ingested document ("hybrid" citation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCitation {
    #[serde(default)]
    pub citation_id: Option<String>,
    #[serde(default)]
    pub chunk_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub page_number: Option<i64>,
    /// Stands in for the page number on non-paginated media (e.g. video seconds).
    #[serde(default, deserialize_with = "lenient_number")]
    pub chunk_sequence: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}

impl DocumentCitation {
    /// The id the backend assigned, preferring `citation_id` over `chunk_id`.
    pub fn source_id(&self) -> Option<&str> {
        self.citation_id
            .as_deref()
            .or(self.chunk_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebCitation {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A tool invocation the assistant relied on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCitation {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub function_arguments: Option<serde_json::Value>,
    #[serde(default)]
    pub function_result: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

/// Page label shown next to a document citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Number(i64),
    NotAvailable,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Number(n) => write!(f, "{}", n),
            PageLabel::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for PageLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageLabel::Number(n) => serializer.serialize_i64(*n),
            PageLabel::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Uniform display shape for all three citation sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DisplayCitation {
    Document {
        id: CitationId,
        doc_id: String,
        file_name: Option<String>,
        page_number: PageLabel,
        content: String,
    },
    Web {
        url: Option<String>,
        title: Option<String>,
    },
    Agent {
        tool_name: String,
        arguments: Option<String>,
        result: String,
        timestamp: Option<String>,
    },
}

/// A citation that received a number during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedCitation {
    pub number: u32,
    pub citation_id: CitationId,
    pub file_name: String,
    pub page_number: Option<i64>,
}

/// Accepts a JSON number or a numeric string; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_citation_lenient_pages() {
        let json = r#"[
            {"citation_id": "doc1_3", "file_name": "a.pdf", "page_number": 3},
            {"chunk_id": "doc2_7", "file_name": "b.mp4", "page_number": "7", "chunk_sequence": 42.0},
            {"file_name": "c.pdf", "page_number": null, "chunk_sequence": "n/a"}
        ]"#;
        let cites: Vec<DocumentCitation> = serde_json::from_str(json).unwrap();
        assert_eq!(cites[0].page_number, Some(3));
        assert_eq!(cites[1].page_number, Some(7));
        assert_eq!(cites[1].chunk_sequence, Some(42));
        assert_eq!(cites[1].source_id(), Some("doc2_7"));
        assert_eq!(cites[2].page_number, None);
        assert_eq!(cites[2].chunk_sequence, None);
        assert_eq!(cites[2].source_id(), None);
    }

    #[test]
    fn test_display_citation_serializes_tagged() {
        let cite = DisplayCitation::Document {
            id: "doc_1".to_string(),
            doc_id: "doc".to_string(),
            file_name: Some("a.pdf".to_string()),
            page_number: PageLabel::NotAvailable,
            content: String::new(),
        };
        let json = serde_json::to_value(&cite).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["docId"], "doc");
        assert_eq!(json["pageNumber"], "N/A");
    }

    #[test]
    fn test_agent_timestamp_accepts_number() {
        let cite: AgentCitation =
            serde_json::from_str(r#"{"tool_name": "search", "timestamp": 1700000000}"#).unwrap();
        assert_eq!(cite.timestamp.as_deref(), Some("1700000000"));
    }
}
