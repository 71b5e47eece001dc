use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

use super::codec;
use super::types::{AgentCitation, DisplayCitation, DocumentCitation, PageLabel, WebCitation};

pub fn format_document_citations(citations: &[DocumentCitation]) -> Vec<DisplayCitation> {
    citations
        .iter()
        .enumerate()
        .map(|(index, cite)| {
            let id = match cite.citation_id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => id.to_string(),
                None => codec::encode(
                    cite.chunk_id.as_deref().unwrap_or_default(),
                    cite.page_number.unwrap_or(index as i64),
                ),
            };
            let decoded = codec::decode(&id);
            let page_number = decoded
                .page_number
                .or(cite.page_number)
                .map(PageLabel::Number)
                .unwrap_or(PageLabel::NotAvailable);

            DisplayCitation::Document {
                id,
                doc_id: decoded.doc_id,
                file_name: cite.file_name.clone(),
                page_number,
                content: cite.content.clone().unwrap_or_default(),
            }
        })
        .collect()
}

pub fn format_web_citations(citations: &[WebCitation]) -> Vec<DisplayCitation> {
    citations
        .iter()
        .map(|cite| DisplayCitation::Web {
            url: cite.url.clone(),
            title: cite
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| cite.url.clone()),
        })
        .collect()
}

pub fn format_agent_citations(citations: &[AgentCitation]) -> Vec<DisplayCitation> {
    citations
        .iter()
        .enumerate()
        .map(|(index, cite)| DisplayCitation::Agent {
            tool_name: cite
                .tool_name
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("Tool {}", index + 1)),
            arguments: cite.function_arguments.as_ref().and_then(stringify),
            result: cite
                .function_result
                .as_ref()
                .and_then(stringify)
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "No result".to_string()),
            timestamp: cite.timestamp.clone(),
        })
        .collect()
}

/// Text stays as-is; structured values are serialized to JSON.
fn stringify(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Human-friendly age of a timestamp relative to `now`.
///
/// Accepts RFC 3339, naive ISO 8601 (taken as UTC), or a unix epoch in
/// seconds or milliseconds. Returns an empty string for anything else.
pub fn format_relative_timestamp(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(timestamp) else {
        return String::new();
    };

    let diff = now.signed_duration_since(at);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if diff.num_seconds() < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} {} ago", minutes, plural(minutes, "minute"))
    } else if hours < 24 {
        format!("{} {} ago", hours, plural(hours, "hour"))
    } else if days < 7 {
        format!("{} {} ago", days, plural(days, "day"))
    } else if at.year() != now.year() {
        at.format("%b %-d, %Y").to_string()
    } else {
        at.format("%b %-d").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let epoch: i64 = raw.parse().ok()?;
    if epoch.abs() >= 100_000_000_000 {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}

/// Cut `text` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_inputs_yield_empty_output() {
        assert!(format_document_citations(&[]).is_empty());
        assert!(format_web_citations(&[]).is_empty());
        assert!(format_agent_citations(&[]).is_empty());
    }

    #[test]
    fn test_document_citation_uses_id_and_decodes() {
        let out = format_document_citations(&[DocumentCitation {
            citation_id: Some("my_doc_12".to_string()),
            file_name: Some("a.pdf".to_string()),
            content: Some("excerpt".to_string()),
            ..Default::default()
        }]);
        assert_eq!(
            out[0],
            DisplayCitation::Document {
                id: "my_doc_12".to_string(),
                doc_id: "my_doc".to_string(),
                file_name: Some("a.pdf".to_string()),
                page_number: PageLabel::Number(12),
                content: "excerpt".to_string(),
            }
        );
    }

    #[test]
    fn test_document_citation_composes_id_from_chunk() {
        let out = format_document_citations(&[
            DocumentCitation {
                chunk_id: Some("chunkA".to_string()),
                page_number: Some(4),
                ..Default::default()
            },
            DocumentCitation {
                chunk_id: Some("chunkB".to_string()),
                ..Default::default()
            },
        ]);
        match &out[0] {
            DisplayCitation::Document { id, doc_id, page_number, .. } => {
                assert_eq!(id, "chunkA_4");
                assert_eq!(doc_id, "chunkA");
                assert_eq!(*page_number, PageLabel::Number(4));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &out[1] {
            DisplayCitation::Document { id, .. } => assert_eq!(id, "chunkB_1"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_document_citation_page_not_available() {
        let out = format_document_citations(&[DocumentCitation {
            citation_id: Some("plainid".to_string()),
            ..Default::default()
        }]);
        match &out[0] {
            DisplayCitation::Document { page_number, content, .. } => {
                assert_eq!(*page_number, PageLabel::NotAvailable);
                assert_eq!(page_number.to_string(), "N/A");
                assert!(content.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_web_citation_title_falls_back_to_url() {
        let out = format_web_citations(&[
            WebCitation {
                url: Some("https://example.com".to_string()),
                title: None,
            },
            WebCitation {
                url: Some("https://rust-lang.org".to_string()),
                title: Some("Rust".to_string()),
            },
        ]);
        assert_eq!(
            out[0],
            DisplayCitation::Web {
                url: Some("https://example.com".to_string()),
                title: Some("https://example.com".to_string()),
            }
        );
        assert_eq!(
            out[1],
            DisplayCitation::Web {
                url: Some("https://rust-lang.org".to_string()),
                title: Some("Rust".to_string()),
            }
        );
    }

    #[test]
    fn test_agent_citation_placeholder_name() {
        let cites = vec![
            AgentCitation {
                tool_name: Some("search".to_string()),
                ..Default::default()
            },
            AgentCitation::default(),
            AgentCitation::default(),
        ];
        let out = format_agent_citations(&cites);
        match &out[2] {
            DisplayCitation::Agent { tool_name, result, arguments, .. } => {
                assert_eq!(tool_name, "Tool 3");
                assert_eq!(result, "No result");
                assert!(arguments.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_agent_citation_stringifies_structured_values() {
        let out = format_agent_citations(&[AgentCitation {
            tool_name: Some("lookup".to_string()),
            function_arguments: Some(json!({"q": "rust"})),
            function_result: Some(json!("plain text")),
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
        }]);
        match &out[0] {
            DisplayCitation::Agent { arguments, result, timestamp, .. } => {
                assert_eq!(arguments.as_deref(), Some(r#"{"q":"rust"}"#));
                assert_eq!(result, "plain text");
                assert_eq!(timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_relative_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_relative_timestamp("2024-06-15T11:59:30Z", now), "Just now");
        assert_eq!(format_relative_timestamp("2024-06-15T11:59:00Z", now), "1 minute ago");
        assert_eq!(format_relative_timestamp("2024-06-15T09:00:00Z", now), "3 hours ago");
        assert_eq!(format_relative_timestamp("2024-06-13T12:00:00", now), "2 days ago");
        assert_eq!(format_relative_timestamp("2024-05-01T12:00:00Z", now), "May 1");
        assert_eq!(format_relative_timestamp("2023-05-01T12:00:00Z", now), "May 1, 2023");
        assert_eq!(format_relative_timestamp("1718452740", now), "1 minute ago");
        assert_eq!(format_relative_timestamp("", now), "");
        assert_eq!(format_relative_timestamp("yesterday", now), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence here", 8), "a longer...");
    }
}
