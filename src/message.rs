use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::citations::{
    self, AgentCitation, CitationMap, DisplayCitation, DocumentCitation, NumberedCitation,
    WebCitation,
};
use crate::render;

/// An assistant message as delivered by the conversation backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub hybrid_citations: Vec<DocumentCitation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub web_citations: Vec<WebCitation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub agent_citations: Vec<AgentCitation>,
}

/// Rendered message body handed to the UI.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub html: String,
    pub citations: Vec<NumberedCitation>,
    pub citations_map: CitationMap,
}

/// Everything the UI needs to show one message and its citation chips.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(flatten)]
    pub rendered: RenderedMessage,
    pub documents: Vec<DisplayCitation>,
    pub web: Vec<DisplayCitation>,
    pub agents: Vec<DisplayCitation>,
}

/// Number citation markers in `content` and render it to sanitized HTML.
pub fn process_content(
    content: &str,
    prior: CitationMap,
    sources: &[DocumentCitation],
) -> RenderedMessage {
    if content.trim().is_empty() {
        return RenderedMessage {
            citations_map: prior,
            ..Default::default()
        };
    }

    let extraction = citations::extract(content, prior, sources);
    let html = render::render_html(&extraction.text);
    debug!(
        html_len = html.len(),
        citations = extraction.citations.len(),
        "message rendered"
    );

    RenderedMessage {
        html,
        citations: extraction.citations,
        citations_map: extraction.numbers,
    }
}

impl Message {
    /// Render with a fresh numbering map.
    pub fn render(&self) -> MessageView {
        self.render_with(CitationMap::new())
    }

    /// Render continuing an existing numbering map (incremental re-renders).
    pub fn render_with(&self, prior: CitationMap) -> MessageView {
        MessageView {
            rendered: process_content(&self.content, prior, &self.hybrid_citations),
            documents: citations::format_document_citations(&self.hybrid_citations),
            web: citations::format_web_citations(&self.web_citations),
            agents: citations::format_agent_citations(&self.agent_citations),
        }
    }
}

fn lenient_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Missing, null, or non-array values become empty; malformed entries are skipped.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
