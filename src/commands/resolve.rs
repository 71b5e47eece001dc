use tracing::info;

use citekit::viewer::{HttpClassifier, Position};
use citekit::{citations, CitationViewer, Config, OpenRequest, ViewerState};

pub async fn resolve(
    config: &Config,
    citation_id: String,
    file_name: Option<String>,
    timestamp: Option<String>,
) -> anyhow::Result<()> {
    let decoded = citations::decode(&citation_id);
    let position = match timestamp {
        Some(t) => Some(Position::Text(t)),
        None => decoded.page_number.map(Position::from),
    };
    let request = OpenRequest {
        citation_id,
        doc_id: decoded.doc_id,
        position,
        file_name,
    };

    let classifier = HttpClassifier::new(config)?;
    let mut viewer = CitationViewer::new(config.endpoints());

    match viewer.open(&classifier, request).await {
        ViewerState::Ready { descriptor, .. } => {
            info!(url = %descriptor.request_url, "citation resolved");
            println!("{}", serde_json::to_string_pretty(descriptor)?);
            Ok(())
        }
        other => anyhow::bail!("Citation did not resolve: {:?}", other),
    }
}
