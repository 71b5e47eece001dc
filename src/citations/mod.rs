pub mod codec;
pub mod extract;
pub mod format;
pub mod types;

pub use codec::{decode, encode, DecodedCitation};
pub use extract::{extract, Extraction};
pub use format::{format_agent_citations, format_document_citations, format_web_citations};
pub use types::{
    AgentCitation, CitationId, CitationMap, DisplayCitation, DocumentCitation, NumberedCitation,
    PageLabel, WebCitation,
};
