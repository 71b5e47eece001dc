pub mod client;
pub mod media;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::citations::{codec, CitationId, DisplayCitation, NumberedCitation, PageLabel};

pub use client::{ClassifyError, HttpClassifier, VideoClassifier, VideoSource};
pub use media::{clamp_seek, ContentType, MediaError, MediaErrorKind, Position};

/// Retrieval endpoint URLs, optionally prefixed with an API origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn pdf(&self, doc_id: &str, page: i64) -> String {
        self.build("pdf", &[("doc_id", doc_id), ("page", &page.to_string())])
    }

    /// Streams a locally stored video; also answers the hosting check.
    pub fn video(&self, doc_id: &str) -> String {
        self.build("video", &[("doc_id", doc_id)])
    }

    pub fn image(&self, doc_id: &str) -> String {
        self.build("image", &[("doc_id", doc_id)])
    }

    fn build(&self, kind: &str, params: &[(&str, &str)]) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        format!(
            "{}/api/enhanced_citations/{}?{}",
            self.base,
            kind,
            query.finish()
        )
    }
}

/// A request to open a citation in the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub citation_id: CitationId,
    pub doc_id: String,
    /// Page for documents, timestamp for videos.
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl OpenRequest {
    pub fn from_numbered(citation: &NumberedCitation) -> Self {
        let decoded = codec::decode(&citation.citation_id);
        Self {
            citation_id: citation.citation_id.clone(),
            doc_id: decoded.doc_id,
            position: decoded.page_number.map(Position::from),
            file_name: Some(citation.file_name.clone()),
        }
    }

    /// Only document citations can be opened.
    pub fn from_display(citation: &DisplayCitation) -> Option<Self> {
        let DisplayCitation::Document {
            id,
            doc_id,
            file_name,
            page_number,
            ..
        } = citation
        else {
            return None;
        };
        let doc_id = if doc_id.is_empty() {
            codec::decode(id).doc_id
        } else {
            doc_id.clone()
        };
        let position = match page_number {
            PageLabel::Number(n) => Some(Position::from(*n)),
            PageLabel::NotAvailable => None,
        };
        Some(Self {
            citation_id: id.clone(),
            doc_id,
            position,
            file_name: file_name.clone(),
        })
    }
}

/// What the viewer should fetch for an opened citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    pub content_type: ContentType,
    pub request_url: String,
    pub is_remote_hosted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    Idle,
    Loading {
        citation_id: CitationId,
    },
    Ready {
        citation_id: CitationId,
        descriptor: ContentDescriptor,
    },
    Failed {
        citation_id: CitationId,
        error: MediaError,
    },
}

impl ViewerState {
    pub fn citation_id(&self) -> Option<&str> {
        match self {
            ViewerState::Idle => None,
            ViewerState::Loading { citation_id }
            | ViewerState::Ready { citation_id, .. }
            | ViewerState::Failed { citation_id, .. } => Some(citation_id.as_str()),
        }
    }
}

/// Pending video classification, tied to the open request that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyTicket {
    generation: u64,
    citation_id: CitationId,
    doc_id: String,
}

impl ClassifyTicket {
    pub fn citation_id(&self) -> &str {
        &self.citation_id
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

/// Outcome of starting an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenStep {
    /// No network work needed; read the state.
    Settled,
    /// Run the classification and hand the result to [`CitationViewer::complete`].
    Classify(ClassifyTicket),
}

/// Per-viewer state machine: `Idle -> Loading -> Ready | Failed`.
///
/// Each open bumps a generation counter; classification results carrying an
/// older generation or another citation are dropped.
#[derive(Debug)]
pub struct CitationViewer {
    endpoints: Endpoints,
    state: ViewerState,
    request: Option<OpenRequest>,
    generation: u64,
}

impl CitationViewer {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            state: ViewerState::Idle,
            request: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn request(&self) -> Option<&OpenRequest> {
        self.request.as_ref()
    }

    /// Start opening a citation.
    ///
    /// Re-opening the citation that is already loading, ready, or failed
    /// leaves the state untouched. PDFs and images become ready
    /// immediately; videos need a classification round-trip first.
    pub fn begin(&mut self, request: OpenRequest) -> OpenStep {
        if self.state.citation_id() == Some(request.citation_id.as_str()) {
            return OpenStep::Settled;
        }

        self.generation += 1;
        let content_type = ContentType::from_file_name(request.file_name.as_deref());
        let citation_id = request.citation_id.clone();
        let doc_id = request.doc_id.clone();
        debug!(citation_id = %citation_id, ?content_type, "opening citation");

        let step = match content_type {
            ContentType::Pdf => {
                let page = request
                    .position
                    .as_ref()
                    .and_then(Position::as_page)
                    .unwrap_or(1);
                self.state = ViewerState::Ready {
                    citation_id,
                    descriptor: ContentDescriptor {
                        content_type,
                        request_url: self.endpoints.pdf(&doc_id, page),
                        is_remote_hosted: false,
                    },
                };
                OpenStep::Settled
            }
            ContentType::Image => {
                self.state = ViewerState::Ready {
                    citation_id,
                    descriptor: ContentDescriptor {
                        content_type,
                        request_url: self.endpoints.image(&doc_id),
                        is_remote_hosted: false,
                    },
                };
                OpenStep::Settled
            }
            ContentType::Video => {
                self.state = ViewerState::Loading {
                    citation_id: citation_id.clone(),
                };
                OpenStep::Classify(ClassifyTicket {
                    generation: self.generation,
                    citation_id,
                    doc_id,
                })
            }
        };

        self.request = Some(request);
        step
    }

    /// Apply a classification result. Returns `false` if the ticket is stale.
    ///
    /// Classification failures fall back to the local stream; they never
    /// fail the open.
    pub fn complete(
        &mut self,
        ticket: ClassifyTicket,
        outcome: Result<VideoSource, ClassifyError>,
    ) -> bool {
        let current = matches!(
            &self.state,
            ViewerState::Loading { citation_id } if *citation_id == ticket.citation_id
        );
        if ticket.generation != self.generation || !current {
            debug!(
                citation_id = %ticket.citation_id,
                "discarding classification for superseded request"
            );
            return false;
        }

        let (request_url, is_remote_hosted) = match outcome {
            Ok(VideoSource::Remote(url)) => {
                info!(citation_id = %ticket.citation_id, url = %url, "remote-hosted video");
                (url, true)
            }
            Ok(VideoSource::Local) => {
                info!(citation_id = %ticket.citation_id, "locally stored video");
                (self.endpoints.video(&ticket.doc_id), false)
            }
            Err(err) => {
                warn!(
                    citation_id = %ticket.citation_id,
                    error = %err,
                    "video classification failed, using local stream"
                );
                (self.endpoints.video(&ticket.doc_id), false)
            }
        };

        self.state = ViewerState::Ready {
            citation_id: ticket.citation_id,
            descriptor: ContentDescriptor {
                content_type: ContentType::Video,
                request_url,
                is_remote_hosted,
            },
        };
        true
    }

    /// Open a citation end to end, classifying videos with `classifier`.
    pub async fn open<C: VideoClassifier>(
        &mut self,
        classifier: &C,
        request: OpenRequest,
    ) -> &ViewerState {
        if let OpenStep::Classify(ticket) = self.begin(request) {
            let outcome = classifier.classify(ticket.doc_id()).await;
            self.complete(ticket, outcome);
        }
        &self.state
    }

    /// Seek target for the opened video once its duration is known.
    pub fn seek_position(&self, duration: f64) -> Option<f64> {
        let ViewerState::Ready { descriptor, .. } = &self.state else {
            return None;
        };
        if descriptor.content_type != ContentType::Video {
            return None;
        }
        let seconds = self
            .request
            .as_ref()
            .and_then(|r| r.position.as_ref())
            .map(Position::to_seconds)
            .unwrap_or(0.0);
        let target = clamp_seek(seconds, duration);
        if seconds >= duration && target.is_some() {
            warn!(seconds, duration, "timestamp beyond media duration, clamping");
        }
        target
    }

    /// Record a playback/fetch failure for the open citation.
    ///
    /// Ignored unless that citation is currently ready.
    pub fn report_media_error(&mut self, citation_id: &str, code: u16) -> Option<&MediaError> {
        let ViewerState::Ready { citation_id: current, descriptor } = &self.state else {
            return None;
        };
        if current != citation_id {
            return None;
        }

        let error = MediaError::from_code(descriptor.content_type, code);
        warn!(citation_id, code, error = %error, "citation media failed");
        self.state = ViewerState::Failed {
            citation_id: citation_id.to_string(),
            error,
        };
        match &self.state {
            ViewerState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Close the viewer; in-flight classifications become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ViewerState::Idle;
        self.request = None;
    }
}
