//! Citation pipeline for assistant answers: numbered cross-references,
//! safe HTML rendering, and a viewer that resolves cited sources.

pub mod citations;
pub mod config;
pub mod message;
pub mod render;
pub mod viewer;

pub use config::Config;
pub use message::{process_content, Message, MessageView, RenderedMessage};
pub use viewer::{CitationViewer, ContentDescriptor, OpenRequest, ViewerState};
