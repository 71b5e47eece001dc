use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use citekit::citations::format::{format_relative_timestamp, truncate};
use citekit::citations::DisplayCitation;
use citekit::render::{render_reference_list, to_plain_text};
use citekit::Message;

const PLAIN_WIDTH: usize = 100;
const PREVIEW_LEN: usize = 120;

pub fn render(path: &Path, plain: bool, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let message: Message = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a message object", path.display()))?;

    let view = message.render();
    info!(
        citations = view.rendered.citations.len(),
        documents = view.documents.len(),
        web = view.web.len(),
        agents = view.agents.len(),
        "rendered message"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&view.rendered)?);
        return Ok(());
    }

    let references = render_reference_list(&view.rendered.citations);
    if plain {
        println!("{}", to_plain_text(&view.rendered.html, PLAIN_WIDTH));
        if !references.is_empty() {
            println!("{}", to_plain_text(&references, PLAIN_WIDTH));
        }
    } else {
        println!("{}", view.rendered.html);
        if !references.is_empty() {
            println!("{}", references);
        }
    }

    let extra: Vec<String> = view
        .documents
        .iter()
        .chain(&view.web)
        .chain(&view.agents)
        .map(describe)
        .collect();
    if !extra.is_empty() {
        println!("\nSources:");
        for line in extra {
            println!("  - {}", line);
        }
    }

    Ok(())
}

fn describe(citation: &DisplayCitation) -> String {
    match citation {
        DisplayCitation::Document {
            file_name,
            page_number,
            content,
            ..
        } => format!(
            "{} (p. {}): {}",
            file_name.as_deref().unwrap_or("Unknown document"),
            page_number,
            truncate(content, PREVIEW_LEN)
        ),
        DisplayCitation::Web { url, title } => {
            let url = url.as_deref().unwrap_or("");
            format!("{} <{}>", title.as_deref().unwrap_or(url), url)
        }
        DisplayCitation::Agent {
            tool_name,
            result,
            timestamp,
            ..
        } => {
            let when = timestamp
                .as_deref()
                .map(|t| format!(" [{}]", format_relative_timestamp(t, Utc::now())))
                .unwrap_or_default();
            format!("{}{}: {}", tool_name, when, truncate(result, PREVIEW_LEN))
        }
    }
}
