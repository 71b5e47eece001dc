use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mkv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Pdf,
    Video,
    Image,
}

impl ContentType {
    /// Classify by extension. Missing or unrecognised extensions fall back to PDF.
    pub fn from_file_name(file_name: Option<&str>) -> Self {
        let Some((_, ext)) = file_name.and_then(|name| name.trim().rsplit_once('.')) else {
            return ContentType::Pdf;
        };
        let ext = ext.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            ContentType::Video
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            ContentType::Image
        } else {
            ContentType::Pdf
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Pdf => "PDF",
            ContentType::Video => "video",
            ContentType::Image => "image",
        })
    }
}

/// Page number or media timestamp carried by a citation-open request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Number(f64),
    Text(String),
}

impl Position {
    /// Positive whole page number, if this position is one.
    pub fn as_page(&self) -> Option<i64> {
        match self {
            Position::Number(n) if n.is_finite() && *n >= 1.0 => Some(n.trunc() as i64),
            Position::Number(_) => None,
            Position::Text(s) => s.trim().parse().ok().filter(|p| *p >= 1),
        }
    }

    /// Seek offset in seconds.
    ///
    /// Numbers and numeric strings are seconds; `H:MM:SS` and `MM:SS`
    /// strings are expanded. Anything else is 0.
    pub fn to_seconds(&self) -> f64 {
        match self {
            Position::Number(n) if n.is_finite() => *n,
            Position::Number(_) => 0.0,
            Position::Text(s) => parse_clock(s.trim()).unwrap_or(0.0),
        }
    }
}

impl From<i64> for Position {
    fn from(n: i64) -> Self {
        Position::Number(n as f64)
    }
}

fn parse_clock(raw: &str) -> Option<f64> {
    if let Some(secs) = raw.parse::<f64>().ok().filter(|s| s.is_finite()) {
        return Some(secs);
    }
    if !raw.contains(':') {
        return None;
    }
    let parts: Vec<f64> = raw
        .split(':')
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
        [m, s] => Some(m * 60.0 + s),
        _ => None,
    }
}

/// Where to seek once the media duration is known, or `None` to stay at 0.
///
/// Offsets past the end land one second before it.
pub fn clamp_seek(seconds: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration < 0.0 {
        return None;
    }
    if seconds > 0.0 && seconds < duration {
        Some(seconds)
    } else if seconds >= duration {
        Some((duration - 1.0).max(0.0))
    } else {
        None
    }
}

/// Playback failure classes reported by the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaErrorKind {
    Aborted,
    Network,
    Decode,
    SourceUnavailable,
    Unknown,
}

impl MediaErrorKind {
    /// Map a media element error code (1-4) to its kind.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaErrorKind::Aborted,
            2 => MediaErrorKind::Network,
            3 => MediaErrorKind::Decode,
            4 => MediaErrorKind::SourceUnavailable,
            _ => MediaErrorKind::Unknown,
        }
    }

    fn detail(self, content_type: &ContentType) -> String {
        match self {
            MediaErrorKind::Aborted => "Loading was aborted.".to_string(),
            MediaErrorKind::Network => "Network error occurred.".to_string(),
            MediaErrorKind::Decode => {
                format!("{} is corrupted or unsupported format.", capitalize(content_type))
            }
            MediaErrorKind::SourceUnavailable => {
                format!("{} source is not available.", capitalize(content_type))
            }
            MediaErrorKind::Unknown => "Unknown error.".to_string(),
        }
    }
}

fn capitalize(content_type: &ContentType) -> String {
    let name = content_type.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Could not load {content_type}. {}", .kind.detail(.content_type))]
pub struct MediaError {
    pub content_type: ContentType,
    pub kind: MediaErrorKind,
}

impl MediaError {
    pub fn from_code(content_type: ContentType, code: u16) -> Self {
        Self {
            content_type,
            kind: MediaErrorKind::from_code(code),
        }
    }
}
