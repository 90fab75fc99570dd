//! Data models for the recap application.
//!
//! Notes and their sections, plus the request and response bodies of the
//! popup's JSON API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::view::{ActiveTab, ViewState};

// ============================================================================
// Core Note Types
// ============================================================================

pub const SUMMARY_TITLE: &str = "Summary";
pub const REFLECTION_TITLE: &str = "Reflection";
pub const ORIGINAL_TEXT_TITLE: &str = "Original Text";

/// A generated record grouping a summary, a reflection and the source text.
///
/// `id` is the creation time in epoch milliseconds and `timestamp` the same
/// instant as an ISO-8601 string. A stored note always has at least one
/// section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: i64,
    pub timestamp: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Note {
    pub fn new(sections: Vec<Section>) -> Self {
        Self::created_at(Utc::now(), sections)
    }

    pub fn created_at(now: DateTime<Utc>, sections: Vec<Section>) -> Self {
        Self {
            id: now.timestamp_millis(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            sections,
        }
    }

    /// Builds the three-section note produced by a generation run.
    pub fn generated(summary: String, reflection: String, original_text: &str) -> Self {
        Self::new(vec![
            Section::new(SUMMARY_TITLE, summary),
            Section::new(REFLECTION_TITLE, reflection),
            Section::new(ORIGINAL_TEXT_TITLE, original_text),
        ])
    }

    /// Content of the first section still titled "Original Text", if any.
    pub fn original_text(&self) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.title == ORIGINAL_TEXT_TITLE)
            .map(|s| s.content.as_str())
    }

    /// Human-readable creation time for the tab strip.
    pub fn display_time(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SwitchTabRequest {
    pub note: usize,
    pub section: usize,
}

#[derive(Debug, Deserialize)]
pub struct RenameSectionRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Everything the popup needs to redraw itself after an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub view: ViewState,
    pub active: Option<ActiveTab>,
    pub tabs_html: String,
    pub panes_html: String,
    pub error: Option<String>,
    pub input: String,
}
