//! On-device AI: a summarizer and a language model behind a capability gate.
//!
//! `AiBackend` is the seam to whatever runs the models; `OllamaBackend` is
//! the one the binary ships with. `AiClient` runs the generation protocol on
//! top of a backend:
//!
//! 1. check both capabilities and fail fast if either is `no`
//! 2. create a key-points summarizer and summarize the raw text
//! 3. create a session with the reflection system prompt and prompt it with
//!    the summary
//!
//! Every instance that gets created is destroyed before the client returns,
//! whether the step succeeded or not.

mod ollama;

#[cfg(test)]
pub(crate) mod testing;

pub use ollama::OllamaBackend;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::Note;

pub const REFLECTION_SYSTEM_PROMPT: &str = "You are a thoughtful reading companion. \
You help the reader think about what they have just read. Answer in a few short \
paragraphs of plain prose.";

// ============================================================================
// Capabilities and Configuration
// ============================================================================

/// Result of a capability check. Only `No` blocks generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Readily,
    AfterDownload,
    No,
}

impl Availability {
    pub fn is_available(self) -> bool {
        !matches!(self, Availability::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryType {
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    Markdown,
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizerConfig {
    pub kind: SummaryType,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            kind: SummaryType::KeyPoints,
            format: SummaryFormat::Markdown,
            length: SummaryLength::Medium,
        }
    }
}

impl SummarizerConfig {
    /// Instructions handed to a general-purpose model to make it behave like
    /// a summarizer with this configuration.
    pub fn system_prompt(&self) -> String {
        let task = match (self.kind, self.length) {
            (SummaryType::KeyPoints, SummaryLength::Short) => {
                "Summarize the text as the 3 most important key points."
            }
            (SummaryType::KeyPoints, SummaryLength::Medium) => {
                "Summarize the text as the 5 most important key points."
            }
            (SummaryType::KeyPoints, SummaryLength::Long) => {
                "Summarize the text as the 7 most important key points."
            }
            (SummaryType::Tldr, SummaryLength::Short) => "Give a one-sentence overview of the text.",
            (SummaryType::Tldr, SummaryLength::Medium) => "Give a three-sentence overview of the text.",
            (SummaryType::Tldr, SummaryLength::Long) => "Give a one-paragraph overview of the text.",
            (SummaryType::Teaser, _) => {
                "Write an intriguing teaser that makes the reader want to read the text."
            }
            (SummaryType::Headline, _) => "Write a single headline capturing the main point of the text.",
        };
        let format = match self.format {
            SummaryFormat::Markdown => "Format the answer as Markdown, using a bulleted list for key points.",
            SummaryFormat::PlainText => "Answer in plain text without any Markdown.",
        };
        format!(
            "You are a summarizer. {} {} Reply with the summary only.",
            task, format
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub system_prompt: String,
}

impl SessionConfig {
    pub fn reflection() -> Self {
        Self {
            system_prompt: REFLECTION_SYSTEM_PROMPT.to_string(),
        }
    }
}

pub fn reflection_prompt(summary: &str) -> String {
    format!(
        "Here is a summary of something I just read:\n\n{}\n\n\
        Write a short reflection on it: what stands out, and one question worth thinking about next.",
        summary
    )
}

// ============================================================================
// Backend Traits
// ============================================================================

#[async_trait]
pub trait Summarizer: Send {
    async fn summarize(&mut self, text: &str) -> AppResult<String>;

    /// Releases the instance. Failures are the backend's to log.
    async fn destroy(&mut self);
}

#[async_trait]
pub trait LanguageModelSession: Send {
    async fn prompt(&mut self, text: &str) -> AppResult<String>;

    /// Releases the session. Failures are the backend's to log.
    async fn destroy(&mut self);
}

#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn summarizer_availability(&self) -> Availability;

    async fn language_model_availability(&self) -> Availability;

    async fn create_summarizer(&self, config: &SummarizerConfig) -> AppResult<Box<dyn Summarizer>>;

    async fn create_session(&self, config: &SessionConfig) -> AppResult<Box<dyn LanguageModelSession>>;
}

// ============================================================================
// Client
// ============================================================================

pub struct AiClient {
    backend: Arc<dyn AiBackend>,
}

impl AiClient {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        Self { backend }
    }

    /// Fails with a descriptive error when either model reports `no`.
    pub async fn check_capabilities(&self) -> AppResult<()> {
        let summarizer = self.backend.summarizer_availability().await;
        let language_model = self.backend.language_model_availability().await;
        info!(?summarizer, ?language_model, "ai capabilities");

        if !summarizer.is_available() {
            return Err(AppError::Unavailable(
                "The on-device summarizer is not available.".to_string(),
            ));
        }
        if !language_model.is_available() {
            return Err(AppError::Unavailable(
                "The on-device language model is not available.".to_string(),
            ));
        }
        Ok(())
    }

    /// Runs the full protocol over `text` and returns the new note.
    pub async fn generate_note(&self, text: &str) -> AppResult<Note> {
        self.check_capabilities().await?;
        let summary = self.summarize(text).await?;
        let reflection = self.reflect(&summary).await?;
        info!(
            input_chars = text.chars().count(),
            summary_chars = summary.chars().count(),
            "note generated"
        );
        Ok(Note::generated(summary, reflection, text))
    }

    async fn summarize(&self, text: &str) -> AppResult<String> {
        let mut summarizer = self
            .backend
            .create_summarizer(&SummarizerConfig::default())
            .await?;
        let result = summarizer.summarize(text).await;
        summarizer.destroy().await;
        if let Err(err) = &result {
            warn!(error = %err, "summarization failed");
        }
        result
    }

    async fn reflect(&self, summary: &str) -> AppResult<String> {
        let mut session = self
            .backend
            .create_session(&SessionConfig::reflection())
            .await?;
        let result = session.prompt(&reflection_prompt(summary)).await;
        session.destroy().await;
        if let Err(err) = &result {
            warn!(error = %err, "reflection prompt failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;

    #[tokio::test]
    async fn generation_yields_three_sections() {
        let backend = Arc::new(ScriptedBackend::new());
        let client = AiClient::new(backend.clone());

        let note = client.generate_note("Rust has ownership.").await.unwrap();
        let titles: Vec<&str> = note.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Summary", "Reflection", "Original Text"]);
        assert_eq!(note.sections[0].content, "summary of: Rust has ownership.");
        assert!(note.sections[1].content.starts_with("reflection on: "));
        assert!(note.sections[1].content.contains("summary of: Rust has ownership."));
        assert_eq!(note.sections[2].content, "Rust has ownership.");

        let counts = backend.counts();
        assert_eq!(counts.summarizers_created, 1);
        assert_eq!(counts.summarizers_destroyed, 1);
        assert_eq!(counts.sessions_created, 1);
        assert_eq!(counts.sessions_destroyed, 1);
    }

    #[tokio::test]
    async fn summarizer_uses_key_point_markdown_medium() {
        let backend = Arc::new(ScriptedBackend::new());
        AiClient::new(backend.clone()).generate_note("text").await.unwrap();
        assert_eq!(backend.last_summarizer_config(), Some(SummarizerConfig::default()));
        assert_eq!(backend.last_session_config(), Some(SessionConfig::reflection()));
    }

    #[tokio::test]
    async fn unavailable_summarizer_creates_nothing() {
        let backend = Arc::new(ScriptedBackend::new().with_summarizer(Availability::No));
        let err = AiClient::new(backend.clone())
            .generate_note("text")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unavailable(_)));
        assert!(err.to_string().contains("summarizer"));
        let counts = backend.counts();
        assert_eq!(counts.summarizers_created, 0);
        assert_eq!(counts.sessions_created, 0);
    }

    #[tokio::test]
    async fn unavailable_language_model_creates_nothing() {
        let backend = Arc::new(ScriptedBackend::new().with_language_model(Availability::No));
        let err = AiClient::new(backend.clone())
            .generate_note("text")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("language model"));
        let counts = backend.counts();
        assert_eq!(counts.summarizers_created, 0);
        assert_eq!(counts.sessions_created, 0);
    }

    #[tokio::test]
    async fn after_download_counts_as_available() {
        let backend = Arc::new(ScriptedBackend::new().with_summarizer(Availability::AfterDownload));
        assert!(AiClient::new(backend).generate_note("text").await.is_ok());
    }

    #[tokio::test]
    async fn failed_summarize_still_destroys_summarizer() {
        let backend = Arc::new(ScriptedBackend::new().failing_summarize("model crashed"));
        let err = AiClient::new(backend.clone())
            .generate_note("text")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "model crashed");
        let counts = backend.counts();
        assert_eq!(counts.summarizers_created, 1);
        assert_eq!(counts.summarizers_destroyed, 1);
        assert_eq!(counts.sessions_created, 0);
    }

    #[tokio::test]
    async fn failed_prompt_still_destroys_session() {
        let backend = Arc::new(ScriptedBackend::new().failing_prompt("context overflow"));
        let err = AiClient::new(backend.clone())
            .generate_note("text")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "context overflow");
        let counts = backend.counts();
        assert_eq!(counts.summarizers_destroyed, 1);
        assert_eq!(counts.sessions_created, 1);
        assert_eq!(counts.sessions_destroyed, 1);
    }

    #[test]
    fn key_point_prompt_asks_for_five_markdown_points() {
        let prompt = SummarizerConfig::default().system_prompt();
        assert!(prompt.contains("5 most important key points"));
        assert!(prompt.contains("Markdown"));
    }

    #[test]
    fn availability_uses_kebab_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&Availability::AfterDownload).unwrap(),
            "\"after-download\""
        );
        let no: Availability = serde_json::from_str("\"no\"").unwrap();
        assert!(!no.is_available());
    }
}
