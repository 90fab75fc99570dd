//! Scripted in-process backend for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{
    AiBackend, Availability, LanguageModelSession, SessionConfig, Summarizer, SummarizerConfig,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub capability_checks: usize,
    pub summarizers_created: usize,
    pub summarizers_destroyed: usize,
    pub sessions_created: usize,
    pub sessions_destroyed: usize,
}

#[derive(Default)]
struct Recorded {
    counts: Counts,
    summarizer_config: Option<SummarizerConfig>,
    session_config: Option<SessionConfig>,
}

pub struct ScriptedBackend {
    summarizer: Availability,
    language_model: Availability,
    summarize_error: Option<String>,
    prompt_error: Option<String>,
    summarize_gate: Option<Arc<Notify>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            summarizer: Availability::Readily,
            language_model: Availability::Readily,
            summarize_error: None,
            prompt_error: None,
            summarize_gate: None,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    pub fn with_summarizer(mut self, availability: Availability) -> Self {
        self.summarizer = availability;
        self
    }

    pub fn with_language_model(mut self, availability: Availability) -> Self {
        self.language_model = availability;
        self
    }

    pub fn failing_summarize(mut self, message: &str) -> Self {
        self.summarize_error = Some(message.to_string());
        self
    }

    pub fn failing_prompt(mut self, message: &str) -> Self {
        self.prompt_error = Some(message.to_string());
        self
    }

    /// Summaries wait until `gate` is notified.
    pub fn with_summarize_gate(mut self, gate: Arc<Notify>) -> Self {
        self.summarize_gate = Some(gate);
        self
    }

    pub fn counts(&self) -> Counts {
        self.recorded.lock().unwrap().counts
    }

    pub fn last_summarizer_config(&self) -> Option<SummarizerConfig> {
        self.recorded.lock().unwrap().summarizer_config
    }

    pub fn last_session_config(&self) -> Option<SessionConfig> {
        self.recorded.lock().unwrap().session_config.clone()
    }
}

struct ScriptedSummarizer {
    error: Option<String>,
    gate: Option<Arc<Notify>>,
    recorded: Arc<Mutex<Recorded>>,
}

struct ScriptedSession {
    error: Option<String>,
    recorded: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&mut self, text: &str) -> AppResult<String> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.error {
            Some(message) => Err(AppError::Ai(message.clone())),
            None => Ok(format!("summary of: {}", text)),
        }
    }

    async fn destroy(&mut self) {
        self.recorded.lock().unwrap().counts.summarizers_destroyed += 1;
    }
}

#[async_trait]
impl LanguageModelSession for ScriptedSession {
    async fn prompt(&mut self, text: &str) -> AppResult<String> {
        match &self.error {
            Some(message) => Err(AppError::Ai(message.clone())),
            None => Ok(format!("reflection on: {}", text)),
        }
    }

    async fn destroy(&mut self) {
        self.recorded.lock().unwrap().counts.sessions_destroyed += 1;
    }
}

#[async_trait]
impl AiBackend for ScriptedBackend {
    async fn summarizer_availability(&self) -> Availability {
        self.recorded.lock().unwrap().counts.capability_checks += 1;
        self.summarizer
    }

    async fn language_model_availability(&self) -> Availability {
        self.recorded.lock().unwrap().counts.capability_checks += 1;
        self.language_model
    }

    async fn create_summarizer(&self, config: &SummarizerConfig) -> AppResult<Box<dyn Summarizer>> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.counts.summarizers_created += 1;
        recorded.summarizer_config = Some(*config);
        Ok(Box::new(ScriptedSummarizer {
            error: self.summarize_error.clone(),
            gate: self.summarize_gate.clone(),
            recorded: self.recorded.clone(),
        }))
    }

    async fn create_session(&self, config: &SessionConfig) -> AppResult<Box<dyn LanguageModelSession>> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.counts.sessions_created += 1;
        recorded.session_config = Some(config.clone());
        Ok(Box::new(ScriptedSession {
            error: self.prompt_error.clone(),
            recorded: self.recorded.clone(),
        }))
    }
}
