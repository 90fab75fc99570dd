//! Ollama backend for the on-device summarizer and language model.
//!
//! - capability: `GET /api/tags`, model listed → `readily`, missing →
//!   `after-download`, daemon unreachable → `no`
//! - create: pulls an `after-download` model first
//! - summarize: `POST /api/generate` with the summarizer system prompt
//! - prompt: `POST /api/chat` with the session's running history
//! - destroy: `POST /api/generate` with `keep_alive: 0` to unload the model

use async_trait::async_trait;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    AiBackend, Availability, LanguageModelSession, SessionConfig, Summarizer, SummarizerConfig,
};
use crate::config::AiConfig;
use crate::error::{AppError, AppResult};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ============================================================================
// Endpoints
// ============================================================================

#[derive(Debug, Clone)]
struct Endpoints {
    tags: Url,
    generate: Url,
    chat: Url,
    pull: Url,
}

impl Endpoints {
    fn new(base: &Url) -> AppResult<Self> {
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| AppError::Config(format!("Cannot build Ollama URL for {}: {}", path, e)))
        };
        Ok(Self {
            tags: join("api/tags")?,
            generate: join("api/generate")?,
            chat: join("api/chat")?,
            pull: join("api/pull")?,
        })
    }
}

// ============================================================================
// Backend
// ============================================================================

pub struct OllamaBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
    summarizer_model: String,
    language_model: String,
}

impl OllamaBackend {
    pub fn new(config: &AiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(&config.base_url)?,
            summarizer_model: config.summarizer_model.clone(),
            language_model: config.language_model.clone(),
        })
    }

    async fn availability(&self, model: &str) -> Availability {
        let response = match self.client.get(self.endpoints.tags.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "ollama is not reachable");
                return Availability::No;
            }
        };
        let tags: TagsResponse = match checked(response).await {
            Ok(r) => match r.json().await {
                Ok(tags) => tags,
                Err(e) => {
                    warn!(error = %e, "unexpected /api/tags response");
                    return Availability::No;
                }
            },
            Err(e) => {
                warn!(error = %e, "ollama capability check failed");
                return Availability::No;
            }
        };

        if tags.models.iter().any(|t| model_matches(&t.name, model)) {
            Availability::Readily
        } else {
            Availability::AfterDownload
        }
    }

    /// Makes sure `model` is present locally, pulling it when needed.
    async fn ensure_model(&self, model: &str) -> AppResult<()> {
        match self.availability(model).await {
            Availability::Readily => Ok(()),
            Availability::AfterDownload => {
                info!(model, "pulling model");
                let response = self
                    .client
                    .post(self.endpoints.pull.clone())
                    .json(&PullRequest { model, stream: false })
                    .send()
                    .await?;
                checked(response).await?;
                info!(model, "model pulled");
                Ok(())
            }
            Availability::No => Err(AppError::Unavailable(format!(
                "Model `{}` is not available.",
                model
            ))),
        }
    }

    fn handle(&self, model: &str) -> ModelHandle {
        ModelHandle {
            client: self.client.clone(),
            endpoints: self.endpoints.clone(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl AiBackend for OllamaBackend {
    async fn summarizer_availability(&self) -> Availability {
        self.availability(&self.summarizer_model).await
    }

    async fn language_model_availability(&self) -> Availability {
        self.availability(&self.language_model).await
    }

    async fn create_summarizer(&self, config: &SummarizerConfig) -> AppResult<Box<dyn Summarizer>> {
        self.ensure_model(&self.summarizer_model).await?;
        debug!(model = %self.summarizer_model, ?config, "summarizer created");
        Ok(Box::new(OllamaSummarizer {
            handle: self.handle(&self.summarizer_model),
            system_prompt: config.system_prompt(),
        }))
    }

    async fn create_session(&self, config: &SessionConfig) -> AppResult<Box<dyn LanguageModelSession>> {
        self.ensure_model(&self.language_model).await?;
        debug!(model = %self.language_model, "language model session created");
        Ok(Box::new(OllamaSession {
            handle: self.handle(&self.language_model),
            messages: vec![ChatMessage::new("system", &config.system_prompt)],
        }))
    }
}

// ============================================================================
// Instances
// ============================================================================

struct ModelHandle {
    client: reqwest::Client,
    endpoints: Endpoints,
    model: String,
}

impl ModelHandle {
    async fn unload(&self) {
        let request = GenerateRequest {
            model: &self.model,
            system: None,
            prompt: None,
            stream: false,
            keep_alive: Some(0),
        };
        let result = match self
            .client
            .post(self.endpoints.generate.clone())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => checked(response).await.map(|_| ()),
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(()) => debug!(model = %self.model, "model unloaded"),
            Err(err) => warn!(model = %self.model, error = %err, "failed to unload model"),
        }
    }
}

struct OllamaSummarizer {
    handle: ModelHandle,
    system_prompt: String,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&mut self, text: &str) -> AppResult<String> {
        let request = GenerateRequest {
            model: &self.handle.model,
            system: Some(&self.system_prompt),
            prompt: Some(text),
            stream: false,
            keep_alive: None,
        };
        let response = self
            .handle
            .client
            .post(self.handle.endpoints.generate.clone())
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = checked(response).await?.json().await?;
        Ok(body.response.trim().to_string())
    }

    async fn destroy(&mut self) {
        self.handle.unload().await;
    }
}

struct OllamaSession {
    handle: ModelHandle,
    messages: Vec<ChatMessage>,
}

#[async_trait]
impl LanguageModelSession for OllamaSession {
    async fn prompt(&mut self, text: &str) -> AppResult<String> {
        self.messages.push(ChatMessage::new("user", text));
        let request = ChatRequest {
            model: &self.handle.model,
            messages: &self.messages,
            stream: false,
        };
        let response = self
            .handle
            .client
            .post(self.handle.endpoints.chat.clone())
            .json(&request)
            .send()
            .await?;
        let body: ChatResponse = checked(response).await?.json().await?;
        let answer = body.message.content.trim().to_string();
        self.messages.push(ChatMessage::new("assistant", &answer));
        Ok(answer)
    }

    async fn destroy(&mut self) {
        self.messages.clear();
        self.handle.unload().await;
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Turns a non-2xx response into an error carrying Ollama's own message.
async fn checked(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(AppError::Ai(format!(
        "The on-device model returned {}: {}",
        status,
        message.trim()
    )))
}

/// `llama3.2` matches a listed `llama3.2:latest`; explicit tags must match
/// exactly.
fn model_matches(listed: &str, wanted: &str) -> bool {
    if listed == wanted {
        return true;
    }
    !wanted.contains(':') && listed.strip_suffix(":latest") == Some(wanted)
}
