//! Configuration types for a table-extraction run.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to log a run's settings and to diff two runs to understand why
//! their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest; `build()` validates the combination.

use crate::error::ExtractError;
use crate::pipeline::llm::ChatModel;
use std::fmt;
use std::sync::Arc;

/// Default Ollama endpoint.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default model tag.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2tab::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .page(3)
///     .model("llama3.2")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// 1-indexed page to extract. Default: 1.
    ///
    /// Validated against the document's page count at extraction time;
    /// out-of-range pages abort the run before any model call.
    pub page: usize,

    /// Model tag passed to the chat endpoint. Default: "llama3.2".
    pub model: String,

    /// Base URL of the Ollama server. Default: "http://localhost:11434".
    pub ollama_host: String,

    /// Sampling temperature for the chat completion. Default: 0.0.
    ///
    /// Zero makes the model deterministic, which is what you want when the
    /// task is transcription of numbers, not prose. Raising it trades
    /// reproducibility for nothing useful here.
    pub temperature: f32,

    /// Custom prompt template. If None, uses the built-in default.
    ///
    /// Must contain the literal placeholder `{page_text}`; the extracted
    /// page text is substituted in verbatim.
    pub prompt_template: Option<String>,

    /// Pre-constructed chat model. Takes precedence over `ollama_host`/`model`.
    ///
    /// This is the seam tests use to inject fixed replies without a live
    /// server.
    pub model_override: Option<Arc<dyn ChatModel>>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Chat-call timeout in seconds. Default: 120.
    ///
    /// Local models can take a minute or more on a long page of dense
    /// figures; the timeout exists so an unloaded or wedged server fails
    /// the run instead of blocking it forever.
    pub api_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            page: 1,
            model: DEFAULT_MODEL.to_string(),
            ollama_host: DEFAULT_HOST.to_string(),
            temperature: 0.0,
            prompt_template: None,
            model_override: None,
            download_timeout_secs: 120,
            api_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("page", &self.page)
            .field("model", &self.model)
            .field("ollama_host", &self.ollama_host)
            .field("temperature", &self.temperature)
            .field("prompt_template", &self.prompt_template.as_ref().map(|_| "<custom>"))
            .field("model_override", &self.model_override.as_ref().map(|_| "<dyn ChatModel>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn page(mut self, page: usize) -> Self {
        self.config.page = page;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn ollama_host(mut self, host: impl Into<String>) -> Self {
        self.config.ollama_host = host.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn model_override(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.config.model_override = Some(model);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.page == 0 {
            return Err(ExtractError::InvalidConfig(
                "Pages are 1-indexed; page must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("Model tag must not be empty".into()));
        }
        if let Some(ref t) = c.prompt_template {
            if !t.contains("{page_text}") {
                return Err(ExtractError::InvalidConfig(
                    "Custom prompt template must contain the {page_text} placeholder".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
