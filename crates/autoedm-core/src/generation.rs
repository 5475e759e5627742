//! The two-step generation cycle: validate the form, ask for a subject line,
//! then ask for a body message.
//!
//! [`GenerationSession`] is the view-owned state. [`EmailGenerator`] runs the
//! network half of a cycle and reports each step as a [`GenerationUpdate`], so
//! the same cycle can be driven inline (headless) or from a spawned task that
//! forwards updates to the UI event loop.

use std::sync::Arc;

use tracing::{error, info};

use crate::ai::{CompletionRequest, CompletionService};
use crate::category::CategoryId;
use crate::error::{CompletionError, GenerateError, ValidationError, GENERATION_FAILED_MESSAGE};
use crate::form::FormInput;
use crate::state::ChatMessage;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const SUBJECT_MAX_TOKENS: u32 = 30;
pub const BODY_MAX_TOKENS: u32 = 120;
pub const SYSTEM_PROMPT: &str = "You are a helpful marketing assistant.";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub subject_max_tokens: u32,
    pub body_max_tokens: u32,
    pub system_prompt: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            subject_max_tokens: SUBJECT_MAX_TOKENS,
            body_max_tokens: BODY_MAX_TOKENS,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// The two user prompts of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPrompts {
    pub subject: String,
    pub body: String,
}

impl EmailPrompts {
    pub fn build(form: &FormInput, category: CategoryId) -> Self {
        let title = category.title();

        let subject = format!(
            "Generate a short, engaging subject line for a marketing email about {}. \
             Use an emoji. Do not include any other text.",
            title
        );

        let purchase = if form.recent_purchase.is_empty() {
            String::new()
        } else {
            format!(" and recently purchased {}", form.recent_purchase)
        };

        let body = format!(
            "Write a friendly, conversational marketing email body (excluding the subject line \
             and greeting) for a customer named {} who loves {}{}. Reference the category and \
             purchase naturally, but do not repeat the subject line or include a greeting. Make \
             it sound personal and engaging. 2-4 sentences.",
            form.display_name(),
            title,
            purchase
        );

        Self { subject, body }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub subject_line: String,
    pub body_message: String,
}

impl GenerationResult {
    pub fn clear(&mut self) {
        self.subject_line.clear();
        self.body_message.clear();
    }

    /// Both parts are present, so there is something to preview or export.
    pub fn is_complete(&self) -> bool {
        !self.subject_line.is_empty() && !self.body_message.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Progress of a running cycle, applied in order to a [`GenerationSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationUpdate {
    Subject(String),
    Body(String),
    Failed,
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationSession {
    pub result: GenerationResult,
    pub state: RequestState,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle: validate, clear previous output and error, enter
    /// `Loading`. Returns the prompts to send.
    ///
    /// A missing category sets the validation message as the error. A call
    /// while a cycle is in flight leaves the session untouched.
    pub fn begin(&mut self, form: &FormInput) -> Result<EmailPrompts, ValidationError> {
        if self.state.is_loading() {
            return Err(ValidationError::AlreadyGenerating);
        }

        let category = match form.validate() {
            Ok(category) => category,
            Err(err) => {
                self.state = RequestState::Error(err.to_string());
                return Err(err);
            }
        };

        self.result.clear();
        self.state = RequestState::Loading;
        Ok(EmailPrompts::build(form, category))
    }

    pub fn apply(&mut self, update: GenerationUpdate) {
        match update {
            GenerationUpdate::Subject(subject) => self.result.subject_line = subject,
            GenerationUpdate::Body(body) => self.result.body_message = body,
            GenerationUpdate::Failed => {
                self.state = RequestState::Error(GENERATION_FAILED_MESSAGE.to_string());
            }
            GenerationUpdate::Finished => {
                if self.state.is_loading() {
                    self.state = RequestState::Idle;
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}

#[derive(Clone)]
pub struct EmailGenerator {
    service: Arc<dyn CompletionService>,
    settings: GenerationSettings,
}

impl EmailGenerator {
    pub fn new(service: Arc<dyn CompletionService>, settings: GenerationSettings) -> Self {
        Self { service, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Run a full cycle against `session` and wait for it to finish.
    pub async fn generate(
        &self,
        form: &FormInput,
        session: &mut GenerationSession,
    ) -> Result<(), GenerateError> {
        let prompts = session.begin(form)?;
        self.run(&prompts, |update| session.apply(update))
            .await
            .map_err(GenerateError::Failed)
    }

    /// Issue both requests in order, reporting each step through `on_update`.
    ///
    /// Always ends with [`GenerationUpdate::Finished`]; a failure in either
    /// call is reported as [`GenerationUpdate::Failed`] first and stops the
    /// cycle.
    pub async fn run<F>(&self, prompts: &EmailPrompts, mut on_update: F) -> Result<(), CompletionError>
    where
        F: FnMut(GenerationUpdate),
    {
        let outcome = self.run_steps(prompts, &mut on_update).await;

        if let Err(ref err) = outcome {
            error!(error = %err, "Error generating email copy");
            on_update(GenerationUpdate::Failed);
        }
        on_update(GenerationUpdate::Finished);

        outcome
    }

    async fn run_steps<F>(&self, prompts: &EmailPrompts, on_update: &mut F) -> Result<(), CompletionError>
    where
        F: FnMut(GenerationUpdate),
    {
        info!(model = %self.settings.model, "generating subject line");
        let subject = self.complete(&prompts.subject, self.settings.subject_max_tokens).await?;
        on_update(GenerationUpdate::Subject(subject.trim().to_string()));

        info!(model = %self.settings.model, "generating body message");
        let body = self.complete(&prompts.body, self.settings.body_max_tokens).await?;
        on_update(GenerationUpdate::Body(body.trim().to_string()));

        Ok(())
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(self.settings.system_prompt.as_str()),
                ChatMessage::user(prompt),
            ],
            max_tokens,
            temperature: self.settings.temperature,
        };
        self.service.complete(&request).await
    }
}
