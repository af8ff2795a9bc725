use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Instant;
use tokio::runtime::Runtime;

use crate::error::{OptimizerError, Result};
use crate::prompts::build_refinement_prompt;
use crate::types::{OptimizerConfig, Refinement, RefinementStep, StopReason, Usage};

/// Gemini's OpenAI-compatible endpoint, the default backend.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Normalize one model response: trim surrounding whitespace, reject blanks.
fn clean_response(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Outcome of a single refinement call
enum StepOutcome {
    /// The model produced usable text
    Refined { prompt: String, usage: Usage },
    /// The call succeeded but carried no usable text
    Empty,
    /// The call failed
    Failed(OptimizerError),
}

/// Iterative prompt optimizer
///
/// Holds one client handle, created at construction with an explicit
/// credential and reused across iterations.
pub struct Optimizer {
    config: OptimizerConfig,
    client: Client<OpenAIConfig>,
    runtime: Runtime,
}

impl Optimizer {
    /// Create a new optimizer against the default Gemini endpoint.
    ///
    /// Reads GEMINI_API_KEY from the environment.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| OptimizerError::MissingApiKey)?;
        Self::with_base_url_and_key(config, DEFAULT_BASE_URL, &api_key)
    }

    /// Create with explicit API key
    pub fn with_api_key(config: OptimizerConfig, api_key: &str) -> Result<Self> {
        Self::with_base_url_and_key(config, DEFAULT_BASE_URL, api_key)
    }

    /// Create with custom base URL (for Ollama, local models, etc.)
    pub fn with_base_url(config: OptimizerConfig, base_url: &str) -> Result<Self> {
        // Local backends don't check the key
        Self::with_base_url_and_key(config, base_url, "unused")
    }

    /// Create with custom base URL and API key
    pub fn with_base_url_and_key(
        config: OptimizerConfig,
        base_url: &str,
        api_key: &str,
    ) -> Result<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);
        let client = Client::with_config(openai_config);
        let runtime = Runtime::new()?;
        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    /// Refine `initial_prompt` through up to `iterations` sequential passes.
    ///
    /// Each pass wraps the current prompt in the refinement instructions,
    /// sends it to the model, and replaces the current prompt with the
    /// trimmed response. The loop stops early on the first failed call or
    /// empty response, keeping the last successful prompt. Once the
    /// iteration count has been validated the loop always returns a
    /// result; the worst case is the initial prompt unchanged.
    pub fn optimize(&self, initial_prompt: &str, iterations: u32) -> Result<Refinement> {
        if iterations == 0 {
            return Err(OptimizerError::InvalidIterations(iterations));
        }

        let start = Instant::now();
        let mut current = initial_prompt.to_string();
        let mut steps: Vec<RefinementStep> = Vec::new();
        let mut total_usage = Usage::default();
        let mut stop = StopReason::Completed;

        for iteration in 1..=iterations {
            let iter_start = Instant::now();

            match self.refine_step(&current) {
                StepOutcome::Refined { prompt, usage } => {
                    total_usage.add(&usage);
                    current = prompt.clone();

                    tracing::info!(iteration, chars = current.len(), "prompt refined");
                    if self.config.progress {
                        println!("Iteration {}: {}", iteration, current);
                    }

                    steps.push(RefinementStep {
                        iteration,
                        prompt,
                        usage,
                        execution_time: iter_start.elapsed(),
                    });
                }
                StepOutcome::Empty => {
                    tracing::warn!(iteration, "model returned an empty response");
                    if self.config.progress {
                        eprintln!(
                            "Warning: empty response in iteration {}, stopping",
                            iteration
                        );
                    }
                    stop = StopReason::EmptyResponse { iteration };
                    break;
                }
                StepOutcome::Failed(err) => {
                    tracing::error!(iteration, error = %err, "refinement call failed");
                    if self.config.progress {
                        eprintln!("Error in iteration {}: {}", iteration, err);
                    }
                    stop = StopReason::Upstream {
                        iteration,
                        message: err.to_string(),
                    };
                    break;
                }
            }
        }

        Ok(Refinement {
            initial_prompt: initial_prompt.to_string(),
            prompt: current,
            steps,
            stop,
            usage: total_usage,
            execution_time: start.elapsed(),
        })
    }

    /// Run one refinement pass over `current`
    fn refine_step(&self, current: &str) -> StepOutcome {
        let request = match self.build_request(current) {
            Ok(request) => request,
            Err(err) => return StepOutcome::Failed(err),
        };

        let response = self
            .runtime
            .block_on(async { self.client.chat().create(request).await });
        let response = match response {
            Ok(response) => response,
            Err(err) => return StepOutcome::Failed(err.into()),
        };

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens as u64, u.completion_tokens as u64))
            .unwrap_or_default();

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        match clean_response(&content) {
            Some(prompt) => StepOutcome::Refined { prompt, usage },
            None => StepOutcome::Empty,
        }
    }

    fn build_request(&self, current: &str) -> Result<CreateChatCompletionRequest> {
        let message = ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(build_refinement_prompt(current))
                .build()?,
        );

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(vec![message])
            .temperature(self.config.temperature);

        if let Some(max_tokens) = self.config.max_tokens {
            request_builder.max_tokens(max_tokens);
        }

        Ok(request_builder.build()?)
    }
}
