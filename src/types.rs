use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model when none is configured.
///
/// Matches the Gemini OpenAI-compatible endpoint; see
/// [`crate::DEFAULT_BASE_URL`].
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
        }
    }

    /// Accumulate usage from another instance
    pub fn add(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Why the refinement loop stopped.
///
/// `EmptyResponse` and `Upstream` carry the 1-based index of the
/// iteration that stopped the loop; the prompt from the iteration before
/// it is what the loop returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// All requested iterations ran.
    Completed,
    /// The model returned no usable text.
    EmptyResponse { iteration: u32 },
    /// The endpoint call failed.
    Upstream { iteration: u32, message: String },
}

/// One successful refinement pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementStep {
    /// 1-based iteration index
    pub iteration: u32,
    /// The refined prompt after trimming
    pub prompt: String,
    pub usage: Usage,
    #[serde(with = "duration_secs")]
    pub execution_time: Duration,
}

/// Final result of a refinement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refinement {
    pub initial_prompt: String,
    /// Best-known prompt: the last successful iteration's output, or the
    /// initial prompt if the first call failed.
    pub prompt: String,
    pub steps: Vec<RefinementStep>,
    pub stop: StopReason,
    pub usage: Usage,
    #[serde(with = "duration_secs")]
    pub execution_time: Duration,
}

/// Configuration for the optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Print per-iteration progress to the console
    pub progress: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            progress: false,
        }
    }
}

impl OptimizerConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn with_progress(mut self, v: bool) -> Self {
        self.progress = v;
        self
    }
}

/// duration_secs module for Duration serialization
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_accumulates() {
        let mut total = Usage::new(10, 5);
        total.add(&Usage::new(7, 3));

        assert_eq!(total.input_tokens, 17);
        assert_eq!(total.output_tokens, 8);
        assert_eq!(total.total_tokens, 25);
    }

    #[test]
    fn test_stop_reason_tags() {
        let stop = StopReason::Upstream {
            iteration: 2,
            message: "connection refused".to_string(),
        };
        let json = serde_json::to_value(&stop).unwrap();

        assert_eq!(json["reason"], "upstream");
        assert_eq!(json["iteration"], 2);
    }
}
