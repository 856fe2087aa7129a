//! Structured output helpers: prompt instructions and lenient JSON parsing.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

/// Model output that could not be read as the expected JSON
#[derive(Debug, thiserror::Error)]
#[error("Failed to parse model output: {message}")]
pub struct OutputParseError {
    pub message: String,
    pub output: String,
}

/// Instructions telling the model to answer with JSON matching `schema`
pub fn format_instructions(schema: &Value) -> String {
    let schema = serde_json::to_string(schema).unwrap_or_default();
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
         Here is the output schema:\n```\n{}\n```\n\
         Answer with the JSON object only.",
        schema
    )
}

fn fence_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").ok())
        .as_ref()
}

/// Parse model output as `T`, accepting raw JSON or JSON inside a Markdown code fence
pub fn parse_json<T: DeserializeOwned>(output: &str) -> Result<T, OutputParseError> {
    let trimmed = output.trim();

    let fenced = fence_pattern()
        .and_then(|re| re.captures(trimmed))
        .and_then(|c| c.get(1));

    let candidate = match fenced {
        Some(inner) => inner.as_str(),
        None => trimmed,
    };

    serde_json::from_str(candidate).map_err(|e| OutputParseError {
        message: e.to_string(),
        output: output.to_string(),
    })
}
