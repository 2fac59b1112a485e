//! Wire types for the `generateContent` REST call.

use super::GeminiConfig;
use gamesmith_core::NormalizedPrompt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn new(prompt: &'a NormalizedPrompt, config: &GeminiConfig) -> Self {
        Self {
            system_instruction: RequestContent {
                role: None,
                parts: vec![RequestPart {
                    text: *prompt.system_instruction(),
                }],
            },
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart {
                    text: prompt.user_text(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: *config.temperature(),
                max_output_tokens: *config.max_output_tokens(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or why there is none.
    pub(crate) fn into_text(self) -> Result<String, String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(format!("response has no candidates ({})", reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "unknown".to_string());
            return Err(format!("candidate has no text (finish reason: {})", reason));
        }

        Ok(text)
    }
}

/// Error envelope Google APIs return with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeminiConfigBuilder;
    use gamesmith_core::normalize;

    #[test]
    fn test_request_shape() {
        let prompt = normalize("A memory game with flags of Europe").unwrap();
        let config = GeminiConfigBuilder::default().api_key("k").build().unwrap();
        let json = serde_json::to_value(GenerateContentRequest::new(&prompt, &config)).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Create an educational game: A memory game with flags of Europe"
        );
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"<html>"},{"text":"</html>"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "<html></html>");
    }

    #[test]
    fn test_blocked_prompt_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.contains("SAFETY"));
    }

    #[test]
    fn test_empty_candidate() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        assert!(response.into_text().unwrap_err().contains("MAX_TOKENS"));
    }
}
