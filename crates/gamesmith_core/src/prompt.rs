//! Prompt normalization.
//!
//! Turns raw user text into the deterministic instruction sent to the backend.
//! The system instruction is a versioned constant; users only ever control the
//! game description embedded in the user turn.

use derive_getters::Getters;
use gamesmith_error::{PromptError, PromptErrorKind};
use serde::{Deserialize, Serialize};

/// Version of [`SYSTEM_INSTRUCTION`]. Bump whenever the instruction text changes.
pub const SYSTEM_INSTRUCTION_VERSION: u32 = 1;

/// Fixed instruction constraining the backend's output shape.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert educational game developer. Your task is to create a complete, \
self-contained HTML game based on the user's prompt.

CRITICAL REQUIREMENTS:
1. Generate a SINGLE, complete HTML file that includes ALL code
2. Include ALL CSS inside a <style> tag in the <head>
3. Include ALL JavaScript inside a <script> tag before </body>
4. DO NOT use any external libraries, CDNs, or imports
5. The game MUST be playable immediately when opened in a browser
6. Use only vanilla HTML, CSS, and JavaScript

GAME DESIGN GUIDELINES:
1. Make the game educational and age-appropriate based on the prompt
2. Include clear instructions on how to play
3. Implement a scoring system that provides feedback
4. Add visual feedback for correct/incorrect answers (colors, animations)
5. Include a way to restart or play again
6. Make the UI clean, readable, and touch-friendly for children
7. Use bright, engaging colors appropriate for educational games
8. Ensure the game is responsive and works on different screen sizes

OUTPUT FORMAT:
- Return ONLY the HTML code, nothing else
- Do NOT include markdown code blocks or any explanation
- Start with <!DOCTYPE html> and end with </html>
- The response should be valid HTML that can be saved directly as a .html file";

/// Prefix placed in front of the user's game description.
const USER_PREFIX: &str = "Create an educational game: ";

/// Length bounds applied to user prompts, in characters after trimming.
///
/// # Examples
///
/// ```
/// use gamesmith_core::PromptPolicy;
///
/// let policy = PromptPolicy::default();
/// assert!(policy.normalize("A quiz about the planets of the solar system").is_ok());
/// assert!(policy.normalize("   ").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptPolicy {
    /// Shortest accepted prompt
    pub min_chars: usize,
    /// Longest accepted prompt
    pub max_chars: usize,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 1000,
        }
    }
}

impl PromptPolicy {
    /// Validate `raw` and wrap it with the system instruction.
    ///
    /// # Errors
    ///
    /// - [`PromptErrorKind::Empty`] for empty or whitespace-only input
    /// - [`PromptErrorKind::TooShort`] below `min_chars`
    /// - [`PromptErrorKind::TooLong`] above `max_chars`
    pub fn normalize(&self, raw: &str) -> Result<NormalizedPrompt, PromptError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PromptError::new(PromptErrorKind::Empty));
        }

        let actual = trimmed.chars().count();
        if actual > self.max_chars {
            return Err(PromptError::new(PromptErrorKind::TooLong {
                max: self.max_chars,
                actual,
            }));
        }
        if actual < self.min_chars {
            return Err(PromptError::new(PromptErrorKind::TooShort {
                min: self.min_chars,
                actual,
            }));
        }

        Ok(NormalizedPrompt {
            system_instruction: SYSTEM_INSTRUCTION,
            instruction_version: SYSTEM_INSTRUCTION_VERSION,
            user_text: format!("{}{}", USER_PREFIX, trimmed),
        })
    }
}

/// Normalize with the default [`PromptPolicy`].
pub fn normalize(raw: &str) -> Result<NormalizedPrompt, PromptError> {
    PromptPolicy::default().normalize(raw)
}

/// A validated prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct NormalizedPrompt {
    /// Fixed instruction constraining output shape
    #[getter(skip)]
    system_instruction: &'static str,
    /// Version of the system instruction in use
    instruction_version: u32,
    /// User turn containing the game description
    user_text: String,
}

impl NormalizedPrompt {
    /// Get field `system_instruction` from instance of `NormalizedPrompt`.
    pub fn system_instruction(&self) -> &&'static str {
        &self.system_instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_trimmed_text() {
        let prompt = normalize("  Multiplication tables for 8 year olds \n").unwrap();
        assert_eq!(
            prompt.user_text(),
            "Create an educational game: Multiplication tables for 8 year olds"
        );
        assert_eq!(*prompt.system_instruction(), SYSTEM_INSTRUCTION);
        assert_eq!(*prompt.instruction_version(), SYSTEM_INSTRUCTION_VERSION);
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        for raw in ["", " ", "\n\t  \r\n"] {
            let err = normalize(raw).unwrap_err();
            assert_eq!(err.kind, PromptErrorKind::Empty);
        }
    }

    #[test]
    fn test_rejects_too_long() {
        let policy = PromptPolicy {
            min_chars: 1,
            max_chars: 20,
        };
        let err = policy.normalize(&"a".repeat(21)).unwrap_err();
        assert_eq!(err.kind, PromptErrorKind::TooLong { max: 20, actual: 21 });
        assert!(policy.normalize(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn test_rejects_too_short() {
        let err = normalize("quiz").unwrap_err();
        assert_eq!(err.kind, PromptErrorKind::TooShort { min: 10, actual: 4 });
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let policy = PromptPolicy {
            min_chars: 1,
            max_chars: 5,
        };
        // five characters, fifteen bytes
        assert!(policy.normalize("日本語日本").is_ok());
    }

    #[test]
    fn test_is_deterministic() {
        let raw = "A spelling bee with animal names";
        assert_eq!(normalize(raw).unwrap(), normalize(raw).unwrap());
    }
}
